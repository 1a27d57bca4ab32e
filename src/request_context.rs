// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request metadata used when rendering error envelopes.
//!
//! ```rust,ignore
//! async fn handler(ctx: RequestContext) -> Result<Json<T>, ApiError> {
//!     Err(ApiError::not_found("USER.NOT_FOUND", "No such user").at(&ctx))
//! }
//! ```

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Header carrying a caller-supplied correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Path reported when the request path is not known.
pub const UNKNOWN_PATH: &str = "unknown";

/// Request path and correlation id of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub request_id: String,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            request_id: request_id.into(),
        }
    }

    /// Build from request parts, generating a request id when the header is
    /// missing or blank.
    pub fn from_parts(parts: &Parts) -> Self {
        let path = parts.uri.path();
        let path = if path.is_empty() { UNKNOWN_PATH } else { path };
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(generate_trace_id);
        Self::new(path, request_id)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// Fresh correlation id (UUID v4).
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}
