// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wire-level response envelopes.
//!
//! Successful responses are wrapped in [`SuccessEnvelope`], failures in
//! [`ErrorEnvelope`] (a simplified RFC 7807 problem document). Optional
//! fields are omitted from the JSON, never serialized as `null`.

use axum::{
    http::{
        header::{ALLOW, RETRY_AFTER},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::kind::ErrorKind;

// =============================================================================
// Success
// =============================================================================

/// Envelope for every successful response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessEnvelope<T> {
    success: bool,
    status: u16,
    message: String,
    /// Absent for operations without a payload (e.g. deletes).
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    timestamp: DateTime<Utc>,
}

impl<T> SuccessEnvelope<T> {
    /// Envelope with an arbitrary success status.
    pub fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            status: status.as_u16(),
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK)
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

impl<T: Serialize> IntoResponse for SuccessEnvelope<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Envelope for every error response. `success` is always `false`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    success: bool,
    error: ErrorDetail,
}

impl ErrorEnvelope {
    pub fn new(error: ErrorDetail) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

impl From<ErrorDetail> for ErrorEnvelope {
    fn from(error: ErrorDetail) -> Self {
        Self::new(error)
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let status = self.error.kind.status();
        let retry_after = self.error.retry_after;
        let allow = self
            .error
            .allowed_methods
            .as_ref()
            .and_then(|methods| HeaderValue::from_str(&methods.join(", ")).ok());

        let mut response = (status, Json(self)).into_response();
        let headers = response.headers_mut();
        if let Some(seconds) = retry_after {
            headers.insert(RETRY_AFTER, HeaderValue::from(seconds));
        }
        if let Some(allow) = allow {
            headers.insert(ALLOW, allow);
        }
        response
    }
}

/// Problem details for one failed request.
///
/// `title` and `status` are always taken from [`ErrorKind`]; there is no way
/// to set them independently.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Error category, e.g. `VALIDATION_ERROR`.
    #[serde(rename = "type")]
    kind: ErrorKind,
    /// Application-specific code, e.g. `USER.NOT_FOUND`.
    code: String,
    #[schema(value_type = String)]
    title: &'static str,
    status: u16,
    detail: String,
    timestamp: DateTime<Utc>,
    /// Request path the error occurred on.
    path: String,
    #[serde(rename = "errors", skip_serializing_if = "Option::is_none")]
    field_errors: Option<Vec<FieldError>>,
    /// Correlation id, populated for 5xx-class kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    /// Seconds to wait before retrying (rate limits).
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
    /// Methods accepted on this path (405 responses).
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_methods: Option<Vec<String>>,
}

impl ErrorDetail {
    pub fn new(
        kind: ErrorKind,
        code: impl Into<String>,
        detail: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let (title, status) = kind.lookup();
        Self {
            kind,
            code: code.into(),
            title,
            status: status.as_u16(),
            detail: detail.into(),
            timestamp: Utc::now(),
            path: path.into(),
            field_errors: None,
            trace_id: None,
            retry_after: None,
            allowed_methods: None,
        }
    }

    pub fn with_field_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.field_errors = Some(errors);
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    pub fn with_allowed_methods(mut self, methods: Vec<String>) -> Self {
        self.allowed_methods = Some(methods);
        self
    }
}

/// One failed validation constraint.
///
/// Serialized keys keep the order `field, message, rejectedValue, code`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// The submitted value that was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub rejected_value: Option<serde_json::Value>,
    /// Machine-readable constraint code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rejected_value: None,
            code: None,
        }
    }

    pub fn with_rejected_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.rejected_value = Some(value.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}
