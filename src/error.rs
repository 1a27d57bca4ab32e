// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Method,
    response::{IntoResponse, Response},
};

use crate::{
    request_context::{generate_trace_id, RequestContext, UNKNOWN_PATH},
    response::{builder, ErrorContext, ErrorEnvelope, ErrorKind, FieldError},
};

/// Handler error, rendered as an [`ErrorEnvelope`].
///
/// The kind must be chosen by the handler; anything not otherwise classified
/// is [`ErrorKind::InternalServerError`].
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub path: String,
    pub context: ErrorContext,
}

impl ApiError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            path: UNKNOWN_PATH.to_string(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceNotFound, code, message)
    }

    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, code, message)
    }

    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        let mut error = Self::new(ErrorKind::ValidationError, "VALIDATION.FAILED", message);
        error.context.field_errors = Some(errors);
        error
    }

    pub fn method_not_allowed(method: &Method, allowed: &[Method]) -> Self {
        let mut error = Self::new(
            ErrorKind::MethodNotAllowed,
            "HTTP.METHOD_NOT_ALLOWED",
            format!("Method {method} is not supported on this path"),
        );
        error.context.allowed_methods = Some(allowed.iter().map(ToString::to_string).collect());
        error
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::InternalServerError,
            "INTERNAL.UNEXPECTED",
            message,
        )
    }

    /// Attach the request path, and the request id as trace id for 5xx kinds.
    pub fn at(mut self, ctx: &RequestContext) -> Self {
        self.path = ctx.path.clone();
        if self.kind.is_server_error() && self.context.trace_id.is_none() {
            self.context.trace_id = Some(ctx.request_id.clone());
        }
        self
    }

    pub fn into_envelope(self) -> ErrorEnvelope {
        builder::error(self.kind, self.code, self.message, self.path, self.context)
    }
}

impl IntoResponse for ApiError {
    fn into_response(mut self) -> Response {
        if self.kind.is_server_error() {
            let trace_id = self
                .context
                .trace_id
                .get_or_insert_with(generate_trace_id)
                .clone();
            tracing::error!(
                kind = %self.kind,
                code = %self.code,
                path = %self.path,
                trace_id = %trace_id,
                "Request failed: {}",
                self.message
            );
        } else {
            tracing::debug!(
                kind = %self.kind,
                code = %self.code,
                path = %self.path,
                "Request rejected"
            );
        }
        self.into_envelope().into_response()
    }
}
