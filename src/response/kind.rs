// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Closed error taxonomy.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Every error surfaced by the API belongs to exactly one of these kinds.
///
/// The kind fixes the HTTP status and the human title of the error, so
/// callers only ever supply the situational detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed request
    BadRequest,
    /// One or more fields failed validation
    ValidationError,
    /// Missing or invalid credentials
    AuthenticationError,
    /// Authenticated but not allowed
    AuthorizationError,
    /// The addressed resource does not exist
    ResourceNotFound,
    /// The path exists but not for this method
    MethodNotAllowed,
    /// The resource already exists
    ResourceConflict,
    /// Request body media type is not accepted
    UnsupportedMediaType,
    /// Well-formed request rejected by a business rule
    BusinessLogicError,
    /// Caller exceeded its rate limit
    RateLimitError,
    /// Unexpected server-side failure
    InternalServerError,
    /// A dependency or the service itself is down
    ServiceUnavailable,
    /// An upstream call timed out
    GatewayTimeout,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ErrorKind; 13] = [
        ErrorKind::BadRequest,
        ErrorKind::ValidationError,
        ErrorKind::AuthenticationError,
        ErrorKind::AuthorizationError,
        ErrorKind::ResourceNotFound,
        ErrorKind::MethodNotAllowed,
        ErrorKind::ResourceConflict,
        ErrorKind::UnsupportedMediaType,
        ErrorKind::BusinessLogicError,
        ErrorKind::RateLimitError,
        ErrorKind::InternalServerError,
        ErrorKind::ServiceUnavailable,
        ErrorKind::GatewayTimeout,
    ];

    /// Title and status for this kind.
    pub fn lookup(self) -> (&'static str, StatusCode) {
        (self.title(), self.status())
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::ValidationError => "Validation Failed",
            ErrorKind::AuthenticationError => "Authentication Failed",
            ErrorKind::AuthorizationError => "Access Denied",
            ErrorKind::ResourceNotFound => "Resource Not Found",
            ErrorKind::MethodNotAllowed => "Method Not Allowed",
            ErrorKind::ResourceConflict => "Resource Already Exists",
            ErrorKind::UnsupportedMediaType => "Unsupported Media Type",
            ErrorKind::BusinessLogicError => "Business Rule Violation",
            ErrorKind::RateLimitError => "Rate Limit Exceeded",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
            ErrorKind::GatewayTimeout => "Gateway Timeout",
        }
    }

    /// HTTP status code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest | ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::AuthenticationError => StatusCode::UNAUTHORIZED,
            ErrorKind::AuthorizationError => StatusCode::FORBIDDEN,
            ErrorKind::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::ResourceConflict => StatusCode::CONFLICT,
            ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::BusinessLogicError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::RateLimitError => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Whether this kind is a 5xx-class failure (these carry a trace id).
    pub fn is_server_error(self) -> bool {
        self.status().is_server_error()
    }

    /// Wire identifier, e.g. `VALIDATION_ERROR`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::AuthenticationError => "AUTHENTICATION_ERROR",
            ErrorKind::AuthorizationError => "AUTHORIZATION_ERROR",
            ErrorKind::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorKind::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorKind::ResourceConflict => "RESOURCE_CONFLICT",
            ErrorKind::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            ErrorKind::BusinessLogicError => "BUSINESS_LOGIC_ERROR",
            ErrorKind::RateLimitError => "RATE_LIMIT_ERROR",
            ErrorKind::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorKind::GatewayTimeout => "GATEWAY_TIMEOUT",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
