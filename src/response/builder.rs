// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Helpers that produce fully-formed envelopes from handler results.
//!
//! Every function here is pure apart from capturing the current time.

use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    envelope::{ErrorDetail, ErrorEnvelope, FieldError, SuccessEnvelope},
    kind::ErrorKind,
    page::{PageInfo, PageSource},
};

// =============================================================================
// Payload shapes
// =============================================================================

/// `data` of a paginated response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedData<T, F = serde_json::Value> {
    pub content: Vec<T>,
    pub page: PageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<F>,
}

/// Counts of a batch operation, always derived from the item lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct BatchSummary {
    pub total: usize,
    #[serde(rename = "successful")]
    pub successful_count: usize,
    #[serde(rename = "failed")]
    pub failed_count: usize,
}

/// `data` of a batch response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchData<S, F> {
    pub summary: BatchSummary,
    pub successful: Vec<S>,
    pub failed: Vec<F>,
}

/// `data` of a 202 response for work that continues after the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsyncJob {
    pub job_id: String,
    pub status: String,
    /// Estimated completion time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_url: Option<String>,
}

/// Optional context of an error response.
///
/// `trace_id` is expected for 5xx kinds, `retry_after` for rate limits and
/// `allowed_methods` for 405s. Nothing here enforces that pairing.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub field_errors: Option<Vec<FieldError>>,
    pub trace_id: Option<String>,
    pub retry_after: Option<u64>,
    pub allowed_methods: Option<Vec<String>>,
}

// =============================================================================
// Success
// =============================================================================

/// 200 OK with a payload.
pub fn success<T>(message: impl Into<String>, data: T) -> SuccessEnvelope<T> {
    SuccessEnvelope::with_status(StatusCode::OK, message, Some(data))
}

/// 201 Created with a payload.
pub fn created<T>(message: impl Into<String>, data: T) -> SuccessEnvelope<T> {
    SuccessEnvelope::with_status(StatusCode::CREATED, message, Some(data))
}

/// 202 Accepted with a payload.
pub fn accepted<T>(message: impl Into<String>, data: T) -> SuccessEnvelope<T> {
    SuccessEnvelope::with_status(StatusCode::ACCEPTED, message, Some(data))
}

/// 200 OK without a payload (e.g. deletes).
pub fn success_no_data<T>(message: impl Into<String>) -> SuccessEnvelope<T> {
    SuccessEnvelope::with_status(StatusCode::OK, message, None)
}

pub fn paginated<P>(message: impl Into<String>, page: P) -> SuccessEnvelope<PaginatedData<P::Item>>
where
    P: PageSource,
{
    let info = PageInfo::from_page(&page);
    success(
        message,
        PaginatedData {
            content: page.into_content(),
            page: info,
            filters: None,
        },
    )
}

/// Paginated response echoing the filters that produced it.
pub fn paginated_with_filters<P, F>(
    message: impl Into<String>,
    page: P,
    filters: F,
) -> SuccessEnvelope<PaginatedData<P::Item, F>>
where
    P: PageSource,
{
    let info = PageInfo::from_page(&page);
    success(
        message,
        PaginatedData {
            content: page.into_content(),
            page: info,
            filters: Some(filters),
        },
    )
}

/// Empty list response, used instead of a not-found error on list endpoints.
pub fn empty_collection<T>(
    message: impl Into<String>,
    page_size: u32,
) -> SuccessEnvelope<PaginatedData<T>> {
    success(
        message,
        PaginatedData {
            content: Vec::new(),
            page: PageInfo::empty(page_size),
            filters: None,
        },
    )
}

/// Empty list response that still echoes the filters which matched nothing.
pub fn empty_collection_with_filters<T, F>(
    message: impl Into<String>,
    page_size: u32,
    filters: F,
) -> SuccessEnvelope<PaginatedData<T, F>> {
    success(
        message,
        PaginatedData {
            content: Vec::new(),
            page: PageInfo::empty(page_size),
            filters: Some(filters),
        },
    )
}

pub fn batch<S, F>(
    message: impl Into<String>,
    total: usize,
    successful: Vec<S>,
    failed: Vec<F>,
) -> SuccessEnvelope<BatchData<S, F>> {
    let summary = BatchSummary {
        total,
        successful_count: successful.len(),
        failed_count: failed.len(),
    };
    success(
        message,
        BatchData {
            summary,
            successful,
            failed,
        },
    )
}

/// 202 Accepted describing a background job.
pub fn async_accepted(
    message: impl Into<String>,
    job_id: impl Into<String>,
    status: impl Into<String>,
    estimated_seconds: Option<u64>,
    status_url: Option<String>,
) -> SuccessEnvelope<AsyncJob> {
    accepted(
        message,
        AsyncJob {
            job_id: job_id.into(),
            status: status.into(),
            estimated_time: estimated_seconds,
            status_url,
        },
    )
}

// =============================================================================
// Errors
// =============================================================================

pub fn error(
    kind: ErrorKind,
    code: impl Into<String>,
    detail: impl Into<String>,
    path: impl Into<String>,
    context: ErrorContext,
) -> ErrorEnvelope {
    let mut detail = ErrorDetail::new(kind, code, detail, path);
    if let Some(errors) = context.field_errors {
        detail = detail.with_field_errors(errors);
    }
    if let Some(trace_id) = context.trace_id {
        detail = detail.with_trace_id(trace_id);
    }
    if let Some(seconds) = context.retry_after {
        detail = detail.with_retry_after(seconds);
    }
    if let Some(methods) = context.allowed_methods {
        detail = detail.with_allowed_methods(methods);
    }
    ErrorEnvelope::new(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::page::SlicePage;
    use serde_json::{json, Value};

    fn to_json<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn status_constructors() {
        assert_eq!(success("ok", 1).status(), StatusCode::OK);
        assert_eq!(created("made", 1).status(), StatusCode::CREATED);
        assert_eq!(accepted("queued", 1).status(), StatusCode::ACCEPTED);

        let deleted = success_no_data::<()>("Deleted");
        assert_eq!(deleted.status(), StatusCode::OK);
        assert!(deleted.data().is_none());
        let json = to_json(&deleted);
        assert!(json.get("data").is_none());
        assert_eq!(json["message"], "Deleted");
    }

    #[test]
    fn paginated_wraps_content_and_page() {
        let page = SlicePage::new(vec!["a", "b", "c"], 0, 2);
        let json = to_json(&paginated("Listed", page));

        assert_eq!(json["data"]["content"], json!(["a", "b"]));
        assert_eq!(json["data"]["page"]["totalElements"], 3);
        assert_eq!(json["data"]["page"]["totalPages"], 2);
        assert!(json["data"].get("filters").is_none());
    }

    #[test]
    fn paginated_with_filters_echoes_filters() {
        let page = SlicePage::new(vec![1, 2], 0, 10);
        let envelope = paginated_with_filters("Listed", page, json!({"tag": "admin"}));
        let json = to_json(&envelope);
        assert_eq!(json["data"]["filters"]["tag"], "admin");
    }

    #[test]
    fn empty_collection_has_zeroed_page() {
        let json = to_json(&empty_collection::<String>("Nothing yet", 25));
        assert_eq!(json["status"], 200);
        assert_eq!(json["data"]["content"], json!([]));
        assert_eq!(
            json["data"]["page"],
            json!({"number": 0, "size": 25, "totalElements": 0, "totalPages": 0})
        );
        assert!(json["data"].get("filters").is_none());
    }

    #[test]
    fn empty_collection_with_filters_keeps_the_echo() {
        let filters = json!({"public": false});
        let envelope = empty_collection_with_filters::<String, _>("Nothing matches", 10, filters);
        let json = to_json(&envelope);

        assert_eq!(json["data"]["content"], json!([]));
        assert_eq!(json["data"]["page"]["size"], 10);
        assert_eq!(json["data"]["page"]["totalElements"], 0);
        assert_eq!(json["data"]["filters"], json!({"public": false}));
    }

    #[test]
    fn batch_counts_come_from_the_lists() {
        let envelope = batch("Processed", 5, vec!["a", "b", "c"], vec!["x", "y"]);
        let json = to_json(&envelope);
        assert_eq!(
            json["data"]["summary"],
            json!({"total": 5, "successful": 3, "failed": 2})
        );
        assert_eq!(json["data"]["successful"], json!(["a", "b", "c"]));

        let mismatched = batch::<&str, &str>("Processed", 10, vec![], vec!["x"]);
        let summary = mismatched.data().unwrap().summary;
        assert_eq!(summary.successful_count, 0);
        assert_eq!(summary.failed_count, 1);
        assert_eq!(summary.total, 10);
    }

    #[test]
    fn async_accepted_omits_absent_estimates() {
        let envelope = async_accepted("Started", "job-1", "PENDING", None, None);
        assert_eq!(envelope.status(), StatusCode::ACCEPTED);
        let json = to_json(&envelope);
        assert_eq!(json["data"], json!({"jobId": "job-1", "status": "PENDING"}));

        let full = async_accepted(
            "Started",
            "job-2",
            "RUNNING",
            Some(30),
            Some("/v1/jobs/job-2".into()),
        );
        let json = to_json(&full);
        assert_eq!(json["data"]["estimatedTime"], 30);
        assert_eq!(json["data"]["statusUrl"], "/v1/jobs/job-2");
    }

    #[test]
    fn error_accepts_whatever_context_is_passed() {
        let envelope = error(
            ErrorKind::ValidationError,
            "VALIDATION.FAILED",
            "Request has invalid fields",
            "/v1/users",
            ErrorContext {
                field_errors: Some(vec![
                    FieldError::new("email", "must not be blank"),
                    FieldError::new("age", "must be positive").with_rejected_value(-1),
                ]),
                trace_id: Some("trace-1".into()),
                ..ErrorContext::default()
            },
        );
        let json = to_json(&envelope);
        let error = &json["error"];

        assert_eq!(error["type"], "VALIDATION_ERROR");
        assert_eq!(error["status"], 400);
        assert_eq!(error["errors"][0]["field"], "email");
        assert_eq!(error["errors"][1]["rejectedValue"], -1);
        assert_eq!(error["traceId"], "trace-1");
        assert!(error.get("retryAfter").is_none());
        assert!(error.get("allowedMethods").is_none());
    }
}
