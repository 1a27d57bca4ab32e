// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Metadata endpoints: the error taxonomy and the declared endpoint contracts.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    contract::{EndpointContract, EndpointId, EndpointMetadata, RateLimitDescriptor},
    error::ApiError,
    request_context::RequestContext,
    response::{
        builder::{self, BatchData, PaginatedData},
        ErrorEnvelope, ErrorKind, FieldError, SlicePage, SuccessEnvelope,
    },
    state::AppState,
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Views
// =============================================================================

/// One entry of the error taxonomy.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorTypeInfo {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub title: String,
    pub status: u16,
}

/// Declared contract of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractView {
    pub method: String,
    pub path: String,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
}

impl ContractView {
    pub fn new(endpoint: &EndpointId, contract: &EndpointContract) -> Self {
        Self {
            method: endpoint.method.to_string(),
            path: endpoint.path.clone(),
            public: contract.is_public(),
            rate_limit: contract.rate_limit,
            permissions: contract
                .permissions
                .as_ref()
                .map(|p| p.permissions().to_vec())
                .unwrap_or_default(),
            configuration: contract
                .configuration
                .as_ref()
                .map(|c| c.path().to_string()),
        }
    }
}

/// A contract submitted for validation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractCandidate {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub rate_limit: Option<RateLimitDescriptor>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub configuration: Option<String>,
}

/// A candidate that failed validation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RejectedContract {
    /// Position in the submitted list.
    pub index: usize,
    pub endpoint: String,
    pub errors: Vec<FieldError>,
}

/// Filters echoed back on filtered listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EndpointFilters {
    pub public: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEndpointsQuery {
    /// Page number (0-based).
    pub page: Option<u32>,
    /// Page size (1-100).
    pub size: Option<u32>,
    /// Only list public (`true`) or private (`false`) endpoints.
    pub public: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EndpointQuery {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Route template, e.g. `/v1/meta/endpoints`.
    pub path: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// List the error taxonomy.
///
/// Every error response carries one of these types, which fixes its HTTP
/// status and title.
#[utoipa::path(
    get,
    path = "/v1/meta/error-types",
    tag = "Meta",
    responses(
        (
            status = 200,
            description = "Error types in declaration order",
            body = SuccessEnvelope<Vec<ErrorTypeInfo>>
        )
    )
)]
pub async fn list_error_types() -> SuccessEnvelope<Vec<ErrorTypeInfo>> {
    let types = ErrorKind::ALL
        .into_iter()
        .map(|kind| ErrorTypeInfo {
            kind,
            title: kind.title().to_string(),
            status: kind.status().as_u16(),
        })
        .collect();
    builder::success("Error types retrieved", types)
}

/// List the declared endpoint contracts.
///
/// Contracts are listed in registration order.
#[utoipa::path(
    get,
    path = "/v1/meta/endpoints",
    params(ListEndpointsQuery),
    tag = "Contracts",
    responses(
        (
            status = 200,
            description = "A page of endpoint contracts",
            body = SuccessEnvelope<PaginatedData<ContractView, EndpointFilters>>
        ),
        (status = 400, description = "Invalid query", body = ErrorEnvelope)
    )
)]
pub async fn list_endpoints(
    State(state): State<AppState>,
    ctx: RequestContext,
    query: Result<Query<ListEndpointsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::bad_request("REQUEST.INVALID_QUERY", rejection.body_text()).at(&ctx)
    })?;

    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(ApiError::validation(
            "Request has invalid query parameters",
            vec![
                FieldError::new("size", format!("must be between 1 and {MAX_PAGE_SIZE}"))
                    .with_rejected_value(size)
                    .with_code("Range"),
            ],
        )
        .at(&ctx));
    }

    let wanted = |contract: &EndpointContract| {
        query
            .public
            .is_none_or(|public| contract.is_public() == public)
    };
    let views: Vec<ContractView> = state
        .contracts
        .iter()
        .filter(|(_, contract)| wanted(contract))
        .map(|(endpoint, contract)| ContractView::new(endpoint, contract))
        .collect();

    if views.is_empty() {
        let message = "No endpoint contracts match";
        let response = match query.public {
            Some(public) => builder::empty_collection_with_filters::<ContractView, _>(
                message,
                size,
                EndpointFilters { public },
            )
            .into_response(),
            None => builder::empty_collection::<ContractView>(message, size).into_response(),
        };
        return Ok(response);
    }

    let page = SlicePage::new(views, query.page.unwrap_or(0), size);
    let response = match query.public {
        Some(public) => builder::paginated_with_filters(
            "Endpoint contracts retrieved",
            page,
            EndpointFilters { public },
        )
        .into_response(),
        None => builder::paginated("Endpoint contracts retrieved", page).into_response(),
    };
    Ok(response)
}

/// Look up the contract of one endpoint.
#[utoipa::path(
    get,
    path = "/v1/meta/endpoint",
    params(EndpointQuery),
    tag = "Contracts",
    responses(
        (
            status = 200,
            description = "The endpoint contract",
            body = SuccessEnvelope<ContractView>
        ),
        (status = 400, description = "Invalid method or query", body = ErrorEnvelope),
        (
            status = 404,
            description = "No contract, or lookups are disabled",
            body = ErrorEnvelope
        )
    )
)]
pub async fn get_endpoint(
    State(state): State<AppState>,
    ctx: RequestContext,
    query: Result<Query<EndpointQuery>, QueryRejection>,
) -> Result<SuccessEnvelope<ContractView>, ApiError> {
    if !state.config.contract_lookup_enabled {
        return Err(ApiError::not_found(
            "FEATURE.DISABLED",
            "Contract lookups are disabled on this server",
        )
        .at(&ctx));
    }

    let Query(query) = query.map_err(|rejection| {
        ApiError::bad_request("REQUEST.INVALID_QUERY", rejection.body_text()).at(&ctx)
    })?;

    let method = parse_method(&query.method).ok_or_else(|| {
        ApiError::bad_request(
            "REQUEST.INVALID_METHOD",
            format!("`{}` is not an HTTP method", query.method),
        )
        .at(&ctx)
    })?;

    let endpoint = EndpointId::new(method, query.path);
    let contract = state.contracts.contract(&endpoint).ok_or_else(|| {
        ApiError::not_found(
            "CONTRACT.NOT_FOUND",
            format!("No contract is registered for {endpoint}"),
        )
        .at(&ctx)
    })?;

    Ok(builder::success(
        "Endpoint contract retrieved",
        ContractView::new(&endpoint, contract),
    ))
}

/// Validate candidate endpoint contracts.
///
/// Each candidate is checked independently; the response lists the accepted
/// contracts and the rejected ones with their field errors.
#[utoipa::path(
    post,
    path = "/v1/meta/endpoints/validate",
    request_body = [ContractCandidate],
    tag = "Contracts",
    responses(
        (
            status = 200,
            description = "Batch validation summary",
            body = SuccessEnvelope<BatchData<ContractView, RejectedContract>>
        ),
        (status = 400, description = "Empty or malformed body", body = ErrorEnvelope),
        (status = 415, description = "Body is not JSON", body = ErrorEnvelope)
    )
)]
pub async fn validate_contracts(
    ctx: RequestContext,
    body: Result<Json<Vec<ContractCandidate>>, JsonRejection>,
) -> Result<SuccessEnvelope<BatchData<ContractView, RejectedContract>>, ApiError> {
    let Json(candidates) = body.map_err(|rejection| json_rejection(rejection).at(&ctx))?;

    if candidates.is_empty() {
        return Err(ApiError::validation(
            "Request has invalid fields",
            vec![
                FieldError::new("contracts", "must contain at least one contract")
                    .with_code("NotEmpty"),
            ],
        )
        .at(&ctx));
    }

    let total = candidates.len();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for (index, candidate) in candidates.into_iter().enumerate() {
        match check_candidate(candidate) {
            Ok(view) => accepted.push(view),
            Err((endpoint, errors)) => rejected.push(RejectedContract {
                index,
                endpoint,
                errors,
            }),
        }
    }

    tracing::debug!(
        total,
        accepted = accepted.len(),
        rejected = rejected.len(),
        "Validated endpoint contracts"
    );
    Ok(builder::batch(
        "Endpoint contracts validated",
        total,
        accepted,
        rejected,
    ))
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_method(raw: &str) -> Option<Method> {
    let upper = raw.trim().to_uppercase();
    if upper.is_empty() || !upper.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Method::from_bytes(upper.as_bytes()).ok()
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            ErrorKind::UnsupportedMediaType,
            "REQUEST.UNSUPPORTED_MEDIA_TYPE",
            rejection.body_text(),
        ),
        _ => ApiError::bad_request("REQUEST.INVALID_BODY", rejection.body_text()),
    }
}

fn check_candidate(
    candidate: ContractCandidate,
) -> Result<ContractView, (String, Vec<FieldError>)> {
    let mut errors = Vec::new();
    let endpoint_label = format!("{} {}", candidate.method, candidate.path);

    let method = parse_method(&candidate.method);
    if method.is_none() {
        errors.push(
            FieldError::new("method", "is not an HTTP method")
                .with_rejected_value(candidate.method.clone())
                .with_code("HttpMethod"),
        );
    }
    if !candidate.path.starts_with('/') {
        errors.push(
            FieldError::new("path", "must start with '/'")
                .with_rejected_value(candidate.path.clone())
                .with_code("Pattern"),
        );
    }

    let mut contract = EndpointContract::new();
    if candidate.public {
        contract = contract.public();
    }
    if let Some(limit) = candidate.rate_limit {
        contract = contract.rate_limited(limit);
    }
    if let Some(permissions) = candidate.permissions {
        contract = contract.require_permissions(permissions);
    }
    if let Some(path) = candidate.configuration {
        contract = contract.require_configuration(path);
    }
    errors.extend(
        contract
            .violations()
            .into_iter()
            .map(|v| FieldError::new(v.field(), v.to_string()).with_code(v.code())),
    );

    match method {
        Some(method) if errors.is_empty() => Ok(ContractView::new(
            &EndpointId::new(method, candidate.path),
            &contract,
        )),
        _ => Err((endpoint_label, errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{contracts, test_state},
        config::AppConfig,
        contract::ContractRegistry,
        response::ErrorKind,
    };
    use axum::{body::to_bytes, http::StatusCode};
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    fn ctx(path: &str) -> RequestContext {
        RequestContext::new(path, "req-test")
    }

    fn list_query(
        page: Option<u32>,
        size: Option<u32>,
        public: Option<bool>,
    ) -> Query<ListEndpointsQuery> {
        Query(ListEndpointsQuery { page, size, public })
    }

    #[tokio::test]
    async fn error_types_cover_the_taxonomy() {
        let envelope = list_error_types().await;
        let types = envelope.data().unwrap();
        assert_eq!(types.len(), ErrorKind::ALL.len());
        assert_eq!(types[0].kind, ErrorKind::BadRequest);
        assert_eq!(types[9].status, 429);
    }

    #[tokio::test]
    async fn list_endpoints_pages_in_registration_order() {
        let state = test_state(false);
        let registered = contracts().unwrap().len() as u64;

        let response = list_endpoints(
            State(state),
            ctx("/v1/meta/endpoints"),
            Ok(list_query(Some(0), Some(2), None)),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let data = &body["data"];
        assert_eq!(data["content"].as_array().unwrap().len(), 2);
        assert_eq!(data["content"][0]["path"], "/health/live");
        assert_eq!(data["page"]["totalElements"], registered);
        assert!(data.get("filters").is_none());
    }

    #[tokio::test]
    async fn list_endpoints_filters_public() {
        let response = list_endpoints(
            State(test_state(false)),
            ctx("/v1/meta/endpoints"),
            Ok(list_query(None, None, Some(true))),
        )
        .await
        .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["filters"], json!({"public": true}));
        let content = json["data"]["content"].as_array().unwrap();
        assert!(content.iter().all(|c| c["public"] == true));
    }

    #[tokio::test]
    async fn list_endpoints_filter_without_matches_keeps_filters() {
        let mut registry = ContractRegistry::new();
        let live = EndpointId::get("/health/live");
        registry
            .register(live, EndpointContract::new().public())
            .unwrap();
        let state = AppState::new(AppConfig::default(), registry);

        let response = list_endpoints(
            State(state),
            ctx("/v1/meta/endpoints"),
            Ok(list_query(None, Some(5), Some(false))),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["content"], json!([]));
        assert_eq!(json["data"]["page"]["totalElements"], 0);
        assert_eq!(json["data"]["page"]["size"], 5);
        assert_eq!(json["data"]["filters"], json!({"public": false}));
    }

    #[tokio::test]
    async fn list_endpoints_past_the_end_is_an_empty_page() {
        let response = list_endpoints(
            State(test_state(false)),
            ctx("/v1/meta/endpoints"),
            Ok(list_query(Some(9), Some(10), None)),
        )
        .await
        .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["content"], json!([]));
        assert_eq!(json["data"]["page"]["number"], 9);
    }

    #[tokio::test]
    async fn list_endpoints_rejects_oversized_pages() {
        let err = list_endpoints(
            State(test_state(false)),
            ctx("/v1/meta/endpoints"),
            Ok(list_query(None, Some(500), None)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::ValidationError);
        assert_eq!(err.path, "/v1/meta/endpoints");
        let errors = err.context.field_errors.unwrap();
        assert_eq!(errors[0].rejected_value, Some(json!(500)));
    }

    #[tokio::test]
    async fn get_endpoint_is_gated_by_configuration() {
        let query = || {
            Ok(Query(EndpointQuery {
                method: "get".into(),
                path: "/v1/meta/endpoints".into(),
            }))
        };

        let disabled = State(test_state(false));
        let err = get_endpoint(disabled, ctx("/v1/meta/endpoint"), query())
            .await
            .unwrap_err();
        assert_eq!(err.code, "FEATURE.DISABLED");

        let enabled = State(test_state(true));
        let envelope = get_endpoint(enabled, ctx("/v1/meta/endpoint"), query())
            .await
            .unwrap();
        let view = envelope.data().unwrap();
        assert_eq!(view.method, "GET");
        assert_eq!(view.permissions, ["DOCS_READ"]);
        assert!(!view.public);
    }

    #[tokio::test]
    async fn get_endpoint_reports_unknown_and_invalid() {
        let unknown = get_endpoint(
            State(test_state(true)),
            ctx("/v1/meta/endpoint"),
            Ok(Query(EndpointQuery {
                method: "PATCH".into(),
                path: "/v1/meta/endpoints".into(),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(unknown.kind, ErrorKind::ResourceNotFound);
        assert_eq!(unknown.code, "CONTRACT.NOT_FOUND");

        let invalid = get_endpoint(
            State(test_state(true)),
            ctx("/v1/meta/endpoint"),
            Ok(Query(EndpointQuery {
                method: "GE T".into(),
                path: "/v1/meta/endpoints".into(),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(invalid.kind, ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn validate_contracts_splits_accepted_and_rejected() {
        let candidates: Vec<ContractCandidate> = serde_json::from_value(json!([
            {"method": "GET", "path": "/v1/users", "permissions": ["USER_READ"]},
            {"method": "POST", "path": "v1/users", "permissions": []},
            {
                "method": "GET",
                "path": "/v1/reports",
                "rateLimit": {"maxRequests": 10, "windowSeconds": 60}
            },
        ]))
        .unwrap();

        let request = ctx("/v1/meta/endpoints/validate");
        let envelope = validate_contracts(request, Ok(Json(candidates)))
            .await
            .unwrap();
        assert_eq!(envelope.status(), StatusCode::OK);

        let data = envelope.data().unwrap();
        assert_eq!(data.summary.total, 3);
        assert_eq!(data.summary.successful_count, 2);
        assert_eq!(data.summary.failed_count, 1);

        let rejected = &data.failed[0];
        assert_eq!(rejected.index, 1);
        let fields: Vec<_> = rejected.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["path", "permissions"]);
    }

    #[tokio::test]
    async fn validate_contracts_rejects_empty_body() {
        let request = ctx("/v1/meta/endpoints/validate");
        let err = validate_contracts(request, Ok(Json(Vec::new())))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
        assert_eq!(err.context.field_errors.unwrap()[0].field, "contracts");
    }

    #[test]
    fn parse_method_accepts_any_case() {
        assert_eq!(parse_method("delete"), Some(Method::DELETE));
        assert_eq!(parse_method(" Post "), Some(Method::POST));
        assert_eq!(parse_method(""), None);
        assert_eq!(parse_method("G-T"), None);
    }
}
