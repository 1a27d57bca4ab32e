// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{AppConfig, CONTRACT_LOOKUP_CONFIG_PATH},
    contract::{
        ContractError, ContractRegistry, EndpointContract, EndpointId, RateLimitDescriptor,
    },
    docs::{self, openapi::SecurityAddon},
    error::ApiError,
    request_context::RequestContext,
    response::{
        builder::{AsyncJob, BatchSummary},
        ErrorDetail, ErrorEnvelope, ErrorKind, FieldError, PageInfo,
    },
    state::AppState,
};

pub mod health;
pub mod meta;

/// Permission required to read declared contracts.
pub const DOCS_READ: &str = "DOCS_READ";

/// Contracts of every routed endpoint.
pub fn contracts() -> Result<ContractRegistry, ContractError> {
    let mut registry = ContractRegistry::new();
    registry.register(
        EndpointId::get("/health/live"),
        EndpointContract::new().public(),
    )?;
    registry.register(
        EndpointId::get("/v1/meta/error-types"),
        EndpointContract::new()
            .public()
            .rate_limited(RateLimitDescriptor::new(60, 60)),
    )?;
    registry.register(
        EndpointId::get("/v1/meta/endpoints"),
        EndpointContract::new()
            .rate_limited(RateLimitDescriptor::new(30, 60).with_api_key_limit(300, 60))
            .require_permissions([DOCS_READ]),
    )?;
    registry.register(
        EndpointId::get("/v1/meta/endpoint"),
        EndpointContract::new()
            .require_permissions([DOCS_READ])
            .require_configuration(CONTRACT_LOOKUP_CONFIG_PATH),
    )?;
    registry.register(
        EndpointId::post("/v1/meta/endpoints/validate"),
        EndpointContract::new()
            .rate_limited(RateLimitDescriptor::new(10, 60))
            .require_permissions([DOCS_READ]),
    )?;
    Ok(registry)
}

/// Generated document with settings applied and every operation enriched.
pub fn openapi_document(
    config: &AppConfig,
    registry: &ContractRegistry,
) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    docs::openapi::apply_settings(&mut openapi, config);
    docs::enrich_openapi(&mut openapi, registry);
    openapi
}

pub fn router(state: AppState) -> Router {
    let openapi = openapi_document(&state.config, &state.contracts);

    Router::new()
        .route("/health/live", get(health::liveness))
        .route("/v1/meta/error-types", get(meta::list_error_types))
        .route("/v1/meta/endpoints", get(meta::list_endpoints))
        .route("/v1/meta/endpoint", get(meta::get_endpoint))
        .route("/v1/meta/endpoints/validate", post(meta::validate_contracts))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", openapi))
        // Fallbacks only apply to routes added before them.
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// No route matches the path.
async fn not_found(ctx: RequestContext) -> ApiError {
    let detail = format!("No endpoint at {}", ctx.path);
    ApiError::not_found("HTTP.NOT_FOUND", detail).at(&ctx)
}

/// A route matches the path but not the method.
///
/// `Allow` lists the methods declared in the registry. Routes without
/// contracts are the documentation routes, which only serve `GET`.
async fn method_not_allowed(
    State(state): State<AppState>,
    method: Method,
    ctx: RequestContext,
) -> ApiError {
    let mut allowed = state.contracts.methods_for(&ctx.path);
    if allowed.is_empty() {
        allowed.push(Method::GET);
    }
    if allowed.contains(&method) {
        return not_found(ctx).await;
    }
    ApiError::method_not_allowed(&method, &allowed).at(&ctx)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        meta::list_error_types,
        meta::list_endpoints,
        meta::get_endpoint,
        meta::validate_contracts
    ),
    components(
        schemas(
            ErrorEnvelope,
            ErrorDetail,
            FieldError,
            ErrorKind,
            PageInfo,
            BatchSummary,
            AsyncJob,
            RateLimitDescriptor,
            health::HealthResponse,
            meta::ErrorTypeInfo,
            meta::ContractView,
            meta::ContractCandidate,
            meta::RejectedContract,
            meta::EndpointFilters
        )
    ),
    modifiers(&SecurityAddon),
    security(
        ("BearerAuth" = []),
        ("ApiKeyAuth" = [])
    )
)]
struct ApiDoc;

#[cfg(test)]
pub(crate) fn test_state(contract_lookup_enabled: bool) -> AppState {
    let config = AppConfig {
        contract_lookup_enabled,
        ..AppConfig::default()
    };
    let registry = contracts().unwrap_or_default();
    AppState::new(config, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{contract::EndpointMetadata, request_context::REQUEST_ID_HEADER};
    use axum::{
        body::{to_bytes, Body},
        http::{header::ALLOW, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn every_routed_endpoint_has_a_valid_contract() {
        let registry = contracts().unwrap();
        assert_eq!(registry.len(), 5);
        assert!(registry
            .contract(&EndpointId::get("/health/live"))
            .is_some_and(EndpointContract::is_public));
    }

    #[tokio::test]
    async fn liveness_returns_success_envelope() {
        let response = router(test_state(false))
            .oneshot(request(Method::GET, "/health/live"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["status"], 200);
        assert_eq!(body["data"]["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unknown_path_returns_not_found_envelope() {
        let response = router(test_state(false))
            .oneshot(
                Request::builder()
                    .uri("/v1/nothing-here")
                    .header(REQUEST_ID_HEADER, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "RESOURCE_NOT_FOUND");
        assert_eq!(body["error"]["path"], "/v1/nothing-here");
    }

    #[tokio::test]
    async fn wrong_method_returns_allowed_methods() {
        let response = router(test_state(false))
            .oneshot(request(Method::DELETE, "/v1/meta/endpoints"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET");

        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "METHOD_NOT_ALLOWED");
        assert_eq!(body["error"]["allowedMethods"], json!(["GET"]));
    }

    #[tokio::test]
    async fn trailing_slash_is_not_found() {
        let response = router(test_state(false))
            .oneshot(request(Method::GET, "/v1/meta/endpoints/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(ALLOW).is_none());

        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "RESOURCE_NOT_FOUND");
        assert_eq!(body["error"]["code"], "HTTP.NOT_FOUND");
        assert_eq!(body["error"]["path"], "/v1/meta/endpoints/");
        assert!(body["error"].get("allowedMethods").is_none());
    }

    #[tokio::test]
    async fn wrong_method_on_document_route_returns_envelope() {
        let response = router(test_state(false))
            .oneshot(request(Method::POST, "/api-doc/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET");

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "METHOD_NOT_ALLOWED");
        assert_eq!(body["error"]["path"], "/api-doc/openapi.json");
        assert_eq!(body["error"]["allowedMethods"], json!(["GET"]));
    }

    #[tokio::test]
    async fn validate_without_json_content_type_is_unsupported() {
        let response = router(test_state(false))
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/v1/meta/endpoints/validate")
                    .body(Body::from("[]"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn served_document_is_enriched() {
        let response = router(test_state(false))
            .oneshot(request(Method::GET, "/api-doc/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = body_json(response).await;
        let liveness = &doc["paths"]["/health/live"]["get"];
        assert_eq!(liveness["x-public"], "yes");
        assert_eq!(liveness["security"], json!([]));

        let endpoints = &doc["paths"]["/v1/meta/endpoints"]["get"];
        assert_eq!(endpoints["x-public"], "no");
        let description = endpoints["description"].as_str().unwrap();
        assert!(description.contains("**Required permissions:** DOCS_READ"));
        assert!(description.contains("and up to 300 times every 1 minute with API Keys."));
        let ok = &endpoints["responses"]["200"];
        assert!(ok["headers"].get("x-ratelimit-limit").is_some());
        assert!(ok["content"]["application/json"]["schema"].is_object());

        let lookup = doc["paths"]["/v1/meta/endpoint"]["get"]["description"]
            .as_str()
            .unwrap();
        assert!(lookup.contains("configuration for `features.contract-lookup` is `true`"));

        let schemes = &doc["components"]["securitySchemes"];
        assert!(schemes.get("BearerAuth").is_some());
        assert!(schemes.get("ApiKeyAuth").is_some());
    }

    #[tokio::test]
    async fn served_document_declares_success_bodies() {
        let response = router(test_state(false))
            .oneshot(request(Method::GET, "/api-doc/openapi.json"))
            .await
            .unwrap();
        let doc = body_json(response).await;

        let operations = [
            ("/health/live", "get"),
            ("/v1/meta/error-types", "get"),
            ("/v1/meta/endpoints", "get"),
            ("/v1/meta/endpoint", "get"),
            ("/v1/meta/endpoints/validate", "post"),
        ];
        for (path, method) in operations {
            let ok = &doc["paths"][path][method]["responses"]["200"];
            let schema = &ok["content"]["application/json"]["schema"];
            assert!(schema.is_object(), "{method} {path} has no success schema");
        }

        let schemas = &doc["components"]["schemas"];
        assert!(schemas.get("HealthResponse").is_some());
    }
}
