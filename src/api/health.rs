// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::Serialize;
use utoipa::ToSchema;

use crate::response::{builder, SuccessEnvelope};

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe.
///
/// Always returns 200 if the process is running.
/// Does not check dependencies.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (
            status = 200,
            description = "Service is alive, `data.status` is `ok`",
            body = SuccessEnvelope<HealthResponse>
        )
    )
)]
pub async fn liveness() -> SuccessEnvelope<HealthResponse> {
    builder::success(
        "Service is alive",
        HealthResponse {
            status: "ok".to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn liveness_reports_ok() {
        let envelope = liveness().await;
        assert_eq!(envelope.status(), StatusCode::OK);
        assert_eq!(envelope.data().unwrap().status, "ok");
    }
}
