// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Liveness and readiness probes.
//!
//! The service is ready when the identity provider's signing keys can be
//! obtained; without them no protected request can succeed.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Unavailable,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessReport {
    /// "ok" or "degraded"
    pub status: String,
    /// Signing key set reachability
    pub jwks: CheckStatus,
    /// Drinks currently in the catalog
    pub drinks: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LivenessReport {
    pub status: String,
}

async fn jwks_status(state: &AppState) -> CheckStatus {
    let resolver = state.verifier.resolver();
    if resolver.is_cached().await {
        return CheckStatus::Ok;
    }
    match resolver.refresh().await {
        Ok(_) => CheckStatus::Ok,
        Err(e) => {
            tracing::warn!(code = e.code(), "Readiness check could not load signing keys");
            CheckStatus::Unavailable
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Signing keys reachable", body = ReadinessReport),
        (status = 503, description = "Signing keys unavailable", body = ReadinessReport)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadinessReport>) {
    let jwks = jwks_status(&state).await;
    let drinks = state.store.read().await.list().len();

    let (status, label) = match jwks {
        CheckStatus::Ok => (StatusCode::OK, "ok"),
        CheckStatus::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
    };

    (
        status,
        Json(ReadinessReport {
            status: label.to_string(),
            jwks,
            drinks,
        }),
    )
}

/// Always 200 while the process runs.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, body = LivenessReport))
)]
pub async fn liveness() -> Json<LivenessReport> {
    Json(LivenessReport {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::JwksStub;
    use crate::auth::TokenVerifier;

    #[tokio::test]
    async fn ready_once_keys_load() {
        let stub = JwksStub::spawn().await;
        let state = AppState::new(stub.verifier());

        let (status, Json(report)) = health(State(state.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report.jwks, CheckStatus::Ok);

        // The second check is answered from the cache.
        let (status, _report) = health(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stub.hits(), 1);
    }

    #[tokio::test]
    async fn degraded_when_keys_unreachable() {
        let stub = JwksStub::spawn().await;
        let settings = stub
            .settings()
            .with_jwks_url("http://127.0.0.1:9/.well-known/jwks.json");
        let state = AppState::new(TokenVerifier::new(settings).unwrap());

        let (status, Json(report)) = health(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.status, "degraded");
        assert_eq!(report.jwks, CheckStatus::Unavailable);
    }
}
