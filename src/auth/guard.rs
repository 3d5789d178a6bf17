// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authorization gate in front of protected operations.
//!
//! Stages run in a fixed order: bearer extraction, token verification,
//! permission check. The first failure ends the request and is returned
//! unchanged; the protected operation only ever sees verified claims.

use std::future::Future;
use std::sync::Arc;

use axum::http::HeaderMap;

use super::{check_permission, extract_bearer_token, AuthError, ClaimSet, TokenVerifier};

/// Authorization gate parameterized by one required permission.
#[derive(Clone)]
pub struct AuthGuard {
    verifier: Arc<TokenVerifier>,
    permission: String,
}

impl AuthGuard {
    pub fn new(verifier: Arc<TokenVerifier>, permission: impl Into<String>) -> Self {
        Self {
            verifier,
            permission: permission.into(),
        }
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    /// Run the pipeline and return the verified claims.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<ClaimSet, AuthError> {
        let result = self.run_stages(headers).await;
        if let Err(ref e) = result {
            tracing::debug!(
                permission = %self.permission,
                code = e.code(),
                "Request rejected by auth guard"
            );
        }
        result
    }

    async fn run_stages(&self, headers: &HeaderMap) -> Result<ClaimSet, AuthError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.verifier.verify(&token).await?;
        check_permission(&self.permission, &claims)?;
        Ok(claims)
    }

    /// Authorize, then invoke `operation` with the claims.
    ///
    /// Any further inputs the operation needs are captured by the closure.
    pub async fn run<F, Fut, T>(&self, headers: &HeaderMap, operation: F) -> Result<T, AuthError>
    where
        F: FnOnce(ClaimSet) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(headers).await?;
        Ok(operation(claims).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{now, sign, valid_payload, JwksStub};
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn headers_for(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    fn guard(stub: &JwksStub, permission: &str) -> AuthGuard {
        AuthGuard::new(Arc::new(stub.verifier()), permission)
    }

    #[tokio::test]
    async fn invokes_operation_once_with_claims() {
        let stub = JwksStub::spawn().await;
        let guard = guard(&stub, "post:drinks");
        let calls = AtomicUsize::new(0);
        let headers = headers_for(&sign(&valid_payload(&["post:drinks"])));

        let result = guard
            .run(&headers, |claims| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { claims.subject().to_string() }
            })
            .await;

        assert_eq!(result.unwrap(), "auth0|5fe7b4fb5696ae00712e665a");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn operation_receives_extra_inputs() {
        let stub = JwksStub::spawn().await;
        let guard = guard(&stub, "patch:drinks");
        let headers = headers_for(&sign(&valid_payload(&["patch:drinks"])));
        let drink_id = 7u64;

        let result = guard
            .run(&headers, |claims| async move {
                format!("{} patched {drink_id}", claims.subject())
            })
            .await
            .unwrap();

        assert!(result.ends_with("patched 7"));
    }

    async fn assert_rejected(guard: &AuthGuard, headers: &HeaderMap, expected: AuthError) {
        let calls = AtomicUsize::new(0);
        let result = guard
            .run(headers, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {}
            })
            .await;
        assert_eq!(result, Err(expected));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_header_short_circuits() {
        let stub = JwksStub::spawn().await;
        let guard = guard(&stub, "post:drinks");

        assert_rejected(&guard, &HeaderMap::new(), AuthError::MissingHeader).await;
        assert_eq!(stub.hits(), 0);
    }

    #[tokio::test]
    async fn expired_token_never_reaches_operation() {
        let stub = JwksStub::spawn().await;
        let guard = guard(&stub, "post:drinks");
        let mut payload = valid_payload(&["post:drinks"]);
        payload["exp"] = (now() - 10).into();

        assert_rejected(&guard, &headers_for(&sign(&payload)), AuthError::TokenExpired).await;
    }

    #[tokio::test]
    async fn missing_permission_is_denied() {
        let stub = JwksStub::spawn().await;
        let guard = guard(&stub, "delete:drinks");
        let headers = headers_for(&sign(&valid_payload(&["get:drinks-detail"])));

        assert_rejected(&guard, &headers, AuthError::PermissionDenied).await;
    }

    #[tokio::test]
    async fn absent_permissions_claim_is_reported() {
        let stub = JwksStub::spawn().await;
        let guard = guard(&stub, "delete:drinks");
        let mut payload = valid_payload(&[]);
        payload.as_object_mut().unwrap().remove("permissions");

        assert_rejected(
            &guard,
            &headers_for(&sign(&payload)),
            AuthError::MissingPermissionsClaim,
        )
        .await;
    }
}
