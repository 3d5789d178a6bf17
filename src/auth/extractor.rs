// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for permission-gated handlers.
//!
//! ```rust,ignore
//! permission!(PostDrinks, "post:drinks");
//!
//! async fn create_drink(
//!     Authorized(claims, _): Authorized<PostDrinks>,
//!     State(state): State<AppState>,
//! ) -> impl IntoResponse {
//!     // claims is a verified ClaimSet that grants post:drinks
//! }
//! ```

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, AuthGuard, ClaimSet, Permission};
use crate::state::AppState;

/// Verified claims of a caller holding permission `P`.
///
/// Rejects with [`AuthError`] before the handler runs.
pub struct Authorized<P: Permission>(pub ClaimSet, pub PhantomData<P>);

impl<P: Permission> Authorized<P> {
    pub fn claims(&self) -> &ClaimSet {
        &self.0
    }
}

impl<P: Permission> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let guard = AuthGuard::new(state.verifier.clone(), P::NAME);
        let claims = guard.authorize(&parts.headers).await?;
        Ok(Authorized(claims, PhantomData))
    }
}
