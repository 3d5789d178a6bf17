// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RBAC permission checks against verified claims.
//!
//! Permissions are the strings Auth0 places in the `permissions` claim when
//! RBAC is enabled for the API (e.g. `post:drinks`). Matching is exact and
//! case-sensitive; there are no wildcards.

use super::{AuthError, ClaimSet};

/// A permission required by an endpoint, declared as a marker type.
///
/// ```rust,ignore
/// permission!(PostDrinks, "post:drinks");
///
/// async fn create(Authorized(claims, ..): Authorized<PostDrinks>) { /* ... */ }
/// ```
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

/// Declare a [`Permission`] marker type.
#[macro_export]
macro_rules! permission {
    ($(#[$meta:meta])* $name:ident, $value:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $crate::auth::Permission for $name {
            const NAME: &'static str = $value;
        }
    };
}

/// Check that `claims` grant `required`.
pub fn check_permission(required: &str, claims: &ClaimSet) -> Result<(), AuthError> {
    let granted = claims
        .permissions()
        .ok_or(AuthError::MissingPermissionsClaim)?;

    if granted.contains(required) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}
