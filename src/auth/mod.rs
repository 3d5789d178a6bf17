// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Auth0 JWT verification and RBAC permission checks for the Drinks API.
//!
//! ## Auth Flow
//!
//! 1. Client obtains an access token from Auth0 for the API audience
//! 2. Client sends `Authorization: Bearer <token>`
//! 3. Server:
//!    - Extracts the bearer token from the header
//!    - Resolves the token's `kid` against `https://<domain>/.well-known/jwks.json`
//!    - Verifies signature, audience, issuer and expiry
//!    - Checks the `permissions` claim for the endpoint's permission
//!
//! ## Security
//!
//! - Claims are only ever read from a verified token
//! - Tokens never appear in logs or error bodies
//! - JWKS is cached with a TTL; key fetches have a deadline

pub mod bearer;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod jwks;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use bearer::{extract_bearer_token, BearerToken};
pub use claims::{Audience, ClaimSet};
pub use error::AuthError;
pub use extractor::Authorized;
pub use guard::AuthGuard;
pub use jwks::{KeyResolver, KeySet, SigningKey};
pub use permissions::{check_permission, Permission};
pub use verifier::TokenVerifier;
