// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification.
//!
//! A token is accepted only when its `kid` resolves against the provider's
//! JWKS, its signature checks out under one of the accepted algorithms, its
//! `aud` and `iss` match configuration and its `exp` has not passed.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::bearer::BearerToken;
use super::claims::{ClaimSet, TokenPayload};
use super::jwks::KeyResolver;
use super::AuthError;
use crate::config::AuthSettings;

/// Claims every accepted token has to carry.
const REQUIRED_CLAIMS: [&str; 4] = ["exp", "iss", "aud", "sub"];

/// Verifies bearer tokens issued by one identity provider.
#[derive(Clone)]
pub struct TokenVerifier {
    resolver: KeyResolver,
    issuer: String,
    audience: String,
    algorithms: Vec<Algorithm>,
    leeway: u64,
}

impl TokenVerifier {
    /// Build a verifier (and its key resolver) from settings.
    pub fn new(settings: AuthSettings) -> Result<Self, AuthError> {
        let resolver = KeyResolver::new(settings.jwks_url(), settings.fetch_timeout)?
            .with_cache_ttl(settings.cache_ttl);
        Ok(Self::with_resolver(resolver, &settings))
    }

    pub fn with_resolver(resolver: KeyResolver, settings: &AuthSettings) -> Self {
        Self {
            resolver,
            issuer: settings.issuer(),
            audience: settings.audience.clone(),
            algorithms: settings.algorithms.clone(),
            leeway: settings.leeway_secs,
        }
    }

    pub fn resolver(&self) -> &KeyResolver {
        &self.resolver
    }

    /// Verify the token and return its claims.
    pub async fn verify(&self, token: &BearerToken) -> Result<ClaimSet, AuthError> {
        let header = decode_header(token.as_str())
            .map_err(|_| AuthError::MalformedHeader("Authorization malformed."))?;
        let kid = header
            .kid
            .ok_or(AuthError::MalformedHeader("Authorization malformed."))?;

        let key = self.resolver.resolve(&kid).await?;
        let decoding_key = key.decoding_key()?;

        let token_data = decode::<TokenPayload>(token.as_str(), &decoding_key, &self.validation())
            .map_err(|e| classify(e.into_kind()))?;

        Ok(ClaimSet::from_payload(token_data.claims))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        // An empty list surfaces as `MissingAlgorithm` rather than a panic.
        validation.algorithms = self.algorithms.clone();
        validation.leeway = self.leeway;
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);
        validation
    }
}

/// Map a decode failure onto the pipeline's error kinds.
fn classify(kind: ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::ImmatureSignature => {
            AuthError::InvalidClaims
        }
        ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
            AuthError::InvalidClaims
        }
        ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::MissingAlgorithm
        | ErrorKind::InvalidRsaKey(_)
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => AuthError::MalformedToken,
        other => {
            tracing::error!(error = ?other, "Unclassified token verification failure");
            AuthError::Internal(format!("{other:?}"))
        }
    }
}
