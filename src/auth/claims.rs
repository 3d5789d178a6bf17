// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified token claims.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Token audience: Auth0 emits a single string or, when the userinfo
/// endpoint is included, a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(a) => a == audience,
            Audience::Multiple(list) => list.iter().any(|a| a == audience),
        }
    }
}

/// Payload as it appears on the wire.
///
/// Only the verifier deserializes this, after the signature checks out.
#[derive(Debug, Deserialize)]
pub(super) struct TokenPayload {
    iss: String,
    sub: String,
    aud: Audience,
    iat: i64,
    exp: i64,
    #[serde(default)]
    azp: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    /// Must be an array of strings when present; any other shape fails
    /// deserialization and therefore verification.
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

/// Decoded claims of a token that passed signature and claim validation.
///
/// There is no public constructor and no `Deserialize` impl: a `ClaimSet`
/// only comes out of [`TokenVerifier::verify`](super::TokenVerifier::verify).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimSet {
    issuer: String,
    subject: String,
    audience: Audience,
    issued_at: i64,
    expires_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    authorized_party: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<BTreeSet<String>>,
}

impl ClaimSet {
    pub(super) fn from_payload(payload: TokenPayload) -> Self {
        Self {
            issuer: payload.iss,
            subject: payload.sub,
            audience: payload.aud,
            issued_at: payload.iat,
            expires_at: payload.exp,
            authorized_party: payload.azp,
            scope: payload.scope,
            permissions: payload.permissions.map(|p| p.into_iter().collect()),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Canonical user id (`sub`).
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn audience(&self) -> &Audience {
        &self.audience
    }

    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn authorized_party(&self) -> Option<&str> {
        self.authorized_party.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// `None` when the token has no `permissions` claim at all, which is
    /// distinct from an empty set.
    pub fn permissions(&self) -> Option<&BTreeSet<String>> {
        self.permissions.as_ref()
    }
}

#[cfg(test)]
pub(crate) fn sample_claims(permissions: Option<&[&str]>) -> ClaimSet {
    ClaimSet {
        issuer: "https://drinks.example.auth0.com/".to_string(),
        subject: "auth0|5fe7b4fb5696ae00712e665a".to_string(),
        audience: Audience::Single("drinks".to_string()),
        issued_at: 1_609_054_331,
        expires_at: 1_609_061_531,
        authorized_party: Some("3ppuJcwYqIUBt6caNpsR01NP2JlMkho7".to_string()),
        scope: Some(String::new()),
        permissions: permissions.map(|p| p.iter().map(|s| s.to_string()).collect()),
    }
}
