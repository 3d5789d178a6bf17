// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.
//!
//! Every stage of the pipeline fails with an [`AuthError`]. Errors are never
//! recovered inside the pipeline; the HTTP boundary renders them as
//! `{code, description, status_code}` with the matching status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authorization error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is expected.")]
    MissingHeader,
    /// Authorization header (or the token's JOSE header) has the wrong shape
    #[error("{0}")]
    MalformedHeader(&'static str),
    /// Token payload or signature could not be verified
    #[error("Unable to parse authentication token.")]
    MalformedToken,
    /// No key in the provider's key set matches the token's `kid`
    #[error("Unable to find the appropriate key.")]
    UnknownKey,
    /// The key set could not be retrieved or parsed.
    ///
    /// The detail is for logs only and is not part of the rendered body.
    #[error("Unable to retrieve signing keys.")]
    KeyFetchError(String),
    /// Token `exp` has passed
    #[error("Token expired.")]
    TokenExpired,
    /// Audience or issuer mismatch
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    /// Verified token carries no `permissions` claim (RBAC disabled upstream)
    #[error("Permissions not included in JWT.")]
    MissingPermissionsClaim,
    /// Required permission not granted
    #[error("Permission is not assigned.")]
    PermissionDenied,
    /// Failure that fits no other kind
    #[error("Internal authentication error.")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: &'static str,
    description: String,
    status_code: u16,
}

impl AuthError {
    /// Stable, machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::MalformedHeader(_) => "invalid_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnknownKey => "unknown_key",
            AuthError::KeyFetchError(_) => "key_fetch_failed",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::MissingPermissionsClaim => "invalid_claims",
            AuthError::PermissionDenied => "unauthorized",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Human-readable description. Never carries token material.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader(_)
            | AuthError::TokenExpired
            | AuthError::InvalidClaims => StatusCode::UNAUTHORIZED,
            AuthError::MalformedToken
            | AuthError::UnknownKey
            | AuthError::MissingPermissionsClaim => StatusCode::BAD_REQUEST,
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            AuthError::KeyFetchError(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            code: self.code(),
            description: self.description(),
            status_code: status.as_u16(),
        });
        (status, body).into_response()
    }
}
