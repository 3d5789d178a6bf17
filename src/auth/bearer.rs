// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction from the `Authorization` header.

use std::fmt;

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::AuthError;

/// Opaque bearer credential taken from a request.
///
/// `Debug` is redacted so the token cannot end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Pull the bearer token out of the request headers.
///
/// The header value is split on whitespace; the scheme must be `Bearer`
/// (any case) followed by exactly one token part.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<BearerToken, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let value = value
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("Authorization header must be bearer token."))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader(
            "Authorization header must start with \"Bearer\".",
        ));
    }

    let token = parts
        .next()
        .ok_or(AuthError::MalformedHeader("Token not found."))?;

    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader(
            "Authorization header must be bearer token.",
        ));
    }

    Ok(BearerToken(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn missing_header_is_rejected() {
        let result = extract_bearer_token(&HeaderMap::new());
        assert_eq!(result, Err(AuthError::MissingHeader));
    }

    #[test]
    fn empty_header_counts_as_missing() {
        let result = extract_bearer_token(&headers_with(""));
        assert_eq!(result, Err(AuthError::MissingHeader));
    }

    #[test]
    fn extracts_token_after_scheme() {
        let token = extract_bearer_token(&headers_with("Bearer abc.def.ghi")).unwrap();
        assert_eq!(token.as_str(), "abc.def.ghi");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        for value in ["bearer abc", "BEARER abc", "bEaReR abc"] {
            let token = extract_bearer_token(&headers_with(value)).unwrap();
            assert_eq!(token.as_str(), "abc");
        }
    }

    #[test]
    fn other_schemes_are_rejected() {
        for value in ["Basic dXNlcjpwYXNz", "Token abc", "Bearerabc"] {
            assert!(matches!(
                extract_bearer_token(&headers_with(value)),
                Err(AuthError::MalformedHeader(_))
            ));
        }
    }

    #[test]
    fn scheme_without_token_is_rejected() {
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer")),
            Err(AuthError::MalformedHeader("Token not found."))
        );
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer   ")),
            Err(AuthError::MalformedHeader("Token not found."))
        );
    }

    #[test]
    fn extra_parts_are_rejected() {
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer abc def")),
            Err(AuthError::MalformedHeader(
                "Authorization header must be bearer token."
            ))
        );
    }

    #[test]
    fn whitespace_only_is_malformed() {
        assert!(matches!(
            extract_bearer_token(&headers_with("   ")),
            Err(AuthError::MalformedHeader(_))
        ));
    }

    #[test]
    fn debug_output_is_redacted() {
        let token = extract_bearer_token(&headers_with("Bearer secret-token")).unwrap();
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("secret-token"));
    }
}
