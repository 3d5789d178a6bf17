// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test fixtures: a fixed RSA signing key, a stub JWKS endpoint and token
//! minting helpers.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use tokio::sync::RwLock;

use crate::auth::TokenVerifier;
use crate::config::AuthSettings;

pub const TEST_DOMAIN: &str = "drinks-test.us.auth0.com";
pub const TEST_AUDIENCE: &str = "drinks";
pub const TEST_KID: &str = "test-key-1";

/// PKCS#1 private key whose public half is published by [`JwksStub`].
pub const TEST_SIGNING_KEY: &str = include_str!("../../fixtures/test_signing_key.pem");

/// Unrelated key, used to forge signatures under [`TEST_KID`].
pub const ROGUE_SIGNING_KEY: &str = include_str!("../../fixtures/rogue_signing_key.pem");

const TEST_MODULUS: &str = "0XHYQh4NwdqqiJGU88k_xGfl9rReKD3VfMN51hUGPX8Y0Hv8oN_3XgV_zMAQOjaD9ICQ_tAcvzZ5Mojkcj4ZKAQLwWfeu45chOC4xDirwyHGIQjjKcLb5IOwtBtNVFNY6_l9PJFFc_q7aKaDvX-V1I_fvDBvurN5TeYeaw1rBHkUfgOnMF1Q1dBc60bgzk8zDHLxhw6ozEjPOFFrwIqujRnEsem6a4kdXoY-VJRPsF9w-xP2b8hSYlHuiVs0pryL87D1mTdU79jg7k4TQ6sa3gF5ny0tu1wi5bPMU-Ea1LmlFZs1dCvzhJYzt4cruIGNBtc1VS6FgTMoSH_tRivg-w";
const TEST_EXPONENT: &str = "AQAB";

/// JWKS document publishing the test key next to an EC key the resolver
/// has to skip.
pub fn test_jwks() -> serde_json::Value {
    json!({
        "keys": [
            {
                "kty": "EC",
                "kid": "ec-key",
                "use": "sig",
                "crv": "P-256",
                "x": "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU",
                "y": "x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0"
            },
            {
                "kty": "RSA",
                "kid": TEST_KID,
                "use": "sig",
                "alg": "RS256",
                "n": TEST_MODULUS,
                "e": TEST_EXPONENT
            }
        ]
    })
}

/// Key set after rotation: the test key republished under `kid`.
pub fn rotated_jwks(kid: &str) -> serde_json::Value {
    json!({
        "keys": [
            {
                "kty": "RSA",
                "kid": kid,
                "use": "sig",
                "alg": "RS256",
                "n": TEST_MODULUS,
                "e": TEST_EXPONENT
            }
        ]
    })
}

/// Local HTTP server standing in for `https://<domain>/.well-known/jwks.json`.
pub struct JwksStub {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    document: Arc<RwLock<serde_json::Value>>,
}

impl JwksStub {
    pub async fn spawn() -> Self {
        Self::serving(test_jwks()).await
    }

    pub async fn serving(document: serde_json::Value) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let document = Arc::new(RwLock::new(document));
        let counter = Arc::clone(&hits);
        let served = Arc::clone(&document);

        let app = Router::new().route(
            "/.well-known/jwks.json",
            get(move || {
                let counter = Arc::clone(&counter);
                let served = Arc::clone(&served);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let document = served.read().await.clone();
                    Json(document)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            hits,
            document,
        }
    }

    /// Replace the served document, as a provider does when rotating keys.
    pub async fn publish(&self, document: serde_json::Value) {
        *self.document.write().await = document;
    }

    pub fn url(&self) -> String {
        format!("http://{}/.well-known/jwks.json", self.addr)
    }

    /// Number of JWKS requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Settings for [`TEST_DOMAIN`] with keys served by this stub.
    pub fn settings(&self) -> AuthSettings {
        AuthSettings::new(TEST_DOMAIN, TEST_AUDIENCE).with_jwks_url(self.url())
    }

    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(self.settings()).unwrap()
    }
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Payload matching [`TEST_DOMAIN`] / [`TEST_AUDIENCE`], valid for an hour.
pub fn valid_payload(permissions: &[&str]) -> serde_json::Value {
    json!({
        "iss": format!("https://{TEST_DOMAIN}/"),
        "sub": "auth0|5fe7b4fb5696ae00712e665a",
        "aud": TEST_AUDIENCE,
        "iat": now() - 60,
        "exp": now() + 3600,
        "azp": "3ppuJcwYqIUBt6caNpsR01NP2JlMkho7",
        "scope": "",
        "permissions": permissions,
    })
}

/// Sign `payload` with the test key under [`TEST_KID`].
pub fn sign(payload: &serde_json::Value) -> String {
    sign_with(TEST_SIGNING_KEY, Some(TEST_KID), payload)
}

pub fn sign_with(key_pem: &str, kid: Option<&str>, payload: &serde_json::Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(key_pem.as_bytes()).unwrap();
    encode(&header, payload, &key).unwrap()
}
