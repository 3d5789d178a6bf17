// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Security
//!
//! - Keys are only ever looked up by the token's declared `kid`
//! - A fetch failure is surfaced as [`AuthError::KeyFetchError`]; there is
//!   no fallback to a stale key set
//! - Every fetch is bounded by the configured timeout
//!
//! ## Caching
//!
//! The resolver holds an immutable snapshot of the last fetched key set.
//! A TTL of zero disables caching and fetches on every resolution. A `kid`
//! miss on a snapshot older than the minimum refresh interval triggers one
//! refetch so rotated keys are picked up before the TTL runs out. Concurrent
//! misses wait on a single fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, PublicKeyUse};
use jsonwebtoken::DecodingKey;
use tokio::sync::{Mutex, RwLock};

use super::error::AuthError;

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default deadline for a JWKS fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default minimum age of a cached snapshot before a `kid` miss may refetch it.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Public RSA key material published by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub key_type: String,
    pub key_id: String,
    pub usage: Option<String>,
    /// Base64url-encoded modulus
    pub modulus: String,
    /// Base64url-encoded public exponent
    pub exponent: String,
}

impl SigningKey {
    /// Copy the verification fields out of an RSA JWK.
    ///
    /// `None` for keys without a `kid` and for non-RSA keys.
    fn from_jwk(jwk: &Jwk) -> Option<Self> {
        let AlgorithmParameters::RSA(rsa) = &jwk.algorithm else {
            return None;
        };
        let usage = jwk.common.public_key_use.as_ref().map(|u| match u {
            PublicKeyUse::Signature => "sig".to_string(),
            PublicKeyUse::Encryption => "enc".to_string(),
            PublicKeyUse::Other(other) => other.clone(),
        });

        Some(Self {
            key_type: "RSA".to_string(),
            key_id: jwk.common.key_id.clone()?,
            usage,
            modulus: rsa.n.clone(),
            exponent: rsa.e.clone(),
        })
    }

    /// Build the verification key from the modulus and exponent.
    pub fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        DecodingKey::from_rsa_components(&self.modulus, &self.exponent).map_err(|e| {
            AuthError::KeyFetchError(format!("invalid key material for kid {}: {e}", self.key_id))
        })
    }
}

/// Keys of one fetch, indexed by key id.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, SigningKey>,
}

impl KeySet {
    pub fn get(&self, key_id: &str) -> Option<&SigningKey> {
        self.keys.get(key_id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Parse a JWKS document.
    ///
    /// Entries without a `kid` and non-RSA entries (for instance EC keys)
    /// are skipped.
    pub fn from_json(body: &[u8]) -> Result<Self, AuthError> {
        let jwks: JwkSet = serde_json::from_slice(body)
            .map_err(|e| AuthError::KeyFetchError(format!("invalid JWKS document: {e}")))?;
        Ok(Self::from(&jwks))
    }
}

impl From<&JwkSet> for KeySet {
    fn from(jwks: &JwkSet) -> Self {
        let keys = jwks
            .keys
            .iter()
            .filter_map(SigningKey::from_jwk)
            .map(|key| (key.key_id.clone(), key))
            .collect();
        Self { keys }
    }
}

/// JWKS cache entry.
struct CacheEntry {
    keys: Arc<KeySet>,
    fetched_at: Instant,
}

/// Resolves key ids against the identity provider's JWKS.
#[derive(Clone)]
pub struct KeyResolver {
    /// JWKS URL
    jwks_url: String,
    /// Cache TTL
    cache_ttl: Duration,
    /// Snapshot age below which a `kid` miss is answered without refetching
    min_refresh_interval: Duration,
    /// Last fetched key set
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// Held while fetching so concurrent misses share one request
    fetch_lock: Arc<Mutex<()>>,
    /// HTTP client
    client: reqwest::Client,
}

impl KeyResolver {
    /// Create a resolver for the given JWKS URL.
    ///
    /// # Arguments
    /// - `jwks_url`: e.g. `https://your-tenant.us.auth0.com/.well-known/jwks.json`
    /// - `fetch_timeout`: deadline applied to every fetch
    pub fn new(jwks_url: impl Into<String>, fetch_timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cache: Arc::new(RwLock::new(None)),
            fetch_lock: Arc::new(Mutex::new(())),
            client,
        })
    }

    /// Override the cache TTL. `Duration::ZERO` disables caching.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Override how old a snapshot must be before an unknown `kid` refetches.
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Find the signing key for `kid`.
    pub async fn resolve(&self, kid: &str) -> Result<SigningKey, AuthError> {
        if let Some(found) = self.lookup_cached(kid).await {
            return found;
        }

        if self.cache_ttl.is_zero() {
            let keys = self.fetch_and_store().await?;
            return keys.get(kid).cloned().ok_or(AuthError::UnknownKey);
        }

        let _fetching = self.fetch_lock.lock().await;
        // Another request may have refreshed the snapshot while we waited.
        if let Some(found) = self.lookup_cached(kid).await {
            return found;
        }

        tracing::debug!(kid, "Key id not in cached JWKS, fetching");
        let keys = self.fetch_and_store().await?;
        keys.get(kid).cloned().ok_or(AuthError::UnknownKey)
    }

    /// Answer from the snapshot when it settles the lookup: a hit, or a
    /// miss on a snapshot too young to refetch.
    async fn lookup_cached(&self, kid: &str) -> Option<Result<SigningKey, AuthError>> {
        let (keys, age) = self.cached().await?;
        match keys.get(kid) {
            Some(key) => Some(Ok(key.clone())),
            None if age < self.min_refresh_interval => Some(Err(AuthError::UnknownKey)),
            None => None,
        }
    }

    /// Fetch the key set and replace the cached snapshot.
    pub async fn refresh(&self) -> Result<Arc<KeySet>, AuthError> {
        let _fetching = self.fetch_lock.lock().await;
        self.fetch_and_store().await
    }

    /// Check if a key set is currently cached and within its TTL.
    pub async fn is_cached(&self) -> bool {
        self.cached().await.is_some()
    }

    async fn cached(&self) -> Option<(Arc<KeySet>, Duration)> {
        let cache = self.cache.read().await;
        let entry = cache.as_ref()?;
        let age = entry.fetched_at.elapsed();
        (age < self.cache_ttl).then(|| (Arc::clone(&entry.keys), age))
    }

    async fn fetch_and_store(&self) -> Result<Arc<KeySet>, AuthError> {
        let keys = Arc::new(self.fetch_jwks().await?);

        if !self.cache_ttl.is_zero() {
            let mut cache = self.cache.write().await;
            *cache = Some(CacheEntry {
                keys: Arc::clone(&keys),
                fetched_at: Instant::now(),
            });
        }

        tracing::info!(url = %self.jwks_url, keys = keys.len(), "Fetched JWKS");
        Ok(keys)
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<KeySet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| self.fetch_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.fetch_failed(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.fetch_failed(e.to_string()))?;

        KeySet::from_json(&body).inspect_err(|e| {
            tracing::warn!(url = %self.jwks_url, error = ?e, "JWKS document rejected");
        })
    }

    fn fetch_failed(&self, detail: String) -> AuthError {
        tracing::warn!(url = %self.jwks_url, error = %detail, "JWKS fetch failed");
        AuthError::KeyFetchError(detail)
    }
}
