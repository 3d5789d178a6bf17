// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup and handed to
//! the components that need it. Nothing here is global.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Auth0 tenant domain (issuer host) | Required |
//! | `AUTH0_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH0_ALGORITHMS` | Comma-separated accepted signing algorithms | `RS256` |
//! | `AUTH0_JWKS_URL` | JWKS endpoint override | `https://<domain>/.well-known/jwks.json` |
//! | `JWKS_CACHE_TTL_SECS` | JWKS cache TTL, `0` disables the cache | `300` |
//! | `JWKS_FETCH_TIMEOUT_SECS` | Deadline for a JWKS fetch | `10` |
//! | `AUTH_LEEWAY_SECS` | Clock skew tolerance for `exp` | `0` |
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `5000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

use crate::auth::jwks::{DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT};

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const AUTH0_AUDIENCE_ENV: &str = "AUTH0_AUDIENCE";
pub const AUTH0_ALGORITHMS_ENV: &str = "AUTH0_ALGORITHMS";
pub const AUTH0_JWKS_URL_ENV: &str = "AUTH0_JWKS_URL";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_FETCH_TIMEOUT_ENV: &str = "JWKS_FETCH_TIMEOUT_SECS";
pub const AUTH_LEEWAY_ENV: &str = "AUTH_LEEWAY_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Startup configuration errors.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("unsupported signing algorithm {0:?}")]
    UnknownAlgorithm(String),
    /// Only RSA-family algorithms can verify against the provider's JWKS
    #[error("signing algorithm {0:?} is not RSA-based (expected RS256/384/512 or PS256/384/512)")]
    NonRsaAlgorithm(String),
    #[error("at least one signing algorithm must be accepted")]
    NoAlgorithms,
    #[error("invalid URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },
}

/// Identity provider settings consumed by the auth pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Bare tenant host, e.g. `drinks.us.auth0.com`
    pub domain: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
    /// Explicit JWKS location; derived from `domain` when unset
    pub jwks_url: Option<String>,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub leeway_secs: u64,
}

impl AuthSettings {
    /// Settings with defaults for everything but domain and audience.
    ///
    /// A scheme or trailing slash on `domain` is stripped.
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            domain: normalize_domain(&domain.into()),
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            jwks_url: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            leeway_secs: 0,
        }
    }

    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = Some(url.into());
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_leeway(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }

    /// Expected `iss` claim.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn jwks_url(&self) -> String {
        self.jwks_url
            .clone()
            .unwrap_or_else(|| format!("https://{}/.well-known/jwks.json", self.domain))
    }
}

fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    let domain = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain);
    domain.trim_end_matches('/').to_string()
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to read variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let seconds = |name: &'static str, default: u64| match lookup(name) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber { name, value }),
            None => Ok(default),
        };

        let mut auth = AuthSettings::new(required(AUTH0_DOMAIN_ENV)?, required(AUTH0_AUDIENCE_ENV)?)
            .with_cache_ttl(Duration::from_secs(seconds(
                JWKS_CACHE_TTL_ENV,
                DEFAULT_CACHE_TTL.as_secs(),
            )?))
            .with_fetch_timeout(Duration::from_secs(seconds(
                JWKS_FETCH_TIMEOUT_ENV,
                DEFAULT_FETCH_TIMEOUT.as_secs(),
            )?))
            .with_leeway(seconds(AUTH_LEEWAY_ENV, 0)?);

        if let Some(list) = lookup(AUTH0_ALGORITHMS_ENV) {
            auth = auth.with_algorithms(parse_algorithms(&list)?);
        }

        if let Some(url) = lookup(AUTH0_JWKS_URL_ENV) {
            Url::parse(&url).map_err(|e| ConfigError::InvalidUrl {
                value: url.clone(),
                reason: e.to_string(),
            })?;
            auth = auth.with_jwks_url(url);
        }

        let derived = auth.jwks_url();
        Url::parse(&derived).map_err(|e| ConfigError::InvalidUrl {
            value: derived.clone(),
            reason: e.to_string(),
        })?;

        let port = match lookup(PORT_ENV) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: PORT_ENV,
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            auth,
        })
    }
}

/// Parse a comma-separated algorithm list such as `RS256,RS384`.
pub fn parse_algorithms(list: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = list
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            let algorithm = Algorithm::from_str(name)
                .map_err(|_| ConfigError::UnknownAlgorithm(name.to_string()))?;
            if is_rsa_family(algorithm) {
                Ok(algorithm)
            } else {
                Err(ConfigError::NonRsaAlgorithm(name.to_string()))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::NoAlgorithms);
    }
    Ok(algorithms)
}

/// Every accepted algorithm has to match the family of the JWKS keys, or
/// jsonwebtoken rejects all tokens.
fn is_rsa_family(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}
