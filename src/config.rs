// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! typed [`Config`] loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATABASE_PATH` | redb catalog database file | `data/casting.redb` |
//! | `AUTH_ISSUER` | Expected JWT issuer claim | Required |
//! | `AUTH_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH_JWKS_URL` | JWKS endpoint for JWT verification | `{AUTH_ISSUER}.well-known/jwks.json` |
//! | `AUTH_ALGORITHM` | Expected signing algorithm | `RS256` |
//! | `AUTH_JWKS_TIMEOUT_SECS` | JWKS fetch timeout | `10` |
//! | `AUTH_LEEWAY_SECS` | Clock skew tolerance for `exp`/`nbf` | `0` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const AUTH_ISSUER_ENV: &str = "AUTH_ISSUER";
pub const AUTH_AUDIENCE_ENV: &str = "AUTH_AUDIENCE";
pub const AUTH_JWKS_URL_ENV: &str = "AUTH_JWKS_URL";
pub const AUTH_ALGORITHM_ENV: &str = "AUTH_ALGORITHM";
pub const AUTH_JWKS_TIMEOUT_ENV: &str = "AUTH_JWKS_TIMEOUT_SECS";
pub const AUTH_LEEWAY_ENV: &str = "AUTH_LEEWAY_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_PATH: &str = "data/casting.redb";
const DEFAULT_JWKS_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_LEEWAY_SECS: u64 = 0;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                reason: format!("unknown format '{other}' (expected 'json' or 'pretty')"),
            }),
        }
    }
}

/// Identity provider trust settings.
///
/// Passed explicitly into [`crate::auth::JwksManager`] and
/// [`crate::auth::TokenVerifier`] at construction.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Expected `iss` claim (e.g. `https://tenant.us.auth0.com/`)
    pub issuer: String,
    /// Expected `aud` claim (API identifier)
    pub audience: String,
    /// JWKS endpoint URL
    pub jwks_url: String,
    /// Expected signing algorithm
    pub algorithm: Algorithm,
    /// Bound on a single JWKS fetch
    pub fetch_timeout: Duration,
    /// Clock skew tolerance in seconds, none unless configured
    pub leeway: u64,
}

impl AuthSettings {
    /// Settings with the default algorithm (RS256), timeout and leeway.
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        jwks_url: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            jwks_url: jwks_url.into(),
            algorithm: Algorithm::RS256,
            fetch_timeout: DEFAULT_JWKS_TIMEOUT,
            leeway: DEFAULT_LEEWAY_SECS,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub auth: AuthSettings,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(&vars, name);

        let host = get(HOST_ENV).unwrap_or(DEFAULT_HOST);
        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    name: HOST_ENV,
                    reason: e.to_string(),
                })?;

        let database_path = PathBuf::from(get(DATABASE_PATH_ENV).unwrap_or(DEFAULT_DATABASE_PATH));

        let issuer = get(AUTH_ISSUER_ENV)
            .ok_or(ConfigError::Missing(AUTH_ISSUER_ENV))?
            .to_string();
        let audience = get(AUTH_AUDIENCE_ENV)
            .ok_or(ConfigError::Missing(AUTH_AUDIENCE_ENV))?
            .to_string();

        let jwks_url = match get(AUTH_JWKS_URL_ENV) {
            Some(url) => url.to_string(),
            None => default_jwks_url(&issuer),
        };
        validate_jwks_url(&jwks_url)?;

        let algorithm = match get(AUTH_ALGORITHM_ENV) {
            Some(raw) => parse_algorithm(raw)?,
            None => Algorithm::RS256,
        };

        let fetch_timeout = match get(AUTH_JWKS_TIMEOUT_ENV) {
            Some(raw) => Duration::from_secs(parse_u64(AUTH_JWKS_TIMEOUT_ENV, raw)?),
            None => DEFAULT_JWKS_TIMEOUT,
        };
        if fetch_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: AUTH_JWKS_TIMEOUT_ENV,
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        let leeway = match get(AUTH_LEEWAY_ENV) {
            Some(raw) => parse_u64(AUTH_LEEWAY_ENV, raw)?,
            None => DEFAULT_LEEWAY_SECS,
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            database_path,
            auth: AuthSettings {
                issuer,
                audience,
                jwks_url,
                algorithm,
                fetch_timeout,
                leeway,
            },
            log_format,
        })
    }
}

fn lookup<'a>(vars: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Auth0-style discovery location relative to the issuer.
fn default_jwks_url(issuer: &str) -> String {
    if issuer.ends_with('/') {
        format!("{issuer}.well-known/jwks.json")
    } else {
        format!("{issuer}/.well-known/jwks.json")
    }
}

/// JWKS must come over TLS. Plain HTTP is tolerated for loopback only.
fn validate_jwks_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: AUTH_JWKS_URL_ENV,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "https" => Ok(()),
        "http" if is_loopback(&url) => Ok(()),
        scheme => Err(ConfigError::Invalid {
            name: AUTH_JWKS_URL_ENV,
            reason: format!("scheme '{scheme}' not allowed, JWKS must be fetched over https"),
        }),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Only asymmetric algorithms make sense with a public key set.
fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(raw).map_err(|_| ConfigError::Invalid {
        name: AUTH_ALGORITHM_ENV,
        reason: format!("unknown algorithm '{raw}'"),
    })?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Err(ConfigError::Invalid {
            name: AUTH_ALGORITHM_ENV,
            reason: format!("symmetric algorithm '{raw}' cannot be verified against a JWKS"),
        }),
        other => Ok(other),
    }
}

fn parse_u64(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
