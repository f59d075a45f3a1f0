//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `MAKEOVER_DATA_FILE` - Path to the JSON data file (default: data.json)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: `PORT`, then 3000)
//! - `STOREFRONT_ASSETS_DIR` - Static files served at `/` (default: assets)
//! - `STOREFRONT_RATE_LIMIT` - Rate limit auth endpoints (default: true)
//! - `JWT_TTL_HOURS` - Token lifetime in hours, 1 to 8784 (default: 24)
//! - `BCRYPT_COST` - Password hashing cost (default: 10)
//! - `LOG_FORMAT` - `json` for JSON log lines, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use makeover_core::auth::{DEFAULT_COST, DEFAULT_TTL_HOURS, MAX_TTL_HOURS};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// JSON data file shared with the admin
    pub data_file: PathBuf,
    /// Directory of static assets
    pub assets_dir: PathBuf,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Token lifetime in hours
    pub jwt_ttl_hours: i64,
    /// bcrypt cost for new hashes
    pub bcrypt_cost: u32,
    /// Whether auth endpoints are rate limited
    pub rate_limit: bool,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Configuration with defaults for everything but the data file and secret.
    ///
    /// Rate limiting is off, which suits in-process servers whose requests all
    /// arrive from one address.
    #[must_use]
    pub fn new(data_file: impl Into<PathBuf>, jwt_secret: SecretString) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_file: data_file.into(),
            assets_dir: PathBuf::from("assets"),
            jwt_secret,
            jwt_ttl_hours: DEFAULT_TTL_HOURS,
            bcrypt_cost: DEFAULT_COST,
            rate_limit: false,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port_var = if std::env::var("STOREFRONT_PORT").is_ok() {
            "STOREFRONT_PORT"
        } else {
            "PORT"
        };
        let port = parse_env(port_var, "3000")?;

        let jwt_secret = get_validated_secret("JWT_SECRET")?;
        validate_secret_length(&jwt_secret, "JWT_SECRET")?;

        Ok(Self {
            host,
            port,
            data_file: PathBuf::from(get_env_or_default("MAKEOVER_DATA_FILE", "data.json")),
            assets_dir: PathBuf::from(get_env_or_default("STOREFRONT_ASSETS_DIR", "assets")),
            jwt_secret,
            jwt_ttl_hours: validate_ttl_hours(parse_env(
                "JWT_TTL_HOURS",
                &DEFAULT_TTL_HOURS.to_string(),
            )?)?,
            bcrypt_cost: parse_env("BCRYPT_COST", &DEFAULT_COST.to_string())?,
            rate_limit: parse_bool_env("STOREFRONT_RATE_LIMIT", true)?,
            log_json: get_optional_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`).
fn parse_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

/// Check a configured token lifetime against the accepted range.
fn validate_ttl_hours(hours: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::InvalidEnvVar(
            "JWT_TTL_HOURS".to_string(),
            format!("must be between 1 and {MAX_TTL_HOURS} (got {hours})"),
        ))
    }
}

/// Validate that a secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Generate one with `mo-cli secret`."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
