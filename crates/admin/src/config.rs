//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JWT_SECRET` - Token signing secret, shared with the storefront
//!
//! ## Optional
//! - `MAKEOVER_DATA_FILE` - Path to the JSON data file (default: data.json)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_LOW_STOCK_THRESHOLD` - Stock at or below this is low (default: 10)
//! - `JWT_TTL_HOURS` - Token lifetime in hours, 1 to 8784 (default: 24)
//! - `BCRYPT_COST` - Password hashing cost (default: 10)
//! - `LOG_FORMAT` - `json` for JSON log lines
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
const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

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

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub host: IpAddr,
    pub port: u16,
    /// JSON data file shared with the storefront
    pub data_file: PathBuf,
    /// Token signing secret (must match the storefront's)
    pub jwt_secret: SecretString,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    /// Products with tracked stock at or below this count are "low stock"
    pub low_stock_threshold: i64,
    pub log_json: bool,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
    /// Defaults for everything but the data file and secret.
    #[must_use]
    pub fn new(data_file: impl Into<PathBuf>, jwt_secret: SecretString) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            data_file: data_file.into(),
            jwt_secret,
            jwt_ttl_hours: DEFAULT_TTL_HOURS,
            bcrypt_cost: DEFAULT_COST,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("ADMIN_HOST", "127.0.0.1")?;
        let port = parse_env("ADMIN_PORT", "3001")?;

        let jwt_secret = get_validated_secret("JWT_SECRET")?;
        validate_secret_length(&jwt_secret, "JWT_SECRET")?;

        Ok(Self {
            host,
            port,
            data_file: PathBuf::from(get_env_or_default("MAKEOVER_DATA_FILE", "data.json")),
            jwt_secret,
            jwt_ttl_hours: validate_ttl_hours(parse_env(
                "JWT_TTL_HOURS",
                &DEFAULT_TTL_HOURS.to_string(),
            )?)?,
            bcrypt_cost: parse_env("BCRYPT_COST", &DEFAULT_COST.to_string())?,
            low_stock_threshold: parse_env(
                "ADMIN_LOW_STOCK_THRESHOLD",
                &DEFAULT_LOW_STOCK_THRESHOLD.to_string(),
            )?,
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

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

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

fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let len = secret.expose_secret().len();
    if len < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_JWT_SECRET_LENGTH} characters (got {len})"),
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
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"),
        ));
    }

    Ok(())
}

fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
