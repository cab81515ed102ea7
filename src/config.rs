//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file and applies environment
//! variable overrides for the knobs most often set by deployment tooling
//! (port, environment name, service version, dependency-check toggles).
//! `AppConfig` is the root configuration struct and is treated as immutable
//! for the process lifetime; there is no hot reload.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Service Identity
// =============================================================================

/// Service name reported by `/health/status`.
pub const SERVICE_NAME: &str = "agent-health-api";

/// Human-facing service title reported by `/` and `/docs`.
pub const SERVICE_TITLE: &str = "Agent Health API";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Health probes must never be served stale by an intermediary, so the whole
// /health family is marked no-store. The static descriptor pages may be
// cached briefly.

/// Max-age in seconds for the static descriptor pages (`/`, `/docs`)
pub const HTTP_CACHE_DOCS_MAX_AGE: u32 = 300;

pub const CACHE_CONTROL_HEALTH: &str = "no-cache, no-store, must-revalidate";

pub const CACHE_CONTROL_DOCS: &str = formatcp!("public, max-age={}", HTTP_CACHE_DOCS_MAX_AGE);

// =============================================================================
// Correlation
// =============================================================================

/// Response header carrying the per-request correlation identifier
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "agent_health=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Environment name that switches error responses to generic messages
pub const PRODUCTION_ENV: &str = "production";

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "AGENT_HEALTH";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Service identity (version, environment name)
    #[serde(default)]
    pub service: ServiceConfig,
    /// Dependency-check toggles (simulated vs. real status keywords)
    #[serde(default)]
    pub dependencies: DependencyChecksConfig,
    /// Metrics source selection
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Fixed-window rate limiting for the /health route family
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl HttpServerConfig {
    fn default_host() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        3000
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// Service identity settings reported on every health document
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Version string, defaults to the crate version at build time
    #[serde(default = "ServiceConfig::default_version")]
    pub version: String,
    /// Environment name (development, staging, production, ...)
    #[serde(default = "ServiceConfig::default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    fn default_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn default_environment() -> String {
        "development".to_string()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            environment: Self::default_environment(),
        }
    }
}

/// Per-dependency toggles: enabled reports a real status keyword, disabled
/// reports `simulated`. No network probing happens either way unless a
/// probe is injected (see the `dependencies` module).
#[derive(Debug, Clone, Deserialize)]
pub struct DependencyChecksConfig {
    #[serde(default)]
    pub database: bool,
    #[serde(default)]
    pub external_api: bool,
    #[serde(default)]
    pub cache: bool,
    /// Budget in milliseconds for an injected dependency probe
    #[serde(default = "DependencyChecksConfig::default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl DependencyChecksConfig {
    fn default_probe_timeout_ms() -> u64 {
        500
    }
}

impl Default for DependencyChecksConfig {
    fn default() -> Self {
        Self {
            database: false,
            external_api: false,
            cache: false,
            probe_timeout_ms: Self::default_probe_timeout_ms(),
        }
    }
}

/// Which metrics implementation backs `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricsSourceKind {
    /// Real host sampling via sysinfo
    #[default]
    System,
    /// Deterministic values from config, for tests and demos
    Fixed,
}

/// Metrics source selection and fixed values
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub source: MetricsSourceKind,
    /// Values served by the fixed source (ignored for `system`)
    #[serde(default)]
    pub fixed_cpu: f64,
    #[serde(default)]
    pub fixed_memory: f64,
    #[serde(default)]
    pub fixed_disk: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            source: MetricsSourceKind::System,
            fixed_cpu: 0.0,
            fixed_memory: 0.0,
            fixed_disk: 0.0,
        }
    }
}

/// Fixed-window rate limit applied only to the /health route family
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per client within one window
    #[serde(default = "RateLimitConfig::default_max_requests")]
    pub max_requests: u32,
    /// Window length in seconds
    #[serde(default = "RateLimitConfig::default_window_seconds")]
    pub window_seconds: u64,
}

impl RateLimitConfig {
    fn default_max_requests() -> u32 {
        30
    }

    fn default_window_seconds() -> u64 {
        60
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: Self::default_max_requests(),
            window_seconds: Self::default_window_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
    /// Optional append-only log file, written in addition to stdout
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over the config file, so
    /// deployment tooling can retarget an instance without editing TOML.
    fn apply_env_overrides(&mut self) {
        if let Some(port) = env_var("PORT").and_then(|v| v.parse().ok()) {
            self.http.port = port;
        }
        if let Some(environment) = env_var("ENVIRONMENT") {
            self.service.environment = environment;
        }
        if let Some(version) = env_var("VERSION") {
            self.service.version = version;
        }
        if let Some(flag) = env_var("CHECK_DATABASE").map(|v| parse_bool(&v)) {
            self.dependencies.database = flag;
        }
        if let Some(flag) = env_var("CHECK_EXTERNAL_API").map(|v| parse_bool(&v)) {
            self.dependencies.external_api = flag;
        }
        if let Some(flag) = env_var("CHECK_CACHE").map(|v| parse_bool(&v)) {
            self.dependencies.cache = flag;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_semver(&self.service.version) {
            return Err(ConfigError::Validation(format!(
                "service.version must be MAJOR.MINOR.PATCH, got '{}'",
                self.service.version
            )));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Validation(
                "rate_limit.max_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Production instances get generic 500 messages; everything else gets
    /// the underlying detail to ease debugging.
    pub fn is_production(&self) -> bool {
        self.service.environment == PRODUCTION_ENV
    }
}

fn env_var(suffix: &str) -> Option<String> {
    std::env::var(format!("{}_{}", ENV_PREFIX, suffix)).ok()
}

/// Accepts the usual truthy spellings; anything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Check for a MAJOR.MINOR.PATCH version string.
pub fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
