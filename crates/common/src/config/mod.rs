//! Configuration management for Shikshak Sarthi services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{APP_ENV}.toml, config/local.toml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Transactional email configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Free-text field mapping configuration
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Artificial delays for the simulated analysis and scrape endpoints
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Maximum concurrent requests
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

/// Which store backs the service
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Store backend
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Database URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Directory of SQL migrations applied at startup (unset to skip)
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT secret for token signing
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// JWT expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Resend API key; email sending is disabled when unset
    pub resend_api_key: Option<String>,

    /// Resend API base URL
    #[serde(default = "default_resend_base")]
    pub resend_api_base: String,

    /// Sender address
    #[serde(default = "default_mail_from")]
    pub from: String,

    /// Public URL of the web app, used for links in emails
    #[serde(default = "default_app_url")]
    pub app_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MappingConfig {
    /// Gemini API key; the keyword mapper is used when unset
    pub gemini_api_key: Option<String>,

    /// Gemini API base URL
    #[serde(default = "default_gemini_base")]
    pub gemini_api_base: String,

    /// Model to use
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_mapping_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default = "default_analysis_delay_min")]
    pub analysis_delay_min_ms: u64,

    #[serde(default = "default_analysis_delay_max")]
    pub analysis_delay_max_ms: u64,

    #[serde(default = "default_scholar_delay_min")]
    pub scholar_delay_min_ms: u64,

    #[serde(default = "default_scholar_delay_max")]
    pub scholar_delay_max_ms: u64,

    #[serde(default = "default_ieee_delay_min")]
    pub ieee_delay_min_ms: u64,

    #[serde(default = "default_ieee_delay_max")]
    pub ieee_delay_max_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. "info", "sarthi_gateway=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Install the Prometheus recorder and serve /metrics
    #[serde(default = "default_enabled")]
    pub metrics_enabled: bool,

    /// Service name for logs
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests per second (global)
    #[serde(default = "default_rate_limit")]
    pub requests_per_second: u32,

    /// Burst capacity
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_max_concurrent() -> usize { 100 }
fn default_backend() -> StoreBackend { StoreBackend::Postgres }
fn default_database_url() -> String { "postgres://localhost/shikshak_sarthi".to_string() }
fn default_max_connections() -> u32 { 20 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 300 }
fn default_migrations_dir() -> Option<String> { Some("migrations".to_string()) }
fn default_jwt_secret() -> String { "change-me-in-production".to_string() }
fn default_jwt_expiration() -> u64 { 86_400 }
fn default_resend_base() -> String { "https://api.resend.com".to_string() }
fn default_mail_from() -> String { "Shikshak Sarthi <noreply@shikshaksarthi.in>".to_string() }
fn default_app_url() -> String { "http://localhost:3000".to_string() }
fn default_gemini_base() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_gemini_model() -> String { "gemini-2.5-flash".to_string() }
fn default_mapping_timeout() -> u64 { 30 }
fn default_analysis_delay_min() -> u64 { 2_000 }
fn default_analysis_delay_max() -> u64 { 5_000 }
fn default_scholar_delay_min() -> u64 { 1_000 }
fn default_scholar_delay_max() -> u64 { 3_000 }
fn default_ieee_delay_min() -> u64 { 1_500 }
fn default_ieee_delay_max() -> u64 { 4_000 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "shikshak-sarthi".to_string() }
fn default_rate_limit() -> u32 { 50 }
fn default_burst() -> u32 { 100 }
fn default_enabled() -> bool { true }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration for tests: in-memory store, no delays, no rate limiting
    pub fn for_tests() -> Self {
        let mut config = Self::default();
        config.database.backend = StoreBackend::Memory;
        config.database.migrations_dir = None;
        config.auth.jwt_secret = "test-secret".to_string();
        config.simulation = SimulationConfig::instant();
        config.observability.metrics_enabled = false;
        config.rate_limit.enabled = false;
        config
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

impl SimulationConfig {
    /// No artificial delay anywhere
    pub fn instant() -> Self {
        Self {
            analysis_delay_min_ms: 0,
            analysis_delay_max_ms: 0,
            scholar_delay_min_ms: 0,
            scholar_delay_max_ms: 0,
            ieee_delay_min_ms: 0,
            ieee_delay_max_ms: 0,
        }
    }

    pub fn analysis_delay(&self) -> RangeInclusive<u64> {
        ordered(self.analysis_delay_min_ms, self.analysis_delay_max_ms)
    }

    pub fn scholar_delay(&self) -> RangeInclusive<u64> {
        ordered(self.scholar_delay_min_ms, self.scholar_delay_max_ms)
    }

    pub fn ieee_delay(&self) -> RangeInclusive<u64> {
        ordered(self.ieee_delay_min_ms, self.ieee_delay_max_ms)
    }
}

fn ordered(a: u64, b: u64) -> RangeInclusive<u64> {
    a.min(b)..=a.max(b)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            max_concurrent_requests: default_max_concurrent(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            migrations_dir: default_migrations_dir(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_expiration_secs: default_jwt_expiration(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            resend_api_base: default_resend_base(),
            from: default_mail_from(),
            app_url: default_app_url(),
        }
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_api_base: default_gemini_base(),
            model: default_gemini_model(),
            timeout_secs: default_mapping_timeout(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            analysis_delay_min_ms: default_analysis_delay_min(),
            analysis_delay_max_ms: default_analysis_delay_max(),
            scholar_delay_min_ms: default_scholar_delay_min(),
            scholar_delay_max_ms: default_scholar_delay_max(),
            ieee_delay_min_ms: default_ieee_delay_min(),
            ieee_delay_max_ms: default_ieee_delay_max(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_enabled: default_enabled(),
            service_name: default_service_name(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_rate_limit(),
            burst: default_burst(),
            enabled: default_enabled(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            mail: MailConfig::default(),
            mapping: MappingConfig::default(),
            simulation: SimulationConfig::default(),
            observability: ObservabilityConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}
