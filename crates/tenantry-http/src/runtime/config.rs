//! # Environment-Based Configuration
//!
//! Server settings are read from environment variables so deployments can
//! change them without a rebuild. Every variable is optional.
//!
//! ## Environment Variables
//!
//! ### Server
//! - `TENANTRY_BIND_ADDR` - Listen address (default: 127.0.0.1:8080)
//! - `TENANTRY_TASKS_FILE` - Path of the JSON task file (default: data/tasks.json)
//! - `TENANTRY_BLOCKED_TENANTS` - Comma-separated tenants rejected with 403 (default: none)
//! - `TENANTRY_REQUEST_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `TENANTRY_MAX_BODY_SIZE` - Maximum request body size in bytes (default: 65536)
//! - `TENANTRY_ENABLE_CORS` - Enable permissive CORS (default: false)
//! - `TENANTRY_LOCK_TIMEOUT_MS` - Store lock acquisition timeout (default: wait forever)
//!
//! ### Notification
//! - `TENANTRY_NOTIFY_BASE_URL` - Document service base URL; unset disables notification
//! - `TENANTRY_NOTIFY_PATH` - Endpoint path (default: /api2/Docuware/add-record)
//! - `TENANTRY_NOTIFY_USER` - Service account
//! - `TENANTRY_NOTIFY_PASSWORD` - Service account password
//! - `TENANTRY_NOTIFY_CABINET_ID` - Target cabinet
//! - `TENANTRY_NOTIFY_TIMEOUT_SECS` - Notification request timeout (default: 10)

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use tenantry_notify::NotifierConfig;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Validated server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,
    /// Backing JSON file for the task store
    pub tasks_file: PathBuf,
    /// Tenants rejected with 403 before reaching any handler
    pub blocked_tenants: Vec<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Enable permissive CORS
    pub enable_cors: bool,
    /// Store lock acquisition timeout; `None` waits indefinitely
    pub lock_timeout: Option<Duration>,
    /// Outbound notification settings; `None` disables notification
    pub notifier: Option<NotifierConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            tasks_file: PathBuf::from("data/tasks.json"),
            blocked_tenants: Vec::new(),
            request_timeout_secs: 30,
            max_body_size: 64 * 1024,
            enable_cors: false,
            lock_timeout: None,
            notifier: None,
        }
    }
}

/// Builder for [`ServerConfig`] with environment variable support
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any environment variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::default();

        if let Some(addr) = get_env_parsed::<SocketAddr>("TENANTRY_BIND_ADDR")? {
            builder = builder.bind_addr(addr);
        }
        if let Some(path) = get_env_string("TENANTRY_TASKS_FILE") {
            builder = builder.tasks_file(path);
        }
        if let Some(list) = get_env_string("TENANTRY_BLOCKED_TENANTS") {
            builder = builder.blocked_tenants(
                list.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from),
            );
        }
        if let Some(timeout) = get_env_parsed::<u64>("TENANTRY_REQUEST_TIMEOUT_SECS")? {
            builder = builder.request_timeout_secs(timeout);
        }
        if let Some(max_size) = get_env_parsed::<usize>("TENANTRY_MAX_BODY_SIZE")? {
            builder = builder.max_body_size(max_size);
        }
        if let Some(cors) = get_env_bool("TENANTRY_ENABLE_CORS")? {
            builder = builder.enable_cors(cors);
        }
        if let Some(ms) = get_env_parsed::<u64>("TENANTRY_LOCK_TIMEOUT_MS")? {
            builder = builder.lock_timeout(Duration::from_millis(ms));
        }

        if let Some(base_url) = get_env_string("TENANTRY_NOTIFY_BASE_URL") {
            let mut notifier = NotifierConfig::new(base_url);
            if let Some(path) = get_env_string("TENANTRY_NOTIFY_PATH") {
                notifier = notifier.path(path);
            }
            notifier = notifier.credentials(
                get_env_string("TENANTRY_NOTIFY_USER").unwrap_or_default(),
                get_env_string("TENANTRY_NOTIFY_PASSWORD").unwrap_or_default(),
            );
            if let Some(cabinet) = get_env_string("TENANTRY_NOTIFY_CABINET_ID") {
                notifier = notifier.cabinet_id(cabinet);
            }
            if let Some(secs) = get_env_parsed::<u64>("TENANTRY_NOTIFY_TIMEOUT_SECS")? {
                notifier = notifier.timeout(Duration::from_secs(secs));
            }
            builder = builder.notifier(notifier);
        }

        Ok(builder)
    }

    #[must_use]
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    #[must_use]
    pub fn tasks_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tasks_file = path.into();
        self
    }

    #[must_use]
    pub fn blocked_tenants<I, S>(mut self, tenants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.blocked_tenants = tenants.into_iter().map(Into::into).collect();
        self
    }

    /// Set request timeout in seconds
    #[must_use]
    pub fn request_timeout_secs(mut self, timeout: u64) -> Self {
        self.config.request_timeout_secs = timeout;
        self
    }

    /// Set maximum request body size in bytes
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    #[must_use]
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.config.enable_cors = enable;
        self
    }

    #[must_use]
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.config.lock_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: NotifierConfig) -> Self {
        self.config.notifier = Some(notifier);
        self
    }

    /// Validate configuration and build [`ServerConfig`]
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        self.validate()?;
        Ok(self.config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let config = &self.config;

        if config.tasks_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "tasks_file cannot be empty".to_string(),
            ));
        }

        if config.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if config.request_timeout_secs > 300 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be <= 300 (5 minutes)".to_string(),
            ));
        }

        if config.max_body_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_body_size must be greater than 0".to_string(),
            ));
        }
        if config.max_body_size > 1024 * 1024 {
            return Err(ConfigError::ValidationError(
                "max_body_size must be <= 1MB".to_string(),
            ));
        }

        if config.lock_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ValidationError(
                "lock_timeout must be greater than 0".to_string(),
            ));
        }

        if let Some(notifier) = &config.notifier {
            if notifier.base_url.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "notifier base_url cannot be empty".to_string(),
                ));
            }
            if notifier.timeout.is_zero() {
                return Err(ConfigError::ValidationError(
                    "notifier timeout must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}

// Environment variable helper functions

fn get_env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn get_env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(val) => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!(
                    "invalid boolean value '{val}', expected true/false/1/0/yes/no/on/off"
                ),
            }),
        },
        Err(_) => Ok(None),
    }
}

fn get_env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid value '{val}': {e}"),
            }),
        Err(_) => Ok(None),
    }
}
