//! Configuration management for spense.
//!
//! Loads configuration from ${SPENSE_HOME}/config.toml with sensible defaults.
//! Environment variables always win over config file values.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default production backend.
pub const DEFAULT_PROD_URL: &str = "https://api.spense.app";
/// Default development backend.
pub const DEFAULT_DEV_URL: &str = "https://api.dev.spense.app";

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Target backend environment.
///
/// Selects which of the two configured base URLs is "primary". The other
/// remains reachable as the named "secondary" endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production backend is primary (default)
    #[default]
    Prod,
    /// Development backend is primary
    Dev,
}

impl Environment {
    /// Returns all environments.
    pub fn all() -> &'static [Environment] {
        &[Environment::Prod, Environment::Dev]
    }

    /// Returns the string identifier used in config files and env vars.
    pub fn id(&self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Dev => "dev",
        }
    }

    /// Returns the Environment for a given id string.
    pub fn from_id(id: &str) -> Option<Environment> {
        match id.to_lowercase().as_str() {
            "prod" | "production" => Some(Environment::Prod),
            "dev" | "development" => Some(Environment::Dev),
            _ => None,
        }
    }

    /// Returns the human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Environment::Prod => "Production",
            Environment::Dev => "Development",
        }
    }
}

/// The two named backend endpoints after environment resolution.
///
/// Both expose an identical path surface; which URL lands in `primary` is
/// decided by [`Environment`], never by the caller guessing an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub primary: String,
    pub secondary: String,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which backend is primary: "prod" (default) or "dev"
    pub environment: Environment,

    /// Production base URL override
    pub prod_url: Option<String>,

    /// Development base URL override
    pub dev_url: Option<String>,

    /// Seconds between session validation probes
    pub refresh_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            prod_url: None,
            dev_url: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Loads configuration from the default path.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the effective environment, honoring the `SPENSE_ENV` override.
    pub fn environment(&self) -> Environment {
        if let Ok(raw) = std::env::var("SPENSE_ENV")
            && let Some(env) = Environment::from_id(raw.trim())
        {
            return env;
        }
        self.environment
    }

    /// Returns the session validation interval, honoring the
    /// `SPENSE_REFRESH_INTERVAL_SECS` override.
    pub fn refresh_interval(&self) -> Duration {
        let secs = std::env::var("SPENSE_REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(self.refresh_interval_secs);
        Duration::from_secs(secs.max(1))
    }

    /// Resolves the named endpoints for the effective environment.
    ///
    /// # Errors
    /// Returns an error if a configured URL is malformed.
    pub fn endpoints(&self) -> Result<Endpoints> {
        let prod = resolve_base_url(
            self.prod_url.as_deref(),
            "SPENSE_PROD_URL",
            DEFAULT_PROD_URL,
            "prod",
        )?;
        let dev = resolve_base_url(
            self.dev_url.as_deref(),
            "SPENSE_DEV_URL",
            DEFAULT_DEV_URL,
            "dev",
        )?;

        Ok(match self.environment() {
            Environment::Prod => Endpoints {
                primary: prod,
                secondary: dev,
            },
            Environment::Dev => Endpoints {
                primary: dev,
                secondary: prod,
            },
        })
    }
}

/// Resolves a base URL with precedence: env > config > default.
///
/// # Arguments
/// * `config_base_url` - Value from config file (if present)
/// * `env_var` - Environment variable name (e.g., "`SPENSE_PROD_URL`")
/// * `default_url` - Default URL if neither env nor config is set
/// * `endpoint_name` - Endpoint name for error messages
///
/// # Errors
/// Returns an error if the operation fails.
pub fn resolve_base_url(
    config_base_url: Option<&str>,
    env_var: &str,
    default_url: &str,
    endpoint_name: &str,
) -> Result<String> {
    // Try env var first
    if let Ok(env_url) = std::env::var(env_var) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed, endpoint_name)?;
            return Ok(trimmed.to_string());
        }
    }

    // Try config value
    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed, endpoint_name)?;
            return Ok(trimmed.to_string());
        }
    }

    // Default
    Ok(default_url.to_string())
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str, endpoint_name: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid {endpoint_name} base URL: {url}"))?;
    Ok(())
}

pub mod paths {
    //! Path resolution for spense configuration and data.
    //!
    //! SPENSE_HOME resolution order:
    //! 1. SPENSE_HOME environment variable (if set)
    //! 2. ~/.config/spense (default)

    use std::path::PathBuf;

    /// Returns the spense home directory.
    ///
    /// Checks SPENSE_HOME env var first, falls back to ~/.config/spense
    pub fn spense_home() -> PathBuf {
        if let Ok(home) = std::env::var("SPENSE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("spense"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        spense_home().join("config.toml")
    }

    /// Returns the path to the cached session file.
    pub fn session_path() -> PathBuf {
        spense_home().join("session.json")
    }
}
