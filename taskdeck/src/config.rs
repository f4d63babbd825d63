//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The configuration file path defaults to `config.yaml` but can
//! be specified via `-f` flag or the `TASKDECK_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources
//! override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `TASKDECK_`
//! 3. **DATABASE_URL** - Special case: overrides `database_url` if set
//!
//! For nested config values, use double underscores in environment
//! variables, e.g. `TASKDECK_REPORTING__INCLUDE_CURRENT_DAY=true`.

use chrono::NaiveDate;
use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "TASKDECK_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment
/// variables. All fields have sensible defaults defined in the `Default`
/// implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// PostgreSQL connection string (overridable via DATABASE_URL)
    pub database_url: String,
    /// Secret key for JWT session signing (required to serve requests)
    pub secret_key: Option<String>,
    /// Account id for the initial super_admin (created on first startup)
    pub admin_account: String,
    /// Display name for the initial super_admin
    pub admin_name: String,
    /// Password for the initial super_admin (optional, can be set via environment)
    pub admin_password: Option<String>,
    /// Bucket label for users without a group
    pub fallback_group: String,
    /// Session cookie configuration
    pub auth: AuthConfig,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
    /// Reporting window configuration
    pub reporting: ReportingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: "postgresql://localhost/taskdeck".to_string(),
            secret_key: None,
            admin_account: "superadmin".to_string(),
            admin_name: "Administrator".to_string(),
            admin_password: None,
            fallback_group: "Unassigned".to_string(),
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
            reporting: ReportingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub session: SessionConfig,
}

/// Session cookie settings for browser-based admin sessions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub cookie_same_site: String,
    /// Session lifetime (humantime format, e.g. "12h")
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "taskdeck_session".to_string(),
            cookie_secure: true,
            cookie_same_site: "Strict".to_string(),
            timeout: Duration::from_secs(12 * 60 * 60),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; "*" allows any origin
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache duration in seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allow_credentials: false,
            max_age: None,
        }
    }
}

/// Reporting window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportingConfig {
    /// System start date: dates before this never enter reporting windows,
    /// regardless of stored records.
    pub start_date: NaiveDate,
    /// Whether the current day is part of the monthly reporting window.
    ///
    /// The tracked revisions disagreed on this: earlier ones aggregated
    /// today alongside closed days, later ones used a half-open window
    /// `[start, today)`. Default is the later behavior.
    pub include_current_day: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid default start date"),
            include_current_day: false,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("TASKDECK_").split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
