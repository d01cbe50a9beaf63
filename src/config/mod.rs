use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Bind address
    #[serde(default = "default_address")]
    pub address: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory served under /static
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

/// Event store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file, relative to the working directory unless absolute
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Connection pool max size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a connection waits on a locked database (seconds)
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u64,
    /// Create the schema on startup
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("detection_stats.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout() -> u64 {
    5
}

fn default_auto_migrate() -> bool {
    true
}

/// Session and operator credential configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Key used to sign session tokens
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// The single operator account
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the session cookie as Secure (HTTPS only)
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_secret_key() -> String {
    "your-secret-key-change-in-production".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "password".to_string()
}

fn default_cookie_name() -> String {
    "session".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            log_level: default_log_level(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout(),
            auto_migrate: default_auto_migrate(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
        }
    }
}

impl Config {
    /// Apply `DASHBOARD_*` environment overrides on top of the loaded values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("DASHBOARD_SECRET_KEY") {
            self.security.secret_key = secret;
        }
        if let Some(username) = lookup("DASHBOARD_ADMIN_USERNAME") {
            self.security.admin_username = username;
        }
        if let Some(password) = lookup("DASHBOARD_ADMIN_PASSWORD") {
            self.security.admin_password = password;
        }
        if let Some(path) = lookup("DASHBOARD_DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(port) = lookup("DASHBOARD_PORT") {
            self.api.port = port
                .parse()
                .context(format!("Invalid DASHBOARD_PORT value: {}", port))?;
        }
        Ok(())
    }
}

/// Load configuration from a file or use default
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => {
            let config_str = std::fs::read_to_string(path)
                .context(format!("Failed to read config file: {:?}", path))?;

            let config = if path.extension().map_or(false, |ext| ext == "json") {
                serde_json::from_str(&config_str).context("Failed to parse JSON config")?
            } else if path.extension().map_or(false, |ext| ext == "toml") {
                toml::from_str(&config_str).context("Failed to parse TOML config")?
            } else {
                return Err(anyhow::anyhow!("Unsupported config file format"));
            };

            Ok(config)
        }
        None => Ok(Config::default()),
    }
}
