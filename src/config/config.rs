//! Server configuration
//! Loaded from an optional YAML file, then overridden from the environment

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::DEFAULT_TTL_MINUTES;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database path
    #[serde(default)]
    pub database_url: String,

    /// HMAC secret used to sign access tokens
    #[serde(default)]
    pub secret_key: String,

    /// Access token lifetime
    #[serde(default = "default_token_ttl")]
    pub access_token_expire_minutes: i64,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub photos: PhotoConfig,

    /// Object storage credentials. Accepted for compatibility; nothing reads them yet.
    #[serde(default)]
    pub s3: S3Config,
}

fn default_token_ttl() -> i64 {
    DEFAULT_TTL_MINUTES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            secret_key: String::new(),
            access_token_expire_minutes: default_token_ttl(),
            server: ServerConfig::default(),
            photos: PhotoConfig::default(),
            s3: S3Config::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Local photo storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoConfig {
    /// Directory uploads are written to; uploads are rejected when unset
    #[serde(default)]
    pub dir: Option<String>,

    /// Prefix for returned photo URLs, e.g. `https://admin.example.com`
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    #[serde(default)]
    pub bucket_name: String,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read the YAML config file; a missing file yields the defaults
    pub fn from_file(path: Option<&str>) -> Result<Self> {
        let config_path = match Self::config_path(path) {
            Some(p) => p,
            None => return Ok(Config::default()),
        };

        if !config_path.exists() {
            debug!("No config file at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config = serde_yaml::from_str(&raw).context("Failed to parse config file")?;

        debug!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Apply `DATABASE_URL`-style overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = lookup("SECRET_KEY") {
            self.secret_key = v;
        }
        if let Some(v) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.access_token_expire_minutes = v
                .parse()
                .with_context(|| format!("Invalid ACCESS_TOKEN_EXPIRE_MINUTES: {}", v))?;
        }
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().with_context(|| format!("Invalid PORT: {}", v))?;
        }
        if let Some(v) = lookup("PHOTO_DIR") {
            self.photos.dir = Some(v);
        }
        if let Some(v) = lookup("PHOTO_BASE_URL") {
            self.photos.base_url = v;
        }
        if let Some(v) = lookup("AWS_ACCESS_KEY_ID") {
            self.s3.access_key_id = v;
        }
        if let Some(v) = lookup("AWS_SECRET_ACCESS_KEY") {
            self.s3.secret_access_key = v;
        }
        if let Some(v) = lookup("S3_BUCKET_NAME") {
            self.s3.bucket_name = v;
        }
        Ok(())
    }

    /// Fail fast when a value the server cannot run without is missing
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is not set");
        }
        if self.secret_key.is_empty() {
            anyhow::bail!("SECRET_KEY is not set");
        }
        if self.access_token_expire_minutes <= 0 {
            anyhow::bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }
        Ok(())
    }

    /// Resolve database path (expand ~, strip a `sqlite://` scheme)
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        let raw = self
            .database_url
            .strip_prefix("sqlite://")
            .unwrap_or(&self.database_url);

        if let Some(rest) = raw.strip_prefix("~/") {
            let home = dirs::home_dir().context("Cannot find home directory")?;
            return Ok(home.join(rest));
        }
        Ok(PathBuf::from(raw))
    }

    /// Get the config file path: `SUKHI_CONFIG`, then `path`, then `~/.sukhi/config.yml`
    fn config_path(path: Option<&str>) -> Option<PathBuf> {
        if let Ok(env_path) = std::env::var("SUKHI_CONFIG") {
            return Some(PathBuf::from(env_path));
        }

        if let Some(p) = path {
            return Some(PathBuf::from(p));
        }

        dirs::home_dir().map(|home| home.join(".sukhi").join("config.yml"))
    }
}
