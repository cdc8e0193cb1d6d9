//! Application configuration.
//!
//! Read from a JSON file (`MAILSIFT_CONFIG`, else
//! `<config dir>/mailsift/config.json`); every field is optional. The
//! `MAILSIFT_UPLOADS` and `MAILSIFT_LISTEN` environment variables override the
//! file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mailsift_core::{DEFAULT_NAMESPACE, Namespace};
use serde::Deserialize;

/// Runtime settings for the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one subdirectory per namespace.
    pub uploads_root: PathBuf,
    /// Namespace used when a request does not select one.
    pub default_namespace: String,
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uploads_root: PathBuf::from("uploads"),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Loads the configuration file and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if an override is malformed.
    pub async fn load() -> Result<Self> {
        let path = std::env::var_os("MAILSIFT_CONFIG").map_or_else(default_path, PathBuf::from);
        let mut config = Self::from_file(&path).await?;

        if let Some(root) = std::env::var_os("MAILSIFT_UPLOADS") {
            config.uploads_root = PathBuf::from(root);
        }
        if let Ok(addr) = std::env::var("MAILSIFT_LISTEN") {
            config.listen_addr = addr
                .parse()
                .with_context(|| format!("Invalid MAILSIFT_LISTEN address: {addr}"))?;
        }
        Ok(config)
    }

    /// Reads `path`, returning defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// The configured default namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the name sanitizes to nothing usable.
    pub fn default_namespace(&self) -> Result<Namespace> {
        Namespace::new(&self.default_namespace)
            .with_context(|| format!("Invalid default namespace {:?}", self.default_namespace))
    }
}

fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailsift")
        .join("config.json")
}
