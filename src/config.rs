// src/config.rs
//! Unified configuration: defaults, optional `resumatch.toml`, env overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Resume formats the scoring service accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "jpg", "jpeg", "png"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub max_file_size: u64,
}

/// Shape of the optional `resumatch.toml` override file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    poll_interval_ms: Option<u64>,
    max_file_size: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then `resumatch.toml` if present in the
    /// working directory, then environment variables.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        let file_path = Path::new("resumatch.toml");
        if file_path.exists() {
            let raw = std::fs::read_to_string(file_path)
                .context("Failed to read resumatch.toml")?;
            let file: FileConfig =
                toml::from_str(&raw).context("Failed to parse resumatch.toml")?;
            config.apply_file(file);
            info!("Loaded configuration overrides from resumatch.toml");
        }

        config.apply_env()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = file.poll_interval_ms {
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Some(size) = file.max_file_size {
            self.max_file_size = size;
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("RESUME_API_URL") {
            self.base_url = url;
        }
        if let Ok(raw) = std::env::var("RESUME_API_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .context("RESUME_API_TIMEOUT_SECS must be a number of seconds")?;
            self.timeout = Duration::from_secs(secs);
        }
        if let Ok(raw) = std::env::var("RESUME_POLL_INTERVAL_MS") {
            let ms: u64 = raw
                .parse()
                .context("RESUME_POLL_INTERVAL_MS must be a number of milliseconds")?;
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Ok(raw) = std::env::var("RESUME_MAX_FILE_SIZE") {
            let size: u64 = raw
                .parse()
                .context("RESUME_MAX_FILE_SIZE must be a number of bytes")?;
            self.max_file_size = size;
        }
        Ok(())
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}
