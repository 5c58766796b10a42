// src/config.rs
//! Client configuration: defaults, optional `config.yaml`, then environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_PATH: &str = "/tmp/jobpost.log";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub token_path: PathBuf,
    pub log_path: PathBuf,
}

/// One section of `config.yaml`; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigSection {
    api_base_url: Option<String>,
    timeout_seconds: Option<u64>,
    token_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: ConfigSection,
    #[serde(default)]
    production: ConfigSection,
}

pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration for the current environment.
    pub fn load(config_path: Option<&Path>) -> Result<ClientConfig> {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("JOBPOST_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config.yaml"));

        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let section = Self::load_section(&path, &environment)?;
        let config = Self::apply_env(Self::resolve(section), |key| std::env::var(key).ok())?;
        Self::validate(config)
    }

    fn get_environment() -> String {
        std::env::var("JOBPOST_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_section(path: &Path, environment: &str) -> Result<ConfigSection> {
        if !path.exists() {
            return Ok(ConfigSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_section(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn parse_section(content: &str, environment: &str) -> Result<ConfigSection> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    fn resolve(section: ConfigSection) -> ClientConfig {
        ClientConfig {
            api_base_url: section
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout_seconds: section.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS),
            token_path: section.token_path.unwrap_or_else(Self::default_token_path),
            log_path: section
                .log_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH)),
        }
    }

    fn apply_env<F>(mut config: ClientConfig, var: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("JOB_API_URL") {
            config.api_base_url = url;
        }
        if let Some(timeout) = var("JOB_API_TIMEOUT_SECS") {
            config.timeout_seconds = timeout
                .parse()
                .context("JOB_API_TIMEOUT_SECS must be a number of seconds")?;
        }
        if let Some(path) = var("JOBPOST_TOKEN_PATH") {
            config.token_path = PathBuf::from(path);
        }
        if let Some(path) = var("JOBPOST_LOG") {
            config.log_path = PathBuf::from(path);
        }
        Ok(config)
    }

    fn validate(mut config: ClientConfig) -> Result<ClientConfig> {
        config.api_base_url = config.api_base_url.trim().trim_end_matches('/').to_string();
        if config.api_base_url.is_empty() {
            anyhow::bail!("API base URL must not be empty");
        }
        if config.timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be greater than zero");
        }
        Ok(config)
    }

    fn default_token_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".jobpost")
            .join("token")
    }
}

impl ClientConfig {
    pub fn with_api_url(mut self, url: String) -> Result<Self> {
        self.api_base_url = url;
        ConfigManager::validate(self)
    }
}
