use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Environment variable selecting the server transport
pub const TRANSPORT_ENV: &str = "MCP_TRANSPORT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MCP server settings
    pub server: ServerConfig,

    /// Defaults applied to transcript requests
    pub transcripts: TranscriptDefaults,

    /// Transcript source settings
    pub source: SourceConfig,
}

/// Transport the MCP server listens on
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST
    Http,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Transport used by `serve`
    pub transport: Transport,

    /// Bind address for the HTTP transport
    pub host: String,

    /// Port for the HTTP transport
    pub port: u16,

    /// Upper bound for a single tool call
    pub request_timeout_secs: u64,
}

/// Read-only request defaults, fixed at startup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptDefaults {
    /// Language tried first when the caller names none (English-first fallback if unset)
    pub default_language: Option<String>,

    /// Format used when the caller names none
    pub default_format: OutputFormat,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Keep HTML formatting tags in fetched transcript text
    pub preserve_formatting: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Stdio,
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration from file or fall back to defaults, then apply environment overrides
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        config.apply_env_overrides(std::env::var(TRANSPORT_ENV).ok().as_deref());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("youtube-transcript-mcp").join("config.yaml"))
    }

    /// Apply the transport override taken from the environment
    pub fn apply_env_overrides(&mut self, transport: Option<&str>) {
        let Some(value) = transport else {
            return;
        };

        match Transport::from_str(value.trim(), true) {
            Ok(transport) => self.server.transport = transport,
            Err(_) => tracing::warn!(
                "Ignoring unknown {} value '{}', using {}",
                TRANSPORT_ENV,
                value,
                self.server.transport
            ),
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than zero");
        }

        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be at least one second");
        }

        if let Some(language) = &self.transcripts.default_language {
            if language.trim().is_empty() {
                anyhow::bail!("Default language must not be empty when set");
            }
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Transport: {}", self.server.transport);
        println!("  HTTP Address: {}:{}", self.server.host, self.server.port);
        println!("  Request Timeout: {}s", self.server.request_timeout_secs);
        println!(
            "  Default Language: {}",
            self.transcripts
                .default_language
                .as_deref()
                .unwrap_or("unset (English first)")
        );
        println!("  Default Format: {}", self.transcripts.default_format);
        println!("  Preserve Formatting: {}", self.source.preserve_formatting);
    }
}
