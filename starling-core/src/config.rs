//! Configuration management for Starling
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (STARLING_*)
//! 3. Config file (~/.config/starling/config.toml)
//! 4. Default values

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Model-runner configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Path to the ollama executable
    pub ollama_path: String,

    /// Model used when a request does not name one
    pub default_model: String,

    /// Maximum number of model processes in flight at once
    pub max_concurrent_reviews: usize,

    /// Wall-clock limit for a single invocation (e.g. "120s").
    /// None lets the process run to completion.
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            ollama_path: "ollama".to_string(),
            default_model: "llama3.2:3b".to_string(),
            max_concurrent_reviews: 4,
            timeout: None,
        }
    }
}

/// Review server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub host: String,

    /// Port the HTTP server listens on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Runner configuration
    pub runner: RunnerConfig,

    /// Server configuration
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/starling/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("starling").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - STARLING_OLLAMA_PATH: Path to ollama executable
    /// - STARLING_MODEL: Default model identifier
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(ollama_path) = std::env::var("STARLING_OLLAMA_PATH") {
            self.runner.ollama_path = ollama_path;
        }

        if let Ok(model) = std::env::var("STARLING_MODEL") {
            self.runner.default_model = model;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        ollama_path: Option<String>,
        model: Option<String>,
    ) -> Self {
        if let Some(path) = ollama_path {
            self.runner.ollama_path = path;
        }

        if let Some(m) = model {
            self.runner.default_model = m;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(ollama_path: Option<String>, model: Option<String>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(ollama_path, model))
    }
}
