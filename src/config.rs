use crate::error::{Result, StandupError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables checked for a GitHub token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Days of activity to look back when `--days` is not given
    #[serde(default = "default_days")]
    pub default_days: i64,

    /// GitHub Models model used when `--model` is not given
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Chat-completion endpoint of GitHub Models
    #[serde(default = "default_models_api_url")]
    pub models_api_url: String,

    /// Timeout for the completion call, in seconds
    #[serde(default = "default_completion_timeout")]
    pub completion_timeout_secs: u64,

    /// GitHub token, used when neither GITHUB_TOKEN nor GH_TOKEN is set
    pub github_token: Option<String>,
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StandupError::config(format!(
                "Config file not found at: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when the file is absent
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StandupError::config("Could not determine home directory"))?;
        Ok(home.join(".config").join("gh-standup").join("config.toml"))
    }

    /// Write a default configuration file to `path`
    pub fn create_default_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Self::default();
        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(path, toml_string)?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_model.trim().is_empty() {
            return Err(StandupError::config("default_model must not be empty"));
        }

        if self.github_api_url.trim().is_empty() {
            return Err(StandupError::config("github_api_url must not be empty"));
        }

        if self.models_api_url.trim().is_empty() {
            return Err(StandupError::config("models_api_url must not be empty"));
        }

        if self.completion_timeout_secs == 0 {
            return Err(StandupError::config("completion_timeout_secs must be > 0"));
        }

        Ok(())
    }

    /// Resolve the GitHub token from the environment, then from the config file
    pub fn github_token(&self) -> Option<String> {
        TOKEN_ENV_VARS
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.trim().is_empty())
            .or_else(|| {
                self.github_token
                    .clone()
                    .filter(|value| !value.trim().is_empty())
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            default_model: default_model(),
            github_api_url: default_github_api_url(),
            models_api_url: default_models_api_url(),
            completion_timeout_secs: default_completion_timeout(),
            github_token: None,
        }
    }
}

// Serde default functions
fn default_days() -> i64 {
    1
}

fn default_model() -> String {
    "openai/gpt-4o".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_models_api_url() -> String {
    "https://models.github.ai/inference/chat/completions".to_string()
}

fn default_completion_timeout() -> u64 {
    30
}
