//! Configuration management for agent.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::{DEFAULT_API_BASE, DEFAULT_API_KEY, DEFAULT_PROVIDER};

/// File name searched for in the current directory and its parents
pub const CONFIG_FILE: &str = "agent.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Connection parameters for the inference server.
///
/// Every field is optional; unset or empty values fall back to the
/// registry defaults (a local Ollama speaking the OpenAI dialect).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointConfig {
    pub base_url: Option<String>,
    pub provider: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Model used by the demo agents
    #[serde(default = "default_selected_model")]
    pub selected: String,
    /// Names appended to the built-in allow-list
    #[serde(default)]
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Environment variable holding the search provider key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_search_url")]
    pub base_url: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Request timeout; unset keeps the HTTP client's default (none)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_selected_model() -> String {
    "qwen3:30b".to_string()
}

fn default_api_key_env() -> String {
    "SERPAPI_KEY".to_string()
}

fn default_search_url() -> String {
    "https://serpapi.com/search".to_string()
}

fn default_engine() -> String {
    "google".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            selected: default_selected_model(),
            extra: Vec::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_search_url(),
            engine: default_engine(),
            timeout_secs: None,
        }
    }
}

impl EndpointConfig {
    pub fn base_url(&self) -> &str {
        non_empty(&self.base_url).unwrap_or(DEFAULT_API_BASE)
    }

    pub fn provider(&self) -> &str {
        non_empty(&self.provider).unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn api_key(&self) -> &str {
        non_empty(&self.api_key).unwrap_or(DEFAULT_API_KEY)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Config {
    /// Load configuration from agent.toml
    pub fn load() -> Result<Self> {
        Self::load_from(Self::find_config_path()?)
    }

    /// Try to load configuration, returning None if not found
    pub fn try_load() -> Option<Self> {
        Self::load().ok()
    }

    /// Configuration used when no agent.toml exists
    pub fn default_minimal() -> Self {
        Self::default()
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.as_ref().display()))
    }

    /// Find agent.toml by searching current directory and parents, then the
    /// user config directory
    pub fn find_config_path() -> Result<PathBuf> {
        let mut current = std::env::current_dir()?;

        for _ in 0..10 {
            let candidate = current.join(CONFIG_FILE);
            if candidate.exists() {
                return Ok(candidate);
            }
            if !current.pop() {
                break;
            }
        }

        if let Some(dir) = dirs::config_dir() {
            let candidate = dir.join("adk-local").join(CONFIG_FILE);
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        anyhow::bail!("{} not found in current directory or parents", CONFIG_FILE)
    }
}
