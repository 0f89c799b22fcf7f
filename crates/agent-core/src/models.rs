//! Model registry: gates which model names may be used and builds the
//! connection descriptor the agent runtime hands to its chat client.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

/// Ollama's OpenAI-compatible API
pub const DEFAULT_API_BASE: &str = "http://localhost:11434/v1";
pub const DEFAULT_PROVIDER: &str = "openai";
/// Ollama ignores the key, but OpenAI clients insist on one
pub const DEFAULT_API_KEY: &str = "ollama";

/// Built-in allow-list, restored on every process start
pub const DEFAULT_MODELS: &[&str] = &[
    "qwen3:30b-a3b-instruct-2507-fp16",
    "qwen3-coder:30b-a3b-fp16",
    "deepseek-v3.1:671b-cloud",
    "qwen3-coder:480b-cloud",
    "kimi-k2:1t-cloud",
    "qwen3:30b",
    "qwen3-coder:30b",
    "gpt-oss:20b",
];

/// Errors surfaced by the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Requested model is not in the allow-list
    #[error("Model '{}' is not in the list of available models. Available models: {}", .name, .available.join(", "))]
    InvalidModel {
        name: String,
        available: Vec<String>,
    },
}

/// A validated, ready-to-use model configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub model_name: String,
    pub endpoint_base_url: String,
    pub provider_protocol: String,
    pub credential: String,
}

impl ModelDescriptor {
    /// Descriptor with the credential replaced, for display
    pub fn redacted(&self) -> Self {
        Self {
            credential: mask(&self.credential),
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for ModelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("model_name", &self.model_name)
            .field("endpoint_base_url", &self.endpoint_base_url)
            .field("provider_protocol", &self.provider_protocol)
            .field("credential", &mask(&self.credential))
            .finish()
    }
}

fn mask(credential: &str) -> String {
    if credential.is_empty() {
        String::new()
    } else {
        "***".to_string()
    }
}

/// Allow-list of model names plus the connection defaults for descriptors.
///
/// The allow-list sits behind a lock so a single registry can be shared
/// across threads; names keep their insertion order.
pub struct ModelRegistry {
    allow_list: RwLock<Vec<String>>,
    api_base: String,
    provider: String,
    api_key: String,
}

impl ModelRegistry {
    /// Create a registry seeded with the built-in models and default connection
    pub fn new() -> Self {
        Self {
            allow_list: RwLock::new(DEFAULT_MODELS.iter().map(|s| s.to_string()).collect()),
            api_base: DEFAULT_API_BASE.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }

    /// Build a registry from the `[endpoint]` and `[models]` sections
    pub fn from_config(config: &Config) -> Self {
        let registry = Self::new()
            .with_api_base(config.endpoint.base_url())
            .with_provider(config.endpoint.provider())
            .with_api_key(config.endpoint.api_key());

        for name in &config.models.extra {
            registry.add(name);
        }

        registry
    }

    /// Override the endpoint base URL (empty keeps the default)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = or_default(api_base.into(), DEFAULT_API_BASE);
        self
    }

    /// Override the wire-protocol dialect (empty keeps the default)
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = or_default(provider.into(), DEFAULT_PROVIDER);
        self
    }

    /// Override the credential (empty keeps the default)
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = or_default(api_key.into(), DEFAULT_API_KEY);
        self
    }

    /// Build a descriptor for an allow-listed model. No network call is made.
    pub fn create(&self, model_name: &str) -> Result<ModelDescriptor, RegistryError> {
        let allow_list = self.allow_list.read();

        if !allow_list.iter().any(|m| m == model_name) {
            debug!(model = model_name, "Rejected model not in allow-list");
            return Err(RegistryError::InvalidModel {
                name: model_name.to_string(),
                available: allow_list.clone(),
            });
        }

        Ok(ModelDescriptor {
            model_name: model_name.to_string(),
            endpoint_base_url: self.api_base.clone(),
            provider_protocol: self.provider.clone(),
            credential: self.api_key.clone(),
        })
    }

    /// Snapshot of the allow-list
    pub fn list_models(&self) -> Vec<String> {
        self.allow_list.read().clone()
    }

    /// Check whether a model is allow-listed
    pub fn contains(&self, model_name: &str) -> bool {
        self.allow_list.read().iter().any(|m| m == model_name)
    }

    /// Add a model; adding a known name does nothing
    pub fn add(&self, model_name: &str) {
        let mut allow_list = self.allow_list.write();
        if !allow_list.iter().any(|m| m == model_name) {
            info!(model = model_name, "Added model to allow-list");
            allow_list.push(model_name.to_string());
        }
    }

    /// Remove a model; removing an unknown name does nothing
    pub fn remove(&self, model_name: &str) {
        let mut allow_list = self.allow_list.write();
        if let Some(idx) = allow_list.iter().position(|m| m == model_name) {
            info!(model = model_name, "Removed model from allow-list");
            allow_list.remove(idx);
        }
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.list_models())
            .field("api_base", &self.api_base)
            .field("provider", &self.provider)
            .finish()
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}
