//! agent-core: shared pieces for the local agent demos
//!
//! Provides:
//! - Configuration loading (agent.toml)
//! - Model registry (allow-list + descriptor factory)
//! - Health check and model listing for the OpenAI-compatible inference endpoint

pub mod config;
pub mod endpoint;
pub mod models;

pub use config::Config;
pub use endpoint::{EndpointClient, ServedModel};
pub use models::{ModelDescriptor, ModelRegistry, RegistryError};
