//! Built-in tools for the agent framework

mod web_search;

pub use web_search::WebSearchTool;

use anyhow::Result;
use agent_core::Config;

use super::registry::ToolRegistry;
use crate::search::SearchNormalizer;

/// Create a registry with all default tools
pub fn create_default_registry(config: &Config) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    registry.register(WebSearchTool::new(SearchNormalizer::from_config(&config.search)?));

    Ok(registry)
}
