//! agent-tools: callables exposed to the agent runtime
//!
//! Provides:
//! - Tool framework (trait, JSON-schema definitions, registry)
//! - Search normalizer over SerpAPI with an offline demo mode

pub mod search;
pub mod tools;

pub use search::{
    CredentialSource, EnvCredential, ResultLabel, SearchNormalizer, SearchParams,
    SearchProvider, SearchResponse, SearchResult, SearchSource, SearchStatus, SerpApiProvider,
    StaticCredential,
};
pub use tools::builtin::{create_default_registry, WebSearchTool};
pub use tools::registry::ToolRegistry;
pub use tools::{Tool, ToolCall, ToolDefinition, ToolResult};
