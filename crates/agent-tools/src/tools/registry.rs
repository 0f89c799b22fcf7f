//! Tool registry for managing and dispatching available tools

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::{Tool, ToolCall, ToolDefinition, ToolResult};

/// Registry of available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all registered tool names, sorted
    pub fn list_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get tool definitions for the LLM API
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        defs
    }

    /// Dispatch a tool call. Unknown tools and execution errors come back
    /// as failed results.
    #[instrument(skip(self), fields(tool = %call.name))]
    pub async fn call(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.get(&call.name) else {
            warn!("Tool not found");
            return ToolResult::error(format!("Unknown tool: {}", call.name));
        };

        info!("Executing tool");
        match tool.execute(&call.arguments).await {
            Ok(result) => {
                if result.success {
                    info!(output_len = result.output.len(), "Tool executed successfully");
                } else {
                    warn!(error = ?result.error, "Tool execution failed");
                }
                result
            }
            Err(e) => {
                warn!(error = %e, "Tool execution error");
                ToolResult::error(e.to_string())
            }
        }
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ParameterSchema;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the arguments back"
        }

        fn parameters_schema(&self) -> ParameterSchema {
            ParameterSchema::new()
        }

        async fn execute(&self, args: &Value) -> Result<ToolResult> {
            Ok(ToolResult::success(args.to_string()))
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "Always errors"
        }

        fn parameters_schema(&self) -> ParameterSchema {
            ParameterSchema::new()
        }

        async fn execute(&self, _args: &Value) -> Result<ToolResult> {
            bail!("Missing required parameter: query")
        }
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_registry_names_and_definitions_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(BrokenTool);

        assert_eq!(registry.list_names(), vec!["broken", "echo"]);

        let defs = registry.tool_definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].function.name, "broken");
        assert_eq!(defs[1].function.name, "echo");
    }

    #[tokio::test]
    async fn test_call_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry
            .call(&ToolCall {
                name: "echo".to_string(),
                arguments: json!({"x": 1}),
            })
            .await;

        assert!(result.success);
        assert_eq!(result.output, r#"{"x":1}"#);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry
            .call(&ToolCall {
                name: "missing".to_string(),
                arguments: Value::Null,
            })
            .await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Unknown tool: missing"));
    }

    #[tokio::test]
    async fn test_call_execution_error_becomes_result() {
        let mut registry = ToolRegistry::new();
        registry.register(BrokenTool);

        let result = registry
            .call(&ToolCall {
                name: "broken".to_string(),
                arguments: json!({}),
            })
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("query"));
    }
}
