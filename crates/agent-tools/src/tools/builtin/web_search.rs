//! Web search tool backed by the search normalizer

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::search::{SearchNormalizer, DEFAULT_NUM_RESULTS};
use crate::tools::{ParameterProperty, ParameterSchema, Tool, ToolResult};

/// Tool for searching the web
#[derive(Debug, Clone)]
pub struct WebSearchTool {
    normalizer: SearchNormalizer,
}

impl WebSearchTool {
    pub fn new(normalizer: SearchNormalizer) -> Self {
        Self { normalizer }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web. Returns JSON with status, query, results (title, url, snippet, source_label, position), total_results and source."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required("query", ParameterProperty::string("The search query"))
            .with_property(
                "num_results",
                ParameterProperty::integer("Number of results to return (default: 5)")
                    .with_default(Value::Number(DEFAULT_NUM_RESULTS.into())),
            )
    }

    async fn execute(&self, args: &Value) -> Result<ToolResult> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing required parameter: query"))?;

        // models sometimes send integers as floats
        let num_results = args
            .get("num_results")
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)))
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_NUM_RESULTS);

        debug!(num_results, "Web search parameters");

        let response = self.normalizer.search(query, num_results).await;
        let output = serde_json::to_string_pretty(&response)?;

        if response.is_success() {
            Ok(ToolResult::success(output))
        } else {
            let error = response.error.unwrap_or_else(|| "Search failed".to_string());
            Ok(ToolResult::failure(output, error))
        }
    }
}
