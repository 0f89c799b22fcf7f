//! CLI commands implementation

use agent_core::{Config, EndpointClient, ModelRegistry};
use agent_tools::{create_default_registry, SearchNormalizer, SearchSource, ToolCall};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

// ANSI color codes
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const BLUE: &str = "\x1b[94m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

fn print_status(ok: bool, msg: &str) {
    let icon = if ok {
        format!("{}✓{}", GREEN, RESET)
    } else {
        format!("{}✗{}", RED, RESET)
    };
    println!("  {} {}", icon, msg);
}

/// Explicit path, then agent.toml discovery, then built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Ok(Config::try_load().unwrap_or_else(|| {
            debug!("No agent.toml found, using defaults");
            Config::default_minimal()
        })),
    }
}

/// Run one search and print the normalized response
pub async fn search(config: &Config, query: &str, num_results: usize, json: bool) -> Result<()> {
    let normalizer = SearchNormalizer::from_config(&config.search)?;
    let response = normalizer.search(query, num_results).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if !response.is_success() {
        let error = response.error.as_deref().unwrap_or_default();
        println!("{}Search failed:{} {}", RED, RESET, error);
        return Ok(());
    }

    let source = response.source.map(|s| s.to_string()).unwrap_or_default();
    println!(
        "{}Results for '{}'{} {}({}, {} results){}",
        BOLD, response.query, RESET, DIM, source, response.total_results, RESET
    );
    if let Some(note) = &response.note {
        let color = match response.source {
            Some(SearchSource::DemoPlaceholderFallback) => RED,
            _ => YELLOW,
        };
        println!("{}{}{}", color, note, RESET);
    }
    println!();

    for result in &response.results {
        println!("{}. {} {}[{}]{}", result.position, result.title, DIM, result.source_label, RESET);
        if !result.url.is_empty() {
            println!("   {}{}{}", BLUE, result.url, RESET);
        }
        if !result.snippet.is_empty() {
            println!("   {}", result.snippet);
        }
        println!();
    }

    Ok(())
}

/// List allow-listed models
pub fn models_list(config: &Config) -> Result<()> {
    let registry = ModelRegistry::from_config(config);

    println!("{}Available models{}", BOLD, RESET);
    for name in registry.list_models() {
        let marker = if name == config.models.selected {
            format!(" {}(selected){}", GREEN, RESET)
        } else {
            String::new()
        };
        println!("  {}{}", name, marker);
    }

    Ok(())
}

/// Show the descriptor for one model, credential masked
pub fn models_show(config: &Config, name: &str) -> Result<()> {
    let registry = ModelRegistry::from_config(config);
    let descriptor = registry.create(name)?;

    println!("{}", serde_json::to_string_pretty(&descriptor.redacted())?);
    Ok(())
}

/// Check the endpoint answers and serves the model
pub async fn health(config: &Config, model: Option<String>) -> Result<()> {
    let registry = ModelRegistry::from_config(config);
    let name = model.unwrap_or_else(|| config.models.selected.clone());
    let descriptor = registry.create(&name)?;
    let client = EndpointClient::new(&descriptor)?;

    println!("{}Inference Endpoint{}", BOLD, RESET);
    println!("  Endpoint: {}", descriptor.endpoint_base_url);
    println!("  Protocol: {}", descriptor.provider_protocol);

    if !client.health_check().await? {
        print_status(false, "Endpoint is not reachable");
        println!("\n  Start with: {}ollama serve{}", BLUE, RESET);
        anyhow::bail!("Inference endpoint not reachable at {}", descriptor.endpoint_base_url);
    }
    print_status(true, "Endpoint is reachable");

    if client.is_served().await? {
        print_status(true, &format!("Model {} is available", name));
    } else {
        print_status(false, &format!("Model {} is not served", name));
        println!("\n  Pull with: {}ollama pull {}{}", BLUE, name, RESET);
    }

    Ok(())
}

/// Print tool definitions as JSON
pub fn tools(config: &Config) -> Result<()> {
    let registry = create_default_registry(config)?;
    println!("{}", serde_json::to_string_pretty(&registry.tool_definitions())?);
    Ok(())
}

/// Dispatch one tool call and print the result
pub async fn call(config: &Config, name: String, args: &str) -> Result<()> {
    let registry = create_default_registry(config)?;
    let arguments = serde_json::from_str(args).context("Tool arguments must be valid JSON")?;

    let result = registry.call(&ToolCall { name, arguments }).await;

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    if let Some(error) = result.error {
        eprintln!("{}Error:{} {}", RED, RESET, error);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\napi_key_env = \"DEMO_KEY\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.search.api_key_env, "DEMO_KEY");
    }

    #[test]
    fn test_load_config_explicit_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_config(Some(&dir.path().join("agent.toml"))).is_err());
    }

    #[test]
    fn test_models_show_rejects_unknown() {
        let err = models_show(&Config::default_minimal(), "not-a-real-model").unwrap_err();
        assert!(err.to_string().contains("qwen3:30b"));
    }
}
