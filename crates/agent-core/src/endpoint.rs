//! Health check and model listing for the OpenAI-compatible endpoint a descriptor points at

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::models::ModelDescriptor;

/// A model reported by the endpoint's `/models` listing
#[derive(Debug, Clone, Deserialize)]
pub struct ServedModel {
    pub id: String,
    #[serde(default)]
    pub owned_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    data: Vec<ServedModel>,
}

/// Client for the endpoint described by a [`ModelDescriptor`]
#[derive(Debug, Clone)]
pub struct EndpointClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl EndpointClient {
    /// Create a new client with default timeout
    pub fn new(descriptor: &ModelDescriptor) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: descriptor.endpoint_base_url.trim_end_matches('/').to_string(),
            api_key: descriptor.credential.clone(),
            model: descriptor.model_name.clone(),
            client,
        })
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    /// Check if the endpoint answers
    pub async fn health_check(&self) -> Result<bool> {
        match self
            .client
            .get(self.models_url())
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => {
                debug!(error = %e, url = %self.base_url, "Endpoint unreachable");
                Ok(false)
            }
        }
    }

    /// List the models the endpoint serves
    pub async fn list_models(&self) -> Result<Vec<ServedModel>> {
        let body = self
            .client
            .get(self.models_url())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to connect to inference endpoint")?
            .error_for_status()
            .context("Inference endpoint returned an error status")?
            .text()
            .await
            .context("Failed to read models response")?;

        parse_models(&body)
    }

    /// Whether the descriptor's model appears in the endpoint's listing
    pub async fn is_served(&self) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| m.id == self.model))
    }
}

fn parse_models(body: &str) -> Result<Vec<ServedModel>> {
    let resp: ModelsResponse =
        serde_json::from_str(body).context("Failed to parse models response")?;
    Ok(resp.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelRegistry;

    #[test]
    fn test_parse_models() {
        let body = r#"{
            "object": "list",
            "data": [
                {"id": "qwen3:30b", "object": "model", "created": 1, "owned_by": "library"},
                {"id": "gpt-oss:20b", "object": "model", "created": 2}
            ]
        }"#;

        let models = parse_models(body).unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].id, "qwen3:30b");
        assert_eq!(models[0].owned_by.as_deref(), Some("library"));
        assert!(models[1].owned_by.is_none());
    }

    #[test]
    fn test_parse_models_rejects_other_shapes() {
        assert!(parse_models(r#"{"models": []}"#).is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let desc = ModelRegistry::new()
            .with_api_base("http://localhost:11434/v1/")
            .create("qwen3:30b")
            .unwrap();
        let client = EndpointClient::new(&desc).unwrap();

        assert_eq!(client.models_url(), "http://localhost:11434/v1/models");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        // port 9 (discard) is not an HTTP server
        let desc = ModelRegistry::new()
            .with_api_base("http://127.0.0.1:9/v1")
            .create("qwen3:30b")
            .unwrap();
        let client = EndpointClient::new(&desc).unwrap();

        assert!(!client.health_check().await.unwrap());
    }
}
