//! Search provider transport

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use agent_core::config::SearchConfig;

/// Parameters sent to the provider for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub engine: String,
    pub q: String,
    pub num: usize,
}

impl SearchParams {
    pub fn google(query: impl Into<String>, num: usize) -> Self {
        Self {
            engine: "google".to_string(),
            q: query.into(),
            num,
        }
    }
}

/// A backend that answers one search request with its raw JSON payload.
///
/// Any `Err` is a provider fault: the normalizer reports it in-band.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn fetch(&self, params: &SearchParams, api_key: &str) -> Result<Value>;
}

/// SerpAPI over HTTPS
#[derive(Debug, Clone)]
pub struct SerpApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl SerpApiProvider {
    /// `timeout` of `None` keeps reqwest's default (no request timeout)
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout_secs.map(Duration::from_secs))
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    #[instrument(skip(self, params, api_key), fields(engine = %params.engine, num = params.num))]
    async fn fetch(&self, params: &SearchParams, api_key: &str) -> Result<Value> {
        let num = params.num.to_string();

        debug!("Sending search request to SerpAPI");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", params.engine.as_str()),
                ("q", params.q.as_str()),
                ("num", num.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .await
            .context("Search request failed")?;

        let status = response.status();
        let body = response.text().await.context("Failed to read response")?;

        if !status.is_success() {
            // SerpAPI explains failures in an "error" field
            let detail = provider_error(&body).unwrap_or(body);
            bail!("Search failed with status {}: {}", status, detail);
        }

        let payload: Value =
            serde_json::from_str(&body).context("Search response was not valid JSON")?;

        // a 200 with only "error" (e.g. no results) is left for the normalizer
        if let Some(detail) = payload.get("error").and_then(Value::as_str) {
            warn!(detail, "Search provider reported an error in a successful response");
        }

        Ok(payload)
    }
}

fn provider_error(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned HTTP response and hands back the raw request head
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/search", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request).into_owned()
        });

        (url, handle)
    }

    #[test]
    fn test_provider_error_extracted() {
        assert_eq!(
            provider_error(r#"{"error": "Invalid API key."}"#).as_deref(),
            Some("Invalid API key.")
        );
        assert!(provider_error("<html>bad gateway</html>").is_none());
        assert!(provider_error(r#"{"organic_results": []}"#).is_none());
    }

    #[test]
    fn test_google_params() {
        let params = SearchParams::google("rust async", 8);
        assert_eq!(params.engine, "google");
        assert_eq!(params.q, "rust async");
        assert_eq!(params.num, 8);
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        let provider = SerpApiProvider::new("http://127.0.0.1:9/search", Some(Duration::from_secs(2))).unwrap();
        let result = provider.fetch(&SearchParams::google("rust", 5), "key").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_request_carries_search_params() {
        let (url, server) = serve_once("200 OK", r#"{"organic_results": []}"#).await;
        let provider = SerpApiProvider::new(url, None).unwrap();

        let payload = provider
            .fetch(&SearchParams::google("rust async", 7), "secret")
            .await
            .unwrap();
        assert_eq!(payload["organic_results"], serde_json::json!([]));

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /search?"));
        assert!(request_line.contains("engine=google&q=rust+async&num=7&api_key=secret"));
    }

    #[tokio::test]
    async fn test_error_status_reports_provider_message() {
        let (url, server) = serve_once("401 Unauthorized", r#"{"error": "Invalid API key."}"#).await;
        let provider = SerpApiProvider::new(url, None).unwrap();

        let err = provider
            .fetch(&SearchParams::google("rust", 5), "bad")
            .await
            .unwrap_err();
        server.await.unwrap();

        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key."));
    }

    #[tokio::test]
    async fn test_non_json_body_is_error() {
        let (url, server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let provider = SerpApiProvider::new(url, None).unwrap();

        let err = provider
            .fetch(&SearchParams::google("rust", 5), "key")
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(err.to_string().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_error_field_in_success_body_is_returned() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"search_metadata": {"status": "Success"}, "error": "Google hasn't returned any results for this query."}"#,
        )
        .await;
        let provider = SerpApiProvider::new(url, None).unwrap();

        let payload = provider
            .fetch(&SearchParams::google("zzqxj", 3), "key")
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(payload["error"], "Google hasn't returned any results for this query.");
    }
}
