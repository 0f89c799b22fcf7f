//! Maps provider payloads (or their absence) onto [`SearchResponse`]

use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use agent_core::config::SearchConfig;

use super::credential::{CredentialSource, EnvCredential};
use super::provider::{SearchParams, SearchProvider, SerpApiProvider};
use super::{ResultLabel, SearchResponse, SearchResult, SearchSource};

pub const DEFAULT_NUM_RESULTS: usize = 5;
/// Demo mode never synthesizes more than this many results
pub const PLACEHOLDER_CAP: usize = 5;

const ANSWER_TITLE: &str = "Answer";
const DEMO_NOTE: &str =
    "Demo mode: configure a SerpAPI key to get real search results";
const FALLBACK_NOTE: &str =
    "Search provider returned no recognizable results; showing demo results instead";

/// Search entry point handed to the agent runtime
#[derive(Clone)]
pub struct SearchNormalizer {
    provider: Arc<dyn SearchProvider>,
    credential: Arc<dyn CredentialSource>,
    engine: String,
}

impl SearchNormalizer {
    pub fn new(provider: impl SearchProvider + 'static, credential: impl CredentialSource + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
            credential: Arc::new(credential),
            engine: "google".to_string(),
        }
    }

    /// SerpAPI provider with the key read from the configured environment variable
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let provider = SerpApiProvider::from_config(config)?;
        let credential = EnvCredential::new(&config.api_key_env);
        Ok(Self::new(provider, credential).with_engine(&config.engine))
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Run one search. Never fails: provider faults come back as an error
    /// response.
    #[instrument(skip(self, query), fields(query = tracing::field::Empty))]
    pub async fn search(&self, query: &str, num_results: usize) -> SearchResponse {
        tracing::Span::current().record("query", query.chars().take(50).collect::<String>().as_str());

        let Some(api_key) = self.credential.credential() else {
            debug!("No search credential, using demo results");
            return placeholder_response(query, num_results, SearchSource::DemoPlaceholder);
        };

        // the provider gets the caller's count unclamped
        let params = SearchParams {
            engine: self.engine.clone(),
            q: query.to_string(),
            num: num_results,
        };

        let payload = match self.provider.fetch(&params, &api_key).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Search request failed");
                return SearchResponse::error(query, format!("Search failed: {:#}", e));
            }
        };

        match parse_results(&payload) {
            Ok(Some(results)) => {
                info!(count = results.len(), "Search returned results");
                SearchResponse::success(query, results, SearchSource::LiveProvider)
            }
            Ok(None) => {
                warn!("Unrecognized search payload, falling back to demo results");
                let mut response =
                    placeholder_response(query, PLACEHOLDER_CAP, SearchSource::DemoPlaceholderFallback);
                // SerpAPI answers "no results" with a 200 and an "error" message
                if let Some(detail) = payload.get("error").and_then(Value::as_str) {
                    response.note = Some(format!("{} (provider said: {})", FALLBACK_NOTE, detail));
                }
                response
            }
            Err(e) => {
                warn!(error = %e, "Malformed search payload");
                SearchResponse::error(query, format!("Search failed: {:#}", e))
            }
        }
    }
}

impl std::fmt::Debug for SearchNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchNormalizer")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// Organic list first, then the answer box; `Ok(None)` when neither key is
/// present. A key that is present with the wrong JSON type is an error.
fn parse_results(payload: &Value) -> Result<Option<Vec<SearchResult>>> {
    if let Some(organic) = payload.get("organic_results") {
        let items = organic
            .as_array()
            .ok_or_else(|| anyhow!("organic_results is not a list: {}", organic))?;
        let results = items
            .iter()
            .map(|item| SearchResult {
                title: str_field(item, "title").unwrap_or_default(),
                url: str_field(item, "link").unwrap_or_default(),
                snippet: str_field(item, "snippet").unwrap_or_default(),
                source_label: ResultLabel::Organic,
                position: item.get("position").and_then(Value::as_u64).unwrap_or(0),
            })
            .collect();
        return Ok(Some(results));
    }

    if let Some(answer) = payload.get("answer_box") {
        if !answer.is_object() {
            bail!("answer_box is not an object: {}", answer);
        }
        let result = SearchResult {
            title: str_field(answer, "title").unwrap_or_else(|| ANSWER_TITLE.to_string()),
            url: str_field(answer, "link").unwrap_or_default(),
            snippet: str_field(answer, "answer")
                .or_else(|| str_field(answer, "snippet"))
                .unwrap_or_default(),
            source_label: ResultLabel::DirectAnswer,
            position: 0,
        };
        return Ok(Some(vec![result]));
    }

    Ok(None)
}

fn str_field(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(str::to_string)
}

fn placeholder_response(query: &str, num_results: usize, source: SearchSource) -> SearchResponse {
    let note = match source {
        SearchSource::DemoPlaceholderFallback => FALLBACK_NOTE,
        _ => DEMO_NOTE,
    };
    SearchResponse::success(query, placeholder_results(query, num_results), source).with_note(note)
}

fn placeholder_results(query: &str, num_results: usize) -> Vec<SearchResult> {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();

    (1..=num_results.min(PLACEHOLDER_CAP))
        .map(|i| SearchResult {
            title: format!("Search result {} for '{}'", i, query),
            url: format!("https://www.google.com/search?q={}", encoded),
            snippet: format!(
                "Summary {} of results about '{}'. With a SerpAPI key configured, live search content appears here.",
                i, query
            ),
            source_label: ResultLabel::Synthetic,
            position: i as u64,
        })
        .collect()
}
