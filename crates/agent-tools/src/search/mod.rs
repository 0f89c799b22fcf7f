//! Search normalizer
//!
//! Turns a free-text query into a uniform [`SearchResponse`], either from a
//! live SerpAPI call or from deterministic placeholder data when no key is
//! configured.

mod credential;
mod normalizer;
mod provider;

pub use credential::{CredentialSource, EnvCredential, StaticCredential};
pub use normalizer::{SearchNormalizer, DEFAULT_NUM_RESULTS, PLACEHOLDER_CAP};
pub use provider::{SearchParams, SearchProvider, SerpApiProvider};

use serde::{Deserialize, Serialize};

/// Origin of a single result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultLabel {
    /// Ordinary ranked listing
    Organic,
    /// Featured answer box, shown above the ranked list
    DirectAnswer,
    /// Generated in demo mode
    Synthetic,
}

impl std::fmt::Display for ResultLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultLabel::Organic => write!(f, "organic"),
            ResultLabel::DirectAnswer => write!(f, "direct-answer"),
            ResultLabel::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// One normalized search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source_label: ResultLabel,
    /// 1-based rank; direct answers use 0
    pub position: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Success,
    Error,
}

/// Provenance of a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchSource {
    LiveProvider,
    /// No credential configured
    DemoPlaceholder,
    /// Credential configured, but the provider payload had no recognizable results
    DemoPlaceholderFallback,
}

impl std::fmt::Display for SearchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchSource::LiveProvider => write!(f, "live-provider"),
            SearchSource::DemoPlaceholder => write!(f, "demo-placeholder"),
            SearchSource::DemoPlaceholderFallback => write!(f, "demo-placeholder-fallback"),
        }
    }
}

/// Envelope for one query's outcome.
///
/// `total_results` always equals `results.len()`; an error response has no
/// results and no source. Construct through [`SearchResponse::success`] and
/// [`SearchResponse::error`] to keep that true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: SearchStatus,
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SearchSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn success(query: impl Into<String>, results: Vec<SearchResult>, source: SearchSource) -> Self {
        Self {
            status: SearchStatus::Success,
            query: query.into(),
            total_results: results.len(),
            results,
            source: Some(source),
            note: None,
            error: None,
        }
    }

    pub fn error(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::Error,
            query: query.into(),
            results: Vec::new(),
            total_results: 0,
            source: None,
            note: None,
            error: Some(error.into()),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == SearchStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serializes_kebab_case() {
        let resp = SearchResponse::success(
            "rust",
            vec![SearchResult {
                title: "Answer".to_string(),
                url: String::new(),
                snippet: "A language".to_string(),
                source_label: ResultLabel::DirectAnswer,
                position: 0,
            }],
            SearchSource::LiveProvider,
        );

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["source"], "live-provider");
        assert_eq!(json["total_results"], 1);
        assert_eq!(json["results"][0]["source_label"], "direct-answer");
        assert!(json.get("error").is_none());
        assert!(json.get("note").is_none());
    }

    #[test]
    fn test_error_has_no_results_or_source() {
        let resp = SearchResponse::error("rust", "Search failed: timeout");

        assert!(!resp.is_success());
        assert!(resp.results.is_empty());
        assert_eq!(resp.total_results, 0);

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Search failed: timeout");
        assert!(json.get("source").is_none());
    }

    #[test]
    fn test_display_matches_serde() {
        for source in [
            SearchSource::LiveProvider,
            SearchSource::DemoPlaceholder,
            SearchSource::DemoPlaceholderFallback,
        ] {
            assert_eq!(serde_json::to_value(source).unwrap(), source.to_string());
        }
        for label in [ResultLabel::Organic, ResultLabel::DirectAnswer, ResultLabel::Synthetic] {
            assert_eq!(serde_json::to_value(label).unwrap(), label.to_string());
        }
    }
}
