//! Where the search provider key comes from

/// Supplies the provider key for one search call.
///
/// Called on every search so a rotated key is picked up without a restart.
/// `None` (or an empty string) selects demo mode.
pub trait CredentialSource: Send + Sync {
    fn credential(&self) -> Option<String>;
}

/// Reads the key from an environment variable at call time
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new("SERPAPI_KEY")
    }
}

impl CredentialSource for EnvCredential {
    fn credential(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|v| !v.is_empty())
    }
}

/// Fixed key (or none), for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn credential(&self) -> Option<String> {
        self.0.clone().filter(|v| !v.is_empty())
    }
}
