use crate::ServiceError;
use std::fmt;
use std::time::Duration;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "TESTSMITH_MODEL";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const TIMEOUT_ENV: &str = "TESTSMITH_TIMEOUT_SECS";

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the chat-completions service.
///
/// The API key is read once and carried here; clients never consult the
/// environment themselves.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_ENV).ok_or(ServiceError::MissingApiKey(API_KEY_ENV))?;
        let mut config = Self::new(api_key.trim());

        if let Some(model) = get(MODEL_ENV) {
            config.model = model.trim().to_string();
        }
        if let Some(url) = get(BASE_URL_ENV) {
            config.base_url = url.trim().to_string();
        }
        if let Some(secs) = get(TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ServiceError::Config(format!("{TIMEOUT_ENV} must be a whole number of seconds"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_only_key_set() {
        let config = GeneratorConfig::from_lookup(lookup(&[(API_KEY_ENV, "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = GeneratorConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ServiceError::MissingApiKey(API_KEY_ENV)));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = GeneratorConfig::from_lookup(lookup(&[(API_KEY_ENV, "  ")])).unwrap_err();
        assert!(matches!(err, ServiceError::MissingApiKey(_)));
    }

    #[test]
    fn overrides_from_environment() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "k"),
            (MODEL_ENV, "gpt-4o"),
            (BASE_URL_ENV, "http://localhost:8080/v1/"),
            (TIMEOUT_ENV, "5"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn bad_timeout_is_config_error() {
        let err = GeneratorConfig::from_lookup(lookup(&[(API_KEY_ENV, "k"), (TIMEOUT_ENV, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }

    #[test]
    fn builder_overrides() {
        let config = GeneratorConfig::new("k")
            .with_model("m")
            .with_base_url("http://x")
            .with_timeout(Duration::from_secs(1));
        assert_eq!(config.model, "m");
        assert_eq!(config.completions_url(), "http://x/chat/completions");
    }

    #[test]
    fn debug_redacts_key() {
        let config = GeneratorConfig::new("sk-very-secret");
        let shown = format!("{config:?}");
        assert!(!shown.contains("sk-very-secret"));
        assert!(shown.contains("redacted"));
    }
}
