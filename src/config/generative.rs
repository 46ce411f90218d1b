use std::env;
use std::time::Duration;

/// Configuration for the generative-text service used by the intake
/// assistant and the incident extractor.
///
/// A missing API key is not an error: the service runs in degraded mode and
/// every model call reports unavailability, which downstream code turns into
/// the deterministic fallback behavior.
#[derive(Debug, Clone)]
pub struct GenerativeConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl GenerativeConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
        let endpoint = env::var("GENAI_ENDPOINT")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());
        let model = env::var("GENAI_MODEL").unwrap_or_else(|_| "gemini-pro".to_string());
        let timeout_secs: u64 = env::var("GENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8);

        Self {
            api_key,
            endpoint,
            model,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
