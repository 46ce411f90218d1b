use crate::config::generative::GenerativeConfig;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure modes of a single model call. Timeouts surface as `Http` (the
/// client enforces a bounded request timeout); all variants are treated
/// identically by callers: one failed attempt, no retry, fall back.
#[derive(Error, Debug)]
pub enum GenerativeError {
    #[error("generative service is not configured")]
    Unavailable,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("service returned an empty reply")]
    EmptyReply,
}

/// Seam for the generative-text service so the extractor and assistant can
/// be exercised with fakes. The reply is raw untrusted text.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerativeError>;
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Production client for the Gemini `generateContent` endpoint.
///
/// Without an API key the client still constructs, but every call reports
/// `Unavailable` so the pipeline runs in its degraded mode.
pub struct GeminiClient {
    config: GenerativeConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GenerativeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerativeError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerativeError::Unavailable)?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(GenerativeError::Status(response.status().as_u16()));
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerativeError::EmptyReply);
        }
        Ok(text)
    }
}
