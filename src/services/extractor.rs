use crate::models::incident::{
    IncidentType, ReporterRole, Severity, StructuredIncident, SUMMARY_MAX_WORDS,
};
use crate::services::generative::{GenerativeClient, GenerativeError};
use crate::utils::{strip_code_fences, truncate_words};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Reporter,
    Assistant,
}

/// One turn of the intake conversation. Session-scoped; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatTurn {
    pub actor: Actor,
    pub text: String,
}

#[derive(Error, Debug)]
enum ExtractError {
    #[error(transparent)]
    Generative(#[from] GenerativeError),

    #[error("reply could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

const EXTRACTION_INSTRUCTION: &str = "\
You are a school safeguarding triage system. Analyze the conversation below \
between a reporting student and an intake assistant, and answer with exactly \
one JSON object and nothing else. The object must have these fields:\n\
  \"reporter_role\": \"VICTIM\" | \"WITNESS\" | \"UNKNOWN\"\n\
  \"victim_name\": name of the victim, or \"the reporter\"\n\
  \"aggressor_names\": names of the people responsible, comma separated\n\
  \"incident_type\": \"physical\" | \"verbal\" | \"cyber\" | \"exclusion\" | \"other\"\n\
  \"severity\": \"LOW\" | \"MODERATE\" | \"SEVERE\"\n\
  \"summary\": factual summary of the incident in at most 30 words\n\
Do not wrap the object in markdown fences.\n\nConversation:\n";

/// The reply shape we are willing to accept. Every field is optional and
/// loosely typed: models return arrays where strings were asked for and
/// vice versa. Anything missing takes its default during normalization.
#[derive(Deserialize)]
struct RawIncident {
    #[serde(default)]
    reporter_role: Option<String>,
    #[serde(default)]
    victim_name: Option<String>,
    #[serde(default)]
    aggressor_names: Option<serde_json::Value>,
    #[serde(default)]
    incident_type: Option<serde_json::Value>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

/// Turns a free-form conversation into a [`StructuredIncident`].
///
/// `extract` is total: any failure of the model call or of decoding yields
/// the deterministic fallback record, never an error. The degraded path is
/// logged so operators can see extraction quality, but the reporting student
/// never does.
#[derive(Clone)]
pub struct IncidentExtractor {
    client: Arc<dyn GenerativeClient>,
}

impl IncidentExtractor {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client }
    }

    pub async fn extract(&self, conversation: &[ChatTurn]) -> StructuredIncident {
        match self.try_extract(conversation).await {
            Ok(incident) => incident,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "incident extraction failed, substituting fallback record"
                );
                StructuredIncident::fallback()
            }
        }
    }

    async fn try_extract(&self, conversation: &[ChatTurn]) -> Result<StructuredIncident, ExtractError> {
        let prompt = format!("{}{}", EXTRACTION_INSTRUCTION, flatten_transcript(conversation));
        let reply = self.client.complete(&prompt).await?;

        // Untrusted text: strip fence markup, then decode strictly.
        // serde_json rejects trailing commas and other near-JSON, which is
        // exactly what we want — no repair, just the fallback.
        let payload = strip_code_fences(&reply);
        let raw: RawIncident = serde_json::from_str(&payload)?;
        Ok(normalize(raw))
    }
}

/// Flatten the conversation into the transcript interpolated into the
/// instruction template.
pub fn flatten_transcript(conversation: &[ChatTurn]) -> String {
    conversation
        .iter()
        .map(|turn| {
            let speaker = match turn.actor {
                Actor::Reporter => "Reporter",
                Actor::Assistant => "Assistant",
            };
            format!("{}: {}", speaker, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize(raw: RawIncident) -> StructuredIncident {
    let reporter_role = raw
        .reporter_role
        .as_deref()
        .map(ReporterRole::from_reply)
        .unwrap_or(ReporterRole::Unknown);

    let victim_name = raw
        .victim_name
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| StructuredIncident::DEFAULT_VICTIM.to_string());

    let aggressor_names = raw
        .aggressor_names
        .as_ref()
        .and_then(join_names)
        .unwrap_or_else(|| StructuredIncident::DEFAULT_AGGRESSORS.to_string());

    let incident_type = raw
        .incident_type
        .as_ref()
        .and_then(first_tag)
        .map(|tag| IncidentType::from_reply(&tag))
        .unwrap_or(IncidentType::Other);

    let severity = raw
        .severity
        .as_deref()
        .map(Severity::from_reply)
        .unwrap_or(Severity::Severe);

    let summary = match raw.summary.filter(|s| !s.trim().is_empty()) {
        Some(s) => truncate_words(&s, SUMMARY_MAX_WORDS),
        None => StructuredIncident::DEFAULT_SUMMARY.to_string(),
    };

    StructuredIncident {
        reporter_role,
        victim_name,
        aggressor_names,
        incident_type,
        severity,
        summary,
    }
}

/// "a, b" from either a JSON string or an array of strings.
fn join_names(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let names: Vec<&str> = items
                .iter()
                .filter_map(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .collect();
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        }
        _ => None,
    }
}

/// First usable tag from either a JSON string or an array of strings.
fn first_tag(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .find(|s| !s.trim().is_empty())
            .map(|s| s.to_string()),
        _ => None,
    }
}
