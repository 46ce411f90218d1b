use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Bound on the extracted summary, in words. Longer summaries are cut and
/// marked before storage.
pub const SUMMARY_MAX_WORDS: usize = 30;

/// How the reporting student relates to the incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReporterRole {
    Victim,
    Witness,
    Unknown,
}

impl ReporterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReporterRole::Victim => "VICTIM",
            ReporterRole::Witness => "WITNESS",
            ReporterRole::Unknown => "UNKNOWN",
        }
    }

    /// Lenient parse of model output. Anything unrecognized maps to Unknown.
    pub fn from_reply(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "VICTIM" => ReporterRole::Victim,
            "WITNESS" => ReporterRole::Witness,
            _ => ReporterRole::Unknown,
        }
    }
}

impl fmt::Display for ReporterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Small open tag set for incident classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    Physical,
    Verbal,
    Cyber,
    Exclusion,
    Other,
}

impl IncidentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Physical => "physical",
            IncidentType::Verbal => "verbal",
            IncidentType::Cyber => "cyber",
            IncidentType::Exclusion => "exclusion",
            IncidentType::Other => "other",
        }
    }

    /// Lenient parse of model output. The set is open: unrecognized tags
    /// collapse to Other rather than failing the extraction.
    pub fn from_reply(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "physical" => IncidentType::Physical,
            "verbal" => IncidentType::Verbal,
            "cyber" | "cyberbullying" | "online" => IncidentType::Cyber,
            "exclusion" | "social exclusion" => IncidentType::Exclusion,
            _ => IncidentType::Other,
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Moderate => "MODERATE",
            Severity::Severe => "SEVERE",
        }
    }

    /// Lenient parse of model output. Unrecognized levels bias to Severe so
    /// an ambiguous extraction always reaches a human reviewer.
    pub fn from_reply(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" | "MILD" => Severity::Low,
            "MODERATE" | "MEDIUM" => Severity::Moderate,
            _ => Severity::Severe,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized record extracted from a free-text conversation.
///
/// Invariant: every field is populated. A record built from a partial model
/// reply takes per-field defaults; a record built from a failed call is the
/// deterministic [`StructuredIncident::fallback`]. Either way it is always
/// renderable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StructuredIncident {
    pub reporter_role: ReporterRole,
    pub victim_name: String,
    pub aggressor_names: String,
    pub incident_type: IncidentType,
    pub severity: Severity,
    pub summary: String,
}

impl StructuredIncident {
    pub const DEFAULT_VICTIM: &'static str = "the reporter";
    pub const DEFAULT_AGGRESSORS: &'static str = "not identified";
    pub const DEFAULT_SUMMARY: &'static str = "No summary provided.";

    /// The fixed record substituted when extraction fails for any reason.
    ///
    /// Biased toward urgency (VICTIM / SEVERE) so a failed extraction is
    /// always escalated to a human reviewer instead of being dropped.
    /// Deterministic and stable across calls.
    pub fn fallback() -> Self {
        Self {
            reporter_role: ReporterRole::Victim,
            victim_name: Self::DEFAULT_VICTIM.to_string(),
            aggressor_names: Self::DEFAULT_AGGRESSORS.to_string(),
            incident_type: IncidentType::Physical,
            severity: Severity::Severe,
            summary: "The student reports an incident in the school environment. \
                      Automated triage was unavailable; immediate review by the \
                      assigned staff is required."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_role_lenient_parse() {
        assert_eq!(ReporterRole::from_reply("victim"), ReporterRole::Victim);
        assert_eq!(ReporterRole::from_reply(" WITNESS "), ReporterRole::Witness);
        assert_eq!(ReporterRole::from_reply("bystander"), ReporterRole::Unknown);
    }

    #[test]
    fn incident_type_open_set_collapses_to_other() {
        assert_eq!(IncidentType::from_reply("Physical"), IncidentType::Physical);
        assert_eq!(IncidentType::from_reply("cyberbullying"), IncidentType::Cyber);
        assert_eq!(IncidentType::from_reply("vandalism"), IncidentType::Other);
    }

    #[test]
    fn severity_biases_to_severe() {
        assert_eq!(Severity::from_reply("low"), Severity::Low);
        assert_eq!(Severity::from_reply("medium"), Severity::Moderate);
        assert_eq!(Severity::from_reply("CRITICAL"), Severity::Severe);
        assert_eq!(Severity::from_reply("???"), Severity::Severe);
    }

    #[test]
    fn fallback_is_deterministic() {
        let a = StructuredIncident::fallback();
        let b = StructuredIncident::fallback();
        assert_eq!(a, b);
        assert_eq!(a.severity, Severity::Severe);
        assert!(!a.summary.is_empty());
    }
}
