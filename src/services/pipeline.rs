use crate::error::AppResult;
use crate::models::incident::StructuredIncident;
use crate::models::report::ReportStatus;
use crate::services::escalation::EscalationResolver;
use crate::services::extractor::{ChatTurn, IncidentExtractor};
use crate::services::notifier::Notifier;
use crate::services::renderer::ReportRenderer;
use crate::services::report::ReportService;
use serde::Serialize;
use utoipa::ToSchema;

/// What the student gets back after filing: enough to confirm the report
/// exists, nothing that leaks reviewer-side detail.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionOutcome {
    pub report_id: i32,
    pub status: ReportStatus,
    pub incident_type: String,
    pub severity: String,
    pub notified: bool,
}

/// End-to-end intake: conversation in, stored report with rendered document
/// and notifications out.
///
/// Exactly one report row comes out of a submission regardless of which
/// optional stages fail. Rendering and notification never abort a filing.
#[derive(Clone)]
pub struct ReportPipeline {
    extractor: IncidentExtractor,
    resolver: EscalationResolver,
    reports: ReportService,
    renderer: ReportRenderer,
    notifier: Notifier,
}

impl ReportPipeline {
    pub fn new(
        extractor: IncidentExtractor,
        resolver: EscalationResolver,
        reports: ReportService,
        renderer: ReportRenderer,
        notifier: Notifier,
    ) -> Self {
        Self {
            extractor,
            resolver,
            reports,
            renderer,
            notifier,
        }
    }

    pub async fn submit(
        &self,
        student_id: i32,
        transcript: &[ChatTurn],
    ) -> AppResult<SubmissionOutcome> {
        let targets = self.resolver.resolve(student_id).await?;
        let incident = self.extractor.extract(transcript).await;

        let report = self
            .reports
            .create(
                targets.school.id,
                targets.director.as_ref().map(|d| d.id),
                incident.incident_type.as_str(),
                incident.severity.as_str(),
                &compose_description(&incident),
            )
            .await?;

        let document = match self.renderer.render(&report, &incident, &targets) {
            Ok(doc) => {
                let path = doc.path.to_string_lossy().into_owned();
                self.reports.attach_document(report.id, &path).await?;
                Some(doc)
            }
            Err(e) => {
                tracing::error!(report_id = report.id, "document render failed: {e}");
                None
            }
        };

        let subject = format!(
            "Incident report #{} — {} ({})",
            report.id,
            incident.incident_type.as_str(),
            incident.severity.as_str()
        );
        let body = format!(
            "A new incident report has been filed at {}.\n\n\
             Incident type: {}\nSeverity: {}\nReported by: {}\n\n\
             Summary: {}\n\nPlease review it in the Say It dashboard.",
            targets.school.name,
            incident.incident_type.as_str(),
            incident.severity.as_str(),
            incident.reporter_role.as_str(),
            incident.summary,
        );
        let notified = self
            .notifier
            .notify(
                &targets.recipients(),
                &subject,
                &body,
                document.as_ref().map(|d| d.path.as_path()),
            )
            .await;

        Ok(SubmissionOutcome {
            report_id: report.id,
            status: ReportStatus::Pending,
            incident_type: incident.incident_type.as_str().to_string(),
            severity: incident.severity.as_str().to_string(),
            notified,
        })
    }
}

/// Flattens the structured record into the stored narrative. The victim's
/// identity stays out of the report row; only the extracted names appear.
fn compose_description(incident: &StructuredIncident) -> String {
    format!(
        "[{}] VICTIM: {} | AGGRESSORS: {} | FACTS: {}",
        incident.reporter_role.as_str(),
        incident.victim_name,
        incident.aggressor_names,
        incident.summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_carries_all_extracted_fields() {
        let incident = StructuredIncident::fallback();
        let description = compose_description(&incident);
        assert!(description.starts_with("[VICTIM]"));
        assert!(description.contains("VICTIM: the reporter"));
        assert!(description.contains("AGGRESSORS: not identified"));
        assert!(description.contains("FACTS:"));
    }
}
