use crate::models::incident::{Severity, StructuredIncident};
use crate::models::{principal, report};
use crate::services::escalation::EscalationTargets;
use crate::utils::wrap_text;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const BODY_WIDTH_CHARS: usize = 90;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pdf error: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LineStyle {
    Banner,
    Heading,
    Body,
    BodyBold,
}

impl LineStyle {
    fn size(self) -> f32 {
        match self {
            LineStyle::Banner => 18.0,
            LineStyle::Heading => 13.0,
            LineStyle::Body | LineStyle::BodyBold => 11.0,
        }
    }

    fn leading(self) -> f32 {
        match self {
            LineStyle::Banner => 12.0,
            LineStyle::Heading => 9.0,
            LineStyle::Body | LineStyle::BodyBold => 6.5,
        }
    }
}

/// Renders a filed report into a one-or-more page PDF under `output_dir`.
///
/// The document opens with a confidentiality banner and the identification
/// block (reporting student, school), then classification and narrative, so
/// a reviewer sees who and how severe before the prose.
#[derive(Clone)]
pub struct ReportRenderer {
    output_dir: PathBuf,
}

impl ReportRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn render(
        &self,
        report: &report::Model,
        incident: &StructuredIncident,
        targets: &EscalationTargets,
    ) -> Result<RenderedDocument, RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let filename = format!(
            "report_{}_{}.pdf",
            report.id,
            report.created_at.format("%Y%m%d")
        );
        let path = self.output_dir.join(filename);

        let lines = self.compose(report, incident, targets);

        let (doc, first_page, first_layer) = PdfDocument::new(
            format!("Incident report #{}", report.id),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "content",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        let mut y = PAGE_HEIGHT - MARGIN;
        for (text, style) in &lines {
            if y < MARGIN {
                let (page, new_layer) =
                    doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
                layer = doc.get_page(page).get_layer(new_layer);
                y = PAGE_HEIGHT - MARGIN;
            }
            let font = match style {
                LineStyle::Body => &regular,
                _ => &bold,
            };
            if !text.is_empty() {
                layer.use_text(text.clone(), style.size(), Mm(MARGIN), Mm(y), font);
            }
            y -= style.leading();
        }

        let file = File::create(&path)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        tracing::info!(report_id = report.id, path = %path.display(), "report rendered");
        Ok(RenderedDocument { path })
    }

    fn compose(
        &self,
        report: &report::Model,
        incident: &StructuredIncident,
        targets: &EscalationTargets,
    ) -> Vec<(String, LineStyle)> {
        let mut lines = vec![
            (
                format!("CONFIDENTIAL INCIDENT FILE #{}", report.id),
                LineStyle::Banner,
            ),
            (
                "For the named responsible adults only.".to_string(),
                LineStyle::BodyBold,
            ),
            (
                format!("Filed {}", report.created_at.format("%Y-%m-%d %H:%M")),
                LineStyle::Body,
            ),
            (
                format!(
                    "School: {} (#{})",
                    targets.school.name, targets.school.id
                ),
                LineStyle::Body,
            ),
            (String::new(), LineStyle::Body),
            ("Identification".to_string(), LineStyle::Heading),
            (
                format!(
                    "Student: {} (#{})",
                    targets.student.name, targets.student.id
                ),
                LineStyle::Body,
            ),
            (format!("Victim: {}", incident.victim_name), LineStyle::Body),
            (
                format!("Aggressors: {}", incident.aggressor_names),
                LineStyle::Body,
            ),
            (String::new(), LineStyle::Body),
            ("Classification".to_string(), LineStyle::Heading),
            (
                format!("Incident type: {}", incident.incident_type.as_str()),
                LineStyle::Body,
            ),
            (
                format!("Severity: {}", incident.severity.as_str()),
                if incident.severity == Severity::Severe {
                    LineStyle::BodyBold
                } else {
                    LineStyle::Body
                },
            ),
            (
                format!("Reported by: {}", incident.reporter_role.as_str()),
                LineStyle::Body,
            ),
            (String::new(), LineStyle::Body),
            ("Narrative".to_string(), LineStyle::Heading),
        ];
        for row in wrap_text(&incident.summary, BODY_WIDTH_CHARS) {
            lines.push((row, LineStyle::Body));
        }
        lines.push((String::new(), LineStyle::Body));
        lines.push(("Escalation".to_string(), LineStyle::Heading));
        lines.push((
            format!("Director: {}", labeled(targets.director.as_ref())),
            LineStyle::Body,
        ));
        lines.push((
            format!("Class teacher: {}", labeled(targets.teacher.as_ref())),
            LineStyle::Body,
        ));
        lines.push((
            format!("Guardian: {}", labeled(targets.guardian.as_ref())),
            LineStyle::Body,
        ));

        lines
    }
}

fn labeled(adult: Option<&principal::Model>) -> String {
    match adult {
        Some(p) => format!("{} (#{})", p.name, p.id),
        None => "unassigned".to_string(),
    }
}
