mod common;

use common::{scratch_dir, seed_school, setup_db};
use sayit::models::StructuredIncident;
use sayit::services::escalation::EscalationResolver;
use sayit::services::renderer::ReportRenderer;
use sayit::services::report::ReportService;

#[tokio::test]
async fn renders_a_valid_pdf_with_expected_name() {
    let db = setup_db().await;
    let seeded = seed_school(&db).await;
    let resolver = EscalationResolver::new(db.clone());
    let targets = resolver.resolve(seeded.student.id).await.unwrap();

    let report = ReportService::new(db)
        .create(seeded.school.id, Some(seeded.director.id), "physical", "SEVERE", "desc")
        .await
        .unwrap();

    let dir = scratch_dir("render");
    let renderer = ReportRenderer::new(dir.clone());
    let doc = renderer
        .render(&report, &StructuredIncident::fallback(), &targets)
        .unwrap();

    let expected = format!("report_{}_{}.pdf", report.id, report.created_at.format("%Y%m%d"));
    assert_eq!(doc.path, dir.join(expected));

    let bytes = std::fs::read(&doc.path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 500);
}

#[tokio::test]
async fn renders_with_every_adult_missing() {
    let db = setup_db().await;
    let school = common::create_school(&db, "Bare School").await;
    let student = common::create_principal(
        &db,
        "Solo",
        sayit::models::Role::Student,
        Some(school.id),
        None,
        None,
    )
    .await;
    let resolver = EscalationResolver::new(db.clone());
    let targets = resolver.resolve(student.id).await.unwrap();

    let report = ReportService::new(db)
        .create(school.id, None, "other", "LOW", "desc")
        .await
        .unwrap();

    let renderer = ReportRenderer::new(scratch_dir("render_bare"));
    let doc = renderer
        .render(&report, &StructuredIncident::fallback(), &targets)
        .unwrap();

    assert!(doc.path.exists());
}

#[tokio::test]
async fn long_narrative_still_renders() {
    let db = setup_db().await;
    let seeded = seed_school(&db).await;
    let resolver = EscalationResolver::new(db.clone());
    let targets = resolver.resolve(seeded.student.id).await.unwrap();

    let report = ReportService::new(db)
        .create(seeded.school.id, Some(seeded.director.id), "verbal", "MODERATE", "desc")
        .await
        .unwrap();

    let mut incident = StructuredIncident::fallback();
    incident.summary = "harassment in the corridor ".repeat(200);

    let renderer = ReportRenderer::new(scratch_dir("render_long"));
    let doc = renderer.render(&report, &incident, &targets).unwrap();

    let bytes = std::fs::read(&doc.path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
