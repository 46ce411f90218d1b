mod common;

use common::{create_principal, create_school, seed_school, setup_db};
use sayit::error::AppError;
use sayit::models::Role;
use sayit::services::escalation::EscalationResolver;

#[tokio::test]
async fn resolves_full_adult_chain() {
    let db = setup_db().await;
    let seeded = seed_school(&db).await;
    let resolver = EscalationResolver::new(db);

    let targets = resolver.resolve(seeded.student.id).await.unwrap();

    assert_eq!(targets.school.id, seeded.school.id);
    assert_eq!(targets.director.as_ref().map(|d| d.id), Some(seeded.director.id));
    assert_eq!(targets.teacher.as_ref().map(|t| t.id), Some(seeded.teacher.id));
    assert_eq!(targets.guardian.as_ref().map(|g| g.id), Some(seeded.guardian.id));
}

#[tokio::test]
async fn recipients_are_deduplicated_and_ordered() {
    let db = setup_db().await;
    let seeded = seed_school(&db).await;
    let resolver = EscalationResolver::new(db);

    let targets = resolver.resolve(seeded.student.id).await.unwrap();
    let recipients = targets.recipients();

    assert_eq!(
        recipients,
        vec![
            seeded.director.email.clone(),
            seeded.teacher.email.clone(),
            seeded.guardian.email.clone(),
        ]
    );
}

#[tokio::test]
async fn unknown_student_is_not_found() {
    let db = setup_db().await;
    let resolver = EscalationResolver::new(db);

    let err = resolver.resolve(9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn non_student_principal_is_not_found() {
    let db = setup_db().await;
    let seeded = seed_school(&db).await;
    let resolver = EscalationResolver::new(db);

    let err = resolver.resolve(seeded.teacher.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn student_without_school_is_rejected() {
    let db = setup_db().await;
    let student = create_principal(&db, "Orphaned", Role::Student, None, None, None).await;
    let resolver = EscalationResolver::new(db);

    let err = resolver.resolve(student.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn missing_adults_resolve_to_none() {
    let db = setup_db().await;
    let school = create_school(&db, "Bare School").await;
    let student =
        create_principal(&db, "Solo Student", Role::Student, Some(school.id), None, None).await;
    let resolver = EscalationResolver::new(db);

    let targets = resolver.resolve(student.id).await.unwrap();

    assert!(targets.director.is_none());
    assert!(targets.teacher.is_none());
    assert!(targets.guardian.is_none());
    assert!(targets.recipients().is_empty());
}
