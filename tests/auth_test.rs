mod common;

use common::{seed_school, spawn_app};
use serde_json::Value;

#[tokio::test]
async fn login_and_fetch_current_principal() {
    let app = spawn_app().await;
    let seeded = seed_school(&app.db).await;

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "email": seeded.student.email,
            "password": "password_123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["data"]["role"], "student");
    let token = body["data"]["token"].as_str().unwrap();

    let resp = app
        .client
        .get(app.url("/auth/me"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Sam Student");
    assert_eq!(body["data"]["school_id"], seeded.school.id);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_both_unauthorized() {
    let app = spawn_app().await;
    let seeded = seed_school(&app.db).await;

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "email": seeded.student.email,
            "password": "not_the_password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "email": "nobody@test.example",
            "password": "password_123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = spawn_app().await;

    let resp = app.client.get(app.url("/auth/me")).send().await.unwrap();
    assert_eq!(resp.status(), 401);

    let resp = app
        .client
        .get(app.url("/reports"))
        .bearer_auth("not.a.jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn reviewer_routes_reject_students() {
    let app = spawn_app().await;
    let seeded = seed_school(&app.db).await;
    let student_token = common::login(&app, &seeded.student.email).await;

    let resp = app
        .client
        .get(app.url("/reports"))
        .bearer_auth(&student_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .get(app.url("/reports/stats"))
        .bearer_auth(&student_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn guardians_see_their_linked_students_and_nobody_else_can() {
    let app = spawn_app().await;
    let seeded = seed_school(&app.db).await;
    let guardian_token = common::login(&app, &seeded.guardian.email).await;

    let resp = app
        .client
        .get(app.url("/guardian/students"))
        .bearer_auth(&guardian_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let wards = body["data"].as_array().unwrap();
    assert_eq!(wards.len(), 1);
    assert_eq!(wards[0]["id"].as_i64(), Some(seeded.student.id as i64));
    assert_eq!(wards[0]["name"], "Sam Student");

    let teacher_token = common::login(&app, &seeded.teacher.email).await;
    let resp = app
        .client
        .get(app.url("/guardian/students"))
        .bearer_auth(&teacher_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn reporter_routes_reject_teachers() {
    let app = spawn_app().await;
    let seeded = seed_school(&app.db).await;
    let teacher_token = common::login(&app, &seeded.teacher.email).await;

    let resp = app
        .client
        .post(app.url("/chat"))
        .bearer_auth(&teacher_token)
        .json(&serde_json::json!({"message": "hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .post(app.url("/reports"))
        .bearer_auth(&teacher_token)
        .json(&serde_json::json!({
            "transcript": [{"actor": "reporter", "text": "hi"}]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}
