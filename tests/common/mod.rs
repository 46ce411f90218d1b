#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::Client;
use sayit::models::principal::{self, Role};
use sayit::models::{class_group, school};
use sayit::services::assistant::Assistant;
use sayit::services::escalation::EscalationResolver;
use sayit::services::extractor::IncidentExtractor;
use sayit::services::generative::{GenerativeClient, GenerativeError};
use sayit::services::notifier::Notifier;
use sayit::services::pipeline::ReportPipeline;
use sayit::services::renderer::ReportRenderer;
use sayit::services::report::ReportService;
use sayit::utils::hash_password;
use sea_orm::{ActiveModelTrait, ConnectOptions, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();
static PRINCIPAL_COUNTER: AtomicUsize = AtomicUsize::new(0);
static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn init_env() {
    INIT.call_once(|| {
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        let config = sayit::config::jwt::JwtConfig::from_env().unwrap();
        let _ = sayit::utils::jwt::init_jwt_config(config);
    });
}

/// Fresh in-memory database with migrations applied. A single connection is
/// used so every query sees the same memory database.
pub async fn setup_db() -> DatabaseConnection {
    init_env();

    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = sea_orm::Database::connect(options)
        .await
        .expect("Failed to open in-memory database");

    sayit::migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Unique scratch directory for rendered documents.
pub fn scratch_dir(prefix: &str) -> PathBuf {
    let n = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("sayit_{}_{}_{}", prefix, std::process::id(), n));
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

/// Model stub that always returns the same scripted reply.
pub struct FakeGenerative {
    pub reply: String,
}

impl FakeGenerative {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl GenerativeClient for FakeGenerative {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerativeError> {
        Ok(self.reply.clone())
    }
}

/// Model stub that always fails, as if the API were unreachable.
pub struct FailingGenerative;

#[async_trait]
impl GenerativeClient for FailingGenerative {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerativeError> {
        Err(GenerativeError::Unavailable)
    }
}

pub async fn create_school(db: &DatabaseConnection, name: &str) -> school::Model {
    let n = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    school::ActiveModel {
        name: Set(name.to_string()),
        address: Set(None),
        phone: Set(None),
        contact_email: Set(None),
        code: Set(format!("SCH-{}", n)),
        director_id: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert school")
}

pub async fn set_director(db: &DatabaseConnection, school_id: i32, director_id: i32) {
    let mut active: school::ActiveModel = school::Entity::find_by_id(school_id)
        .one(db)
        .await
        .expect("query failed")
        .expect("school missing")
        .into();
    active.director_id = Set(Some(director_id));
    active.update(db).await.expect("Failed to set director");
}

pub async fn create_class_group(
    db: &DatabaseConnection,
    label: &str,
    teacher_id: Option<i32>,
) -> class_group::Model {
    class_group::ActiveModel {
        label: Set(label.to_string()),
        teacher_id: Set(teacher_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert class group")
}

pub async fn create_principal(
    db: &DatabaseConnection,
    name: &str,
    role: Role,
    school_id: Option<i32>,
    class_group_id: Option<i32>,
    guardian_id: Option<i32>,
) -> principal::Model {
    let counter = PRINCIPAL_COUNTER.fetch_add(1, Ordering::SeqCst);
    principal::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!("{}_{}@test.example", role.as_str(), counter)),
        password_hash: Set(hash_password("password_123").expect("hash failed")),
        role: Set(role.as_str().to_string()),
        school_id: Set(school_id),
        class_group_id: Set(class_group_id),
        guardian_id: Set(guardian_id),
        active: Set(true),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert principal")
}

/// A school with a full adult chain: director, teacher with a class group,
/// guardian, and a student wired to all three.
pub struct SeededSchool {
    pub school: school::Model,
    pub director: principal::Model,
    pub teacher: principal::Model,
    pub guardian: principal::Model,
    pub student: principal::Model,
}

pub async fn seed_school(db: &DatabaseConnection) -> SeededSchool {
    let school = create_school(db, "Test School").await;
    let director =
        create_principal(db, "Diana Director", Role::Director, Some(school.id), None, None).await;
    set_director(db, school.id, director.id).await;
    let teacher =
        create_principal(db, "Tom Teacher", Role::Teacher, Some(school.id), None, None).await;
    let group = create_class_group(db, "4-B", Some(teacher.id)).await;
    let guardian = create_principal(db, "Gail Guardian", Role::Guardian, None, None, None).await;
    let student = create_principal(
        db,
        "Sam Student",
        Role::Student,
        Some(school.id),
        Some(group.id),
        Some(guardian.id),
    )
    .await;

    SeededSchool {
        school: school::Entity::find_by_id(school.id)
            .one(db)
            .await
            .expect("query failed")
            .expect("school missing"),
        director,
        teacher,
        guardian,
        student,
    }
}

pub fn build_pipeline(
    db: &DatabaseConnection,
    client: Arc<dyn GenerativeClient>,
    output_dir: PathBuf,
) -> ReportPipeline {
    ReportPipeline::new(
        IncidentExtractor::new(client),
        EscalationResolver::new(db.clone()),
        ReportService::new(db.clone()),
        ReportRenderer::new(output_dir),
        Notifier::from_env(),
    )
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

/// Spins up the full HTTP app on a random port, backed by an in-memory
/// database and a scripted model stub.
pub async fn spawn_app() -> TestApp {
    let db = setup_db().await;

    let client: Arc<dyn GenerativeClient> =
        Arc::new(FakeGenerative::new("Thanks, noted. Anything else?"));
    let assistant = Assistant::new(client.clone());
    let pipeline = build_pipeline(&db, client, scratch_dir("http"));

    let app = axum::Router::new()
        .merge(sayit::routes::create_routes())
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(assistant))
        .layer(axum::extract::Extension(pipeline));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
    }
}

/// Log a principal in over HTTP and return the bearer token.
pub async fn login(app: &TestApp, email: &str) -> String {
    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "email": email,
            "password": "password_123"
        }))
        .send()
        .await
        .expect("login request failed");
    let body: serde_json::Value = resp.json().await.expect("login body not json");
    body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("login failed: {}", body))
        .to_string()
}
