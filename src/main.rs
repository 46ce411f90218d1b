use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use sayit::services::assistant::Assistant;
use sayit::services::escalation::EscalationResolver;
use sayit::services::extractor::IncidentExtractor;
use sayit::services::generative::{GeminiClient, GenerativeClient};
use sayit::services::notifier::Notifier;
use sayit::services::pipeline::ReportPipeline;
use sayit::services::renderer::ReportRenderer;
use sayit::services::report::ReportService;
use sayit::{config, migration, routes, utils};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Auth routes
        sayit::handlers::login,
        sayit::handlers::get_current_principal,
        sayit::handlers::auth::list_ward_students,
        // Chat routes
        sayit::handlers::chat::chat,
        // Report routes
        sayit::handlers::report::submit_report,
        sayit::handlers::report::list_reports,
        sayit::handlers::report::report_stats,
        sayit::handlers::report::set_report_status,
    ),
    components(
        schemas(
            sayit::response::ApiResponse<serde_json::Value>,
            sayit::response::PaginatedResponse<serde_json::Value>,
            sayit::response::PaginationQuery,
            sayit::error::AppError,
            // Auth
            sayit::handlers::auth::LoginRequest,
            sayit::handlers::auth::AuthResponse,
            sayit::handlers::auth::PrincipalResponse,
            // Chat
            sayit::handlers::chat::ChatRequest,
            sayit::handlers::chat::ChatResponse,
            sayit::services::extractor::ChatTurn,
            // Report
            sayit::handlers::report::SubmitReportRequest,
            sayit::handlers::report::ListReportsQuery,
            sayit::handlers::report::SetStatusRequest,
            sayit::handlers::report::ReportResponse,
            sayit::services::pipeline::SubmissionOutcome,
            sayit::services::report::ReportStats,
        )
    ),
    tags(
        (name = "auth", description = "Authentication operations"),
        (name = "chat", description = "Guided intake conversation"),
        (name = "reports", description = "Incident report operations"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sayit=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration before doing anything else
    let (jwt_config, reports_dir) = validate_config()?;

    utils::jwt::init_jwt_config(jwt_config)?;

    tracing::info!("Starting Say It API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database().await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let generative_config = config::generative::GenerativeConfig::from_env();
    if generative_config.api_key.is_none() {
        tracing::warn!("GOOGLE_API_KEY not set, extraction will use the fallback record");
    }
    let client: Arc<dyn GenerativeClient> = Arc::new(GeminiClient::new(generative_config)?);

    let notifier = Notifier::from_env();
    if notifier.is_configured() {
        tracing::info!("SMTP notifier configured");
    } else {
        tracing::warn!("SMTP not configured, notifications will be simulated");
    }

    let assistant = Assistant::new(client.clone());
    let pipeline = ReportPipeline::new(
        IncidentExtractor::new(client),
        EscalationResolver::new(db.clone()),
        ReportService::new(db.clone()),
        ReportRenderer::new(&reports_dir),
        notifier,
    );

    let app = create_app()
        .layer(Extension(db))
        .layer(Extension(assistant))
        .layer(Extension(pipeline));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<(config::jwt::JwtConfig, String)> {
    // JWT config — validated and cached
    let jwt_config = config::jwt::JwtConfig::from_env()?;

    // DATABASE_URL — checked here for early error; actual connection happens later
    if env::var("DATABASE_URL").is_err() {
        return Err(anyhow::anyhow!(
            "DATABASE_URL environment variable must be set"
        ));
    }

    // Rendered documents directory — create if needed
    let reports_dir = env::var("REPORTS_DIR").unwrap_or_else(|_| "./reports".to_string());
    std::fs::create_dir_all(&reports_dir).map_err(|e| {
        anyhow::anyhow!("Failed to create reports directory '{}': {}", reports_dir, e)
    })?;

    Ok((jwt_config, reports_dir))
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app() -> Router {
    Router::new()
        .route("/", get(health_check))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db.ping().await.is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "Say It API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
