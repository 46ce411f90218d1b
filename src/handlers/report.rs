use crate::error::{AppError, AppResult};
use crate::middleware::auth::{require_reporter, require_reviewer};
use crate::middleware::AuthUser;
use crate::models::{ReportModel, ReportStatus};
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::extractor::ChatTurn;
use crate::services::pipeline::{ReportPipeline, SubmissionOutcome};
use crate::services::report::{ReportFilter, ReportService, ReportStats};
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitReportRequest {
    /// Full intake conversation, oldest turn first
    #[validate(length(min = 1))]
    pub transcript: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListReportsQuery {
    /// Only reports filed on or after this date (YYYY-MM-DD)
    pub from: Option<NaiveDate>,
    /// Only reports filed on or before this date (YYYY-MM-DD)
    pub to: Option<NaiveDate>,
    /// Filter by incident type
    pub incident_type: Option<String>,
    /// Filter by status
    pub status: Option<ReportStatus>,
    /// Page number
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    /// New workflow status
    pub status: ReportStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    /// Report ID
    pub id: i32,
    /// School the report belongs to
    pub school_id: i32,
    /// Director assigned at filing time
    pub director_id: Option<i32>,
    /// Incident type
    pub incident_type: String,
    /// Severity level
    pub severity: String,
    /// Structured narrative
    pub description: String,
    /// Workflow status
    pub status: String,
    /// Path of the rendered document, if any
    pub document_path: Option<String>,
    /// Filing timestamp
    pub created_at: String,
}

impl From<ReportModel> for ReportResponse {
    fn from(r: ReportModel) -> Self {
        Self {
            id: r.id,
            school_id: r.school_id,
            director_id: r.director_id,
            incident_type: r.incident_type,
            severity: r.severity,
            description: r.description,
            status: r.status,
            document_path: r.document_path,
            created_at: r.created_at.to_string(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/reports",
    security(("jwt_token" = [])),
    request_body = SubmitReportRequest,
    responses(
        (status = 200, description = "Report filed", body = SubmissionOutcome),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 403, description = "Only students can file reports", body = AppError),
    ),
    tag = "reports"
)]
pub async fn submit_report(
    Extension(db): Extension<DatabaseConnection>,
    Extension(pipeline): Extension<ReportPipeline>,
    auth_user: AuthUser,
    Json(payload): Json<SubmitReportRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let student = require_reporter(&db, &auth_user).await?;

    let outcome = pipeline.submit(student.id, &payload.transcript).await?;
    let message = format!(
        "Your report #{} has been filed and the responsible adults notified.",
        outcome.report_id
    );
    Ok(ApiResponse::with_message(outcome, message))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports",
    security(("jwt_token" = [])),
    params(
        ("from" = Option<String>, Query, description = "Earliest filing date (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Latest filing date (YYYY-MM-DD)"),
        ("incident_type" = Option<String>, Query, description = "Filter by incident type"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Reports retrieved", body = PaginatedResponse<ReportResponse>),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 403, description = "Reviewer role required", body = AppError),
    ),
    tag = "reports"
)]
pub async fn list_reports(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<impl IntoResponse> {
    require_reviewer(&db, &auth_user).await?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let filter = ReportFilter {
        from: query.from,
        to: query.to,
        incident_type: query.incident_type,
        status: query.status,
    };

    let service = ReportService::new(db);
    let (rows, total) = service.list(&filter, page, per_page).await?;
    let items: Vec<ReportResponse> = rows.into_iter().map(ReportResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/stats",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Aggregate counts", body = ReportStats),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 403, description = "Reviewer role required", body = AppError),
    ),
    tag = "reports"
)]
pub async fn report_stats(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    require_reviewer(&db, &auth_user).await?;

    let service = ReportService::new(db);
    let stats = service.stats().await?;
    Ok(ApiResponse::ok(stats))
}

#[utoipa::path(
    put,
    path = "/api/v1/reports/{id}/status",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Report ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ReportResponse),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 403, description = "Reviewer role required", body = AppError),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "reports"
)]
pub async fn set_report_status(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<impl IntoResponse> {
    require_reviewer(&db, &auth_user).await?;

    let service = ReportService::new(db);
    let updated = service.set_status(id, payload.status).await?;
    Ok(ApiResponse::ok(ReportResponse::from(updated)))
}
