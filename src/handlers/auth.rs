use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_principal_id, require_guardian};
use crate::middleware::AuthUser;
use crate::models::PrincipalModel;
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address
    #[validate(email)]
    pub email: String,
    /// Account password
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// JWT access token
    pub token: String,
    /// Principal ID
    pub principal_id: i32,
    /// Display name
    pub name: String,
    /// Role (student, teacher, director, guardian)
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrincipalResponse {
    /// Principal ID
    pub id: i32,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role (student, teacher, director, guardian)
    pub role: String,
    /// School the principal belongs to
    pub school_id: Option<i32>,
    /// Class group, for students and teachers
    pub class_group_id: Option<i32>,
}

impl From<PrincipalModel> for PrincipalResponse {
    fn from(p: PrincipalModel) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            role: p.role,
            school_id: p.school_id,
            class_group_id: p.class_group_id,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError),
        (status = 403, description = "Account deactivated", body = AppError),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = AuthService::new(db);
    let (principal, token) = service.login(&payload.email, &payload.password).await?;

    Ok(ApiResponse::ok(AuthResponse {
        token,
        principal_id: principal.id,
        name: principal.name,
        role: principal.role,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Current principal retrieved", body = PrincipalResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "auth"
)]
pub async fn get_current_principal(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let principal_id = parse_principal_id(&auth_user)?;

    let service = AuthService::new(db);
    let principal = service.get_principal(principal_id).await?;

    Ok(ApiResponse::ok(PrincipalResponse::from(principal)))
}

#[utoipa::path(
    get,
    path = "/api/v1/guardian/students",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Students linked to the current guardian", body = Vec<PrincipalResponse>),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 403, description = "Guardian role required", body = AppError),
    ),
    tag = "auth"
)]
pub async fn list_ward_students(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let guardian = require_guardian(&db, &auth_user).await?;

    let service = AuthService::new(db);
    let wards = service.list_wards(guardian.id).await?;
    let wards: Vec<PrincipalResponse> = wards.into_iter().map(PrincipalResponse::from).collect();

    Ok(ApiResponse::ok(wards))
}
