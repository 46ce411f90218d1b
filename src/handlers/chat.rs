use crate::error::{AppError, AppResult};
use crate::middleware::auth::require_reporter;
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::services::assistant::Assistant;
use crate::services::extractor::ChatTurn;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatRequest {
    /// Conversation so far, oldest turn first
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    /// The student's new message
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    /// The assistant's reply
    pub reply: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/chat",
    security(("jwt_token" = [])),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 403, description = "Only students can use the intake chat", body = AppError),
    ),
    tag = "chat"
)]
pub async fn chat(
    Extension(db): Extension<DatabaseConnection>,
    Extension(assistant): Extension<Assistant>,
    auth_user: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    require_reporter(&db, &auth_user).await?;

    let reply = assistant.reply(&payload.history, &payload.message).await;
    Ok(ApiResponse::ok(ChatResponse { reply }))
}
