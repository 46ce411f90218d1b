use crate::{
    error::AppError,
    models::principal,
    utils::jwt::decode_jwt,
};
use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response, Extension};
use sea_orm::{DatabaseConnection, EntityTrait};

/// Extracted principal information from the JWT token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub principal_id: String,
}

/// JWT authentication middleware
///
/// Verifies the bearer token from the Authorization header, checks the
/// principal still exists and is active, and adds the principal id to
/// request extensions.
pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&headers).ok_or(AppError::Unauthorized)?;

    let claims = decode_jwt(&token).map_err(|_| AppError::Unauthorized)?;

    let principal_id: i32 = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;

    let principal = principal::Entity::find_by_id(principal_id)
        .one(&db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !principal.active {
        return Err(AppError::Forbidden);
    }

    let auth_user = AuthUser {
        principal_id: claims.sub,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let token = auth_header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Parse principal id from AuthUser string to i32
pub fn parse_principal_id(auth_user: &AuthUser) -> crate::error::AppResult<i32> {
    auth_user
        .principal_id
        .parse()
        .map_err(|_| AppError::Validation("Invalid principal ID".to_string()))
}

async fn load_principal(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
) -> crate::error::AppResult<principal::Model> {
    let id = parse_principal_id(auth_user)?;
    principal::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Verify the current principal may file reports (students only).
pub async fn require_reporter(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
) -> crate::error::AppResult<principal::Model> {
    let principal = load_principal(db, auth_user).await?;
    let can_report = principal.parsed_role().is_some_and(|r| r.can_report());
    if !can_report {
        return Err(AppError::Forbidden);
    }
    Ok(principal)
}

/// Verify the current principal may review reports (teachers and directors).
pub async fn require_reviewer(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
) -> crate::error::AppResult<principal::Model> {
    let principal = load_principal(db, auth_user).await?;
    let can_review = principal.parsed_role().is_some_and(|r| r.can_review());
    if !can_review {
        return Err(AppError::Forbidden);
    }
    Ok(principal)
}

/// Verify the current principal may use the guardian views.
pub async fn require_guardian(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
) -> crate::error::AppResult<principal::Model> {
    let principal = load_principal(db, auth_user).await?;
    let can_view = principal.parsed_role().is_some_and(|r| r.can_guardian_view());
    if !can_view {
        return Err(AppError::Forbidden);
    }
    Ok(principal)
}

/// Extractor for AuthUser from request extensions
use axum::extract::FromRequestParts;

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
