use crate::error::{AppError, AppResult};
use crate::models::principal::{self, Role};
use crate::utils::{encode_access_token, verify_password};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Verifies credentials and issues an access token. Unknown email and
    /// wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(principal::Model, String)> {
        let principal = principal::Entity::find()
            .filter(principal::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let valid = verify_password(password, &principal.password_hash)
            .map_err(|_| AppError::Unauthorized)?;
        if !valid {
            return Err(AppError::Unauthorized);
        }
        if !principal.active {
            return Err(AppError::Forbidden);
        }

        let token = encode_access_token(&principal.id.to_string())
            .map_err(|e| AppError::Internal(e.into()))?;

        tracing::info!(principal_id = principal.id, role = %principal.role, "login succeeded");
        Ok((principal, token))
    }

    pub async fn get_principal(&self, id: i32) -> AppResult<principal::Model> {
        principal::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Loads a principal and checks it still exists and is active. Used by
    /// the auth middleware on every request.
    pub async fn get_active_principal(&self, id: i32) -> AppResult<principal::Model> {
        let principal = self.get_principal(id).await.map_err(|_| AppError::Unauthorized)?;
        if !principal.active {
            return Err(AppError::Unauthorized);
        }
        Ok(principal)
    }

    /// Students linked to a guardian, for the guardian-facing view.
    pub async fn list_wards(&self, guardian_id: i32) -> AppResult<Vec<principal::Model>> {
        Ok(principal::Entity::find()
            .filter(principal::Column::GuardianId.eq(guardian_id))
            .filter(principal::Column::Role.eq(Role::Student.as_str()))
            .all(&self.db)
            .await?)
    }

    pub fn parsed_role(principal: &principal::Model) -> AppResult<Role> {
        principal
            .parsed_role()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown role stored for principal")))
    }
}
