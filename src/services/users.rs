//! Authentication and user management service

use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, SignupRequest, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user. Name, email and external ID must all be unique.
    pub async fn signup(&self, request: SignupRequest) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.name_exists(&request.name).await? {
            return Err(AppError::Conflict("Name already registered".to_string()));
        }
        if self.repository.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        if self
            .repository
            .users
            .external_id_exists(&request.external_id)
            .await?
        {
            return Err(AppError::Conflict("ID already registered".to_string()));
        }

        let user = self.repository.users.create(&request).await?;
        tracing::info!(user_id = user.id, "New user registered");
        Ok(user)
    }

    /// Authenticate by email and external ID and return a JWT token.
    /// Both failure modes return the same message so callers cannot tell
    /// which factor was wrong.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<(String, User)> {
        let invalid = || AppError::Authentication("Invalid email or ID".to_string());

        let user = self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .ok_or_else(invalid)?;

        if user.external_id != request.external_id {
            return Err(invalid());
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            name: user.name.clone(),
            is_admin: user.is_admin,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}
