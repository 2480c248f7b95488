//! Authentication and user account service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, User, UserClaims, UserStatus},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate a user by login and password, returning a JWT and the user
    pub async fn login(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if UserStatus::from(user.status) == UserStatus::Blocked {
            return Err(AppError::Authentication("Account is blocked".to_string()));
        }

        let stored = user
            .password
            .as_deref()
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        let parsed = PasswordHash::new(stored)
            .map_err(|e| AppError::Internal(format!("Corrupt password hash: {}", e)))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }

        let token = self.issue_token(&user)?;
        Ok((token, user))
    }

    /// Build and sign claims for a user
    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.login.clone(),
            user_id: user.id,
            account_type: user.account_type,
            rights: user.account_type.rights(),
            iat: now,
            exp: now + (self.config.jwt_expiration_hours as i64) * 3600,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Create a user account with a hashed password
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.login_exists(&user.login).await? {
            return Err(AppError::Conflict(format!(
                "Login '{}' already exists",
                user.login
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(user.password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?
            .to_string();

        self.repository.users.create(&user, &hash).await
    }
}
