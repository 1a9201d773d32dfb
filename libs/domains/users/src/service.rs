use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use observability::UserMetrics;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{LoginRequest, RegisterRequest, User, UserResponse};
use crate::repository::UserRepository;

/// Service layer for registration and credential checks
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn outcome<T>(result: &UserResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create an account. Usernames are unique; the store enforces it too,
    /// so a concurrent duplicate still ends up as [`UserError::UsernameTaken`].
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        let result: UserResult<UserResponse> = async {
            input.validate()?;

            if self
                .repository
                .find_by_username(&input.username)
                .await?
                .is_some()
            {
                return Err(UserError::UsernameTaken(input.username));
            }

            let password_hash = hash_password(&input.password)?;
            let user = self
                .repository
                .create(User::new(input.username, password_hash))
                .await?;

            tracing::info!(user_id = %user.id, "Registered user");
            Ok(user.into())
        }
        .await;

        UserMetrics::record_registration(outcome(&result));
        result
    }

    /// Verify a username/password pair.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn authenticate(&self, input: LoginRequest) -> UserResult<UserResponse> {
        let result: UserResult<UserResponse> = async {
            let user = self
                .repository
                .find_by_username(&input.username)
                .await?
                .ok_or(UserError::InvalidCredentials)?;

            if !verify_password(&input.password, &user.password_hash)? {
                tracing::debug!("Password mismatch");
                return Err(UserError::InvalidCredentials);
            }

            Ok(user.into())
        }
        .await;

        UserMetrics::record_login(outcome(&result));
        result
    }

    pub async fn find_by_username(&self, username: &str) -> UserResult<Option<UserResponse>> {
        let user = self.repository.find_by_username(username).await?;
        Ok(user.map(UserResponse::from))
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound(id))
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
