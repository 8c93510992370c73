use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use tokio::task;

use crate::auth;
use crate::entities::users;

/// User data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: Option<String>,
    pub username: String,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            username: model.username,
            created_at: model.created_at,
        }
    }
}

/// Signup failure modes. A username collision is surfaced distinctly so the
/// boundary can answer 409 instead of a generic storage failure.
#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("a user with that username already exists")]
    DuplicateUsername,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create a user, hashing the password before it touches the store.
    /// The plaintext is never persisted or logged.
    pub async fn create(
        &self,
        name: Option<&str>,
        username: &str,
        password: &str,
    ) -> Result<User, CreateUserError> {
        let password = password.to_string();

        // Argon2 hashing is CPU-intensive; keep it off the async runtime.
        let password_hash = task::spawn_blocking(move || auth::hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let active_model = users::ActiveModel {
            name: Set(name.map(ToString::to_string)),
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = match active_model.insert(&self.conn).await {
            Ok(model) => model,
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    return Err(CreateUserError::DuplicateUsername);
                }
                return Err(anyhow::Error::new(e)
                    .context("Failed to insert user")
                    .into());
            }
        };

        Ok(User::from(model))
    }

    /// Get user by username, exact match as stored
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Verify password for a user. Unknown usernames report `false`, the
    /// same as a wrong password.
    /// Note: This uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        let is_valid =
            task::spawn_blocking(move || auth::verify_password(&password, &password_hash))
                .await
                .context("Password verification task panicked")?;

        Ok(is_valid)
    }
}
