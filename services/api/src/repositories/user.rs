//! User repository for database operations
//!
//! Credentials are hashed with argon2 before they reach the database;
//! username uniqueness is enforced by the unique constraint on the table.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::User;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user
    ///
    /// Fails with a conflict when the username is already taken.
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<User> {
        info!("Creating new user: {}", username);

        let password_hash = Self::hash_password(password)?;

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(ApiError::Conflict("Username is already taken.".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify a username/password pair and return the user
    ///
    /// An unknown username and a wrong password produce the same error, so
    /// a caller cannot tell which credential was wrong.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

        if !Self::password_matches(password, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Hash a password for storage
    fn hash_password(password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        Ok(password_hash)
    }

    /// Compare a supplied password against a stored hash
    fn password_matches(password: &str, stored_hash: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = UserRepository::hash_password("pw1").unwrap();

        assert_ne!(hash, "pw1");
        assert!(UserRepository::password_matches("pw1", &hash).unwrap());
        assert!(!UserRepository::password_matches("pw2", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = UserRepository::hash_password("pw1").unwrap();
        let second = UserRepository::hash_password("pw1").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn garbage_stored_hash_is_an_error() {
        assert!(UserRepository::password_matches("pw1", "not-a-phc-string").is_err());
    }
}
