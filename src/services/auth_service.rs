//! Account registration and cookie sessions.
//!
//! Sessions are rows in SQLite keyed by an opaque token; the HTTP layer
//! carries the token in the `session` cookie and calls [`AuthService::verify`]
//! at the request boundary.

use crate::{
    models::user::{Session, User},
    repositories::product_repository::is_unique_violation,
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use rand_core::OsRng;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),
    #[error("email address is already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Clone)]
pub struct AuthService {
    db: Arc<SqlitePool>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(db: Arc<SqlitePool>, session_ttl_hours: i64) -> Self {
        Self {
            db,
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> AuthResult<User> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        match sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&*self.db)
        .await
        {
            Ok(_) => {
                info!(user_id = %user.id, "registered user");
                Ok(user)
            }
            Err(err) if is_unique_violation(&err) => Err(AuthError::EmailTaken),
            Err(err) => Err(AuthError::Sqlx(err)),
        }
    }

    /// Check credentials and open a new session.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(&email)
        .fetch_optional(&*self.db)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let created_at = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id: user.id,
            created_at,
            expires_at: created_at + self.session_ttl,
        };

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&*self.db)
        .await?;

        info!(user_id = %user.id, "opened session");
        Ok(session)
    }

    /// Resolve a session token to its user. Expired sessions are removed and
    /// reported as absent.
    pub async fn verify(&self, token: &str) -> AuthResult<Option<Uuid>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&*self.db)
        .await?;

        match session {
            Some(session) if session.is_expired_at(Utc::now()) => {
                debug!(user_id = %session.user_id, "dropping expired session");
                self.logout(token).await?;
                Ok(None)
            }
            Some(session) => Ok(Some(session.user_id)),
            None => Ok(None),
        }
    }

    /// Idempotent.
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&*self.db)
            .await?;
        Ok(())
    }
}

fn normalize_email(email: &str) -> AuthResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AuthError::InvalidEmail),
    }
}

fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
