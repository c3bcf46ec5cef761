//! Accounts and their login sessions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account.
#[derive(Serialize, Clone, FromRow, Debug)]
pub struct User {
    pub id: Uuid,

    /// Trimmed, lower-cased login email.
    pub email: String,

    /// Argon2 PHC string; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

/// A server-side login session keyed by the token carried in the `session` cookie.
#[derive(Clone, FromRow, Debug)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
