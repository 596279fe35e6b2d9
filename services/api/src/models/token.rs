//! Bearer token model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Opaque bearer token; one row per user, reused across logins
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthToken {
    pub key: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}
