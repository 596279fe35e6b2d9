//! Bearer token repository
//!
//! Tokens are opaque alphanumeric keys, one per user, created lazily on the
//! first successful registration or login and reused thereafter.

use anyhow::Result;
use rand::{Rng, distributions::Alphanumeric};
use sqlx::PgPool;
use tracing::info;

use crate::models::{AuthToken, User};

/// Length of a generated token key
const TOKEN_KEY_LEN: usize = 40;

/// Token repository
#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the user's token, creating one on first use
    pub async fn get_or_create(&self, user_id: i32) -> Result<AuthToken> {
        if let Some(token) = self.find_by_user_id(user_id).await? {
            return Ok(token);
        }

        info!("Issuing token for user: {}", user_id);

        let inserted = sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (key, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING key, user_id, created_at
            "#,
        )
        .bind(generate_key())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(token) => Ok(token),
            // Lost the race to a concurrent insert; the stored token wins
            None => self
                .find_by_user_id(user_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("No token found for user {}", user_id)),
        }
    }

    /// Find a user's token
    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<AuthToken>> {
        let token = sqlx::query_as::<_, AuthToken>(
            r#"
            SELECT key, user_id, created_at
            FROM auth_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    /// Resolve a token key to its user
    pub async fn user_for_key(&self, key: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.name, u.password_hash, u.created_at, u.updated_at
            FROM users u
            INNER JOIN auth_tokens t ON t.user_id = u.id
            WHERE t.key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Generate a random alphanumeric token key
pub fn generate_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_KEY_LEN)
        .map(char::from)
        .collect()
}
