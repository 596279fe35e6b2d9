//! Application state shared across handlers

use sqlx::PgPool;

use crate::repositories::{MedicineRepository, TokenRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub medicine_repository: MedicineRepository,
    pub token_repository: TokenRepository,
    pub user_repository: UserRepository,
}
