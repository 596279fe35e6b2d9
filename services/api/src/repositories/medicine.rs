//! Medicine repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::models::{Medicine, MedicineInput};

/// Medicine repository
#[derive(Clone)]
pub struct MedicineRepository {
    pool: PgPool,
}

impl MedicineRepository {
    /// Create a new medicine repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all medicines
    pub async fn list(&self) -> Result<Vec<Medicine>> {
        let medicines = sqlx::query_as::<_, Medicine>(
            r#"
            SELECT id, name, price, quantity
            FROM medicines
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(medicines)
    }

    /// Create a new medicine
    pub async fn create(&self, input: &MedicineInput) -> Result<Medicine> {
        info!("Creating medicine: {}", input.name);

        let medicine = sqlx::query_as::<_, Medicine>(
            r#"
            INSERT INTO medicines (name, price, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, quantity
            "#,
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(input.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(medicine)
    }

    /// Find a medicine by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Medicine>> {
        let medicine = sqlx::query_as::<_, Medicine>(
            r#"
            SELECT id, name, price, quantity
            FROM medicines
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(medicine)
    }

    /// Replace a medicine's fields; returns None when the id is unknown
    pub async fn update(&self, id: i32, input: &MedicineInput) -> Result<Option<Medicine>> {
        let medicine = sqlx::query_as::<_, Medicine>(
            r#"
            UPDATE medicines
            SET name = $2, price = $3, quantity = $4
            WHERE id = $1
            RETURNING id, name, price, quantity
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(medicine)
    }

    /// Delete a medicine; returns false when the id is unknown
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM medicines
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
