//! # Cashier Repository
//!
//! Database operations for cashiers.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::Cashier;

/// Repository for cashier database operations.
#[derive(Debug, Clone)]
pub struct CashierRepository {
    pool: SqlitePool,
}

const CASHIER_COLUMNS: &str =
    "id, first_name, last_name, employee_code, phone, email, active, created_at";

impl CashierRepository {
    /// Creates a new CashierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashierRepository { pool }
    }

    /// Lists all cashiers, ordered by first name.
    pub async fn list(&self) -> DbResult<Vec<Cashier>> {
        let cashiers = sqlx::query_as::<_, Cashier>(&format!(
            "SELECT {CASHIER_COLUMNS} FROM cashiers ORDER BY first_name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(cashiers)
    }

    /// Gets a cashier by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Cashier>> {
        let cashier = sqlx::query_as::<_, Cashier>(&format!(
            "SELECT {CASHIER_COLUMNS} FROM cashiers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cashier)
    }

    /// Inserts a new cashier.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - employee code already taken
    pub async fn insert(&self, cashier: &Cashier) -> DbResult<Cashier> {
        debug!(employee_code = %cashier.employee_code, "Inserting cashier");

        sqlx::query(
            r#"
            INSERT INTO cashiers (
                id, first_name, last_name, employee_code,
                phone, email, active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&cashier.id)
        .bind(&cashier.first_name)
        .bind(&cashier.last_name)
        .bind(&cashier.employee_code)
        .bind(&cashier.phone)
        .bind(&cashier.email)
        .bind(cashier.active)
        .bind(cashier.created_at)
        .execute(&self.pool)
        .await?;

        Ok(cashier.clone())
    }

    /// Updates an existing cashier.
    ///
    /// `active = false` is the soft retire: the record stays for history,
    /// the frontend stops offering the cashier for new shifts.
    pub async fn update(&self, cashier: &Cashier) -> DbResult<()> {
        debug!(id = %cashier.id, "Updating cashier");

        let result = sqlx::query(
            r#"
            UPDATE cashiers SET
                first_name = ?2,
                last_name = ?3,
                employee_code = ?4,
                phone = ?5,
                email = ?6,
                active = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&cashier.id)
        .bind(&cashier.first_name)
        .bind(&cashier.last_name)
        .bind(&cashier.employee_code)
        .bind(&cashier.phone)
        .bind(&cashier.email)
        .bind(cashier.active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cashier", &cashier.id));
        }

        Ok(())
    }

    /// Deletes a cashier.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting cashier");

        let result = sqlx::query("DELETE FROM cashiers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cashier", id));
        }

        Ok(())
    }
}

/// Helper to generate a new cashier ID.
pub fn generate_cashier_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn sample_cashier(code: &str) -> Cashier {
        Cashier {
            id: generate_cashier_id(),
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            employee_code: code.to_string(),
            phone: None,
            email: Some("ana@tienda.mx".to_string()),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_cashier_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cashiers();

        let cashier = sample_cashier("CAJ-01");
        repo.insert(&cashier).await.unwrap();

        let fetched = repo.get_by_id(&cashier.id).await.unwrap().unwrap();
        assert_eq!(fetched.employee_code, "CAJ-01");
        assert!(fetched.active);
    }

    #[tokio::test]
    async fn test_duplicate_employee_code_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cashiers();

        repo.insert(&sample_cashier("CAJ-01")).await.unwrap();
        let err = repo.insert(&sample_cashier("CAJ-01")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_soft_retire() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cashiers();

        let mut cashier = sample_cashier("CAJ-01");
        repo.insert(&cashier).await.unwrap();

        cashier.active = false;
        repo.update(&cashier).await.unwrap();

        assert!(!repo.get_by_id(&cashier.id).await.unwrap().unwrap().active);
    }
}
