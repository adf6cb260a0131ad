//! # Worker Repository
//!
//! Database operations for staff members.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::Worker;

/// Repository for worker database operations.
#[derive(Debug, Clone)]
pub struct WorkerRepository {
    pool: SqlitePool,
}

const WORKER_COLUMNS: &str = "id, name, email, phone";

impl WorkerRepository {
    /// Creates a new WorkerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WorkerRepository { pool }
    }

    /// Lists all workers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Worker>> {
        let workers = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(workers)
    }

    /// Gets a worker by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Worker>> {
        let worker = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(worker)
    }

    /// Inserts a new worker.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email already registered
    pub async fn insert(&self, worker: &Worker) -> DbResult<Worker> {
        debug!(name = %worker.name, "Inserting worker");

        sqlx::query("INSERT INTO workers (id, name, email, phone) VALUES (?1, ?2, ?3, ?4)")
            .bind(&worker.id)
            .bind(&worker.name)
            .bind(&worker.email)
            .bind(&worker.phone)
            .execute(&self.pool)
            .await?;

        Ok(worker.clone())
    }

    /// Updates an existing worker.
    pub async fn update(&self, worker: &Worker) -> DbResult<()> {
        debug!(id = %worker.id, "Updating worker");

        let result =
            sqlx::query("UPDATE workers SET name = ?2, email = ?3, phone = ?4 WHERE id = ?1")
                .bind(&worker.id)
                .bind(&worker.name)
                .bind(&worker.email)
                .bind(&worker.phone)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Worker", &worker.id));
        }

        Ok(())
    }

    /// Deletes a worker.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting worker");

        let result = sqlx::query("DELETE FROM workers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Worker", id));
        }

        Ok(())
    }
}

/// Helper to generate a new worker ID.
pub fn generate_worker_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_worker(name: &str, email: &str) -> Worker {
        Worker {
            id: generate_worker_id(),
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("555-0101".to_string()),
        }
    }

    #[tokio::test]
    async fn test_worker_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.workers();

        let worker = sample_worker("Juan Pérez", "juan@tienda.mx");
        repo.insert(&worker).await.unwrap();

        let fetched = repo.get_by_id(&worker.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "juan@tienda.mx");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.workers();

        repo.insert(&sample_worker("Juan Pérez", "juan@tienda.mx"))
            .await
            .unwrap();
        let err = repo
            .insert(&sample_worker("Otro Juan", "juan@tienda.mx"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref field } if field.contains("email")));
    }
}
