//! # Customer Repository
//!
//! Database operations for customers and their running balances.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::Customer;

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

const CUSTOMER_COLUMNS: &str = "id, name, address, balance_cents, last_payment";

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists all customers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<Customer> {
        debug!(name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, address, balance_cents, last_payment)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(customer.balance_cents)
        .bind(customer.last_payment)
        .execute(&self.pool)
        .await?;

        Ok(customer.clone())
    }

    /// Updates an existing customer.
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Updating customer");

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = ?2,
                address = ?3,
                balance_cents = ?4,
                last_payment = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(customer.balance_cents)
        .bind(customer.last_payment)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        Ok(())
    }

    /// Deletes a customer.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}

/// Helper to generate a new customer ID.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;

    fn sample_customer(name: &str) -> Customer {
        Customer {
            id: generate_customer_id(),
            name: name.to_string(),
            address: Some("Av. Central 12".to_string()),
            balance_cents: 15_050,
            last_payment: NaiveDate::from_ymd_opt(2026, 7, 15),
        }
    }

    #[tokio::test]
    async fn test_customer_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let customer = sample_customer("Doña Lupita");
        repo.insert(&customer).await.unwrap();

        let fetched = repo.get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Doña Lupita");
        assert_eq!(fetched.balance_cents, 15_050);
        assert_eq!(fetched.last_payment, NaiveDate::from_ymd_opt(2026, 7, 15));
    }

    #[tokio::test]
    async fn test_customer_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let mut customer = sample_customer("Doña Lupita");
        repo.insert(&customer).await.unwrap();

        customer.balance_cents = 0;
        repo.update(&customer).await.unwrap();
        assert_eq!(
            repo.get_by_id(&customer.id).await.unwrap().unwrap().balance_cents,
            0
        );

        repo.delete(&customer.id).await.unwrap();
        assert!(repo.get_by_id(&customer.id).await.unwrap().is_none());
    }
}
