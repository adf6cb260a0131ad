//! # Movement Repository
//!
//! The stock ledger: recording movements and the mutation service that keeps
//! `products.stock` and the movement history in lockstep.
//!
//! ## The Commit Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record(): one transaction                            │
//! │                                                                         │
//! │  validate cantidad > 0 (pure, before any I/O)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products SET stock = stock ± qty                               │
//! │         WHERE id = ? [AND stock >= qty]    ← guard and write are ONE   │
//! │       │                                      statement: racing calls   │
//! │       │                                      can never both see the    │
//! │       │                                      same before-stock         │
//! │       ├── 0 rows? → SELECT product → NotFound │ InsufficientStock      │
//! │       │             ROLLBACK, nothing persisted                        │
//! │       ▼                                                                 │
//! │  INSERT INTO stock_movements (...)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT  → both rows, or neither                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checking stock outside this transaction (the old serializer-level check)
//! reintroduces the read-modify-write race; everything stateful lives here.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult, MovementError};
use bodega_core::validation::validate_quantity;
use bodega_core::{CoreError, MovementKind, Product, StockMovement};

/// A movement proposal: everything the caller supplies.
///
/// Id and timestamp are assigned at commit time by [`MovementRepository::record`].
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: String,
    pub kind: MovementKind,
    pub quantity: i64,
    pub note: Option<String>,
}

/// Repository for the stock ledger.
///
/// `record` is the sole gateway through which stock quantities change;
/// everything else here is read-only.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

const MOVEMENT_COLUMNS: &str = "id, product_id, kind, quantity, note, created_at";

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Validates and commits a stock movement.
    ///
    /// ## Validation (all before any write)
    /// * `quantity > 0`, otherwise `CoreError::Validation` (cantidad)
    /// * product exists, otherwise `CoreError::ProductNotFound`
    /// * outbound quantity covered by stock, otherwise
    ///   `CoreError::InsufficientStock` carrying the current stock and the
    ///   product name for the user-facing message
    ///
    /// ## Atomicity
    /// The movement row and the stock update commit together or not at all.
    /// On any failure nothing is persisted.
    ///
    /// ## Returns
    /// The committed movement with its assigned id and timestamp.
    pub async fn record(&self, new: NewMovement) -> Result<StockMovement, MovementError> {
        debug!(
            product_id = %new.product_id,
            kind = %new.kind.as_str(),
            quantity = new.quantity,
            "Recording stock movement"
        );

        validate_quantity(new.quantity).map_err(CoreError::from)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let affected = apply_stock_delta(&mut tx, &new.product_id, new.kind, new.quantity, now)
            .await
            .map_err(DbError::from)?;

        if affected == 0 {
            // Classify inside the same transaction: either the product is
            // missing or the outbound guard said no. The transaction rolls
            // back on drop, so nothing is persisted either way.
            let product = fetch_product(&mut tx, &new.product_id)
                .await
                .map_err(DbError::from)?;

            return match product {
                None => Err(CoreError::ProductNotFound(new.product_id.clone()).into()),
                Some(p) => {
                    p.ensure_stock_for(new.quantity).map_err(MovementError::from)?;
                    // Guard matched nothing yet stock now suffices: a
                    // concurrent inbound landed between our two statements.
                    // Surface it; retry policy belongs to the caller.
                    Err(DbError::TransactionFailed(
                        "stock changed concurrently, retry the movement".to_string(),
                    )
                    .into())
                }
            };
        }

        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            product_id: new.product_id,
            kind: new.kind,
            quantity: new.quantity,
            note: new.note,
            created_at: now,
        };

        insert_movement(&mut tx, &movement)
            .await
            .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            id = %movement.id,
            product_id = %movement.product_id,
            kind = %movement.kind.as_str(),
            quantity = movement.quantity,
            "Stock movement committed"
        );

        Ok(movement)
    }

    /// Lists movements newest-first, optionally filtered to one product.
    ///
    /// Ties on `created_at` break by insertion order (rowid), so two
    /// movements committed in the same instant still list deterministically.
    pub async fn list(&self, product_id: Option<&str>) -> DbResult<Vec<StockMovement>> {
        let movements = match product_id {
            Some(pid) => {
                sqlx::query_as::<_, StockMovement>(&format!(
                    "SELECT {MOVEMENT_COLUMNS} FROM stock_movements \
                     WHERE product_id = ?1 \
                     ORDER BY created_at DESC, rowid DESC"
                ))
                .bind(pid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StockMovement>(&format!(
                    "SELECT {MOVEMENT_COLUMNS} FROM stock_movements \
                     ORDER BY created_at DESC, rowid DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = movements.len(), "Listed stock movements");
        Ok(movements)
    }

    /// Gets a movement by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StockMovement>> {
        let movement = sqlx::query_as::<_, StockMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movement)
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================
// record() composes exactly these two writes. They take the open transaction
// so the pair commits or rolls back as a unit.

/// Applies the stock delta for a movement, guarded so stock never goes
/// negative.
///
/// ## Returns
/// Rows affected: 1 on success, 0 when the product is missing or the
/// outbound guard rejected the draw.
async fn apply_stock_delta(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: &str,
    kind: MovementKind,
    quantity: i64,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = match kind {
        MovementKind::Inbound => {
            // No upper bound: stock_max is advisory
            sqlx::query("UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1")
                .bind(product_id)
                .bind(quantity)
                .bind(now)
                .execute(&mut **tx)
                .await?
        }
        MovementKind::Outbound => {
            sqlx::query(
                "UPDATE products SET stock = stock - ?2, updated_at = ?3 \
                 WHERE id = ?1 AND stock >= ?2",
            )
            .bind(product_id)
            .bind(quantity)
            .bind(now)
            .execute(&mut **tx)
            .await?
        }
    };

    Ok(result.rows_affected())
}

/// Inserts the ledger row for a committed stock change.
async fn insert_movement(
    tx: &mut Transaction<'_, Sqlite>,
    movement: &StockMovement,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO stock_movements (id, product_id, kind, quantity, note, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.product_id)
    .bind(movement.kind)
    .bind(movement.quantity)
    .bind(&movement.note)
    .bind(movement.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Reads a product inside the transaction (current, since the writer lock
/// is held).
async fn fetch_product(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, code, description, photo, price_cents, stock, stock_min, stock_max, \
         created_at, updated_at \
         FROM products WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use bodega_core::{ValidationError, DEFAULT_STOCK_MAX, DEFAULT_STOCK_MIN};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: name.to_string(),
            code: None,
            description: None,
            photo: None,
            price_cents: 2000,
            stock,
            stock_min: DEFAULT_STOCK_MIN,
            stock_max: DEFAULT_STOCK_MAX,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    fn outbound(product: &Product, quantity: i64) -> NewMovement {
        NewMovement {
            product_id: product.id.clone(),
            kind: MovementKind::Outbound,
            quantity,
            note: Some("Venta normal".to_string()),
        }
    }

    fn inbound(product: &Product, quantity: i64) -> NewMovement {
        NewMovement {
            product_id: product.id.clone(),
            kind: MovementKind::Inbound,
            quantity,
            note: Some("Resurtido".to_string()),
        }
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_outbound_within_stock_commits() {
        let db = test_db().await;
        let product = seed_product(&db, "Coca Cola", 10).await;

        let movement = db.movements().record(outbound(&product, 5)).await.unwrap();

        assert_eq!(movement.product_id, product.id);
        assert_eq!(movement.kind, MovementKind::Outbound);
        assert_eq!(movement.quantity, 5);
        assert_eq!(stock_of(&db, &product.id).await, 5);

        let ledger = db.movements().list(Some(&product.id)).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].id, movement.id);
    }

    #[tokio::test]
    async fn test_outbound_over_stock_rejected_without_state_change() {
        let db = test_db().await;
        let product = seed_product(&db, "Coca Cola", 10).await;

        let err = db
            .movements()
            .record(outbound(&product, 20))
            .await
            .unwrap_err();

        match err {
            MovementError::Core(CoreError::InsufficientStock {
                name,
                available,
                requested,
            }) => {
                assert_eq!(name, "Coca Cola");
                assert_eq!(available, 10);
                assert_eq!(requested, 20);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&db, &product.id).await, 10);
        assert!(db.movements().list(Some(&product.id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inbound_has_no_upper_bound() {
        let db = test_db().await;
        let product = seed_product(&db, "Coca Cola", 10).await;

        db.movements().record(inbound(&product, 100)).await.unwrap();

        // 110 is well past stock_max; the ledger doesn't care
        assert_eq!(stock_of(&db, &product.id).await, 110);
    }

    #[tokio::test]
    async fn test_outbound_can_exhaust_stock_to_zero() {
        let db = test_db().await;
        let product = seed_product(&db, "Coca Cola", 10).await;

        db.movements().record(outbound(&product, 10)).await.unwrap();

        assert_eq!(stock_of(&db, &product.id).await, 0);
    }

    #[tokio::test]
    async fn test_zero_and_negative_quantities_rejected() {
        let db = test_db().await;
        let product = seed_product(&db, "Coca Cola", 10).await;

        for qty in [0, -5] {
            let err = db
                .movements()
                .record(outbound(&product, qty))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                MovementError::Core(CoreError::Validation(ValidationError::MustBePositive { .. }))
            ));
        }

        assert_eq!(stock_of(&db, &product.id).await, 10);
        assert!(db.movements().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let db = test_db().await;

        let err = db
            .movements()
            .record(NewMovement {
                product_id: "00000000-0000-0000-0000-000000000000".to_string(),
                kind: MovementKind::Inbound,
                quantity: 5,
                note: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MovementError::Core(CoreError::ProductNotFound(_))
        ));
        assert!(db.movements().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ledger_reconstructs_stock() {
        let db = test_db().await;
        let product = seed_product(&db, "Coca Cola", 10).await;

        db.movements().record(inbound(&product, 30)).await.unwrap();
        db.movements().record(outbound(&product, 25)).await.unwrap();
        db.movements().record(inbound(&product, 7)).await.unwrap();
        db.movements().record(outbound(&product, 2)).await.unwrap();

        let ledger = db.movements().list(Some(&product.id)).await.unwrap();
        let delta: i64 = ledger.iter().map(|m| m.kind.signed_delta(m.quantity)).sum();

        // stock == initial + Σ entradas − Σ salidas
        assert_eq!(stock_of(&db, &product.id).await, 10 + delta);
        assert_eq!(stock_of(&db, &product.id).await, 20);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_insertion_tie_break() {
        let db = test_db().await;
        let product = seed_product(&db, "Coca Cola", 100).await;

        let m1 = db.movements().record(outbound(&product, 1)).await.unwrap();
        let m2 = db.movements().record(outbound(&product, 2)).await.unwrap();
        let m3 = db.movements().record(outbound(&product, 3)).await.unwrap();

        let ids: Vec<String> = db
            .movements()
            .list(None)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();

        assert_eq!(ids, vec![m3.id, m2.id, m1.id]);
    }

    #[tokio::test]
    async fn test_list_filters_by_product() {
        let db = test_db().await;
        let coca = seed_product(&db, "Coca Cola", 10).await;
        let agua = seed_product(&db, "Agua", 10).await;

        db.movements().record(outbound(&coca, 1)).await.unwrap();
        db.movements().record(outbound(&agua, 2)).await.unwrap();
        db.movements().record(outbound(&coca, 3)).await.unwrap();

        let coca_ledger = db.movements().list(Some(&coca.id)).await.unwrap();
        assert_eq!(coca_ledger.len(), 2);
        assert!(coca_ledger.iter().all(|m| m.product_id == coca.id));

        assert_eq!(db.movements().list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_deleting_product_cascades_to_ledger() {
        let db = test_db().await;
        let product = seed_product(&db, "Coca Cola", 10).await;

        db.movements().record(outbound(&product, 5)).await.unwrap();
        db.products().delete(&product.id).await.unwrap();

        // no orphan movements
        assert!(db.movements().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_second_write_rolls_back_the_first() {
        let db = test_db().await;
        let product = seed_product(&db, "Coca Cola", 10).await;
        let repo = db.movements();

        // Drive the same two statements record() composes, forcing the
        // second to fail against the schema's quantity backstop.
        let now = Utc::now();
        let mut tx = repo.pool.begin().await.unwrap();

        let affected = apply_stock_delta(&mut tx, &product.id, MovementKind::Outbound, 5, now)
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let bad = StockMovement {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            kind: MovementKind::Outbound,
            quantity: 0,
            note: None,
            created_at: now,
        };
        assert!(insert_movement(&mut tx, &bad).await.is_err());
        drop(tx); // rollback

        // neither the stock change nor the movement survived
        assert_eq!(stock_of(&db, &product.id).await, 10);
        assert!(db.movements().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_outbounds_never_oversell() {
        // File-backed database so the pool can hand out real concurrent
        // connections (in-memory SQLite is pinned to one).
        let path = std::env::temp_dir().join(format!("bodega-ledger-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(5))
            .await
            .unwrap();

        let product = seed_product(&db, "Coca Cola", 10).await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let repo = db.movements();
            let new = outbound(&product, 5);
            handles.push(tokio::spawn(async move { repo.record(new).await }));
        }

        let mut ok = 0;
        let mut insufficient = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(MovementError::Core(CoreError::InsufficientStock { .. })) => {
                    insufficient += 1
                }
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        // 10 units / 5 per draw: exactly two winners, stock exactly zero
        assert_eq!(ok, 2);
        assert_eq!(insufficient, 2);
        assert_eq!(stock_of(&db, &product.id).await, 0);
        assert_eq!(db.movements().list(None).await.unwrap().len(), 2);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
