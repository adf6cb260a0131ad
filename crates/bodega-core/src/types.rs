//! # Domain Types
//!
//! Core domain types for the inventory tracker.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  StockMovement  │   │  MovementKind   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  product_id(FK) │   │  Inbound        │       │
//! │  │  code (business)│   │  kind           │   │  Outbound       │       │
//! │  │  stock          │   │  quantity       │   └─────────────────┘       │
//! │  │  price_cents    │   │  created_at     │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │     Worker      │   │    Cashier      │       │
//! │  │  balance_cents  │   │  email (unique) │   │  employee_code  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products have:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `code`: business identifier (`id_producto` on the wire) - human-readable
//!
//! ## The Ledger Rule
//! A product's `stock` is only ever changed by committing a [`StockMovement`]
//! through the mutation service in bodega-db. At all times
//! `stock == initial + Σ inbound − Σ outbound` over committed movements.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// =============================================================================
// Movement Kind
// =============================================================================

/// The direction of a stock movement.
///
/// Stored and transmitted as the Spanish tokens `"entrada"` / `"salida"`,
/// which the frontend and the database both use verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum MovementKind {
    /// Stock increase (restock, return).
    #[serde(rename = "entrada")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "entrada"))]
    Inbound,

    /// Stock decrease (sale, write-off).
    #[serde(rename = "salida")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "salida"))]
    Outbound,
}

impl MovementKind {
    /// Returns the wire token for this kind.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Inbound => "entrada",
            MovementKind::Outbound => "salida",
        }
    }

    /// Parses a wire token into a kind.
    ///
    /// ## Why not serde?
    /// The HTTP layer deserializes `tipo` as a raw string and parses it here,
    /// so an unknown value surfaces as the typed [`CoreError::InvalidKind`]
    /// with a field-specific message instead of a generic decode failure.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "entrada" => Ok(MovementKind::Inbound),
            "salida" => Ok(MovementKind::Outbound),
            other => Err(CoreError::InvalidKind(other.to_string())),
        }
    }

    /// Returns the stock delta this kind applies for a given quantity.
    ///
    /// Inbound adds, outbound subtracts. `quantity` must already be
    /// validated as positive.
    #[inline]
    pub const fn signed_delta(&self, quantity: i64) -> i64 {
        match self {
            MovementKind::Inbound => quantity,
            MovementKind::Outbound => -quantity,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product tracked in inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across the catalog.
    pub name: String,

    /// Business identifier (`id_producto` on the wire), unique when present.
    pub code: Option<String>,

    /// Optional long description.
    pub description: Option<String>,

    /// Relative path of the product photo under the media directory.
    pub photo: Option<String>,

    /// Sale price in centavos (smallest currency unit).
    pub price_cents: i64,

    /// Current on-hand quantity. Never negative.
    pub stock: i64,

    /// Advisory reorder threshold. Not enforced.
    pub stock_min: i64,

    /// Advisory shelf capacity. Not enforced.
    pub stock_max: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product (including its stock) was last written.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks that an outbound draw of `quantity` units is covered by stock.
    ///
    /// ## Returns
    /// * `Ok(())` - enough stock on hand
    /// * `Err(CoreError::InsufficientStock)` - with current stock and the
    ///   product name, ready for a human-readable message
    pub fn ensure_stock_for(&self, quantity: i64) -> Result<(), CoreError> {
        if quantity > self.stock {
            return Err(CoreError::InsufficientStock {
                name: self.name.clone(),
                available: self.stock,
                requested: quantity,
            });
        }
        Ok(())
    }

    /// Computes the stock level after applying a movement.
    ///
    /// Pure: does not mutate. The storage layer persists the returned value
    /// and the movement row in one transaction.
    ///
    /// ## Rules
    /// - Inbound: `stock + quantity`, no upper bound (`stock_max` is advisory)
    /// - Outbound: `stock - quantity`, guarded so the result is never negative
    pub fn next_stock(&self, kind: MovementKind, quantity: i64) -> Result<i64, CoreError> {
        if kind == MovementKind::Outbound {
            self.ensure_stock_for(quantity)?;
        }
        Ok(self.stock + kind.signed_delta(quantity))
    }

    /// Whether the product sits at or below its advisory reorder threshold.
    ///
    /// Reporting signal only; nothing in the core enforces it.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.stock_min
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// One committed entry in a product's stock ledger.
///
/// Immutable once committed: movements are created exclusively by the
/// mutation service in bodega-db and never updated afterwards. Deleting a
/// product cascades to its movements, so the ledger and the product live
/// and die together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    /// Unique identifier (UUID v4), assigned on commit.
    pub id: String,

    /// The product this movement belongs to.
    pub product_id: String,

    /// Direction of the change.
    pub kind: MovementKind,

    /// Units moved. Strictly positive.
    pub quantity: i64,

    /// Optional free-text note ("Venta normal", "Resurtido", ...).
    pub note: Option<String>,

    /// Commit timestamp, set by the service, never modified.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer with a running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    /// Outstanding balance in centavos.
    pub balance_cents: i64,
    /// Date of the most recent payment, if any.
    pub last_payment: Option<NaiveDate>,
}

// =============================================================================
// Worker
// =============================================================================

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Worker {
    pub id: String,
    pub name: String,
    /// Contact email, unique across staff.
    pub email: String,
    pub phone: Option<String>,
}

// =============================================================================
// Cashier
// =============================================================================

/// A cashier with a unique employee code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Cashier {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Unique employee identifier (`codigo_empleado` on the wire).
    pub employee_code: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// False once the cashier no longer works here (soft retire).
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Cashier {
    /// Full display name ("nombre apellidos").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_stock(stock: i64) -> Product {
        Product {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            name: "Coca Cola".to_string(),
            code: Some("COCA-123".to_string()),
            description: None,
            photo: None,
            price_cents: 2000,
            stock,
            stock_min: crate::DEFAULT_STOCK_MIN,
            stock_max: crate::DEFAULT_STOCK_MAX,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(MovementKind::parse("entrada").unwrap(), MovementKind::Inbound);
        assert_eq!(MovementKind::parse("salida").unwrap(), MovementKind::Outbound);
        assert_eq!(MovementKind::Inbound.as_str(), "entrada");
        assert_eq!(MovementKind::Outbound.as_str(), "salida");
    }

    #[test]
    fn test_kind_rejects_unknown_token() {
        let err = MovementKind::parse("ajuste").unwrap_err();
        assert!(matches!(err, CoreError::InvalidKind(ref s) if s == "ajuste"));
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(MovementKind::Inbound.signed_delta(5), 5);
        assert_eq!(MovementKind::Outbound.signed_delta(5), -5);
    }

    #[test]
    fn test_next_stock_outbound_within_stock() {
        let product = product_with_stock(10);
        assert_eq!(product.next_stock(MovementKind::Outbound, 5).unwrap(), 5);
    }

    #[test]
    fn test_next_stock_outbound_exhausts_to_zero() {
        let product = product_with_stock(10);
        assert_eq!(product.next_stock(MovementKind::Outbound, 10).unwrap(), 0);
    }

    #[test]
    fn test_next_stock_outbound_over_stock_fails() {
        let product = product_with_stock(10);
        let err = product.next_stock(MovementKind::Outbound, 20).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                name,
                available,
                requested,
            } => {
                assert_eq!(name, "Coca Cola");
                assert_eq!(available, 10);
                assert_eq!(requested, 20);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_next_stock_inbound_has_no_upper_bound() {
        // stock_max is advisory: 10 + 1000 sails past it
        let product = product_with_stock(10);
        assert_eq!(product.next_stock(MovementKind::Inbound, 1000).unwrap(), 1010);
    }

    #[test]
    fn test_low_stock_is_advisory_signal() {
        let mut product = product_with_stock(5);
        assert!(product.is_low_stock());
        product.stock = 6;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_cashier_full_name() {
        let cashier = Cashier {
            id: "c1".to_string(),
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            employee_code: "CAJ-01".to_string(),
            phone: None,
            email: None,
            active: true,
            created_at: Utc::now(),
        };
        assert_eq!(cashier.full_name(), "Ana García");
    }
}
