//! # bodega-core: Pure Business Logic for Bodega
//!
//! This crate is the **heart** of the inventory tracker. It contains the
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bodega Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Inventario ──► Movimientos ──► Clientes ──► Cajeros         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  │    /api/productos, /api/movimientos, /api/clientes, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bodega-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐     ┌────────────┐     ┌────────────┐          │   │
//! │  │   │   types   │     │ validation │     │   error    │          │   │
//! │  │   │  Product  │     │   rules    │     │ CoreError  │          │   │
//! │  │   │  Movement │     │   checks   │     │ Validation │          │   │
//! │  │   └───────────┘     └────────────┘     └────────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bodega-db (Database Layer)                   │   │
//! │  │         SQLite queries, migrations, the stock ledger            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, StockMovement, Customer, etc.)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bodega_core::Product` instead of
// `use bodega_core::types::Product`

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default advisory reorder threshold for new products.
///
/// ## Why advisory?
/// `stock_min`/`stock_max` are reporting signals for the frontend (low-stock
/// badges, restock suggestions). They are never enforced as hard invariants;
/// only `stock >= 0` is.
pub const DEFAULT_STOCK_MIN: i64 = 5;

/// Default advisory shelf capacity for new products.
pub const DEFAULT_STOCK_MAX: i64 = 100;

/// Maximum length for entity display names.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length for a product's business code (`id_producto` on the wire).
pub const MAX_PRODUCT_CODE_LEN: usize = 100;

/// Maximum length for a cashier's employee code.
pub const MAX_EMPLOYEE_CODE_LEN: usize = 20;
