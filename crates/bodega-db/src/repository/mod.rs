//! # Repository Module
//!
//! Database repository implementations for Bodega.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.movements().record(new_movement)                           │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  MovementRepository                                                    │
//! │  ├── record(&self, new)      ← the mutation service                    │
//! │  ├── list(&self, product?)                                             │
//! │  └── get_by_id(&self, id)                                              │
//! │       │                                                                 │
//! │       │  SQL (one transaction for record)                              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • The ledger invariant is enforced by exactly one code path           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD
//! - [`customer::CustomerRepository`] - Customer CRUD
//! - [`worker::WorkerRepository`] - Worker CRUD
//! - [`cashier::CashierRepository`] - Cashier CRUD
//! - [`movement::MovementRepository`] - The stock ledger

pub mod cashier;
pub mod customer;
pub mod movement;
pub mod product;
pub mod worker;
