//! # Movement Handlers
//!
//! The HTTP surface of the stock ledger: `/api/movimientos`.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/movimientos                                                  │
//! │  { "producto": "<id>", "tipo": "salida", "cantidad": 5, "nota": "..." } │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Stateless checks here:                                                │
//! │  ├── producto is a well-formed id       → 400 field "producto"         │
//! │  └── tipo parses to entrada/salida      → 400 field "tipo"             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MovementRepository::record (one transaction):                         │
//! │  ├── cantidad > 0                       → 400 field "cantidad"         │
//! │  ├── product exists                     → 404 field "producto"         │
//! │  ├── stock covers salida                → 400 "Stock insuficiente..."  │
//! │  └── commit movement + stock            → 201 with id and fecha        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no PUT/DELETE here: the ledger is append-only.
//! Rewriting history would desynchronize `stock` from the movement sum.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use bodega_core::validation::validate_uuid;
use bodega_core::{MovementKind, StockMovement};
use bodega_db::NewMovement;

/// Movement DTO with the wire field names the frontend expects.
#[derive(Debug, Clone, Serialize)]
pub struct MovementDto {
    pub id: String,
    pub producto: String,
    pub tipo: String,
    pub cantidad: i64,
    pub nota: Option<String>,
    pub fecha: DateTime<Utc>,
}

impl From<StockMovement> for MovementDto {
    fn from(m: StockMovement) -> Self {
        MovementDto {
            id: m.id,
            producto: m.product_id,
            tipo: m.kind.as_str().to_string(),
            cantidad: m.quantity,
            nota: m.note,
            fecha: m.created_at,
        }
    }
}

/// Create form for movements.
///
/// `tipo` stays a raw string so an unknown value becomes a typed,
/// field-specific validation error rather than a decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct MovementForm {
    pub producto: String,
    pub tipo: String,
    pub cantidad: i64,
    #[serde(default)]
    pub nota: Option<String>,
}

/// Query filter for the movement list.
#[derive(Debug, Clone, Deserialize)]
pub struct MovementFilter {
    #[serde(default)]
    pub producto: Option<String>,
}

/// `GET /api/movimientos[?producto=<id>]` - newest first.
pub async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
) -> Result<Json<Vec<MovementDto>>, ApiError> {
    let movements = state
        .db
        .movements()
        .list(filter.producto.as_deref())
        .await?;
    Ok(Json(movements.into_iter().map(MovementDto::from).collect()))
}

/// `GET /api/movimientos/:id`
pub async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MovementDto>, ApiError> {
    let movement = state
        .db
        .movements()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Movement", &id))?;
    Ok(Json(MovementDto::from(movement)))
}

/// `POST /api/movimientos` - validates and commits a stock movement.
pub async fn create_movement(
    State(state): State<AppState>,
    Json(form): Json<MovementForm>,
) -> Result<(StatusCode, Json<MovementDto>), ApiError> {
    debug!(producto = %form.producto, tipo = %form.tipo, cantidad = form.cantidad, "create_movement");

    validate_uuid("producto", &form.producto)?;
    let kind = MovementKind::parse(&form.tipo)?;

    let movement = state
        .db
        .movements()
        .record(NewMovement {
            product_id: form.producto,
            kind,
            quantity: form.cantidad,
            note: form.nota,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MovementDto::from(movement))))
}
