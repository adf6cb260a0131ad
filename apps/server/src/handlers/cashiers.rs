//! # Cashier Handlers
//!
//! CRUD for `/api/cajeros`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;
use bodega_core::validation::{validate_email, validate_employee_code, validate_name};
use bodega_core::Cashier;

/// Cashier DTO with the wire field names the frontend expects.
#[derive(Debug, Clone, Serialize)]
pub struct CashierDto {
    pub id: String,
    pub nombre: String,
    pub apellidos: String,
    pub codigo_empleado: String,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub fecha_registro: DateTime<Utc>,
    pub activo: bool,
}

impl From<Cashier> for CashierDto {
    fn from(c: Cashier) -> Self {
        CashierDto {
            id: c.id,
            nombre: c.first_name,
            apellidos: c.last_name,
            codigo_empleado: c.employee_code,
            telefono: c.phone,
            email: c.email,
            fecha_registro: c.created_at,
            activo: c.active,
        }
    }
}

/// Create/update form for cashiers.
#[derive(Debug, Clone, Deserialize)]
pub struct CashierForm {
    pub nombre: String,
    pub apellidos: String,
    pub codigo_empleado: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Uncheck when the cashier no longer works here.
    #[serde(default = "default_active")]
    pub activo: bool,
}

fn default_active() -> bool {
    true
}

fn validated_email(email: Option<String>) -> Result<Option<String>, ApiError> {
    match email.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(e) => Ok(Some(validate_email("email", e)?)),
    }
}

/// `GET /api/cajeros` - ordered by first name.
pub async fn list_cashiers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CashierDto>>, ApiError> {
    let cashiers = state.db.cashiers().list().await?;
    Ok(Json(cashiers.into_iter().map(CashierDto::from).collect()))
}

/// `GET /api/cajeros/:id`
pub async fn get_cashier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CashierDto>, ApiError> {
    let cashier = state
        .db
        .cashiers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cashier", &id))?;
    Ok(Json(CashierDto::from(cashier)))
}

/// `POST /api/cajeros`
pub async fn create_cashier(
    State(state): State<AppState>,
    Json(form): Json<CashierForm>,
) -> Result<(StatusCode, Json<CashierDto>), ApiError> {
    debug!(codigo_empleado = %form.codigo_empleado, "create_cashier");

    let cashier = Cashier {
        id: Uuid::new_v4().to_string(),
        first_name: validate_name("nombre", &form.nombre)?,
        last_name: validate_name("apellidos", &form.apellidos)?,
        employee_code: validate_employee_code(&form.codigo_empleado)?,
        phone: form.telefono,
        email: validated_email(form.email)?,
        active: form.activo,
        created_at: Utc::now(),
    };

    let created = state.db.cashiers().insert(&cashier).await?;
    info!(id = %created.id, codigo_empleado = %created.employee_code, "Cashier created");

    Ok((StatusCode::CREATED, Json(CashierDto::from(created))))
}

/// `PUT /api/cajeros/:id`
pub async fn update_cashier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<CashierForm>,
) -> Result<Json<CashierDto>, ApiError> {
    debug!(id = %id, "update_cashier");

    let existing = state
        .db
        .cashiers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cashier", &id))?;

    let cashier = Cashier {
        id: existing.id,
        first_name: validate_name("nombre", &form.nombre)?,
        last_name: validate_name("apellidos", &form.apellidos)?,
        employee_code: validate_employee_code(&form.codigo_empleado)?,
        phone: form.telefono,
        email: validated_email(form.email)?,
        active: form.activo,
        created_at: existing.created_at,
    };
    state.db.cashiers().update(&cashier).await?;

    Ok(Json(CashierDto::from(cashier)))
}

/// `DELETE /api/cajeros/:id`
pub async fn delete_cashier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.cashiers().delete(&id).await?;
    info!(id = %id, "Cashier deleted");
    Ok(StatusCode::NO_CONTENT)
}
