//! # Customer Handlers
//!
//! CRUD for `/api/clientes`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{centavos_from_decimal, decimal_from_centavos};
use crate::AppState;
use bodega_core::validation::validate_name;
use bodega_core::Customer;

/// Customer DTO with the wire field names the frontend expects.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDto {
    pub id: String,
    pub nombre: String,
    pub direccion: Option<String>,
    pub saldo_actual: f64,
    pub ultimo_pago: Option<NaiveDate>,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        CustomerDto {
            id: c.id,
            nombre: c.name,
            direccion: c.address,
            saldo_actual: decimal_from_centavos(c.balance_cents),
            ultimo_pago: c.last_payment,
        }
    }
}

/// Create/update form for customers.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerForm {
    pub nombre: String,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub saldo_actual: f64,
    #[serde(default)]
    pub ultimo_pago: Option<NaiveDate>,
}

/// `GET /api/clientes`
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerDto>>, ApiError> {
    let customers = state.db.customers().list().await?;
    Ok(Json(customers.into_iter().map(CustomerDto::from).collect()))
}

/// `GET /api/clientes/:id`
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerDto>, ApiError> {
    let customer = state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", &id))?;
    Ok(Json(CustomerDto::from(customer)))
}

/// `POST /api/clientes`
pub async fn create_customer(
    State(state): State<AppState>,
    Json(form): Json<CustomerForm>,
) -> Result<(StatusCode, Json<CustomerDto>), ApiError> {
    debug!(nombre = %form.nombre, "create_customer");

    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        name: validate_name("nombre", &form.nombre)?,
        address: form.direccion,
        balance_cents: centavos_from_decimal(form.saldo_actual),
        last_payment: form.ultimo_pago,
    };

    let created = state.db.customers().insert(&customer).await?;
    info!(id = %created.id, "Customer created");

    Ok((StatusCode::CREATED, Json(CustomerDto::from(created))))
}

/// `PUT /api/clientes/:id`
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<CustomerForm>,
) -> Result<Json<CustomerDto>, ApiError> {
    debug!(id = %id, "update_customer");

    let customer = Customer {
        id: id.clone(),
        name: validate_name("nombre", &form.nombre)?,
        address: form.direccion,
        balance_cents: centavos_from_decimal(form.saldo_actual),
        last_payment: form.ultimo_pago,
    };
    state.db.customers().update(&customer).await?;

    Ok(Json(CustomerDto::from(customer)))
}

/// `DELETE /api/clientes/:id`
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.customers().delete(&id).await?;
    info!(id = %id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
