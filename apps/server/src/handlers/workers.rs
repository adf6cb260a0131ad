//! # Worker Handlers
//!
//! CRUD for `/api/trabajadores`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;
use bodega_core::validation::{validate_email, validate_name};
use bodega_core::Worker;

/// Worker DTO with the wire field names the frontend expects.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerDto {
    pub id: String,
    pub nombre: String,
    pub correo: String,
    pub numero: Option<String>,
}

impl From<Worker> for WorkerDto {
    fn from(w: Worker) -> Self {
        WorkerDto {
            id: w.id,
            nombre: w.name,
            correo: w.email,
            numero: w.phone,
        }
    }
}

/// Create/update form for workers.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerForm {
    pub nombre: String,
    pub correo: String,
    #[serde(default)]
    pub numero: Option<String>,
}

/// `GET /api/trabajadores`
pub async fn list_workers(State(state): State<AppState>) -> Result<Json<Vec<WorkerDto>>, ApiError> {
    let workers = state.db.workers().list().await?;
    Ok(Json(workers.into_iter().map(WorkerDto::from).collect()))
}

/// `GET /api/trabajadores/:id`
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkerDto>, ApiError> {
    let worker = state
        .db
        .workers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Worker", &id))?;
    Ok(Json(WorkerDto::from(worker)))
}

/// `POST /api/trabajadores`
pub async fn create_worker(
    State(state): State<AppState>,
    Json(form): Json<WorkerForm>,
) -> Result<(StatusCode, Json<WorkerDto>), ApiError> {
    debug!(nombre = %form.nombre, "create_worker");

    let worker = Worker {
        id: Uuid::new_v4().to_string(),
        name: validate_name("nombre", &form.nombre)?,
        email: validate_email("correo", &form.correo)?,
        phone: form.numero,
    };

    let created = state.db.workers().insert(&worker).await?;
    info!(id = %created.id, "Worker created");

    Ok((StatusCode::CREATED, Json(WorkerDto::from(created))))
}

/// `PUT /api/trabajadores/:id`
pub async fn update_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<WorkerForm>,
) -> Result<Json<WorkerDto>, ApiError> {
    debug!(id = %id, "update_worker");

    let worker = Worker {
        id: id.clone(),
        name: validate_name("nombre", &form.nombre)?,
        email: validate_email("correo", &form.correo)?,
        phone: form.numero,
    };
    state.db.workers().update(&worker).await?;

    Ok(Json(WorkerDto::from(worker)))
}

/// `DELETE /api/trabajadores/:id`
pub async fn delete_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.workers().delete(&id).await?;
    info!(id = %id, "Worker deleted");
    Ok(StatusCode::NO_CONTENT)
}
