//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bodega                                 │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  POST /api/movimientos                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler: Result<T, ApiError>                                    │  │
//! │  │         │                                                        │  │
//! │  │  CoreError::InsufficientStock ──► 400 + "Stock insuficiente..." │  │
//! │  │  CoreError::Validation        ──► 400 + field                   │  │
//! │  │  DbError::NotFound            ──► 404                           │  │
//! │  │  DbError::* (storage)         ──► 500, details only in the log  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄── { "code": "INSUFFICIENT_STOCK", "message": "...", "field": null } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors are expected, recoverable-by-caller conditions and are
//! never logged as system failures; storage errors are logged with detail
//! and surfaced as a generic 500 the caller may retry.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bodega_core::CoreError;
use bodega_db::{DbError, MovementError};

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Stock insuficiente. Solo tienes 10 unidades de Coca Cola.",
///   "field": null
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Offending input field, when the error is about one
    pub field: Option<String>,
}

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```javascript
/// if (err.code === 'INSUFFICIENT_STOCK') showStockWarning(err.message);
/// else if (err.field) highlightInput(err.field, err.message);
/// ```
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Outbound movement exceeds current stock (400)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::InsufficientStock => StatusCode::BAD_REQUEST,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Attaches the offending field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Translates a SQLite constraint name ("products.name") to the wire field
/// the frontend knows ("nombre").
fn wire_field(constraint: &str) -> Option<String> {
    let column = constraint.split('.').next_back()?;
    let field = match column {
        "name" => "nombre",
        "code" => "id_producto",
        "email" if constraint.starts_with("workers") => "correo",
        "email" => "email",
        "employee_code" => "codigo_empleado",
        other => other,
    };
    Some(field.to_string())
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field } => {
                let mut api = ApiError::new(
                    ErrorCode::ValidationError,
                    format!("Duplicate {}: already exists", field),
                );
                api.field = wire_field(&field);
                api
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::CheckViolation { message } => {
                // The schema backstop fired past the validation layers
                tracing::error!("Check constraint violation: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => {
                ApiError::not_found("Product", &id).with_field("producto")
            }
            CoreError::InsufficientStock {
                name,
                available,
                requested: _,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                // Compatibility surface: the frontend pattern-matches on
                // "Stock insuficiente". Do not rephrase.
                format!(
                    "Stock insuficiente. Solo tienes {} unidades de {}.",
                    available, name
                ),
            ),
            CoreError::InvalidKind(value) => ApiError::new(
                ErrorCode::ValidationError,
                format!("'{}' is not a valid tipo (expected 'entrada' or 'salida')", value),
            )
            .with_field("tipo"),
            CoreError::Validation(e) => {
                let field = e.field().to_string();
                ApiError::validation(e.to_string()).with_field(field)
            }
        }
    }
}

/// Converts bare validation errors to API errors.
///
/// Lets handlers use `?` directly on the bodega-core validators.
impl From<bodega_core::ValidationError> for ApiError {
    fn from(err: bodega_core::ValidationError) -> Self {
        CoreError::from(err).into()
    }
}

/// Converts mutation service errors to API errors.
impl From<MovementError> for ApiError {
    fn from(err: MovementError) -> Self {
        match err {
            MovementError::Core(e) => e.into(),
            MovementError::Db(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================
