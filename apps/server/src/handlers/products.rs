//! # Product Handlers
//!
//! CRUD for `/api/productos` plus the photo upload endpoint.
//!
//! ## Photo Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Photo Flow                                   │
//! │                                                                         │
//! │  POST /api/productos/:id/foto  (multipart, field "foto")               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  media/fotos_productos/<product-id>.<ext>  ← written to disk           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products.photo = "fotos_productos/<product-id>.<ext>"                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GET /media/fotos_productos/<product-id>.<ext>  ← ServeDir             │
//! │  (the DTO's "imageUrl" field carries exactly this path)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{centavos_from_decimal, decimal_from_centavos};
use crate::AppState;
use bodega_core::validation::{
    validate_initial_stock, validate_name, validate_price_cents, validate_product_code,
};
use bodega_core::{Product, DEFAULT_STOCK_MAX, DEFAULT_STOCK_MIN};

/// Product DTO with the wire field names the frontend expects.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDto {
    pub id: String,
    pub nombre: String,
    pub id_producto: Option<String>,
    pub descripcion: Option<String>,
    pub foto: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub precio_venta: f64,
    pub stock: i64,
    pub stock_minimo: i64,
    pub stock_maximo: i64,
    pub ultimo_registro: DateTime<Utc>,
    pub fecha_creacion: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let image_url = p.photo.as_ref().map(|f| format!("/media/{}", f));
        ProductDto {
            id: p.id,
            nombre: p.name,
            id_producto: p.code,
            descripcion: p.description,
            foto: p.photo,
            image_url,
            precio_venta: decimal_from_centavos(p.price_cents),
            stock: p.stock,
            stock_minimo: p.stock_min,
            stock_maximo: p.stock_max,
            ultimo_registro: p.updated_at,
            fecha_creacion: p.created_at,
        }
    }
}

/// Create/update form for products.
///
/// `stock` is only honored on create; updates leave stock to the ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    pub nombre: String,
    #[serde(default)]
    pub id_producto: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub precio_venta: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_stock_min")]
    pub stock_minimo: i64,
    #[serde(default = "default_stock_max")]
    pub stock_maximo: i64,
}

fn default_stock_min() -> i64 {
    DEFAULT_STOCK_MIN
}

fn default_stock_max() -> i64 {
    DEFAULT_STOCK_MAX
}

/// `GET /api/productos` - lists products ordered by name.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let products = state.db.products().list().await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// `GET /api/productos/:id`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;
    Ok(Json(ProductDto::from(product)))
}

/// `POST /api/productos` - creates a product.
///
/// The submitted `stock` is the initial on-hand quantity; from here on,
/// stock changes only through `/api/movimientos`.
pub async fn create_product(
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    debug!(nombre = %form.nombre, "create_product");

    let name = validate_name("nombre", &form.nombre)?;
    let code = validate_product_code(form.id_producto.as_deref())?;
    let price_cents = centavos_from_decimal(form.precio_venta);
    validate_price_cents(price_cents)?;
    validate_initial_stock(form.stock)?;

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name,
        code,
        description: form.descripcion,
        photo: None,
        price_cents,
        stock: form.stock,
        stock_min: form.stock_minimo,
        stock_max: form.stock_maximo,
        created_at: now,
        updated_at: now,
    };

    let created = state.db.products().insert(&product).await?;
    info!(id = %created.id, nombre = %created.name, "Product created");

    Ok((StatusCode::CREATED, Json(ProductDto::from(created))))
}

/// `PUT /api/productos/:id` - full update of descriptive fields.
///
/// `stock` in the body is ignored; the ledger owns it.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ProductForm>,
) -> Result<Json<ProductDto>, ApiError> {
    debug!(id = %id, "update_product");

    let existing = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    let name = validate_name("nombre", &form.nombre)?;
    let code = validate_product_code(form.id_producto.as_deref())?;
    let price_cents = centavos_from_decimal(form.precio_venta);
    validate_price_cents(price_cents)?;

    let updated = Product {
        name,
        code,
        description: form.descripcion,
        price_cents,
        stock_min: form.stock_minimo,
        stock_max: form.stock_maximo,
        ..existing
    };
    state.db.products().update(&updated).await?;

    let fresh = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    Ok(Json(ProductDto::from(fresh)))
}

/// `DELETE /api/productos/:id`
///
/// Cascades to the product's movements: product and ledger go together.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.products().delete(&id).await?;
    info!(id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/productos/:id/foto` - multipart photo upload.
///
/// Accepts a single `foto` part, stores it under `media/fotos_productos/`,
/// and records the relative path on the product.
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ProductDto>, ApiError> {
    debug!(id = %id, "upload_photo");

    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    let mut saved: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("foto") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|f| std::path::Path::new(f).extension()?.to_str())
            .unwrap_or("jpg")
            .to_ascii_lowercase();

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("failed to read foto: {}", e)))?;
        if data.is_empty() {
            return Err(ApiError::validation("foto is empty").with_field("foto"));
        }

        let relative = format!("fotos_productos/{}.{}", product.id, extension);
        let destination = state.media_dir.join(&relative);
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!("Failed to create media directory: {}", e);
                ApiError::internal("Failed to store photo")
            })?;
        }
        tokio::fs::write(&destination, &data).await.map_err(|e| {
            tracing::error!("Failed to write photo: {}", e);
            ApiError::internal("Failed to store photo")
        })?;

        saved = Some(relative);
        break;
    }

    let relative = saved.ok_or_else(|| {
        ApiError::validation("multipart field 'foto' is required").with_field("foto")
    })?;

    state.db.products().set_photo(&id, &relative).await?;
    info!(id = %id, foto = %relative, "Product photo stored");

    let fresh = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    Ok(Json(ProductDto::from(fresh)))
}
