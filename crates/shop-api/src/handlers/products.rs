//! Catalog handlers. Listing and lookup are public; creation is admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use shop_core::{Product, ShopError};
use tracing::{info, instrument};

use crate::db::ProductRepository;
use crate::error::ApiResult;
use crate::extract::AdminUser;
use crate::state::AppState;

/// List all products
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = ProductRepository::new(&state.pool).list().await?;
    Ok(Json(products))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> ApiResult<Json<Product>> {
    let product = ProductRepository::new(&state.pool)
        .find(product_id)
        .await?
        .ok_or(ShopError::ProductNotFound { product_id })?;

    Ok(Json(product))
}

/// Admin request to add a catalog entry
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn validate_product(req: &CreateProductRequest) -> Result<(), ShopError> {
    if req.name.trim().is_empty() {
        return Err(ShopError::Validation("name: must not be empty".to_string()));
    }
    if req.price < Decimal::ZERO {
        return Err(ShopError::Validation("price: must be non-negative".to_string()));
    }
    if req.stock_quantity < 0 {
        return Err(ShopError::Validation(
            "stock_quantity: must be non-negative".to_string(),
        ));
    }
    Ok(())
}

/// Create a product (admin-only)
#[instrument(skip(state, request, admin), fields(admin_id = admin.0.sub))]
pub async fn create_product(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    validate_product(&request)?;

    let product = ProductRepository::new(&state.pool)
        .create(
            request.name.trim(),
            request.description.as_deref(),
            request.price,
            request.stock_quantity,
            request.image_url.as_deref(),
            request.category.as_deref(),
        )
        .await?;

    info!(product_id = product.id, "created product");

    Ok((StatusCode::CREATED, Json(product)))
}
