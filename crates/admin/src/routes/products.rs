//! Catalog product route handlers.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::put,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use soundhaus_core::{Money, ProductId};

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::product::Product;
use crate::state::AppState;

use super::parse_id;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/products/{id}", put(update))
}

/// Product update request body.
///
/// All three fields are required; the update is all-or-nothing.
#[derive(Debug, Deserialize)]
struct UpdateProductInput {
    name: Option<String>,
    /// Price as a decimal string (e.g. "499.00").
    price: Option<String>,
    description: Option<String>,
}

/// Update a product's name, price and description.
///
/// PUT /api/products/:id
///
/// Validation is fail-fast: a missing field or bad price rejects the
/// request before any write. The write itself is a single conditional
/// UPDATE, so "no matching row" comes back as 404 rather than a silent
/// no-op.
async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>, AppError> {
    let id: ProductId = parse_id(&id, "Product ID")?;

    let name = input.name.ok_or_else(|| AppError::missing_field("name"))?;
    let raw_price = input.price.ok_or_else(|| AppError::missing_field("price"))?;
    let description = input
        .description
        .ok_or_else(|| AppError::missing_field("description"))?;

    let price = Decimal::from_str(&raw_price)
        .map(Money::new)
        .map_err(|_| AppError::BadRequest(format!("Invalid price: {raw_price}")))?;
    if price.is_negative() {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }

    let product = ProductRepository::new(state.pool())
        .update(id, &name, price, &description)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;

    Ok(Json(product))
}
