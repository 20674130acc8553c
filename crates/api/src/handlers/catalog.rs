//! Handlers for the product catalog: collection listings and the
//! duplicate-gated insertion endpoint the bot forwards to.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use vitrina_core::catalog::{generate_id, is_duplicate, validate_product_payload, Product};
use vitrina_core::error::CoreError;
use vitrina_store::Collection;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/products
///
/// The full product collection in insertion order.
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.store.load(Collection::Products).await)
}

/// GET /api/akcii
pub async fn list_promotions(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(state.store.load(Collection::Promotions).await)
}

/// GET /api/novinki
pub async fn list_new_items(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(state.store.load(Collection::NewItems).await)
}

/// POST /api/add-product
///
/// Validates the payload, then inserts under the products-collection lock so
/// the duplicate check and the append are one atomic read-modify-write.
/// Located candidates that match an existing record on the composite key
/// (category, brand, name, flavor, city, normalized street) get 409;
/// unlocated payloads are never deduplicated.
pub async fn add_product(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Json<Value>> {
    let fields = validate_product_payload(&payload)?;

    let id = state
        .store
        .update(Collection::Products, |products: &mut Vec<Product>| {
            if is_duplicate(products, &fields) {
                return Err(CoreError::Conflict("Product already exists".into()));
            }
            let product = Product {
                id: generate_id(),
                fields,
            };
            let id = product.id.clone();
            products.push(product);
            Ok(id)
        })
        .await??;

    tracing::info!(%id, "Product added to catalog");
    Ok(Json(json!({"status": "ok", "id": id})))
}
