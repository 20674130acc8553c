//! Route definitions for the product catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes mounted under `/api`.
///
/// ```text
/// GET  /products     -> list_products
/// GET  /akcii        -> list_promotions
/// GET  /novinki      -> list_new_items
/// POST /add-product  -> add_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route("/akcii", get(catalog::list_promotions))
        .route("/novinki", get(catalog::list_new_items))
        .route("/add-product", post(catalog::add_product))
}
