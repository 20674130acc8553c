pub mod catalog;
pub mod health;
pub mod leaderboard;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /products              catalog listing
/// /akcii                 promotion listing
/// /novinki               new-item listing
/// /add-product           duplicate-gated insertion (POST)
///
/// /leaderboard           top 100 (GET), score report (POST)
/// /bonuses/{user_id}     today's bonus count
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .merge(leaderboard::router())
}
