//! Route definition for the Telegram webhook (root-level, not under `/api`).

use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// ```text
/// POST /webhook -> telegram_webhook
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(webhook::telegram_webhook))
}
