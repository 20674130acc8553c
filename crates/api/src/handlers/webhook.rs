//! Telegram webhook intake.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use vitrina_bot::Update;

use crate::state::AppState;

/// POST /webhook
///
/// Feeds one Telegram update into the submission machine. Answers 403 when
/// the bot is not configured. Always 200 once the update is handled; bot
/// failures become replies or log lines, never webhook errors (Telegram
/// would retry the update otherwise).
pub async fn telegram_webhook(
    State(state): State<AppState>,
    Json(update): Json<Update>,
) -> Response {
    let Some(bot) = &state.bot else {
        return StatusCode::FORBIDDEN.into_response();
    };

    tracing::debug!(update_id = update.update_id, "Webhook update received");
    bot.handle_update(update).await;
    StatusCode::OK.into_response()
}
