//! Route definitions for the leaderboard and bonus ledger.

use axum::routing::get;
use axum::Router;

use crate::handlers::leaderboard;
use crate::state::AppState;

/// Leaderboard routes mounted under `/api`.
///
/// ```text
/// GET  /leaderboard         -> get_leaderboard
/// POST /leaderboard         -> submit_score
/// GET  /bonuses/{user_id}   -> get_bonus
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/leaderboard",
            get(leaderboard::get_leaderboard).post(leaderboard::submit_score),
        )
        .route("/bonuses/{user_id}", get(leaderboard::get_bonus))
}
