//! Handlers for the leaderboard and daily bonus ledger.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use vitrina_core::error::CoreError;
use vitrina_core::leaderboard::{
    apply_score, bonus_count, merge_bonus, parse_score_report, ranked, BonusEntry,
    LeaderboardEntry,
};
use vitrina_store::Collection;

use crate::error::AppResult;
use crate::state::AppState;

/// Local calendar date as an ISO string, the ledger's notion of "today".
fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

/// GET /api/leaderboard
///
/// Top 100 entries by score descending.
pub async fn get_leaderboard(State(state): State<AppState>) -> Json<Vec<LeaderboardEntry>> {
    let board = state.store.load(Collection::Leaderboard).await;
    Json(ranked(board))
}

/// POST /api/leaderboard
///
/// Merge a score report: bonus ledger first, then the ranking table, each
/// under its own collection lock. The leaderboard score never decreases and
/// the username only changes on a strictly higher score.
pub async fn submit_score(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let (user_id, username, score) = parse_score_report(&body)?;
    let today = today();

    state
        .store
        .update(Collection::Bonuses, |entries: &mut Vec<BonusEntry>| {
            merge_bonus(entries, &user_id, score, &today);
            Ok::<_, CoreError>(())
        })
        .await??;

    state
        .store
        .update(Collection::Leaderboard, |board: &mut Vec<LeaderboardEntry>| {
            apply_score(board, &user_id, &username, score);
            Ok::<_, CoreError>(())
        })
        .await??;

    tracing::info!(%user_id, score, "Score report merged");
    Ok(Json(json!({"status": "ok"})))
}

/// GET /api/bonuses/{user_id}
///
/// Today's bonus count for the user; a stale or missing ledger entry reads
/// as zero without being mutated.
pub async fn get_bonus(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Value> {
    let entries: Vec<BonusEntry> = state.store.load(Collection::Bonuses).await;
    let count = bonus_count(&entries, &user_id, &today());
    Json(json!({"count": count}))
}
