//! Leaderboard ranking and daily bonus merge rules.
//!
//! Pure functions over in-memory entry lists; the HTTP layer loads and
//! persists them through `vitrina-store` under the collection mutexes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// The ranking table keeps at most this many entries.
pub const LEADERBOARD_CAP: usize = 100;

/// Daily bonus ceiling.
pub const DAILY_BONUS_CAP: i64 = 10;

/// Score points per bonus unit.
pub const BONUS_SCORE_STEP: i64 = 100;

/// One ranking entry. `id` is the user id; the maximum score seen wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub username: String,
    pub score: i64,
}

/// One live bonus-ledger entry per user. `date` is an ISO calendar date;
/// `count` resets when the date rolls over and never decreases within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusEntry {
    pub id: String,
    pub date: String,
    pub count: i64,
}

/// Bonus units implied by a score: `min(10, score div 100)`.
pub fn bonus_for_score(score: i64) -> i64 {
    (score / BONUS_SCORE_STEP).min(DAILY_BONUS_CAP)
}

/// Coerce a raw `POST /api/leaderboard` body into `(id, username, score)`.
///
/// `id` and `username` accept strings or numbers; `score` accepts an integer
/// or a decimal string. Anything else is a validation error (surfaced as 400).
pub fn parse_score_report(body: &Value) -> Result<(String, String, i64), CoreError> {
    let object = body
        .as_object()
        .ok_or_else(|| CoreError::Validation("Invalid data".into()))?;
    if !["id", "username", "score"]
        .iter()
        .all(|k| object.contains_key(*k))
    {
        return Err(CoreError::Validation("Invalid data".into()));
    }

    let as_text = |value: &Value| -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    };

    let id = as_text(&object["id"]);
    let username = as_text(&object["username"]);
    let score = match &object["score"] {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    match (id, username, score) {
        (Some(id), Some(username), Some(score)) => Ok((id, username, score)),
        _ => Err(CoreError::Validation("Invalid data types".into())),
    }
}

/// Merge a score report into the bonus ledger for `today`.
///
/// Creates the user's entry at zero if absent, resets it to zero when its
/// date differs from `today`, then raises `count` to the score-implied value
/// if that is larger. `count` never decreases within a day.
pub fn merge_bonus(entries: &mut Vec<BonusEntry>, user_id: &str, score: i64, today: &str) {
    let entry = match entries.iter_mut().find(|b| b.id == user_id) {
        Some(entry) => {
            if entry.date != today {
                entry.date = today.to_string();
                entry.count = 0;
            }
            entry
        }
        None => {
            entries.push(BonusEntry {
                id: user_id.to_string(),
                date: today.to_string(),
                count: 0,
            });
            entries.last_mut().expect("just pushed")
        }
    };

    let implied = bonus_for_score(score);
    if implied > entry.count {
        entry.count = implied;
    }
}

/// Today's bonus count for `user_id`, without mutating the ledger.
///
/// A stale entry (different date) reads as zero; it is only reset by the
/// next score report, never by a read.
pub fn bonus_count(entries: &[BonusEntry], user_id: &str, today: &str) -> i64 {
    entries
        .iter()
        .find(|b| b.id == user_id && b.date == today)
        .map_or(0, |b| b.count)
}

/// Merge a score report into the ranking table.
///
/// An existing entry's score and username are overwritten only when the new
/// score is strictly greater; otherwise a new entry is appended. The table
/// is then sorted by score descending (stable, so ties keep their order)
/// and truncated to [`LEADERBOARD_CAP`].
pub fn apply_score(board: &mut Vec<LeaderboardEntry>, user_id: &str, username: &str, score: i64) {
    match board.iter_mut().find(|e| e.id == user_id) {
        Some(entry) => {
            if score > entry.score {
                entry.score = score;
                entry.username = username.to_string();
            }
        }
        None => board.push(LeaderboardEntry {
            id: user_id.to_string(),
            username: username.to_string(),
            score,
        }),
    }

    board.sort_by(|a, b| b.score.cmp(&a.score));
    board.truncate(LEADERBOARD_CAP);
}

/// Top entries by score descending (what `GET /api/leaderboard` returns).
pub fn ranked(mut board: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    board.sort_by(|a, b| b.score.cmp(&a.score));
    board.truncate(LEADERBOARD_CAP);
    board
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
