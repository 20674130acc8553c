//! Integration tests for the leaderboard and bonus endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Score reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn score_report_appears_in_the_leaderboard() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let response = post_json(
        app.clone(),
        "/api/leaderboard",
        json!({"id": "u1", "username": "Bob", "score": 250}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));

    let board = body_json(get(app, "/api/leaderboard").await).await;
    assert_eq!(board, json!([{"id": "u1", "username": "Bob", "score": 250}]));
}

#[tokio::test]
async fn lower_rescore_does_not_shrink_the_entry() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    for (name, score) in [("Bob", 300), ("Robert", 200)] {
        let response = post_json(
            app.clone(),
            "/api/leaderboard",
            json!({"id": "u1", "username": name, "score": score}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let board = body_json(get(app, "/api/leaderboard").await).await;
    assert_eq!(board[0]["score"], 300);
    assert_eq!(board[0]["username"], "Bob");
}

#[tokio::test]
async fn leaderboard_is_sorted_descending() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    for (id, score) in [("a", 10), ("b", 30), ("c", 20)] {
        post_json(
            app.clone(),
            "/api/leaderboard",
            json!({"id": id, "username": id, "score": score}),
        )
        .await;
    }

    let board = body_json(get(app, "/api/leaderboard").await).await;
    let scores: Vec<i64> = board
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![30, 20, 10]);
}

#[tokio::test]
async fn numeric_id_and_string_score_are_coerced() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let response = post_json(
        app.clone(),
        "/api/leaderboard",
        json!({"id": 42, "username": "Bob", "score": "250"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let board = body_json(get(app, "/api/leaderboard").await).await;
    assert_eq!(board[0]["id"], "42");
    assert_eq!(board[0]["score"], 250);
}

#[tokio::test]
async fn malformed_report_is_a_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let missing = post_json(app.clone(), "/api/leaderboard", json!({"id": "u1"})).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(missing).await["error"], "Invalid data");

    let untypeable = post_json(
        app,
        "/api/leaderboard",
        json!({"id": "u1", "username": "Bob", "score": [1, 2]}),
    )
    .await;
    assert_eq!(untypeable.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(untypeable).await["error"], "Invalid data types");
}

// ---------------------------------------------------------------------------
// Bonuses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bonus_follows_score_div_100() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    post_json(
        app.clone(),
        "/api/leaderboard",
        json!({"id": "u1", "username": "Bob", "score": 250}),
    )
    .await;

    let bonus = body_json(get(app, "/api/bonuses/u1").await).await;
    assert_eq!(bonus, json!({"count": 2}));
}

#[tokio::test]
async fn bonus_is_clamped_at_10() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    post_json(
        app.clone(),
        "/api/leaderboard",
        json!({"id": "u1", "username": "Bob", "score": 999_999}),
    )
    .await;

    let bonus = body_json(get(app, "/api/bonuses/u1").await).await;
    assert_eq!(bonus, json!({"count": 10}));
}

#[tokio::test]
async fn unknown_user_has_zero_bonus() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let bonus = body_json(get(app, "/api/bonuses/nobody").await).await;
    assert_eq!(bonus, json!({"count": 0}));
}

#[tokio::test]
async fn stale_ledger_entry_reads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(
        data_dir.join("bonuses.json"),
        serde_json::to_vec_pretty(&json!([
            {"id": "u1", "date": "2000-01-01", "count": 7}
        ]))
        .unwrap(),
    )
    .unwrap();

    let app = common::build_test_app(dir.path());
    let bonus = body_json(get(app, "/api/bonuses/u1").await).await;
    assert_eq!(bonus, json!({"count": 0}));
}
