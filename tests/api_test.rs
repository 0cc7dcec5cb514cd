use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use mafia_moderator::{build_router, build_state, config::AppConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    build_router(build_state(AppConfig::in_memory()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "POST", uri, None).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

#[tokio::test]
async fn test_fresh_state_is_on_the_welcome_screen() {
    let app = app();

    let (status, view) = get(&app, "/view").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["screen"], "welcome");

    let (status, state) = get(&app, "/game/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["phase"], "welcome");
    assert_eq!(state["red_player_count"], 7);
    assert_eq!(state["black_player_count"], 3);
}

#[tokio::test]
async fn test_full_game_is_recorded() {
    let app = app();

    let (status, view) = post(&app, "/screens/welcome/play").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["screen"], "config");
    assert_eq!(view["total_players"], 10);

    let (_, state) = send(&app, "POST", "/game/players/red", Some(json!({"count": 3}))).await;
    assert_eq!(state["red_player_count"], 3);
    let (_, state) = send(&app, "POST", "/game/players/black", Some(json!({"count": 2}))).await;
    assert_eq!(state["total_players"], 5);

    let (status, view) = post(&app, "/screens/config/continue").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["screen"], "roles");
    assert_eq!(view["position"], 1);

    let (_, state) = post(&app, "/game/players/1/reveal").await;
    assert_eq!(state["players"][0]["has_viewed_role"], true);
    let (_, view) = get(&app, "/view").await;
    assert!(view["card"]["role"].is_object());

    for _ in 0..4 {
        let (_, view) = post(&app, "/screens/roles/advance").await;
        assert_eq!(view["screen"], "roles");
    }
    let (_, view) = post(&app, "/screens/roles/advance").await;
    assert_eq!(view["screen"], "handoff");

    let (status, state) = send(&app, "POST", "/game/phase", Some(json!({"phase": "game"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["phase"], "game");

    post(&app, "/game/players/2/vote").await;
    post(&app, "/game/players/4/vote").await;
    post(&app, "/game/players/2/warnings/add").await;
    let (_, state) = post(&app, "/game/players/2/eliminate").await;
    assert_eq!(state["voting_players"], json!([4]));
    assert_eq!(state["players"][1]["is_eliminated"], true);
    assert_eq!(state["players"][1]["warnings"], 0);

    let session_id = state["session_id"].as_str().unwrap().to_string();

    let (status, state) = post(&app, "/game/end").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["phase"], "welcome");

    let (status, sessions) = get(&app, "/sessions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions.as_array().unwrap().len(), 1);
    assert_eq!(sessions[0]["id"], session_id.as_str());
    assert!(sessions[0]["ended_at"].is_string());

    let (status, session) = get(&app, &format!("/sessions/{session_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["total_players"], 5);
    assert_eq!(session["players"][1]["is_eliminated"], true);
}

#[tokio::test]
async fn test_illegal_phase_change_is_a_conflict() {
    let app = app();

    let (status, body) = send(&app, "POST", "/game/phase", Some(json!({"phase": "game"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("invalid transition"));

    let (status, _) = post(&app, "/game/end").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, state) = get(&app, "/game/state").await;
    assert_eq!(state["phase"], "welcome");
}

#[tokio::test]
async fn test_small_table_cannot_continue() {
    let app = app();
    post(&app, "/screens/welcome/play").await;
    send(&app, "POST", "/game/players/red", Some(json!({"count": 1}))).await;
    send(&app, "POST", "/game/players/black", Some(json!({"count": 1}))).await;

    let (status, _) = post(&app, "/screens/config/continue").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, view) = get(&app, "/view").await;
    assert_eq!(view["screen"], "config");
    assert_eq!(view["can_continue"], false);
}

#[tokio::test]
async fn test_counts_are_clamped_and_unknown_players_ignored() {
    let app = app();

    let (status, state) = send(&app, "POST", "/game/players/red", Some(json!({"count": 99}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["red_player_count"], 20);

    let (_, state) = send(&app, "POST", "/game/players/black", Some(json!({"count": -3}))).await;
    assert_eq!(state["black_player_count"], 1);

    let (status, _) = post(&app, "/game/players/99/eliminate").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_timer_endpoints() {
    let app = app();

    let (_, state) = post(&app, "/game/timer/start").await;
    assert_eq!(state["is_timer_running"], true);
    assert_eq!(state["timer_seconds"], 60);

    let (_, state) = post(&app, "/game/timer/stop").await;
    assert_eq!(state["is_timer_running"], false);

    let (_, state) = post(&app, "/game/timer/reset").await;
    assert_eq!(state["timer_seconds"], 60);
    assert_eq!(state["is_timer_running"], false);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = app();
    let (status, _) = get(&app, "/sessions/game_0_missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_texts_and_health() {
    let app = app();

    let (status, texts) = get(&app, "/texts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(texts["texts"]["app_title"], "MafClub 36");
    assert_eq!(texts["roles"].as_array().unwrap().len(), 4);

    let (status, health) = get(&app, "/healthcheck").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}
