use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::game::{GameStateSnapshot, PhaseChangeRequest, TeamCountRequest},
    error::AppError,
    services::game_service::{self, PlayerAction, TimerAction},
    state::SharedState,
};

/// Routes exposing the store operations.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game/state", get(get_state))
        .route("/game/new", post(new_game))
        .route("/game/players/red", post(set_red_count))
        .route("/game/players/black", post(set_black_count))
        .route("/game/players/deal", post(deal))
        .route("/game/players/{id}/reveal", post(reveal_role))
        .route("/game/players/{id}/close", post(close_role))
        .route("/game/players/{id}/vote", post(toggle_vote))
        .route("/game/players/{id}/warnings/add", post(add_warning))
        .route("/game/players/{id}/warnings/remove", post(remove_warning))
        .route("/game/players/{id}/eliminate", post(eliminate_player))
        .route("/game/next-player", post(next_player))
        .route("/game/timer/start", post(start_timer))
        .route("/game/timer/stop", post(stop_timer))
        .route("/game/timer/reset", post(reset_timer))
        .route("/game/phase", post(set_phase))
        .route("/game/end", post(end_game))
}

/// Full state of the store.
#[utoipa::path(
    get,
    path = "/game/state",
    tag = "game",
    responses((status = 200, description = "Current state", body = GameStateSnapshot))
)]
pub async fn get_state(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::snapshot(&state).await)
}

/// Start a new session with the default team sizes, back on the welcome screen.
#[utoipa::path(
    post,
    path = "/game/new",
    tag = "game",
    responses((status = 200, description = "New session created", body = GameStateSnapshot))
)]
pub async fn new_game(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::new_game(&state).await)
}

/// Set the red team size (clamped to 1..=20).
#[utoipa::path(
    post,
    path = "/game/players/red",
    tag = "game",
    request_body = TeamCountRequest,
    responses((status = 200, description = "Team size updated", body = GameStateSnapshot))
)]
pub async fn set_red_count(
    State(state): State<SharedState>,
    Json(payload): Json<TeamCountRequest>,
) -> Json<GameStateSnapshot> {
    Json(game_service::set_red_count(&state, payload.count).await)
}

/// Set the black team size (clamped to 1..=20).
#[utoipa::path(
    post,
    path = "/game/players/black",
    tag = "game",
    request_body = TeamCountRequest,
    responses((status = 200, description = "Team size updated", body = GameStateSnapshot))
)]
pub async fn set_black_count(
    State(state): State<SharedState>,
    Json(payload): Json<TeamCountRequest>,
) -> Json<GameStateSnapshot> {
    Json(game_service::set_black_count(&state, payload.count).await)
}

/// Deal roles for the configured team sizes.
#[utoipa::path(
    post,
    path = "/game/players/deal",
    tag = "game",
    responses((status = 200, description = "Players dealt", body = GameStateSnapshot))
)]
pub async fn deal(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::deal(&state).await)
}

/// Show a player their role.
#[utoipa::path(
    post,
    path = "/game/players/{id}/reveal",
    tag = "game",
    params(("id" = u32, Path, description = "Seat number")),
    responses((status = 200, description = "Role shown", body = GameStateSnapshot))
)]
pub async fn reveal_role(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> Json<GameStateSnapshot> {
    Json(game_service::player_action(&state, id, PlayerAction::Reveal).await)
}

/// Hide a player's role.
#[utoipa::path(
    post,
    path = "/game/players/{id}/close",
    tag = "game",
    params(("id" = u32, Path, description = "Seat number")),
    responses((status = 200, description = "Role hidden", body = GameStateSnapshot))
)]
pub async fn close_role(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> Json<GameStateSnapshot> {
    Json(game_service::player_action(&state, id, PlayerAction::Close).await)
}

/// Toggle a player's nomination.
#[utoipa::path(
    post,
    path = "/game/players/{id}/vote",
    tag = "game",
    params(("id" = u32, Path, description = "Seat number")),
    responses((status = 200, description = "Nomination toggled", body = GameStateSnapshot))
)]
pub async fn toggle_vote(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> Json<GameStateSnapshot> {
    Json(game_service::player_action(&state, id, PlayerAction::Vote).await)
}

/// Give a player a warning (at most 3).
#[utoipa::path(
    post,
    path = "/game/players/{id}/warnings/add",
    tag = "game",
    params(("id" = u32, Path, description = "Seat number")),
    responses((status = 200, description = "Warning added", body = GameStateSnapshot))
)]
pub async fn add_warning(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> Json<GameStateSnapshot> {
    Json(game_service::player_action(&state, id, PlayerAction::AddWarning).await)
}

/// Take a warning back.
#[utoipa::path(
    post,
    path = "/game/players/{id}/warnings/remove",
    tag = "game",
    params(("id" = u32, Path, description = "Seat number")),
    responses((status = 200, description = "Warning removed", body = GameStateSnapshot))
)]
pub async fn remove_warning(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> Json<GameStateSnapshot> {
    Json(game_service::player_action(&state, id, PlayerAction::RemoveWarning).await)
}

/// Eliminate a player.
#[utoipa::path(
    post,
    path = "/game/players/{id}/eliminate",
    tag = "game",
    params(("id" = u32, Path, description = "Seat number")),
    responses((status = 200, description = "Player eliminated", body = GameStateSnapshot))
)]
pub async fn eliminate_player(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> Json<GameStateSnapshot> {
    Json(game_service::player_action(&state, id, PlayerAction::Eliminate).await)
}

/// Move the role reveal to the next seat.
#[utoipa::path(
    post,
    path = "/game/next-player",
    tag = "game",
    responses((status = 200, description = "Reveal advanced", body = GameStateSnapshot))
)]
pub async fn next_player(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::next_player(&state).await)
}

/// Restart the discussion timer from 60 seconds.
#[utoipa::path(
    post,
    path = "/game/timer/start",
    tag = "game",
    responses((status = 200, description = "Timer started", body = GameStateSnapshot))
)]
pub async fn start_timer(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::timer(&state, TimerAction::Start).await)
}

/// Stop the timer, keeping the remaining seconds.
#[utoipa::path(
    post,
    path = "/game/timer/stop",
    tag = "game",
    responses((status = 200, description = "Timer stopped", body = GameStateSnapshot))
)]
pub async fn stop_timer(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::timer(&state, TimerAction::Stop).await)
}

/// Stop the timer and refill it.
#[utoipa::path(
    post,
    path = "/game/timer/reset",
    tag = "game",
    responses((status = 200, description = "Timer reset", body = GameStateSnapshot))
)]
pub async fn reset_timer(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::timer(&state, TimerAction::Reset).await)
}

/// Move to another screen along a legal edge.
#[utoipa::path(
    post,
    path = "/game/phase",
    tag = "game",
    request_body = PhaseChangeRequest,
    responses(
        (status = 200, description = "Phase changed", body = GameStateSnapshot),
        (status = 409, description = "No legal edge leads to the requested phase")
    )
)]
pub async fn set_phase(
    State(state): State<SharedState>,
    Json(payload): Json<PhaseChangeRequest>,
) -> Result<Json<GameStateSnapshot>, AppError> {
    let snapshot = game_service::set_phase(&state, payload.phase).await?;
    Ok(Json(snapshot))
}

/// End the game from the lobby and record the session.
#[utoipa::path(
    post,
    path = "/game/end",
    tag = "game",
    responses(
        (status = 200, description = "Game ended", body = GameStateSnapshot),
        (status = 409, description = "Not in the game lobby")
    )
)]
pub async fn end_game(
    State(state): State<SharedState>,
) -> Result<Json<GameStateSnapshot>, AppError> {
    let snapshot = game_service::end_game(&state).await?;
    Ok(Json(snapshot))
}
