use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::{texts::TextsResponse, view::PhaseView},
    error::AppError,
    services::screen_service,
    state::SharedState,
};

/// Routes serving the screen views and their actions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/view", get(current_view))
        .route("/texts", get(texts))
        .route("/screens/welcome/play", post(play))
        .route("/screens/config/continue", post(confirm_players))
        .route("/screens/roles/advance", post(advance_reveal))
}

/// View of the screen the device is on.
#[utoipa::path(
    get,
    path = "/view",
    tag = "screens",
    responses((status = 200, description = "Current screen", body = PhaseView))
)]
pub async fn current_view(State(state): State<SharedState>) -> Json<PhaseView> {
    Json(screen_service::current_view(&state).await)
}

/// Interface strings and role labels.
#[utoipa::path(
    get,
    path = "/texts",
    tag = "screens",
    responses((status = 200, description = "Text table", body = TextsResponse))
)]
pub async fn texts() -> Json<TextsResponse> {
    Json(screen_service::texts())
}

/// Start a new session and open the configuration screen.
#[utoipa::path(
    post,
    path = "/screens/welcome/play",
    tag = "screens",
    responses((status = 200, description = "Configuration screen", body = PhaseView))
)]
pub async fn play(State(state): State<SharedState>) -> Result<Json<PhaseView>, AppError> {
    let view = screen_service::play(&state).await?;
    Ok(Json(view))
}

/// Deal roles and start the reveal.
#[utoipa::path(
    post,
    path = "/screens/config/continue",
    tag = "screens",
    responses(
        (status = 200, description = "Role reveal screen", body = PhaseView),
        (status = 400, description = "Fewer than three players"),
        (status = 409, description = "Not on the configuration screen")
    )
)]
pub async fn confirm_players(
    State(state): State<SharedState>,
) -> Result<Json<PhaseView>, AppError> {
    let view = screen_service::confirm_players(&state).await?;
    Ok(Json(view))
}

/// Hide the current card and move to the next seat, or hand off after the last one.
#[utoipa::path(
    post,
    path = "/screens/roles/advance",
    tag = "screens",
    responses(
        (status = 200, description = "Next seat or handoff screen", body = PhaseView),
        (status = 409, description = "Not on the role reveal screen")
    )
)]
pub async fn advance_reveal(
    State(state): State<SharedState>,
) -> Result<Json<PhaseView>, AppError> {
    let view = screen_service::advance_reveal(&state).await?;
    Ok(Json(view))
}
