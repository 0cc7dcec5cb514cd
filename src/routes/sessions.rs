use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::session::SessionSummary, error::AppError, services::session_service, state::SharedState,
};

/// Routes over the recorded session history.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{id}", get(get_session))
}

/// Recorded sessions, most recent first.
#[utoipa::path(
    get,
    path = "/sessions",
    tag = "sessions",
    responses((status = 200, description = "Session history", body = [SessionSummary]))
)]
pub async fn list_sessions(State(state): State<SharedState>) -> Json<Vec<SessionSummary>> {
    Json(session_service::list_sessions(&state).await)
}

/// One recorded session.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session found", body = SessionSummary),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = session_service::get_session(&state, &id).await?;
    Ok(Json(session))
}
