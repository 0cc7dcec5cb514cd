use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/events",
    tag = "sse",
    responses((status = 200, description = "`view.changed` events carrying the current screen view", content_type = "text/event-stream", body = String))
)]
/// Stream the current screen view, then every change to it.
pub async fn view_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let (initial, receiver) = sse_service::subscribe(&state).await;
    info!("New SSE connection");
    sse_service::to_sse_stream(initial, receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/events", get(view_stream))
}
