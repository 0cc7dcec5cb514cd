use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{sse::ServerEvent, view::PhaseView},
    state::{SseHub, game::GameState},
};

/// Event name carrying the current screen view.
pub const EVENT_VIEW_CHANGED: &str = "view.changed";

/// Broadcast the view of the current screen.
pub fn broadcast_view(hub: &SseHub, game: &GameState) {
    send_event(hub, EVENT_VIEW_CHANGED, &PhaseView::from(game));
}

/// Build the event a freshly connected client starts from.
pub fn view_event(game: &GameState) -> Option<ServerEvent> {
    match ServerEvent::json(Some(EVENT_VIEW_CHANGED.to_string()), &PhaseView::from(game)) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(error = %err, "failed to serialize view payload");
            None
        }
    }
}

fn send_event(hub: &SseHub, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
