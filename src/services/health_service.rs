use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the session log is reachable. The game itself never depends on it.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let store = state.recorder().store();
    if let Err(err) = store.health_check().await {
        warn!(error = %err, "session log health check failed");
        return HealthResponse::degraded();
    }

    match store.list_sessions().await {
        Ok(sessions) => HealthResponse::ok(sessions.len()),
        Err(err) => {
            warn!(error = %err, "session log unreadable");
            HealthResponse::degraded()
        }
    }
}
