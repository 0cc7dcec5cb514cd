use crate::{dto::session::SessionSummary, error::ServiceError, state::SharedState};

/// Recorded sessions, most recent first.
pub async fn list_sessions(state: &SharedState) -> Vec<SessionSummary> {
    state
        .recorder()
        .get_sessions()
        .await
        .into_iter()
        .map(SessionSummary::from)
        .collect()
}

/// Recorded session with the given id.
pub async fn get_session(state: &SharedState, id: &str) -> Result<SessionSummary, ServiceError> {
    state
        .recorder()
        .get_session_by_id(id)
        .await
        .map(SessionSummary::from)
        .ok_or_else(|| ServiceError::NotFound(format!("session `{id}` not found")))
}
