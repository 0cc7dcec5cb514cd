use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct HealthResponse {
    /// "ok", or "degraded" when the session log cannot be reached.
    pub status: String,
    /// Number of recorded sessions.
    pub sessions: usize,
}

impl HealthResponse {
    /// Session log reachable.
    pub fn ok(sessions: usize) -> Self {
        Self {
            status: "ok".to_string(),
            sessions,
        }
    }

    /// Session log unreachable; the game keeps working without it.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            sessions: 0,
        }
    }
}
