use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dao::models::{GameSessionEntity, SessionPlayerEntity},
    dto::format_unix_millis,
    state::game::Role,
};

/// Player line of a recorded session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionPlayerSummary {
    pub id: u32,
    pub role: Role,
    pub is_eliminated: bool,
}

/// Recorded session as listed by the history endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSummary {
    pub id: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    pub red_player_count: u32,
    pub black_player_count: u32,
    pub total_players: u32,
    pub players: Vec<SessionPlayerSummary>,
}

impl From<SessionPlayerEntity> for SessionPlayerSummary {
    fn from(player: SessionPlayerEntity) -> Self {
        Self {
            id: player.id,
            role: player.role,
            is_eliminated: player.is_eliminated,
        }
    }
}

impl From<GameSessionEntity> for SessionSummary {
    fn from(session: GameSessionEntity) -> Self {
        Self {
            id: session.id,
            created_at: format_unix_millis(session.created_at),
            started_at: session.started_at.map(format_unix_millis),
            ended_at: session.ended_at.map(format_unix_millis),
            red_player_count: session.red_player_count,
            black_player_count: session.black_player_count,
            total_players: session.total_players,
            players: session.players.into_iter().map(Into::into).collect(),
        }
    }
}
