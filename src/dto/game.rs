use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::phase::VisibleGamePhase,
    state::game::{GameState, Player, Role},
};

/// Body of the team size endpoints. Out-of-range values are clamped.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TeamCountRequest {
    pub count: i64,
}

/// Body of the phase change endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PhaseChangeRequest {
    pub phase: VisibleGamePhase,
}

/// One player as returned by the state endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSnapshot {
    pub id: u32,
    pub role: Role,
    pub warnings: u8,
    pub has_viewed_role: bool,
    pub is_eliminated: bool,
    /// Whether the player is in the voting set.
    pub is_voted: bool,
}

/// Full state of the store.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameStateSnapshot {
    pub session_id: String,
    pub phase: VisibleGamePhase,
    /// Number of phase transitions applied since the process started.
    pub phase_version: usize,
    pub red_player_count: u32,
    pub black_player_count: u32,
    pub total_players: usize,
    pub players: Vec<PlayerSnapshot>,
    pub current_player_index: usize,
    pub all_roles_revealed: bool,
    pub timer_seconds: u32,
    pub is_timer_running: bool,
    /// Nominated players in nomination order.
    pub voting_players: Vec<u32>,
}

impl PlayerSnapshot {
    fn new(player: &Player, is_voted: bool) -> Self {
        Self {
            id: player.id,
            role: player.role,
            warnings: player.warnings,
            has_viewed_role: player.has_viewed_role,
            is_eliminated: player.is_eliminated,
            is_voted,
        }
    }
}

impl From<&GameState> for GameStateSnapshot {
    fn from(game: &GameState) -> Self {
        let snapshot = game.phase_snapshot();
        Self {
            session_id: game.session_id().to_string(),
            phase: snapshot.phase.into(),
            phase_version: snapshot.version,
            red_player_count: game.red_player_count(),
            black_player_count: game.black_player_count(),
            total_players: game.total_players(),
            players: game
                .players()
                .iter()
                .map(|player| PlayerSnapshot::new(player, game.is_voted(player.id)))
                .collect(),
            current_player_index: game.current_player_index(),
            all_roles_revealed: game.all_roles_revealed(),
            timer_seconds: game.timer_seconds(),
            is_timer_running: game.is_timer_running(),
            voting_players: game.voting_players().collect(),
        }
    }
}
