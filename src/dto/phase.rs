use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::state_machine::GamePhase;

/// Publicly visible game phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleGamePhase {
    /// Title screen.
    Welcome,
    /// Team size configuration.
    Config,
    /// Pass-and-play role reveal.
    Roles,
    /// Device goes back to the moderator.
    Handoff,
    /// Game lobby.
    Game,
}

impl From<GamePhase> for VisibleGamePhase {
    fn from(value: GamePhase) -> Self {
        match value {
            GamePhase::Welcome => VisibleGamePhase::Welcome,
            GamePhase::Config => VisibleGamePhase::Config,
            GamePhase::Roles => VisibleGamePhase::Roles,
            GamePhase::Handoff => VisibleGamePhase::Handoff,
            GamePhase::Game => VisibleGamePhase::Game,
        }
    }
}

impl From<VisibleGamePhase> for GamePhase {
    fn from(value: VisibleGamePhase) -> Self {
        match value {
            VisibleGamePhase::Welcome => GamePhase::Welcome,
            VisibleGamePhase::Config => GamePhase::Config,
            VisibleGamePhase::Roles => GamePhase::Roles,
            VisibleGamePhase::Handoff => GamePhase::Handoff,
            VisibleGamePhase::Game => GamePhase::Game,
        }
    }
}
