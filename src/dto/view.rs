//! Per-screen projections of the game state. Each view carries exactly what one
//! screen renders, including which of its controls are enabled.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::texts::{RoleDisplay, text},
    state::{
        game::{
            GameState, MAX_TEAM_SIZE, MAX_WARNINGS, MIN_TEAM_SIZE, MIN_TOTAL_PLAYERS, Player,
            TIMER_SECONDS,
        },
        state_machine::GamePhase,
    },
};

/// Remaining seconds at or below which the timer is shown as urgent.
const URGENT_SECONDS: u32 = 10;

/// View of the current screen, tagged with the screen name.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum PhaseView {
    Welcome(WelcomeView),
    Config(ConfigView),
    Roles(RolesView),
    Handoff(HandoffView),
    Game(LobbyView),
}

/// Title screen.
#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeView {
    pub title: String,
    pub subtitle: String,
}

/// Team size selection.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigView {
    pub red_player_count: u32,
    pub black_player_count: u32,
    pub total_players: usize,
    pub min_team_size: u32,
    pub max_team_size: u32,
    pub can_decrement_red: bool,
    pub can_increment_red: bool,
    pub can_decrement_black: bool,
    pub can_increment_black: bool,
    /// The table has at least three players.
    pub can_continue: bool,
}

/// Card shown to the player currently holding the device.
#[derive(Debug, Serialize, ToSchema)]
pub struct RevealCard {
    pub player_id: u32,
    pub is_revealed: bool,
    /// Only present while the card is revealed.
    pub role: Option<RoleDisplay>,
}

/// Pass-and-play role reveal.
#[derive(Debug, Serialize, ToSchema)]
pub struct RolesView {
    /// 1-based position of the reveal.
    pub position: usize,
    pub total_players: usize,
    /// Missing while players have not been dealt yet.
    pub card: Option<RevealCard>,
    pub is_last_player: bool,
    /// Player to hand the device to, once past the first seat.
    pub pass_device_to: Option<u32>,
    pub all_roles_revealed: bool,
}

/// Screen asking to give the device back to the moderator.
#[derive(Debug, Serialize, ToSchema)]
pub struct HandoffView {
    pub title: String,
    pub description: String,
}

/// One row of the lobby board.
#[derive(Debug, Serialize, ToSchema)]
pub struct LobbyPlayer {
    pub id: u32,
    pub role: RoleDisplay,
    pub is_voted: bool,
    pub warnings: u8,
    pub is_eliminated: bool,
    pub can_vote: bool,
    pub can_add_warning: bool,
    pub can_remove_warning: bool,
    pub can_eliminate: bool,
}

/// Discussion timer as displayed in the lobby.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct TimerView {
    pub seconds: u32,
    /// `mm:ss`.
    pub display: String,
    pub is_running: bool,
    pub is_urgent: bool,
    pub remaining_percent: u32,
    pub can_start: bool,
}

/// Game lobby with the voting board and the timer.
#[derive(Debug, Serialize, ToSchema)]
pub struct LobbyView {
    pub active_players: Vec<LobbyPlayer>,
    pub eliminated_players: Vec<LobbyPlayer>,
    /// Nominated players in nomination order.
    pub voting_players: Vec<u32>,
    pub timer: TimerView,
}

impl From<&GameState> for PhaseView {
    fn from(game: &GameState) -> Self {
        match game.phase() {
            GamePhase::Welcome => PhaseView::Welcome(WelcomeView {
                title: text("app_title").to_string(),
                subtitle: text("produced_by").to_string(),
            }),
            GamePhase::Config => PhaseView::Config(ConfigView::from(game)),
            GamePhase::Roles => PhaseView::Roles(RolesView::from(game)),
            GamePhase::Handoff => PhaseView::Handoff(HandoffView {
                title: text("handoff_title").to_string(),
                description: text("handoff_desc").to_string(),
            }),
            GamePhase::Game => PhaseView::Game(LobbyView::from(game)),
        }
    }
}

impl From<&GameState> for ConfigView {
    fn from(game: &GameState) -> Self {
        let red = game.red_player_count();
        let black = game.black_player_count();
        Self {
            red_player_count: red,
            black_player_count: black,
            total_players: game.total_players(),
            min_team_size: MIN_TEAM_SIZE,
            max_team_size: MAX_TEAM_SIZE,
            can_decrement_red: red > MIN_TEAM_SIZE,
            can_increment_red: red < MAX_TEAM_SIZE,
            can_decrement_black: black > MIN_TEAM_SIZE,
            can_increment_black: black < MAX_TEAM_SIZE,
            can_continue: game.total_players() >= MIN_TOTAL_PLAYERS,
        }
    }
}

impl From<&GameState> for RolesView {
    fn from(game: &GameState) -> Self {
        let index = game.current_player_index();
        let card = game.current_player().map(|player| RevealCard {
            player_id: player.id,
            is_revealed: player.has_viewed_role,
            role: player
                .has_viewed_role
                .then(|| RoleDisplay::from(player.role)),
        });
        let pass_device_to = match (index, game.current_player()) {
            (0, _) | (_, None) => None,
            (_, Some(player)) => Some(player.id),
        };
        Self {
            position: index + 1,
            total_players: game.total_players(),
            card,
            is_last_player: game.is_last_player(),
            pass_device_to,
            all_roles_revealed: game.all_roles_revealed(),
        }
    }
}

impl From<&GameState> for LobbyView {
    fn from(game: &GameState) -> Self {
        let (eliminated, active): (Vec<_>, Vec<_>) = game
            .players()
            .iter()
            .map(|player| lobby_player(player, game.is_voted(player.id)))
            .partition(|player| player.is_eliminated);
        Self {
            active_players: active,
            eliminated_players: eliminated,
            voting_players: game.voting_players().collect(),
            timer: TimerView::new(game.timer_seconds(), game.is_timer_running()),
        }
    }
}

fn lobby_player(player: &Player, is_voted: bool) -> LobbyPlayer {
    let active = !player.is_eliminated;
    LobbyPlayer {
        id: player.id,
        role: RoleDisplay::from(player.role),
        is_voted,
        warnings: player.warnings,
        is_eliminated: player.is_eliminated,
        can_vote: active,
        can_add_warning: active && player.warnings < MAX_WARNINGS,
        can_remove_warning: active && player.warnings > 0,
        can_eliminate: active,
    }
}

impl TimerView {
    /// Timer display for `seconds` left.
    pub fn new(seconds: u32, is_running: bool) -> Self {
        Self {
            seconds,
            display: format!("{:02}:{:02}", seconds / 60, seconds % 60),
            is_running,
            is_urgent: seconds > 0 && seconds <= URGENT_SECONDS,
            remaining_percent: seconds.min(TIMER_SECONDS) * 100 / TIMER_SECONDS,
            can_start: !is_running,
        }
    }
}
