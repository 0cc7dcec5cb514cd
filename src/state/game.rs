use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{GameSessionEntity, SessionPlayerEntity},
    state::{
        roles,
        state_machine::{GameEvent, GamePhase, GameStateMachine, InvalidTransition, Snapshot},
    },
};

/// Smallest allowed team size.
pub const MIN_TEAM_SIZE: u32 = 1;
/// Largest allowed team size.
pub const MAX_TEAM_SIZE: u32 = 20;
/// Warnings a player can collect before the counter saturates.
pub const MAX_WARNINGS: u8 = 3;
/// Length of one discussion round, in seconds.
pub const TIMER_SECONDS: u32 = 60;
/// Smallest table the configuration screen lets through.
pub const MIN_TOTAL_PLAYERS: usize = 3;

/// Role dealt to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary member of the red (town) team.
    Red,
    /// Leader of the red team.
    Sheriff,
    /// Ordinary member of the black (mafia) team.
    Black,
    /// Leader of the black team.
    Don,
}

impl Role {
    /// Whether the role belongs to the red team.
    pub fn is_red(self) -> bool {
        matches!(self, Role::Red | Role::Sheriff)
    }
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Seat number, starting at 1.
    pub id: u32,
    /// Role dealt for this game.
    pub role: Role,
    /// Warnings given by the moderator, `0..=MAX_WARNINGS`.
    pub warnings: u8,
    /// Whether the role card is currently shown during the reveal.
    pub has_viewed_role: bool,
    /// Eliminated players keep their seat but can no longer be acted on.
    pub is_eliminated: bool,
}

impl Player {
    /// Fresh player for seat `id`.
    pub fn new(id: u32, role: Role) -> Self {
        Self {
            id,
            role,
            warnings: 0,
            has_viewed_role: false,
            is_eliminated: false,
        }
    }
}

/// Errors raised when a phase change is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    /// No edge leads from the current phase to the requested one.
    #[error(transparent)]
    Invalid(#[from] InvalidTransition),
    /// Handoff was requested before the reveal reached the last player.
    #[error("role reveal is at player {current} of {total}")]
    RevealPending {
        /// 1-based position of the reveal.
        current: usize,
        /// Number of players to reveal.
        total: usize,
    },
}

/// Whole state of one moderated game.
#[derive(Debug, Clone)]
pub struct GameState {
    session_id: String,
    created_at: i64,
    started_at: Option<i64>,
    red_player_count: u32,
    black_player_count: u32,
    players: Vec<Player>,
    current_player_index: usize,
    machine: GameStateMachine,
    all_roles_revealed: bool,
    timer_seconds: u32,
    timer_running: bool,
    voting_players: IndexSet<u32>,
}

impl GameState {
    /// Initial state on the welcome screen, before any game was dealt.
    pub fn new(red: u32, black: u32) -> Self {
        Self {
            session_id: generate_session_id(),
            created_at: now_millis(),
            started_at: None,
            red_player_count: clamp_team_size(i64::from(red)),
            black_player_count: clamp_team_size(i64::from(black)),
            players: Vec::new(),
            current_player_index: 0,
            machine: GameStateMachine::new(),
            all_roles_revealed: false,
            timer_seconds: TIMER_SECONDS,
            timer_running: false,
            voting_players: IndexSet::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// Identifier of the current session.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Configured size of the red team.
    pub fn red_player_count(&self) -> u32 {
        self.red_player_count
    }

    /// Configured size of the black team.
    pub fn black_player_count(&self) -> u32 {
        self.black_player_count
    }

    /// Sum of both team sizes.
    pub fn total_players(&self) -> usize {
        (self.red_player_count + self.black_player_count) as usize
    }

    /// Players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look a player up by seat number.
    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Index of the player whose turn it is during the reveal.
    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    /// Player whose turn it is during the reveal, if the index points at one.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Whether the reveal is on its last player.
    pub fn is_last_player(&self) -> bool {
        self.current_player_index + 1 == self.total_players()
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    /// Phase and transition counter.
    pub fn phase_snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    /// Whether every player went through the reveal.
    pub fn all_roles_revealed(&self) -> bool {
        self.all_roles_revealed
    }

    /// Seconds left on the discussion timer.
    pub fn timer_seconds(&self) -> u32 {
        self.timer_seconds
    }

    /// Whether the discussion timer is counting down.
    pub fn is_timer_running(&self) -> bool {
        self.timer_running
    }

    /// Players nominated for elimination, in nomination order.
    pub fn voting_players(&self) -> impl Iterator<Item = u32> + '_ {
        self.voting_players.iter().copied()
    }

    /// Whether `id` is in the voting set.
    pub fn is_voted(&self, id: u32) -> bool {
        self.voting_players.contains(&id)
    }

    /// Session record for the current state.
    pub fn session_record(&self, ended_at: Option<i64>) -> GameSessionEntity {
        GameSessionEntity {
            id: self.session_id.clone(),
            created_at: self.created_at,
            started_at: self.started_at,
            ended_at,
            red_player_count: self.red_player_count,
            black_player_count: self.black_player_count,
            total_players: self.total_players() as u32,
            players: self
                .players
                .iter()
                .map(|player| SessionPlayerEntity {
                    id: player.id,
                    role: player.role,
                    is_eliminated: player.is_eliminated,
                })
                .collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------------

    /// Replace the whole state with a fresh game dealt with the default team
    /// sizes. Returns the record to log as created.
    pub(crate) fn initialize_new_game(&mut self, red: u32, black: u32) -> GameSessionEntity {
        let mut fresh = GameState::new(red, black);
        fresh.players = roles::create_players(fresh.red_player_count, fresh.black_player_count);
        *self = fresh;
        self.session_record(None)
    }

    /// Deal players for the configured team sizes and restart the reveal.
    /// Returns the record to log as started.
    pub(crate) fn initialize_players(&mut self) -> GameSessionEntity {
        self.players = roles::create_players(self.red_player_count, self.black_player_count);
        self.current_player_index = 0;
        self.all_roles_revealed = false;
        self.voting_players.clear();
        self.started_at = Some(now_millis());
        self.session_record(None)
    }

    /// Close the game and return to the welcome screen. Returns the record to
    /// log as ended.
    pub(crate) fn end_game(&mut self) -> Result<GameSessionEntity, PhaseError> {
        self.machine.plan(GameEvent::EndGame)?;
        let record = self.session_record(Some(now_millis()));
        self.timer_running = false;
        self.machine.apply(GameEvent::EndGame)?;
        Ok(record)
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    pub(crate) fn set_red_player_count(&mut self, count: i64) {
        self.red_player_count = clamp_team_size(count);
    }

    pub(crate) fn set_black_player_count(&mut self, count: i64) {
        self.black_player_count = clamp_team_size(count);
    }

    // -----------------------------------------------------------------------
    // Role reveal
    // -----------------------------------------------------------------------

    pub(crate) fn reveal_role(&mut self, id: u32) {
        if let Some(player) = self.player_mut(id) {
            player.has_viewed_role = true;
        }
    }

    pub(crate) fn close_role(&mut self, id: u32) {
        if let Some(player) = self.player_mut(id) {
            player.has_viewed_role = false;
        }
    }

    pub(crate) fn next_player(&mut self) {
        if self.current_player_index + 1 < self.total_players() {
            self.current_player_index += 1;
        } else {
            self.all_roles_revealed = true;
        }
    }

    // -----------------------------------------------------------------------
    // Lobby
    // -----------------------------------------------------------------------

    pub(crate) fn toggle_vote(&mut self, id: u32) {
        if self.active_player_mut(id).is_none() {
            return;
        }
        if !self.voting_players.shift_remove(&id) {
            self.voting_players.insert(id);
        }
    }

    pub(crate) fn add_warning(&mut self, id: u32) {
        if let Some(player) = self.active_player_mut(id) {
            if player.warnings < MAX_WARNINGS {
                player.warnings += 1;
            }
        }
    }

    pub(crate) fn remove_warning(&mut self, id: u32) {
        if let Some(player) = self.active_player_mut(id) {
            player.warnings = player.warnings.saturating_sub(1);
        }
    }

    pub(crate) fn eliminate_player(&mut self, id: u32) {
        let Some(player) = self.player_mut(id) else {
            return;
        };
        player.is_eliminated = true;
        player.warnings = 0;
        self.voting_players.shift_remove(&id);
    }

    // -----------------------------------------------------------------------
    // Timer
    // -----------------------------------------------------------------------

    pub(crate) fn start_timer(&mut self) {
        self.timer_seconds = TIMER_SECONDS;
        self.timer_running = true;
    }

    pub(crate) fn stop_timer(&mut self) {
        self.timer_running = false;
    }

    pub(crate) fn reset_timer(&mut self) {
        self.timer_seconds = TIMER_SECONDS;
        self.timer_running = false;
    }

    /// One countdown step. Returns whether the timer keeps running.
    pub(crate) fn tick(&mut self) -> bool {
        if !self.timer_running {
            return false;
        }
        self.timer_seconds = self.timer_seconds.saturating_sub(1);
        if self.timer_seconds == 0 {
            self.timer_running = false;
        }
        self.timer_running
    }

    // -----------------------------------------------------------------------
    // Phases
    // -----------------------------------------------------------------------

    /// Move to `target` along a legal edge.
    pub(crate) fn set_game_phase(&mut self, target: GamePhase) -> Result<GamePhase, PhaseError> {
        let event = self.machine.event_towards(target)?;
        if event == GameEvent::RolesDealt && !self.reveal_reached_end() {
            return Err(PhaseError::RevealPending {
                current: self.current_player_index + 1,
                total: self.total_players(),
            });
        }
        Ok(self.machine.apply(event)?)
    }

    fn reveal_reached_end(&self) -> bool {
        self.all_roles_revealed || self.is_last_player()
    }

    fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    fn active_player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.player_mut(id).filter(|player| !player.is_eliminated)
    }
}

/// Clamp a requested team size into `MIN_TEAM_SIZE..=MAX_TEAM_SIZE`.
pub fn clamp_team_size(count: i64) -> u32 {
    count.clamp(i64::from(MIN_TEAM_SIZE), i64::from(MAX_TEAM_SIZE)) as u32
}

/// Current wall-clock time in unix milliseconds.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

fn generate_session_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("game_{}_{}", now_millis(), &suffix[..9])
}
