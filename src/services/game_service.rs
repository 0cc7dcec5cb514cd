//! Store operations exposed over HTTP. Each call applies one operation and
//! answers with the resulting state.

use crate::{
    dto::{game::GameStateSnapshot, phase::VisibleGamePhase},
    error::ServiceError,
    state::SharedState,
};

/// Identifies a per-player operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Show the role card.
    Reveal,
    /// Hide the role card.
    Close,
    /// Toggle membership of the voting set.
    Vote,
    /// Add a warning.
    AddWarning,
    /// Remove a warning.
    RemoveWarning,
    /// Eliminate the player.
    Eliminate,
}

/// Timer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Restart from a full minute.
    Start,
    /// Stop and keep the remaining seconds.
    Stop,
    /// Stop and refill.
    Reset,
}

/// Current state of the store.
pub async fn snapshot(state: &SharedState) -> GameStateSnapshot {
    state.read(|game| GameStateSnapshot::from(game)).await
}

/// Start a new session with the default team sizes.
pub async fn new_game(state: &SharedState) -> GameStateSnapshot {
    state.initialize_new_game().await;
    snapshot(state).await
}

/// Set the red team size.
pub async fn set_red_count(state: &SharedState, count: i64) -> GameStateSnapshot {
    state.set_red_player_count(count).await;
    snapshot(state).await
}

/// Set the black team size.
pub async fn set_black_count(state: &SharedState, count: i64) -> GameStateSnapshot {
    state.set_black_player_count(count).await;
    snapshot(state).await
}

/// Deal roles for the configured team sizes.
pub async fn deal(state: &SharedState) -> GameStateSnapshot {
    state.initialize_players().await;
    snapshot(state).await
}

/// Apply `action` to player `id`. Unknown players are left alone.
pub async fn player_action(
    state: &SharedState,
    id: u32,
    action: PlayerAction,
) -> GameStateSnapshot {
    match action {
        PlayerAction::Reveal => state.reveal_role(id).await,
        PlayerAction::Close => state.close_role(id).await,
        PlayerAction::Vote => state.toggle_vote(id).await,
        PlayerAction::AddWarning => state.add_warning(id).await,
        PlayerAction::RemoveWarning => state.remove_warning(id).await,
        PlayerAction::Eliminate => state.eliminate_player(id).await,
    }
    snapshot(state).await
}

/// Advance the role reveal by one seat.
pub async fn next_player(state: &SharedState) -> GameStateSnapshot {
    state.next_player().await;
    snapshot(state).await
}

/// Drive the discussion timer.
pub async fn timer(state: &SharedState, action: TimerAction) -> GameStateSnapshot {
    match action {
        TimerAction::Start => state.start_timer().await,
        TimerAction::Stop => state.stop_timer().await,
        TimerAction::Reset => state.reset_timer().await,
    }
    snapshot(state).await
}

/// Move to another screen along a legal edge.
pub async fn set_phase(
    state: &SharedState,
    phase: VisibleGamePhase,
) -> Result<GameStateSnapshot, ServiceError> {
    state.set_game_phase(phase.into()).await?;
    Ok(snapshot(state).await)
}

/// End the game from the lobby.
pub async fn end_game(state: &SharedState) -> Result<GameStateSnapshot, ServiceError> {
    state.end_game().await?;
    Ok(snapshot(state).await)
}
