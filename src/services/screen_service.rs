//! Screen-level actions: the composite steps behind the buttons of the
//! welcome, configuration and role reveal screens.

use tracing::{debug, warn};

use crate::{
    dto::{texts::TextsResponse, view::PhaseView},
    error::ServiceError,
    state::{
        SharedState,
        game::{GameState, MIN_TOTAL_PLAYERS},
        state_machine::GamePhase,
    },
};

/// View of the screen the device is on.
pub async fn current_view(state: &SharedState) -> PhaseView {
    state.read(|game| PhaseView::from(game)).await
}

/// Interface strings and role labels.
pub fn texts() -> TextsResponse {
    TextsResponse::build()
}

/// "Play" on the welcome screen: start a new session and open the
/// configuration screen.
pub async fn play(state: &SharedState) -> Result<PhaseView, ServiceError> {
    state.play().await?;
    Ok(current_view(state).await)
}

/// "Continue" on the configuration screen: deal roles and start the reveal.
pub async fn confirm_players(state: &SharedState) -> Result<PhaseView, ServiceError> {
    state
        .run("confirm_players", |game| {
            let total = game.total_players();
            if total < MIN_TOTAL_PLAYERS {
                warn!(total, "refusing to deal for a table this small");
                return Err(ServiceError::InvalidInput(format!(
                    "at least {MIN_TOTAL_PLAYERS} players are needed, got {total}"
                )));
            }
            let phase = game.phase();
            if phase != GamePhase::Config {
                return Err(ServiceError::InvalidState(format!(
                    "players can only be confirmed from the configuration screen, not {phase:?}"
                )));
            }

            game.set_game_phase(GamePhase::Roles)?;
            Ok(((), Some(game.initialize_players())))
        })
        .await?;
    Ok(current_view(state).await)
}

/// "Next" on the role reveal: hide the current card, then move to the next
/// seat or, after the last one, to the handoff screen.
pub async fn advance_reveal(state: &SharedState) -> Result<PhaseView, ServiceError> {
    state
        .run("advance_reveal", |game: &mut GameState| {
            let phase = game.phase();
            if phase != GamePhase::Roles {
                return Err(ServiceError::InvalidState(format!(
                    "the reveal only advances on the roles screen, not {phase:?}"
                )));
            }

            let is_last = game.is_last_player();
            if is_last {
                game.set_game_phase(GamePhase::Handoff)?;
                debug!("reveal finished; handing the device back");
            }
            if let Some(id) = game.current_player().map(|player| player.id) {
                game.close_role(id);
            }
            if !is_last {
                game.next_player();
            }
            Ok(((), None))
        })
        .await?;
    Ok(current_view(state).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::session_store::memory::InMemorySessionStore,
        state::{AppState, game::Role},
    };

    fn test_state() -> SharedState {
        AppState::new(
            Arc::new(AppConfig::in_memory()),
            Arc::new(InMemorySessionStore::new()),
        )
    }

    #[tokio::test]
    async fn scenario_small_table_walkthrough() {
        let state = test_state();
        play(&state).await.unwrap();
        state.set_red_player_count(2).await;
        state.set_black_player_count(1).await;

        let view = confirm_players(&state).await.unwrap();
        assert!(matches!(view, PhaseView::Roles(_)));

        let roles: Vec<Role> = state
            .read(|game| game.players().iter().map(|p| p.role).collect())
            .await;
        assert_eq!(roles.len(), 3);
        assert_eq!(roles.iter().filter(|r| **r == Role::Don).count(), 1);
        assert_eq!(roles.iter().filter(|r| **r == Role::Sheriff).count(), 1);
        assert_eq!(roles.iter().filter(|r| **r == Role::Red).count(), 1);

        state.reveal_role(1).await;
        advance_reveal(&state).await.unwrap();
        assert!(!state.read(|game| game.player(1).unwrap().has_viewed_role).await);

        advance_reveal(&state).await.unwrap();
        let view = advance_reveal(&state).await.unwrap();
        assert!(matches!(view, PhaseView::Handoff(_)));
    }

    #[tokio::test]
    async fn tiny_tables_are_refused() {
        let state = test_state();
        play(&state).await.unwrap();
        state.set_red_player_count(1).await;
        state.set_black_player_count(1).await;

        let err = confirm_players(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(state.phase().await, GamePhase::Config);
    }

    #[tokio::test]
    async fn confirming_outside_the_configuration_screen_is_refused() {
        let state = test_state();
        let err = confirm_players(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert!(state.recorder().get_sessions().await.is_empty());
    }

    async fn concurrently<F, Fut>(
        state: &SharedState,
        action: F,
    ) -> [Result<PhaseView, ServiceError>; 2]
    where
        F: Fn(SharedState) -> Fut,
        Fut: Future<Output = Result<PhaseView, ServiceError>> + Send + 'static,
    {
        let first = tokio::spawn(action(state.clone()));
        let second = tokio::spawn(action(state.clone()));
        [first.await.unwrap(), second.await.unwrap()]
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn double_continue_deals_exactly_once() {
        for _ in 0..100 {
            let state = test_state();
            play(&state).await.unwrap();
            let mut events = state.events().subscribe();

            let outcomes = concurrently(&state, |state| async move {
                confirm_players(&state).await
            })
            .await;

            assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
            assert!(outcomes
                .iter()
                .any(|outcome| matches!(outcome, Err(ServiceError::InvalidState(_)))));

            let mut published = 0;
            while events.try_recv().is_ok() {
                published += 1;
            }
            assert_eq!(published, 1, "the refused continue must not touch the table");
            assert_eq!(state.phase().await, GamePhase::Roles);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_next_on_the_last_but_one_seat_reaches_handoff() {
        for _ in 0..100 {
            let state = test_state();
            play(&state).await.unwrap();
            state.set_red_player_count(2).await;
            state.set_black_player_count(1).await;
            confirm_players(&state).await.unwrap();
            advance_reveal(&state).await.unwrap();

            let outcomes = concurrently(&state, |state| async move {
                advance_reveal(&state).await
            })
            .await;

            assert!(outcomes.iter().all(Result::is_ok));
            assert_eq!(state.phase().await, GamePhase::Handoff);
            assert_eq!(state.read(GameState::current_player_index).await, 2);
        }
    }

    #[tokio::test]
    async fn advancing_outside_the_reveal_changes_nothing() {
        let state = test_state();
        play(&state).await.unwrap();
        let before = state.snapshot().await;

        let err = advance_reveal(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert_eq!(state.snapshot().await, before);
    }

    #[tokio::test]
    async fn play_records_a_fresh_session() {
        let state = test_state();
        play(&state).await.unwrap();
        let first = state.read(|game| game.session_id().to_string()).await;
        state.set_game_phase(GamePhase::Welcome).await.unwrap();
        play(&state).await.unwrap();

        let sessions = state.recorder().get_sessions().await;
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1].id, first);
        assert_eq!(state.phase().await, GamePhase::Config);
    }
}
