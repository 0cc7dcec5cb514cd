use thiserror::Error;

/// Top-level screens the moderator can be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Title screen; a new game starts from here.
    Welcome,
    /// Team sizes are being chosen.
    Config,
    /// The device is passed around so each player can see their role.
    Roles,
    /// The device goes back to the moderator.
    Handoff,
    /// Lobby with the voting board, warnings and the timer.
    Game,
}

/// Events that move the state machine between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// "Play" pressed on the welcome screen.
    Play,
    /// Back from the configuration screen.
    BackToWelcome,
    /// Team sizes confirmed; roles are dealt.
    ConfirmPlayers,
    /// Back from the role reveal to the configuration screen.
    BackToConfig,
    /// Every player has seen their role.
    RolesDealt,
    /// The moderator has the device and opens the lobby.
    BeginGame,
    /// Back from the lobby to the role reveal.
    ReviewRoles,
    /// The game is over; return to the welcome screen.
    EndGame,
}

/// Error returned when an event cannot be applied from the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the event was received.
    pub from: GamePhase,
    /// The event that cannot be applied from this phase.
    pub event: GameEvent,
}

/// Snapshot of the current state machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Current phase.
    pub phase: GamePhase,
    /// Number of transitions applied since the machine was created.
    pub version: usize,
}

/// Linear-with-backtrack flow between the five screens.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
    version: usize,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self {
            phase: GamePhase::Welcome,
            version: 0,
        }
    }
}

impl GameStateMachine {
    /// Create a new state machine on the welcome screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Create a snapshot of the current state machine state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            version: self.version,
        }
    }

    /// Check that `event` is legal from the current phase without applying it.
    pub fn plan(&self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        self.compute_transition(event)
    }

    /// Apply `event`, returning the new phase.
    pub fn apply(&mut self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        self.version += 1;
        Ok(next)
    }

    /// Find the event whose edge leads from the current phase to `target`.
    ///
    /// `EndGame` is deliberately not returned here: the lobby can only be left
    /// for the welcome screen through the end-of-game operation.
    pub fn event_towards(&self, target: GamePhase) -> Result<GameEvent, InvalidTransition> {
        let event = match (self.phase, target) {
            (GamePhase::Welcome, GamePhase::Config) => GameEvent::Play,
            (GamePhase::Config, GamePhase::Welcome) => GameEvent::BackToWelcome,
            (GamePhase::Config, GamePhase::Roles) => GameEvent::ConfirmPlayers,
            (GamePhase::Roles, GamePhase::Config) => GameEvent::BackToConfig,
            (GamePhase::Roles, GamePhase::Handoff) => GameEvent::RolesDealt,
            (GamePhase::Handoff, GamePhase::Game) => GameEvent::BeginGame,
            (GamePhase::Game, GamePhase::Roles) => GameEvent::ReviewRoles,
            (from, GamePhase::Welcome) => {
                return Err(InvalidTransition {
                    from,
                    event: GameEvent::EndGame,
                });
            }
            (from, GamePhase::Config) => {
                return Err(InvalidTransition {
                    from,
                    event: GameEvent::Play,
                });
            }
            (from, GamePhase::Roles) => {
                return Err(InvalidTransition {
                    from,
                    event: GameEvent::ConfirmPlayers,
                });
            }
            (from, GamePhase::Handoff) => {
                return Err(InvalidTransition {
                    from,
                    event: GameEvent::RolesDealt,
                });
            }
            (from, GamePhase::Game) => {
                return Err(InvalidTransition {
                    from,
                    event: GameEvent::BeginGame,
                });
            }
        };
        Ok(event)
    }

    /// Compute a transition from an event if the transition is valid.
    fn compute_transition(&self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (GamePhase::Welcome, GameEvent::Play) => GamePhase::Config,
            (GamePhase::Config, GameEvent::BackToWelcome) => GamePhase::Welcome,
            (GamePhase::Config, GameEvent::ConfirmPlayers) => GamePhase::Roles,
            (GamePhase::Roles, GameEvent::BackToConfig) => GamePhase::Config,
            (GamePhase::Roles, GameEvent::RolesDealt) => GamePhase::Handoff,
            (GamePhase::Handoff, GameEvent::BeginGame) => GamePhase::Game,
            (GamePhase::Game, GameEvent::ReviewRoles) => GamePhase::Roles,
            (GamePhase::Game, GameEvent::EndGame) => GamePhase::Welcome,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(sm: &mut GameStateMachine, event: GameEvent) -> GamePhase {
        sm.apply(event).unwrap()
    }

    #[test]
    fn initial_state_is_welcome() {
        let sm = GameStateMachine::new();
        assert_eq!(sm.phase(), GamePhase::Welcome);
        assert_eq!(sm.snapshot().version, 0);
    }

    #[test]
    fn full_happy_path_through_game() {
        let mut sm = GameStateMachine::new();

        assert_eq!(apply(&mut sm, GameEvent::Play), GamePhase::Config);
        assert_eq!(apply(&mut sm, GameEvent::ConfirmPlayers), GamePhase::Roles);
        assert_eq!(apply(&mut sm, GameEvent::RolesDealt), GamePhase::Handoff);
        assert_eq!(apply(&mut sm, GameEvent::BeginGame), GamePhase::Game);
        assert_eq!(apply(&mut sm, GameEvent::EndGame), GamePhase::Welcome);
        assert_eq!(sm.snapshot().version, 5);
    }

    #[test]
    fn back_edges_are_allowed() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::Play);
        assert_eq!(apply(&mut sm, GameEvent::BackToWelcome), GamePhase::Welcome);

        apply(&mut sm, GameEvent::Play);
        apply(&mut sm, GameEvent::ConfirmPlayers);
        assert_eq!(apply(&mut sm, GameEvent::BackToConfig), GamePhase::Config);

        apply(&mut sm, GameEvent::ConfirmPlayers);
        apply(&mut sm, GameEvent::RolesDealt);
        apply(&mut sm, GameEvent::BeginGame);
        assert_eq!(apply(&mut sm, GameEvent::ReviewRoles), GamePhase::Roles);
    }

    #[test]
    fn invalid_transition_returns_error_and_keeps_phase() {
        let mut sm = GameStateMachine::new();
        let err = sm.apply(GameEvent::BeginGame).unwrap_err();
        assert_eq!(err.from, GamePhase::Welcome);
        assert_eq!(err.event, GameEvent::BeginGame);
        assert_eq!(sm.phase(), GamePhase::Welcome);
        assert_eq!(sm.snapshot().version, 0);
    }

    #[test]
    fn end_game_only_from_lobby() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::Play);
        assert!(sm.plan(GameEvent::EndGame).is_err());
    }

    #[test]
    fn event_towards_maps_legal_targets() {
        let mut sm = GameStateMachine::new();
        assert_eq!(sm.event_towards(GamePhase::Config), Ok(GameEvent::Play));
        apply(&mut sm, GameEvent::Play);
        assert_eq!(
            sm.event_towards(GamePhase::Welcome),
            Ok(GameEvent::BackToWelcome)
        );
        assert_eq!(
            sm.event_towards(GamePhase::Roles),
            Ok(GameEvent::ConfirmPlayers)
        );
        assert!(sm.event_towards(GamePhase::Game).is_err());
        assert!(sm.event_towards(GamePhase::Config).is_err());
    }

    #[test]
    fn lobby_cannot_jump_to_welcome_without_ending() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::Play);
        apply(&mut sm, GameEvent::ConfirmPlayers);
        apply(&mut sm, GameEvent::RolesDealt);
        apply(&mut sm, GameEvent::BeginGame);

        let err = sm.event_towards(GamePhase::Welcome).unwrap_err();
        assert_eq!(err.event, GameEvent::EndGame);
    }
}
