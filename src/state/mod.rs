pub mod game;
pub mod roles;
mod sse;
pub mod state_machine;
pub(crate) mod timer;

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::AppConfig,
    dao::{models::GameSessionEntity, session_store::SessionStore},
    services::{recorder::SessionRecorder, sse_events},
    state::{
        game::{GameState, PhaseError},
        state_machine::GamePhase,
        timer::Countdown,
    },
};

pub use self::sse::SseHub;
pub use self::state_machine::Snapshot;

pub type SharedState = Arc<AppState>;
/// Interval between two timer ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Game state and the countdown driving it, guarded together.
struct Table {
    game: GameState,
    countdown: Countdown,
}

/// Central application state: the single game store of the device.
///
/// Every operation takes the table lock, runs to completion and publishes the
/// resulting view before releasing it, so operations and timer ticks are
/// applied one at a time in lock acquisition order. Session records are
/// written once the lock is released.
pub struct AppState {
    config: Arc<AppConfig>,
    table: Mutex<Table>,
    recorder: SessionRecorder,
    events: SseHub,
    tick_period: Duration,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn SessionStore>) -> SharedState {
        Self::with_tick_period(config, store, DEFAULT_TICK_PERIOD)
    }

    /// Same as [`AppState::new`] with a custom timer period.
    pub fn with_tick_period(
        config: Arc<AppConfig>,
        store: Arc<dyn SessionStore>,
        tick_period: Duration,
    ) -> SharedState {
        let game = GameState::new(config.red_players(), config.black_players());
        let events = SseHub::new(config.events_capacity());
        Arc::new(Self {
            config,
            table: Mutex::new(Table {
                game,
                countdown: Countdown::default(),
            }),
            recorder: SessionRecorder::new(store),
            events,
            tick_period,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Session log.
    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    /// Broadcast hub carrying view updates.
    pub fn events(&self) -> &SseHub {
        &self.events
    }

    /// Run `reader` against the current state.
    pub async fn read<R>(&self, reader: impl FnOnce(&GameState) -> R) -> R {
        let table = self.table.lock().await;
        reader(&table.game)
    }

    /// Current phase.
    pub async fn phase(&self) -> GamePhase {
        self.read(GameState::phase).await
    }

    /// Current phase and transition counter.
    pub async fn snapshot(&self) -> Snapshot {
        self.read(GameState::phase_snapshot).await
    }

    /// Start over with a new session, default team sizes and freshly dealt
    /// players. The phase is reset to the welcome screen.
    pub async fn initialize_new_game(&self) {
        let mut table = self.table.lock().await;
        let record = self.start_new_game(&mut table);
        self.publish(&table.game);
        drop(table);
        self.recorder.save_session(record).await;
    }

    /// Start a new session and open the configuration screen as one step.
    pub async fn play(&self) -> Result<(), PhaseError> {
        let mut table = self.table.lock().await;
        let record = self.start_new_game(&mut table);
        // Welcome always leads to the configuration screen.
        table.game.set_game_phase(GamePhase::Config)?;
        info!(session_id = %record.id, "configuration opened");
        self.publish(&table.game);
        drop(table);
        self.recorder.save_session(record).await;
        Ok(())
    }

    /// Set the red team size, clamped to the allowed range.
    pub async fn set_red_player_count(&self, count: i64) {
        self.mutate("set_red_player_count", |game| game.set_red_player_count(count))
            .await;
    }

    /// Set the black team size, clamped to the allowed range.
    pub async fn set_black_player_count(&self, count: i64) {
        self.mutate("set_black_player_count", |game| {
            game.set_black_player_count(count)
        })
        .await;
    }

    /// Deal roles for the configured team sizes and restart the reveal.
    pub async fn initialize_players(&self) {
        let mut table = self.table.lock().await;
        let record = table.game.initialize_players();
        info!(session_id = %record.id, players = record.total_players, "players dealt");
        self.publish(&table.game);
        drop(table);
        self.recorder.save_session(record).await;
    }

    /// Show player `id` their role.
    pub async fn reveal_role(&self, id: u32) {
        self.mutate("reveal_role", |game| game.reveal_role(id)).await;
    }

    /// Hide player `id`'s role again.
    pub async fn close_role(&self, id: u32) {
        self.mutate("close_role", |game| game.close_role(id)).await;
    }

    /// Move the reveal to the next player.
    pub async fn next_player(&self) {
        self.mutate("next_player", GameState::next_player).await;
    }

    /// Add or remove player `id` from the voting set.
    pub async fn toggle_vote(&self, id: u32) {
        self.mutate("toggle_vote", |game| game.toggle_vote(id)).await;
    }

    /// Give player `id` a warning.
    pub async fn add_warning(&self, id: u32) {
        self.mutate("add_warning", |game| game.add_warning(id)).await;
    }

    /// Take a warning back from player `id`.
    pub async fn remove_warning(&self, id: u32) {
        self.mutate("remove_warning", |game| game.remove_warning(id))
            .await;
    }

    /// Eliminate player `id`.
    pub async fn eliminate_player(&self, id: u32) {
        self.mutate("eliminate_player", |game| game.eliminate_player(id))
            .await;
    }

    /// Restart the discussion timer from a full minute.
    pub async fn start_timer(self: &Arc<Self>) {
        let mut table = self.table.lock().await;
        table.game.start_timer();
        table.countdown.arm(Arc::downgrade(self), self.tick_period);
        debug!(seconds = table.game.timer_seconds(), "timer started");
        self.publish(&table.game);
    }

    /// Stop the timer, keeping the remaining seconds.
    pub async fn stop_timer(&self) {
        let mut table = self.table.lock().await;
        table.countdown.cancel();
        table.game.stop_timer();
        debug!(seconds = table.game.timer_seconds(), "timer stopped");
        self.publish(&table.game);
    }

    /// Stop the timer and put a full minute back on it.
    pub async fn reset_timer(&self) {
        let mut table = self.table.lock().await;
        table.countdown.cancel();
        table.game.reset_timer();
        debug!("timer reset");
        self.publish(&table.game);
    }

    /// Move to `target` along a legal edge of the phase graph.
    pub async fn set_game_phase(&self, target: GamePhase) -> Result<GamePhase, PhaseError> {
        let mut table = self.table.lock().await;
        let from = table.game.phase();
        match table.game.set_game_phase(target) {
            Ok(phase) => {
                info!(from = ?from, to = ?phase, "phase changed");
                self.publish(&table.game);
                Ok(phase)
            }
            Err(err) => {
                warn!(from = ?from, to = ?target, error = %err, "phase change refused");
                Err(err)
            }
        }
    }

    /// Close the game from the lobby and record how it ended.
    pub async fn end_game(&self) -> Result<(), PhaseError> {
        let mut table = self.table.lock().await;
        let record = match table.game.end_game() {
            Ok(record) => record,
            Err(err) => {
                warn!(phase = ?table.game.phase(), error = %err, "end of game refused");
                return Err(err);
            }
        };
        table.countdown.cancel();
        info!(session_id = %record.id, "game ended");
        self.publish(&table.game);
        drop(table);
        self.recorder.save_session(record).await;
        Ok(())
    }

    /// Apply one timer tick armed with `epoch`. Returns whether the countdown
    /// task should keep going.
    pub(crate) async fn countdown_tick(&self, epoch: u64) -> bool {
        let mut table = self.table.lock().await;
        if !table.countdown.is_current(epoch) {
            return false;
        }
        let running = table.game.tick();
        if !running {
            info!("timer ran out");
        }
        self.publish(&table.game);
        running
    }

    /// Run a multi-step operation under a single acquisition of the table
    /// lock. `apply` must check everything that can fail before it changes
    /// the game, so an `Err` leaves the state untouched and publishes nothing.
    /// On success the view is published and the returned record, if any, is
    /// logged after the lock is released.
    pub(crate) async fn run<T, E>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut GameState) -> Result<(T, Option<GameSessionEntity>), E>,
    ) -> Result<T, E> {
        let mut table = self.table.lock().await;
        let (outcome, record) = apply(&mut table.game)?;
        debug!(operation, "state updated");
        self.publish(&table.game);
        drop(table);
        if let Some(record) = record {
            self.recorder.save_session(record).await;
        }
        Ok(outcome)
    }

    async fn mutate<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut GameState) -> T,
    ) -> T {
        let mut table = self.table.lock().await;
        let outcome = apply(&mut table.game);
        debug!(operation, "state updated");
        self.publish(&table.game);
        outcome
    }

    fn start_new_game(&self, table: &mut Table) -> GameSessionEntity {
        table.countdown.cancel();
        let record = table
            .game
            .initialize_new_game(self.config.red_players(), self.config.black_players());
        info!(session_id = %record.id, players = record.total_players, "new game created");
        record
    }

    fn publish(&self, game: &GameState) {
        sse_events::broadcast_view(&self.events, game);
    }
}

#[cfg(test)]
mod tests {
    use futures::future::{self, BoxFuture};
    use tokio::{
        sync::Notify,
        time::{sleep, timeout},
    };

    use super::*;
    use crate::dao::{session_store::memory::InMemorySessionStore, storage::StorageResult};

    /// Store whose writes park until released.
    struct GatedStore {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl SessionStore for GatedStore {
        fn save_session(&self, _: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>> {
            let entered = Arc::clone(&self.entered);
            let release = Arc::clone(&self.release);
            Box::pin(async move {
                entered.notify_one();
                release.notified().await;
                Ok(())
            })
        }

        fn list_sessions(&self) -> BoxFuture<'static, StorageResult<Vec<GameSessionEntity>>> {
            Box::pin(future::ready(Ok(Vec::new())))
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(future::ready(Ok(())))
        }
    }

    fn test_state() -> SharedState {
        AppState::new(
            Arc::new(AppConfig::in_memory()),
            Arc::new(InMemorySessionStore::new()),
        )
    }

    async fn seconds(state: &SharedState) -> (u32, bool) {
        state
            .read(|game| (game.timer_seconds(), game.is_timer_running()))
            .await
    }

    async fn into_lobby(state: &SharedState) {
        state.initialize_new_game().await;
        state.set_game_phase(GamePhase::Config).await.unwrap();
        state.initialize_players().await;
        state.set_game_phase(GamePhase::Roles).await.unwrap();
        let total = state.read(GameState::total_players).await;
        for _ in 0..total {
            state.next_player().await;
        }
        state.set_game_phase(GamePhase::Handoff).await.unwrap();
        state.set_game_phase(GamePhase::Game).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn timer_counts_down_once_per_second() {
        let state = test_state();
        state.start_timer().await;

        sleep(Duration::from_millis(10_500)).await;
        assert_eq!(seconds(&state).await, (50, true));

        sleep(Duration::from_secs(60)).await;
        assert_eq!(seconds(&state).await, (0, false));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_timer_never_ticks_again() {
        let state = test_state();
        state.start_timer().await;
        sleep(Duration::from_millis(3_500)).await;
        state.stop_timer().await;
        assert_eq!(seconds(&state).await, (57, false));

        sleep(Duration::from_secs(10)).await;
        assert_eq!(seconds(&state).await, (57, false));
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_the_timer_replaces_the_running_task() {
        let state = test_state();
        state.start_timer().await;
        sleep(Duration::from_millis(5_500)).await;

        state.start_timer().await;
        assert_eq!(seconds(&state).await, (60, true));

        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(seconds(&state).await, (58, true));

        state.reset_timer().await;
        sleep(Duration::from_secs(5)).await;
        assert_eq!(seconds(&state).await, (60, false));
    }

    #[tokio::test(start_paused = true)]
    async fn new_game_cancels_the_timer() {
        let state = test_state();
        state.start_timer().await;
        sleep(Duration::from_millis(2_500)).await;

        state.initialize_new_game().await;
        sleep(Duration::from_secs(5)).await;
        assert_eq!(seconds(&state).await, (60, false));
    }

    #[tokio::test]
    async fn session_is_recorded_when_created_dealt_and_ended() {
        let state = test_state();
        into_lobby(&state).await;
        state.eliminate_player(1).await;
        let session_id = state.read(|game| game.session_id().to_string()).await;

        state.end_game().await.unwrap();

        let sessions = state.recorder().get_sessions().await;
        assert_eq!(sessions.len(), 1);
        let record = &sessions[0];
        assert_eq!(record.id, session_id);
        assert!(record.started_at.is_some());
        assert!(record.ended_at.is_some());
        assert!(record.players.iter().any(|p| p.id == 1 && p.is_eliminated));
        assert_eq!(state.phase().await, GamePhase::Welcome);
    }

    #[tokio::test]
    async fn slow_recording_does_not_block_the_table() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let state = AppState::new(
            Arc::new(AppConfig::in_memory()),
            Arc::new(GatedStore {
                entered: Arc::clone(&entered),
                release: Arc::clone(&release),
            }),
        );

        let creating = tokio::spawn({
            let state = Arc::clone(&state);
            async move { state.initialize_new_game().await }
        });
        entered.notified().await;

        timeout(Duration::from_secs(1), state.set_red_player_count(4))
            .await
            .expect("table lock released before the session write");
        assert_eq!(state.read(GameState::red_player_count).await, 4);

        release.notify_one();
        creating.await.unwrap();
    }

    #[tokio::test]
    async fn end_game_outside_the_lobby_records_nothing() {
        let state = test_state();
        assert!(state.end_game().await.is_err());
        assert!(state.recorder().get_sessions().await.is_empty());
    }

    #[tokio::test]
    async fn refused_phase_change_keeps_the_phase_and_version() {
        let state = test_state();
        let before = state.snapshot().await;
        assert!(state.set_game_phase(GamePhase::Handoff).await.is_err());
        assert_eq!(state.snapshot().await, before);
    }

    #[tokio::test]
    async fn every_operation_publishes_the_view() {
        let state = test_state();
        let mut events = state.events().subscribe();

        state.initialize_new_game().await;
        state.set_game_phase(GamePhase::Config).await.unwrap();
        state.set_red_player_count(4).await;

        for _ in 0..3 {
            let event = events.recv().await.unwrap();
            assert_eq!(event.event.as_deref(), Some("view.changed"));
        }
    }
}
