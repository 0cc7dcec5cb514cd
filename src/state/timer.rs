//! Countdown task driving the discussion timer.

use std::{sync::Weak, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::debug;

use crate::state::AppState;

/// Handle on the background task ticking the timer.
///
/// Every armed task captures the epoch it was armed with. Cancelling bumps the
/// epoch and aborts the task, and ticks carrying a stale epoch are ignored, so
/// a tick already waiting on the state lock cannot land after a stop.
#[derive(Debug, Default)]
pub(crate) struct Countdown {
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Stop the pending task, if any.
    pub(crate) fn cancel(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Replace any pending task with a fresh one ticking every `period`.
    pub(crate) fn arm(&mut self, state: Weak<AppState>, period: Duration) {
        self.cancel();
        let epoch = self.epoch;
        self.task = Some(tokio::spawn(run(state, epoch, period)));
    }

    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(state: Weak<AppState>, epoch: u64, period: Duration) {
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;
        let Some(state) = state.upgrade() else {
            break;
        };
        if !state.countdown_tick(epoch).await {
            break;
        }
    }

    debug!(epoch, "countdown task finished");
}
