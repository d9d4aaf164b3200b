use std::time::{Duration, Instant};

use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

use crate::{view::format_elapsed, ControllerEvent};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Free-running elapsed-time clock. Publishes a `Clock` event every second,
/// measured from the local session start. The task is aborted on drop.
pub(crate) struct ElapsedTicker {
    task: JoinHandle<()>,
}

impl ElapsedTicker {
    pub(crate) fn spawn(started: Instant, events: broadcast::Sender<ControllerEvent>) -> Self {
        let task = tokio::spawn(async move {
            let mut ticks = interval(TICK_INTERVAL);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticks.tick().await;
                let _ = events.send(ControllerEvent::Clock(format_elapsed(started.elapsed())));
            }
        });
        Self { task }
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
