//! Tag watcher: scheduler and status holder.
//!
//! # Data Flow
//! ```text
//! Watcher::start
//!     → spawn loop task
//!     → every tick (first one immediately):
//!           Prober::probe_outcome(target) → tagged + last error
//!           → StatusCell::publish (snapshot swap)
//!     → StatusReader handles read the latest snapshot
//! ```
//!
//! # Design Decisions
//! - Single writer: one loop task per watcher, one probe in flight at most
//! - A slow probe delays the next tick instead of queueing a burst
//! - Cancellation wins over a ready tick and abandons an in-flight probe;
//!   nothing is published after stop
//! - Dropping the watcher stops the loop

pub mod status;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::lifecycle::shutdown::{self, Shutdown};
use crate::observability::metrics;
use crate::probe::Prober;

/// Shortest period the loop will tick at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub use self::status::{StatusCell, StatusReader, StatusSnapshot, TagState};

/// Periodically probes one target and publishes whether it is tagged.
#[derive(Debug)]
pub struct Watcher {
    target: Arc<str>,
    interval: Duration,
    cell: Arc<StatusCell>,
    stop: Shutdown,
    task: JoinHandle<()>,
}

impl Watcher {
    /// Start watching `target`, probing every `interval`.
    ///
    /// The first probe is issued right away. An interval shorter than
    /// [`MIN_INTERVAL`] is raised to it. Must be called within a Tokio
    /// runtime.
    pub fn start<P: Prober>(target: impl Into<Arc<str>>, interval: Duration, prober: P) -> Self {
        Self::spawn(target.into(), interval, prober, None)
    }

    /// Like [`Watcher::start`], but also stops when `shutdown` fires.
    pub fn start_with_shutdown<P: Prober>(
        target: impl Into<Arc<str>>,
        interval: Duration,
        prober: P,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self::spawn(target.into(), interval, prober, Some(shutdown))
    }

    fn spawn<P: Prober>(
        target: Arc<str>,
        interval: Duration,
        prober: P,
        external: Option<broadcast::Receiver<()>>,
    ) -> Self {
        let interval = if interval < MIN_INTERVAL {
            tracing::warn!(
                url = %target,
                interval = ?interval,
                min = ?MIN_INTERVAL,
                "Poll interval too short, clamping"
            );
            MIN_INTERVAL
        } else {
            interval
        };

        let cell = Arc::new(StatusCell::new());
        let stop = Shutdown::new();

        let task = tokio::spawn(run_loop(
            target.clone(),
            interval,
            prober,
            cell.clone(),
            stop.subscribe(),
            external,
        ));

        Self {
            target,
            interval,
            cell,
            stop,
            task,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Effective poll interval, after clamping.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Latest published result. `Unknown` reads as `false`.
    pub fn is_tagged(&self) -> bool {
        self.cell.load().is_tagged()
    }

    /// Latest published snapshot.
    pub fn status(&self) -> Arc<StatusSnapshot> {
        self.cell.load()
    }

    /// Read-only handle for consumers such as the status server.
    pub fn reader(&self) -> StatusReader {
        StatusReader::new(self.cell.clone())
    }

    /// Whether the loop task is still alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the loop and wait for the task to exit.
    pub async fn stop(self) {
        let Watcher { target, stop, task, .. } = self;
        stop.trigger();

        if let Err(e) = task.await {
            tracing::error!(url = %target, error = %e, "Watcher task failed");
        }
    }
}

async fn run_loop<P: Prober>(
    target: Arc<str>,
    interval: Duration,
    prober: P,
    cell: Arc<StatusCell>,
    mut stop: broadcast::Receiver<()>,
    mut external: Option<broadcast::Receiver<()>>,
) {
    tracing::info!(url = %target, interval = ?interval, "Watcher starting");

    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown::recv(&mut stop) => break,
            _ = recv_external(&mut external) => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = shutdown::recv(&mut stop) => break,
            _ = recv_external(&mut external) => break,
            outcome = prober.probe_outcome(&target) => outcome,
        };

        let tagged = outcome.tagged;
        tracing::debug!(url = %target, tagged, error = ?outcome.error, "Probe complete");
        if let Some(previous) = cell.publish(outcome) {
            tracing::info!(
                url = %target,
                from = ?previous,
                to = ?TagState::from(tagged),
                "Tag state changed"
            );
        }
        metrics::record_tagged(tagged);
    }

    tracing::info!(url = %target, "Watcher stopped");
}

async fn recv_external(external: &mut Option<broadcast::Receiver<()>>) {
    match external {
        Some(rx) => shutdown::recv(rx).await,
        None => std::future::pending().await,
    }
}
