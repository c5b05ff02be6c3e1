// Host poller: owns the poll timer and the host map, publishes DashboardSnapshot.
// The initial fetch and on-demand refreshes set `loading`; interval polls are silent.
// Cycles may overlap (refresh during an interval poll); whichever settles last publishes last.

use crate::collector::CollectorClient;
use crate::config::MAX_POLL_INTERVAL_MS;
use crate::error::FetchError;
use crate::host_store::{HostStore, MergeOutcome};
use crate::models::{
    CanonicalHost, DashboardSnapshot, RawTelemetryRecord, StatusCounts, distinct_groups,
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{oneshot, watch};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::Instrument;

/// Whether a cycle toggles the loading flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Initial fetch and on-demand refresh.
    Visible,
    /// Background interval poll.
    Silent,
}

pub struct PollerConfig {
    pub poll_interval_ms: u64,
}

impl PollerConfig {
    /// Poll period, clamped to `1..=MAX_POLL_INTERVAL_MS`.
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.clamp(1, MAX_POLL_INTERVAL_MS))
    }
}

/// Everything behind the poller's lock. Mutated only by settling cycles.
#[derive(Debug, Default)]
pub struct PollState {
    store: HostStore,
    pending_visible: usize,
    error: Option<String>,
    is_connected: bool,
    last_updated: Option<DateTime<Utc>>,
    /// Kept until the next successful merge.
    last_merge: MergeOutcome,
    merge_generation: u64,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_visible(&mut self) {
        self.pending_visible += 1;
    }

    pub fn end_visible(&mut self) {
        self.pending_visible = self.pending_visible.saturating_sub(1);
    }

    pub fn apply_success(
        &mut self,
        records: Vec<RawTelemetryRecord>,
        now: DateTime<Utc>,
    ) -> &MergeOutcome {
        let hosts = records.into_iter().map(CanonicalHost::from_raw).collect();
        self.last_merge = self.store.merge(hosts);
        self.merge_generation += 1;
        self.is_connected = true;
        self.last_updated = Some(now);
        self.error = None;
        &self.last_merge
    }

    /// Keep the last good hosts; only report an error when there is nothing to show.
    pub fn apply_failure(&mut self, error: &FetchError) {
        self.is_connected = false;
        if self.store.is_empty() {
            self.error = Some(format!("Failed to fetch hosts: {}", error));
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let hosts = self.store.hosts();
        DashboardSnapshot {
            counts: StatusCounts::tally(&hosts),
            groups: distinct_groups(&hosts),
            hosts,
            loading: self.pending_visible > 0,
            error: self.error.clone(),
            is_connected: self.is_connected,
            last_updated: self.last_updated,
            changed: self.last_merge.changed.clone(),
            removed: self.last_merge.removed.clone(),
            merge_generation: self.merge_generation,
        }
    }
}

struct Shared {
    client: CollectorClient,
    state: Mutex<PollState>,
    tx: watch::Sender<DashboardSnapshot>,
    torn_down: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PollState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Snapshot and swap in one step while the state lock is held.
    fn publish(&self, state: &PollState) -> DashboardSnapshot {
        let snapshot = state.snapshot();
        self.tx.send_replace(snapshot.clone());
        snapshot
    }

    fn begin(&self, mode: FetchMode) {
        if mode == FetchMode::Silent || self.is_torn_down() {
            return;
        }
        let mut state = self.lock();
        state.begin_visible();
        self.publish(&state);
    }

    async fn run_cycle(&self, mode: FetchMode) -> DashboardSnapshot {
        let result = self.client.fetch_records().await;

        let mut state = self.lock();
        if mode == FetchMode::Visible {
            state.end_visible();
        }
        if self.is_torn_down() {
            tracing::debug!(
                operation = "poll_cycle",
                "poller torn down; discarding fetch result"
            );
            return state.snapshot();
        }
        match result {
            Ok(records) => {
                let received = records.len();
                let outcome = state.apply_success(records, Utc::now());
                tracing::debug!(
                    operation = "poll_cycle",
                    ?mode,
                    received,
                    changed = outcome.changed.len(),
                    removed = outcome.removed.len(),
                    "hosts merged"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = e.kind(),
                    operation = "poll_cycle",
                    ?mode,
                    "telemetry fetch failed"
                );
                state.apply_failure(&e);
            }
        }
        self.publish(&state)
    }
}

struct PollTask {
    shutdown_tx: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

/// Long-lived owner of the poll timer and host state.
///
/// Created with [`HostPoller::start`], stopped with [`HostPoller::shutdown`] or by
/// dropping it. Cycles that settle after teardown are discarded.
pub struct HostPoller {
    shared: Arc<Shared>,
    task: Mutex<Option<PollTask>>,
}

impl HostPoller {
    /// Kick off an immediate visible fetch, then poll silently every `poll_interval_ms`.
    /// Must be called inside a tokio runtime.
    pub fn start(client: CollectorClient, config: PollerConfig) -> Self {
        let (tx, _) = watch::channel(DashboardSnapshot::default());
        let shared = Arc::new(Shared {
            client,
            state: Mutex::new(PollState::new()),
            tx,
            torn_down: AtomicBool::new(false),
        });
        shared.begin(FetchMode::Visible);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = spawn_poll_loop(shared.clone(), config.period(), shutdown_rx);
        Self {
            shared,
            task: Mutex::new(Some(PollTask {
                shutdown_tx,
                handle,
            })),
        }
    }

    /// Visible fetch on demand. Resolves once the fetch settles, with the state it produced.
    /// Fetch errors are folded into the snapshot, never returned.
    pub async fn refresh(&self) -> DashboardSnapshot {
        self.shared.begin(FetchMode::Visible);
        self.shared.run_cycle(FetchMode::Visible).await
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.shared.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.shared.tx.subscribe()
    }

    pub fn collector_url(&self) -> &reqwest::Url {
        self.shared.client.url()
    }

    /// Stop the timer and wait for the poll task to exit. A cycle in flight on the
    /// poll task is dropped, so this never waits on the collector. Idempotent.
    pub async fn shutdown(&self) {
        self.shared.torn_down.store(true, Ordering::Release);
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            let _ = task.shutdown_tx.send(());
            if let Err(e) = task.handle.await {
                tracing::warn!(error = %e, operation = "poller_shutdown", "poll task join failed");
            }
        }
    }
}

impl Drop for HostPoller {
    // Dropping the task's shutdown sender ends the loop.
    fn drop(&mut self) {
        self.shared.torn_down.store(true, Ordering::Release);
    }
}

fn spawn_poll_loop(
    shared: Arc<Shared>,
    period: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    let poll_span = tracing::span!(
        tracing::Level::DEBUG,
        "poller",
        url = %shared.client.url(),
        poll_interval_ms = period.as_millis() as u64
    );
    tokio::spawn(
        async move {
            if !cycle_or_shutdown(&shared, FetchMode::Visible, &mut shutdown_rx).await {
                tracing::debug!("Poller shut down during initial fetch");
                return;
            }

            let mut tick = interval_at(Instant::now() + period, period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Poller shutting down");
                        break;
                    }
                    _ = tick.tick() => {
                        if !cycle_or_shutdown(&shared, FetchMode::Silent, &mut shutdown_rx).await {
                            tracing::debug!("Poller shut down mid-cycle");
                            break;
                        }
                    }
                }
            }
        }
        .instrument(poll_span),
    )
}

/// Run one cycle unless shutdown arrives first. Returns false on shutdown.
async fn cycle_or_shutdown(
    shared: &Shared,
    mode: FetchMode,
    shutdown_rx: &mut oneshot::Receiver<()>,
) -> bool {
    tokio::select! {
        biased;
        _ = shutdown_rx => false,
        _ = shared.run_cycle(mode) => true,
    }
}
