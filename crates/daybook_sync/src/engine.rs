//! The synchronization engine.
//!
//! Keeps one local file and one remote file approximately consistent
//! without a central lock, tolerating a third-party process that may
//! write the same local path. Reconciliation is most-recent-wins over
//! opaque text: the engine compares bytes and timestamps only and never
//! inspects day records.
//!
//! Lifecycle is explicit: construct (configure) → [`SyncEngine::start`] →
//! [`SyncEngine::stop`]. A fixed-interval timer drives cycles;
//! [`SyncEngine::sync_now`] triggers one on demand through the same
//! in-flight guard, so overlapping triggers are dropped, not queued.
//!
//! Two consecutive cycle failures (of the auth-specific class or of any
//! class) trip a circuit breaker: one terminal notification is emitted
//! and automatic cycles halt until [`SyncEngine::reconfigure`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use daybook_core::fs::FileSystem;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{CycleError, FailureClass};
use crate::remote::RemoteFileStore;

/// How long after a local write the engine defers reconciliation, so an
/// external desktop client can finish its own upload before a download
/// could clobber it. A heuristic, not a lock: true races remain possible.
pub const GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Consecutive failures (auth-specific or any-class) that trip the
/// circuit breaker.
pub const FAILURE_THRESHOLD: u32 = 2;

/// Consecutive failures after which the interval widens.
pub const BACKOFF_THRESHOLD: u32 = 2;

/// Ceiling for the widened interval.
pub const MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Engine configuration: which local file to reconcile with which remote
/// path, and how often.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Local document path.
    pub local_path: PathBuf,
    /// Remote document path, relative to the store's base URL.
    pub remote_path: String,
    /// Base interval between automatic cycles.
    pub interval: Duration,
}

/// Engine state machine: `Idle → Syncing → {Idle | CircuitOpen}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Waiting for the next trigger.
    Idle,
    /// A cycle is in flight.
    Syncing,
    /// The circuit breaker tripped; automatic cycles are halted until
    /// reconfiguration.
    CircuitOpen,
}

/// What a sync cycle did (or why it did not run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote and local were byte-identical.
    UpToDate,
    /// Local content was uploaded over a differing remote.
    Uploaded,
    /// Remote content was downloaded over the local file.
    Downloaded,
    /// The remote file was absent and has been initialized from local
    /// content (or an empty string).
    InitializedRemote,
    /// A local write happened within the grace period; cycle skipped.
    SkippedGracePeriod,
    /// Another cycle was already in flight; this trigger was dropped.
    SkippedInFlight,
    /// The circuit breaker is open; the trigger was refused.
    SkippedCircuitOpen,
    /// The cycle failed; see the accompanying event for details.
    Failed(FailureClass),
}

/// Events emitted to the notification channel.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A cycle ran to completion.
    CycleCompleted(SyncOutcome),
    /// A cycle failed.
    CycleFailed {
        /// Breaker classification of the failure.
        class: FailureClass,
        /// Human-readable description.
        message: String,
    },
    /// Terminal notification: the circuit breaker tripped and automatic
    /// sync has stopped. Emitted exactly once per configuration.
    Halted {
        /// Human-readable description of the final failure.
        message: String,
    },
}

/// Trait for receiving sync events.
///
/// Implementors translate events into frontend-specific actions (CLI
/// prints, UI notifications).
pub trait SyncEventHandler: Send + Sync {
    /// Called when a sync event occurs.
    fn on_event(&self, event: SyncEvent);
}

/// The synchronization engine. One instance per sync target.
pub struct SyncEngine<R: RemoteFileStore, F: FileSystem> {
    remote: Arc<R>,
    fs: Arc<F>,
    handler: Arc<dyn SyncEventHandler>,
    config: Mutex<EngineConfig>,

    state: Mutex<SyncState>,
    in_flight: AtomicBool,
    failures: AtomicU32,
    auth_failures: AtomicU32,
    halt_notified: AtomicBool,
    /// Current (possibly widened) interval between cycles.
    interval: Mutex<Duration>,

    timer: Mutex<Option<JoinHandle<()>>>,
    stop_tx: Mutex<Option<watch::Sender<bool>>>,
}

impl<R: RemoteFileStore + 'static, F: FileSystem + 'static> SyncEngine<R, F> {
    /// Configure an engine against a remote store and a local filesystem.
    pub fn new(
        remote: Arc<R>,
        fs: Arc<F>,
        config: EngineConfig,
        handler: Arc<dyn SyncEventHandler>,
    ) -> Self {
        let interval = config.interval;
        Self {
            remote,
            fs,
            handler,
            config: Mutex::new(config),
            state: Mutex::new(SyncState::Idle),
            in_flight: AtomicBool::new(false),
            failures: AtomicU32::new(0),
            auth_failures: AtomicU32::new(0),
            halt_notified: AtomicBool::new(false),
            interval: Mutex::new(interval),
            timer: Mutex::new(None),
            stop_tx: Mutex::new(None),
        }
    }

    /// Current engine state.
    pub fn state(&self) -> SyncState {
        *self.state.lock().unwrap()
    }

    /// Current interval between automatic cycles.
    pub fn interval(&self) -> Duration {
        *self.interval.lock().unwrap()
    }

    /// Start the fixed-interval timer. A no-op if already started.
    pub fn start(self: &Arc<Self>) {
        let mut timer = self.timer.lock().unwrap();
        if timer.is_some() {
            return;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        *self.stop_tx.lock().unwrap() = Some(stop_tx);

        let engine = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                let interval = engine.interval();
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = stop_rx.changed() => break,
                }
                if engine.state() == SyncState::CircuitOpen {
                    break;
                }
                // Not select!-ed against stop: a cycle that has started
                // runs to completion and its result is applied.
                engine.sync_now().await;
                if *stop_rx.borrow() {
                    break;
                }
            }
            log::debug!("[SyncEngine] timer exited");
        });
        *timer = Some(handle);
    }

    /// Stop scheduling further cycles. An in-flight cycle completes and
    /// its result is still applied.
    pub fn stop(&self) {
        if let Some(stop_tx) = self.stop_tx.lock().unwrap().take() {
            let _ = stop_tx.send(true);
        }
        self.timer.lock().unwrap().take();
    }

    /// Replace the configuration, reset the failure counters, and close
    /// the circuit. This is the only way to resume after a halt; call
    /// [`SyncEngine::start`] again afterwards.
    pub fn reconfigure(&self, config: EngineConfig) {
        self.stop();
        *self.interval.lock().unwrap() = config.interval;
        *self.config.lock().unwrap() = config;
        self.failures.store(0, Ordering::SeqCst);
        self.auth_failures.store(0, Ordering::SeqCst);
        self.halt_notified.store(false, Ordering::SeqCst);
        *self.state.lock().unwrap() = SyncState::Idle;
    }

    /// Run one sync cycle now, sharing the in-flight guard with the
    /// timer. A trigger that arrives while a cycle is running is dropped
    /// (not queued, not retried).
    pub async fn sync_now(&self) -> SyncOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("[SyncEngine] cycle already in flight, trigger dropped");
            return SyncOutcome::SkippedInFlight;
        }

        let outcome = self.guarded_cycle().await;
        self.in_flight.store(false, Ordering::Release);
        outcome
    }

    async fn guarded_cycle(&self) -> SyncOutcome {
        if self.state() == SyncState::CircuitOpen {
            log::debug!("[SyncEngine] circuit open, trigger refused");
            return SyncOutcome::SkippedCircuitOpen;
        }

        let config = self.config.lock().unwrap().clone();

        // A recent local write means an external client may still be
        // mid-upload; let it settle before reconciling.
        if self.within_grace_period(&config) {
            log::debug!("[SyncEngine] local write within grace period, cycle skipped");
            return SyncOutcome::SkippedGracePeriod;
        }

        *self.state.lock().unwrap() = SyncState::Syncing;
        match self.run_cycle(&config).await {
            Ok(outcome) => {
                self.record_success();
                *self.state.lock().unwrap() = SyncState::Idle;
                self.handler.on_event(SyncEvent::CycleCompleted(outcome));
                outcome
            }
            Err(err) => {
                let class = err.class();
                log::warn!("[SyncEngine] cycle failed ({:?}): {}", class, err);
                self.handler.on_event(SyncEvent::CycleFailed {
                    class,
                    message: err.to_string(),
                });
                self.record_failure(class, &err);
                SyncOutcome::Failed(class)
            }
        }
    }

    fn within_grace_period(&self, config: &EngineConfig) -> bool {
        let Ok(modified) = self.fs.last_modified(&config.local_path) else {
            return false;
        };
        SystemTime::now()
            .duration_since(modified)
            .is_ok_and(|age| age < GRACE_PERIOD)
    }

    /// One reconciliation cycle over opaque text.
    async fn run_cycle(&self, config: &EngineConfig) -> Result<SyncOutcome, CycleError> {
        let remote_text = self.remote.get(&config.remote_path).await?;
        let local_text = if self.fs.exists(&config.local_path) {
            Some(self.fs.read_to_string(&config.local_path)?)
        } else {
            None
        };

        let Some(remote_text) = remote_text else {
            // Remote absent: initialize it from local content (or an
            // empty string), creating parent collections first.
            self.ensure_remote_dirs(&config.remote_path).await?;
            let body = local_text.as_deref().unwrap_or("");
            self.remote.put(&config.remote_path, body).await?;
            log::info!(
                "[SyncEngine] initialized remote {} ({} bytes)",
                config.remote_path,
                body.len()
            );
            return Ok(SyncOutcome::InitializedRemote);
        };

        let Some(local_text) = local_text else {
            // Local missing entirely: take the remote copy.
            self.write_local(config, &remote_text)?;
            log::info!("[SyncEngine] downloaded {} (no local file)", config.remote_path);
            return Ok(SyncOutcome::Downloaded);
        };

        if remote_text == local_text {
            return Ok(SyncOutcome::UpToDate);
        }

        // Contents differ: most-recent-wins on last-modified, ties favor
        // local.
        if self.remote_is_newer(config).await? {
            self.write_local(config, &remote_text)?;
            log::info!("[SyncEngine] downloaded newer remote {}", config.remote_path);
            Ok(SyncOutcome::Downloaded)
        } else {
            self.remote.put(&config.remote_path, &local_text).await?;
            log::info!("[SyncEngine] uploaded local over {}", config.remote_path);
            Ok(SyncOutcome::Uploaded)
        }
    }

    async fn remote_is_newer(&self, config: &EngineConfig) -> Result<bool, CycleError> {
        let Some(remote_modified) = self.remote.last_modified(&config.remote_path).await? else {
            return Ok(false);
        };
        let local_modified: DateTime<Utc> = self.fs.last_modified(&config.local_path)?.into();
        Ok(remote_modified > local_modified)
    }

    fn write_local(&self, config: &EngineConfig, content: &str) -> Result<(), CycleError> {
        if let Some(parent) = config.local_path.parent()
            && !parent.as_os_str().is_empty()
        {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write_file(&config.local_path, content)?;
        Ok(())
    }

    /// Create the remote path's parent collections segment by segment.
    /// "Already exists" answers are success inside `make_dir`.
    async fn ensure_remote_dirs(&self, remote_path: &str) -> Result<(), CycleError> {
        let mut prefix = String::new();
        let segments: Vec<&str> = remote_path.split('/').collect();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            if segment.is_empty() {
                continue;
            }
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            self.remote.make_dir(&prefix).await?;
        }
        Ok(())
    }

    fn record_success(&self) {
        self.failures.store(0, Ordering::SeqCst);
        self.auth_failures.store(0, Ordering::SeqCst);
        *self.interval.lock().unwrap() = self.config.lock().unwrap().interval;
    }

    fn record_failure(&self, class: FailureClass, err: &CycleError) {
        let failures = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
        let auth_failures = if class == FailureClass::Auth {
            self.auth_failures.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            self.auth_failures.load(Ordering::SeqCst)
        };

        if auth_failures >= FAILURE_THRESHOLD || failures >= FAILURE_THRESHOLD {
            self.trip_breaker(err);
            return;
        }

        // Widen the interval on repeated failures (doubled, capped).
        // The breaker above trips at the same consecutive count, so in
        // practice this branch is shadowed; kept as observed behavior.
        if failures >= BACKOFF_THRESHOLD {
            let mut interval = self.interval.lock().unwrap();
            *interval = (*interval * 2).min(MAX_INTERVAL);
            log::debug!("[SyncEngine] interval widened to {:?}", *interval);
        }

        *self.state.lock().unwrap() = SyncState::Idle;
    }

    fn trip_breaker(&self, err: &CycleError) {
        *self.state.lock().unwrap() = SyncState::CircuitOpen;
        // Wake the timer so it exits without waiting out the sleep.
        if let Some(stop_tx) = self.stop_tx.lock().unwrap().as_ref() {
            let _ = stop_tx.send(true);
        }
        if self
            .halt_notified
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            log::error!("[SyncEngine] circuit breaker tripped: {}", err);
            self.handler.on_event(SyncEvent::Halted {
                message: format!("sync stopped after repeated failures: {}", err),
            });
        }
    }
}
