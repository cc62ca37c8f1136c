//! # Operation Orchestrator
//!
//! Owns every piece of observable state and drives encrypt and decrypt runs
//! from request to output file.
//!
//! ## State Publication
//!
//! State lives in a single `tokio::sync::watch` channel. The orchestrator is
//! its only writer; each mutation replaces the snapshot atomically, so
//! observers either see the state before a change or after it, never halfway.
//! Readers call [`Orchestrator::snapshot`] or wait on
//! [`Orchestrator::subscribe`].
//!
//! ## Runs
//!
//! [`Orchestrator::encrypt`] and [`Orchestrator::decrypt`] return a
//! [`RunHandle`] immediately and do the work on a spawned task:
//!
//! 1. read the input with `tokio::fs`
//! 2. transform on a rayon pool sized from the configured thread count
//! 3. stage the output in a temporary file beside the target
//! 4. rename it into place in the same state update that publishes success
//!
//! Only one run may be in flight. A second request while busy is rejected
//! without touching state.
//!
//! ## Cancellation
//!
//! Cancelling flips status and busy right away and detaches the run. The run
//! notices at its next checkpoint (after the read, after the transform, before
//! staging) and stops. An engine call already in progress is not interrupted,
//! and a detached run can never publish state or commit output again because
//! every run-side update is keyed by its run id.
//!
//! ## Compute Pool
//!
//! One rayon pool is kept per orchestrator and rebuilt only when the
//! configured thread count changes. A run submits a single engine call, so
//! the thread count bounds the pool rather than splitting the work.

mod run;
mod state;

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use anyhow::Result;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::audit::{LogEntry, LogLevel, SOURCE_CONFIG, SOURCE_CRYPTO, SOURCE_FILE, SOURCE_SYSTEM};
use crate::file::{self, FileInfo};
use crate::gateway::{Gateway, TransformEngine};
use crate::progress::{ProcessingProgress, ProcessingStatus};
use crate::settings::EncryptionConfig;
use crate::types::Operation;

use self::run::Run;
use self::state::ActiveRun;
pub use self::state::{RunError, RunOutcome, State};

struct Inner {
    state: watch::Sender<State>,
    engine: Arc<dyn TransformEngine>,
    gateway: OnceLock<Gateway>,
    next_run: AtomicU64,
    /// Compute pool and the thread count it was built with.
    pool: Mutex<Option<(usize, Arc<ThreadPool>)>>,
}

/// Cheaply cloneable handle to the shared orchestrator.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").field("gateway", &self.inner.gateway.get()).finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new<E: TransformEngine + 'static>(engine: E) -> Self {
        let (state, _) = watch::channel(State::default());
        Self { inner: Arc::new(Inner { state, engine: Arc::new(engine), gateway: OnceLock::new(), next_run: AtomicU64::new(1), pool: Mutex::new(None) }) }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> State {
        self.inner.state.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<State> {
        self.inner.state.subscribe()
    }

    /// Brings up the engine and runs a round-trip self-test.
    ///
    /// Returns whether the engine is usable. A failed self-test is logged as a
    /// warning and does not make initialization fail.
    pub async fn initialize(&self) -> bool {
        self.update(|state| record(state, LogEntry::info("Initializing CryptingTool system...").with_source(SOURCE_SYSTEM)));

        let gateway = match Gateway::initialize_shared(Arc::clone(&self.inner.engine)) {
            Ok(gateway) => self.inner.gateway.get_or_init(|| gateway).clone(),
            Err(err) => {
                self.update(|state| {
                    state.initialized = false;
                    record(state, LogEntry::error(format!("Failed to initialize system: {err}")).with_source(SOURCE_SYSTEM));
                    state.status_message = "System initialization failed".to_owned();
                });
                return false;
            }
        };

        tracing::info!(version = gateway.version(), "transform engine ready");
        self.update(|state| {
            state.initialized = true;
            record(state, LogEntry::success("System initialized successfully").with_source(SOURCE_SYSTEM));
            state.status_message = "Ready for operations".to_owned();
        });

        let verified = tokio::task::spawn_blocking(move || gateway.self_test()).await.map_err(anyhow::Error::from).and_then(|result| result);
        self.update(|state| match verified {
            Ok(()) => record(state, LogEntry::success("Backend functionality verified").with_source(SOURCE_CRYPTO)),
            Err(err) => {
                tracing::warn!(error = %err, "self-test failed");
                record(state, LogEntry::warning("Backend test failed, but continuing...").with_source(SOURCE_CRYPTO));
            }
        });

        true
    }

    /// Replaces the configuration. It is validated when a run starts, not here.
    pub fn update_config(&self, config: EncryptionConfig) {
        self.update(|state| {
            record(state, LogEntry::info(format!("Configuration updated: {}", config.summary())).with_source(SOURCE_CONFIG));
            state.config = config;
        });
    }

    /// Captures `path` as the input for the next run.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be stat'ed or is not a regular file; the
    /// previous selection is kept.
    pub async fn select_input(&self, path: impl AsRef<Path>) -> Result<FileInfo> {
        match FileInfo::capture(path).await {
            Ok(info) => {
                self.update(|state| {
                    record(state, LogEntry::info(format!("File selected: {} ({})", info.name(), info.formatted_size())).with_source(SOURCE_FILE));
                    state.status_message = format!("File selected: {}", info.name());
                    state.selected = Some(info.clone());
                });
                Ok(info)
            }
            Err(err) => {
                self.update(|state| record(state, LogEntry::error(format!("Failed to select file: {err:#}")).with_source(SOURCE_FILE)));
                Err(err)
            }
        }
    }

    /// Starts encrypting the selected input. Must be called inside a Tokio
    /// runtime.
    pub fn encrypt(&self) -> Result<RunHandle, RunError> {
        self.start(Operation::Encrypt)
    }

    /// Starts decrypting the selected input. Must be called inside a Tokio
    /// runtime.
    pub fn decrypt(&self) -> Result<RunHandle, RunError> {
        self.start(Operation::Decrypt)
    }

    /// Cancels the run in flight, if any. Returns whether one was cancelled.
    pub fn cancel(&self) -> bool {
        self.cancel_run(None)
    }

    pub fn clear_logs(&self) {
        self.update(|state| state.log.clear());
    }

    /// Engine version, or `None` when the engine is unavailable.
    pub fn engine_version(&self) -> Option<String> {
        self.inner.engine.version()
    }

    pub fn algorithm_ids(&self) -> Option<Vec<i32>> {
        self.inner.engine.algorithm_ids()
    }

    pub fn mode_ids(&self) -> Option<Vec<i32>> {
        self.inner.engine.mode_ids()
    }

    /// Starts a run of `operation` over the selected input.
    ///
    /// # Errors
    ///
    /// Rejects the request without reaching the engine when the engine is not
    /// initialized, nothing is selected, the configuration is invalid, or a
    /// run is already in flight. Only the last case leaves state untouched.
    pub fn start(&self, operation: Operation) -> Result<RunHandle, RunError> {
        let Some(gateway) = self.inner.gateway.get().cloned() else {
            self.update(|state| record(state, LogEntry::error("Crypto bridge not initialized").with_source(SOURCE_SYSTEM)));
            return Err(RunError::NotInitialized);
        };

        let id = self.inner.next_run.fetch_add(1, Ordering::Relaxed);
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut accepted: Result<Run, RunError> = Err(RunError::Busy);

        // Check and claim busy in the same mutation so two requests can never
        // both start.
        self.inner.state.send_if_modified(|state| {
            if state.busy {
                return false;
            }

            let Some(input) = state.selected.clone() else {
                let noun = operation.noun().to_lowercase();
                record(state, LogEntry::error(format!("No file selected for {noun}")).with_source(SOURCE_CRYPTO));
                accepted = Err(RunError::NoInput);
                return true;
            };

            if let Err(err) = state.config.validate() {
                record(state, LogEntry::error(format!("Invalid configuration: {err}")).with_source(SOURCE_CONFIG));
                accepted = Err(RunError::InvalidConfig(err));
                return true;
            }

            state.busy = true;
            state.active = Some(ActiveRun { id, cancelled: Arc::clone(&cancelled) });
            state.status_message = format!("{} {}...", operation.progress_label(), input.name());
            state.progress = ProcessingProgress::started(input.size(), format!("{} file...", operation.progress_label()));
            record(state, LogEntry::info(format!("Starting {}: {}", operation.noun().to_lowercase(), state.config.summary())).with_source(SOURCE_CRYPTO));

            let output = file::output_path(input.path(), operation);
            accepted = Ok(Run { id, operation, config: state.config.clone(), input, output, cancelled: Arc::clone(&cancelled), gateway: gateway.clone() });
            true
        });

        let run = accepted.inspect_err(|err| tracing::debug!(%err, %operation, "request rejected"))?;
        let task = tokio::spawn(run::execute(self.clone(), run));

        Ok(RunHandle { orchestrator: self.clone(), id, task })
    }

    /// Cancels the active run, or only run `id` when given.
    fn cancel_run(&self, id: Option<u64>) -> bool {
        self.inner.state.send_if_modified(|state| {
            let Some(active) = state.active.take_if(|active| id.is_none_or(|id| active.id == id)) else {
                return false;
            };

            active.cancelled.store(true, Ordering::Release);
            state.busy = false;
            state.progress.status = ProcessingStatus::Cancelled;
            state.progress.current_operation = Some("Operation cancelled".to_owned());
            record(state, LogEntry::warning("Operation cancelled by user").with_source(SOURCE_SYSTEM));
            state.status_message = "Operation cancelled".to_owned();
            true
        })
    }

    /// The compute pool for `threads` workers, reused across runs until the
    /// thread count changes.
    fn compute_pool(&self, threads: usize) -> Result<Arc<ThreadPool>, ThreadPoolBuildError> {
        let mut slot = self.inner.pool.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((size, pool)) = slot.as_ref()
            && *size == threads
        {
            return Ok(Arc::clone(pool));
        }

        let pool = Arc::new(ThreadPoolBuilder::new().num_threads(threads).thread_name(|index| format!("transform-{index}")).build()?);
        *slot = Some((threads, Arc::clone(&pool)));
        Ok(pool)
    }

    fn update(&self, update: impl FnOnce(&mut State)) {
        self.inner.state.send_modify(update);
    }

    /// Applies `update` only while run `id` is still the active run.
    fn update_run(&self, id: u64, update: impl FnOnce(&mut State)) -> bool {
        self.inner.state.send_if_modified(|state| {
            if !state.is_active(id) {
                return false;
            }
            update(state);
            true
        })
    }
}

/// Appends to the audit log and mirrors the entry to `tracing`.
fn record(state: &mut State, entry: LogEntry) {
    let source = entry.source().unwrap_or("-");
    match entry.level() {
        LogLevel::Info | LogLevel::Success => tracing::info!(source, "{}", entry.message()),
        LogLevel::Warning => tracing::warn!(source, "{}", entry.message()),
        LogLevel::Error => tracing::error!(source, "{}", entry.message()),
    }
    state.log.append(entry);
}

/// Handle to a run started by [`Orchestrator::encrypt`] or
/// [`Orchestrator::decrypt`].
#[derive(Debug)]
pub struct RunHandle {
    orchestrator: Orchestrator,
    id: u64,
    task: JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// Cancels this run. Has no effect once it has finished or another run
    /// has taken over.
    pub fn cancel(&self) -> bool {
        self.orchestrator.cancel_run(Some(self.id))
    }

    /// Waits for the run task to end.
    pub async fn wait(self) -> RunOutcome {
        self.task.await.unwrap_or_else(|err| RunOutcome::Failed(format!("run task failed: {err}")))
    }
}
