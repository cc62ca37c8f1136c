use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;
use tracing::instrument;

use crate::audit::{LogEntry, SOURCE_CRYPTO};
use crate::file::{self, FileInfo};
use crate::gateway::Gateway;
use crate::orchestrator::{Orchestrator, RunOutcome, record};
use crate::progress::ProcessingStatus;
use crate::settings::EncryptionConfig;
use crate::types::Operation;

/// Everything a run needs, captured when it was accepted.
pub(super) struct Run {
    pub(super) id: u64,
    pub(super) operation: Operation,
    pub(super) config: EncryptionConfig,
    pub(super) input: FileInfo,
    pub(super) output: PathBuf,
    pub(super) cancelled: Arc<AtomicBool>,
    pub(super) gateway: Gateway,
}

enum Interrupt {
    Cancelled,
    Failed(String),
}

impl Run {
    fn checkpoint(&self) -> Result<(), Interrupt> {
        if self.cancelled.load(Ordering::Acquire) { Err(Interrupt::Cancelled) } else { Ok(()) }
    }
}

/// Clears busy if the run ends without publishing a terminal state, for
/// example when the task panics.
pub(super) struct BusyGuard<'a> {
    pub(super) orchestrator: &'a Orchestrator,
    pub(super) id: u64,
    pub(super) operation: Operation,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let text = format!("{} failed: operation aborted", self.operation.noun());
        self.orchestrator.update_run(self.id, |state| {
            state.busy = false;
            state.active = None;
            state.progress.status = ProcessingStatus::Error;
            state.progress.current_operation = Some(text.clone());
            record(state, LogEntry::error(text.clone()).with_source(SOURCE_CRYPTO));
            state.status_message = text;
        });
    }
}

#[instrument(
    name = "run",
    skip_all,
    fields(
        id = run.id,
        operation = %run.operation,
        algorithm = %run.config.algorithm(),
        key_size = run.config.key_size(),
        mode = %run.config.mode(),
    )
)]
pub(super) async fn execute(orchestrator: Orchestrator, run: Run) -> RunOutcome {
    let _guard = BusyGuard { orchestrator: &orchestrator, id: run.id, operation: run.operation };
    let started = Instant::now();

    let outcome = match drive(&orchestrator, &run, started).await {
        Ok(staged) => finish(&orchestrator, &run, started.elapsed(), Ok(staged)),
        Err(Interrupt::Failed(message)) => finish(&orchestrator, &run, started.elapsed(), Err(message)),
        Err(Interrupt::Cancelled) => None,
    };

    match outcome {
        Some(outcome) => {
            tracing::debug!(?outcome, elapsed = ?started.elapsed(), "run finished");
            outcome
        }
        None => {
            tracing::debug!("run cancelled");
            RunOutcome::Cancelled
        }
    }
}

/// Reads, transforms and stages the output. The staged file only reaches the
/// output path through [`finish`].
async fn drive(orchestrator: &Orchestrator, run: &Run, started: Instant) -> Result<NamedTempFile, Interrupt> {
    let data = file::read_input(run.input.path()).await.map_err(|err| Interrupt::Failed(format!("{err:#}")))?;
    run.checkpoint()?;

    let output = transform(orchestrator, run, data).await?;
    run.checkpoint()?;

    orchestrator.update_run(run.id, |state| {
        state.progress.current_chunk = 1;
        state.progress.bytes_processed = state.progress.total_bytes;
        state.progress.elapsed = started.elapsed();
        state.progress.current_operation = Some("Writing output...".to_owned());
    });

    run.checkpoint()?;
    file::stage_output(&run.output, &output).await.map_err(|err| Interrupt::Failed(format!("{err:#}")))
}

/// Runs the engine call on the shared compute pool and awaits the result.
async fn transform(orchestrator: &Orchestrator, run: &Run, data: Vec<u8>) -> Result<Vec<u8>, Interrupt> {
    let pool = orchestrator.compute_pool(run.config.threads()).map_err(|err| Interrupt::Failed(format!("failed to build compute pool: {err}")))?;

    let (tx, rx) = flume::bounded(1);
    let (gateway, config, operation) = (run.gateway.clone(), run.config.clone(), run.operation);
    pool.spawn(move || {
        // The receiver is gone only if the run task itself was dropped.
        let _ = tx.send(gateway.transform(&config, operation, &data));
    });

    let result = rx.recv_async().await.map_err(|_| Interrupt::Failed("transform was dropped by the compute pool".to_owned()))?;
    result.map_err(|status| Interrupt::Failed(status.to_string()))
}

/// Publishes the terminal state of a run and, on success, moves the staged
/// output into place.
///
/// Commit and publication happen in one state update that only applies while
/// the run is still active, so a cancel either lands before it (the staged
/// file is dropped and removed) or after the run has already finished.
/// Returns `None` when the run was cancelled.
fn finish(orchestrator: &Orchestrator, run: &Run, elapsed: Duration, result: Result<NamedTempFile, String>) -> Option<RunOutcome> {
    let noun = run.operation.noun();
    let mut outcome = None;

    orchestrator.update_run(run.id, |state| {
        state.busy = false;
        state.active = None;
        state.progress.elapsed = elapsed;

        let committed = result.and_then(|staged| file::commit_output(staged, &run.output).map_err(|err| format!("{err:#}")));
        match committed {
            Ok(()) => {
                let name = run.output.file_name().map_or_else(|| run.output.display().to_string(), |name| name.to_string_lossy().into_owned());
                state.progress.status = ProcessingStatus::Success;
                state.progress.current_chunk = state.progress.total_chunks;
                state.progress.bytes_processed = state.progress.total_bytes;
                state.progress.current_operation = Some(format!("{noun} complete"));
                record(state, LogEntry::success(format!("File {} successfully: {name}", run.operation.past())).with_source(SOURCE_CRYPTO));
                state.status_message = format!("{noun} completed successfully");
                outcome = Some(RunOutcome::Succeeded(run.output.clone()));
            }
            Err(message) => {
                let text = format!("{noun} failed: {message}");
                state.progress.status = ProcessingStatus::Error;
                state.progress.current_operation = Some(text.clone());
                record(state, LogEntry::error(text.clone()).with_source(SOURCE_CRYPTO));
                state.status_message = text;
                outcome = Some(RunOutcome::Failed(message));
            }
        }
    });

    outcome
}
