use anyhow::Result;
use cryptingtool::orchestrator::State;
use cryptingtool::progress::{ProcessingProgress, ProcessingStatus};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;

/// Progress bar mirroring the byte counters of the active run.
pub struct Bar {
    bar: ProgressBar,
}

impl Bar {
    pub fn new(total: u64, description: &str) -> Result<Self> {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({elapsed_precise})")?.progress_chars("●○ ");

        bar.set_style(style);
        bar.set_message(description.to_owned());

        Ok(Self { bar })
    }

    pub fn apply(&self, progress: &ProcessingProgress) {
        self.bar.set_length(progress.total_bytes);
        self.bar.set_position(progress.bytes_processed);
        if let Some(operation) = &progress.current_operation {
            self.bar.set_message(operation.clone());
        }
    }

    pub fn finish(&self, status: ProcessingStatus) {
        match status {
            ProcessingStatus::Success => self.bar.finish_with_message("Done"),
            other => self.bar.abandon_with_message(other.description()),
        }
    }
}

impl Drop for Bar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}

/// Feeds state changes into `bar` until the run stops being busy.
pub async fn follow(mut state: watch::Receiver<State>, bar: &Bar) -> ProcessingStatus {
    loop {
        {
            let snapshot = state.borrow_and_update();
            bar.apply(snapshot.progress());
            if !snapshot.is_busy() {
                return snapshot.progress().status;
            }
        }

        if state.changed().await.is_err() {
            return ProcessingStatus::Error;
        }
    }
}
