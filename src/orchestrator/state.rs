use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use thiserror::Error;

use crate::audit::AuditLog;
use crate::file::FileInfo;
use crate::progress::ProcessingProgress;
use crate::settings::{ConfigError, EncryptionConfig};

/// The run currently allowed to publish state.
#[derive(Debug, Clone)]
pub(super) struct ActiveRun {
    pub(super) id: u64,
    pub(super) cancelled: Arc<AtomicBool>,
}

/// Everything observers can see, published as one snapshot per change.
#[derive(Debug, Clone)]
pub struct State {
    pub(super) config: EncryptionConfig,
    pub(super) selected: Option<FileInfo>,
    pub(super) progress: ProcessingProgress,
    pub(super) log: AuditLog,
    pub(super) status_message: String,
    pub(super) busy: bool,
    pub(super) initialized: bool,
    pub(super) active: Option<ActiveRun>,
}

impl State {
    #[inline]
    pub fn config(&self) -> &EncryptionConfig {
        &self.config
    }

    #[inline]
    pub fn selected(&self) -> Option<&FileInfo> {
        self.selected.as_ref()
    }

    #[inline]
    pub fn progress(&self) -> &ProcessingProgress {
        &self.progress
    }

    #[inline]
    pub fn log(&self) -> &AuditLog {
        &self.log
    }

    #[inline]
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// True from the moment a run is accepted until it finishes or is
    /// cancelled.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(super) fn is_active(&self, id: u64) -> bool {
        self.active.as_ref().is_some_and(|active| active.id == id)
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            config: EncryptionConfig::default(),
            selected: None,
            progress: ProcessingProgress::default(),
            log: AuditLog::new(),
            status_message: "System ready".to_owned(),
            busy: false,
            initialized: false,
            active: None,
        }
    }
}

/// Why an encrypt or decrypt request was turned away. A rejected request
/// never reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("transform engine is not initialized")]
    NotInitialized,

    #[error("no file selected")]
    NoInput,

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("an operation is already in progress")]
    Busy,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded(PathBuf),
    Failed(String),
    Cancelled,
}
