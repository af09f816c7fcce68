//! Error types and the process-wide error channel.
//!
//! Every failure in the session core is represented as a [`GameError`],
//! recorded to the error channel at the point of detection via [`record`],
//! and then propagated upward as a `Result`. The surrounding application
//! calls [`report_last`] to surface the most recent failure before exiting.

use std::collections::TryReserveError;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// All failures the session core can produce.
#[derive(Debug, Error)]
pub enum GameError {
    /// Backing storage for a resource or buffer could not grow. Always
    /// fatal: construction aborts, or the process exits.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Level geometry could not be loaded or parsed. Fatal to session
    /// construction; fatal-but-reported for a live reload.
    #[error("could not load level '{}': {reason}", path.display())]
    Load {
        /// The level file that failed to load.
        path: PathBuf,
        /// Human-readable cause (I/O or parse failure).
        reason: String,
    },

    /// The drawing backend failed to produce or present a frame. The
    /// session state is left unchanged; the caller decides what to do.
    #[error("render backend failure: {0}")]
    Render(String),
}

/// Coarse classification of a [`GameError`], used by the error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`GameError::Allocation`].
    Allocation,
    /// See [`GameError::Load`].
    Load,
    /// See [`GameError::Render`].
    Render,
}

impl GameError {
    /// Convenience constructor for level load failures.
    pub fn load(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        GameError::Load {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::Allocation(_) => ErrorKind::Allocation,
            GameError::Load { .. } => ErrorKind::Load,
            GameError::Render(_) => ErrorKind::Render,
        }
    }
}

/// Last error recorded by the core. Write-mostly: the core records on
/// every failure path and never reads its own prior errors.
static LAST_ERROR: Mutex<Option<(ErrorKind, String)>> = Mutex::new(None);

/// Records `err` as the process-wide last error.
pub fn record(err: &GameError) {
    let mut last = LAST_ERROR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *last = Some((err.kind(), err.to_string()));
}

/// Logs the last recorded error, if any, prefixed with `context`.
pub fn report_last(context: &str) {
    let last = LAST_ERROR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    match last.as_ref() {
        Some((kind, message)) => log::error!("{context}: {message} ({kind:?})"),
        None => log::error!("{context}"),
    }
}
