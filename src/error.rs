//! Crate-wide error type.
//!
//! Every fallible library entry point returns `Result<_, AmiraError>`. The
//! binaries convert this into an exit code and a message on stderr (see
//! `src/cli.rs`), in the manner of this crate's `anyhow`-wrapped `main`
//! functions.

use std::path::PathBuf;

/// Errors surfaced by the AMIRA pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AmiraError {
    /// Malformed CLI arguments, out-of-range `delta`/`theta`, non-positive sample size.
    #[error("invalid input: {0}")]
    Input(String),

    /// Inability to open or read the dataset or the sample file.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that could not be read/written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Malformed transaction line (non-integer token).
    #[error("parse error at {path} line {line}: {reason}")]
    Parse {
        /// Dataset path being parsed.
        path: PathBuf,
        /// 1-indexed line number.
        line: usize,
        /// Human-readable reason.
        reason: String,
    },

    /// The numerical minimiser failed to converge, or the objective produced
    /// a non-finite value.
    #[error("optimiser error while computing {context}: {reason}")]
    Optimiser {
        /// Which bound/objective was being minimised (e.g. "omega1").
        context: &'static str,
        /// Underlying reason.
        reason: String,
    },

    /// Internal invariant violated (e.g. dataset size 0).
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl AmiraError {
    /// Wrap an I/O error with the path that triggered it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AmiraError::Io { path: path.into(), source }
    }

    /// The small process exit code associated with each error class, mirroring
    /// the exit-code-per-failure-class idiom used by this crate's binaries.
    pub fn exit_code(&self) -> i32 {
        match self {
            AmiraError::Input(_) => 2,
            AmiraError::Io { .. } => 3,
            AmiraError::Parse { .. } => 4,
            AmiraError::Optimiser { .. } => 5,
            AmiraError::Invariant(_) => 6,
        }
    }
}
