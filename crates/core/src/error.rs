use crate::state::Metric;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type used across the entire monitor.
///
/// Every variant except the I/O passthrough is fatal for a run: the monitor
/// never degrades a single panel, it stops and reports.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Something the run cannot start without (core count, history buffers).
    #[error("setup error: {0}")]
    Setup(String),

    /// A metric's backing file could not be opened or read.
    #[error("cannot read '{}': {source}", path.display())]
    SourceRead {
        path:   PathBuf,
        source: std::io::Error,
    },

    /// A metric's backing data was read but made no sense.
    #[error("cannot parse {source_name}: {reason}")]
    SourceParse {
        source_name: String,
        reason:      String,
    },

    #[error("{metric} sampler did not report within {timeout_ms} ms")]
    SamplerTimeout { metric: Metric, timeout_ms: u64 },

    /// The sampling unit went away without reporting (it panicked).
    #[error("{metric} sampler exited without reporting")]
    SamplerCrashed { metric: Metric },

    #[error("invalid command line argument '{0}'")]
    Argument(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MonitorError {
    pub fn source_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceRead { path: path.into(), source }
    }

    pub fn source_parse(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceParse {
            source_name: source_name.into(),
            reason:      reason.into(),
        }
    }

    /// `true` for errors raised by malformed command-line input.
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument(_))
    }
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
