//! Crate error type and logging helpers.
//!
//! Almost every error kind here is non-fatal: a malformed record, an
//! unknown currency, or a listing with no manufacturer match is logged and
//! the record is skipped, never escalated to [`MatchError`]. Only I/O
//! failure on the input streams, or a malformed `--config` file, aborts
//! the run.

use thiserror::Error;

/// Unrecoverable errors that abort the run with a non-zero exit.
///
/// `InvalidRecord` and `UnknownCurrency` round out the type for callers that
/// want to escalate a per-record problem instead of the default skip policy;
/// this crate's own pipeline never constructs them, since every per-record
/// failure it sees is logged via [`log_skipped_record`] and dropped instead
/// of promoted to a process-level error.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid record at line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown currency code: {code}")]
    UnknownCurrency { code: String },
}

/// Log a skipped record under the crate's "log and skip" policy.
pub fn log_skipped_record(kind: &str, line_no: usize, reason: &str) {
    tracing::warn!(kind, line = line_no, reason, "skipping record");
}
