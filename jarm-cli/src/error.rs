//! CLI/network-facing error type. Errors that should degrade a single probe
//! rather than the whole scan (timeouts, connection resets, malformed
//! responses, non-200 proxy replies) never reach here — [`crate::runner`]
//! catches those locally and folds them into a `Failed` parse outcome.
//! Only faults that abort an entire target (bad proxy config, DNS failure,
//! argument errors) propagate as [`Error`].

/// Result type alias for `jarm-cli` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid proxy: {0}")]
    InvalidProxy(String),

    #[error("could not resolve target: {0}")]
    InvalidTarget(String),

    #[error("invalid command-line arguments: {0}")]
    Argument(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] jarm_core::Error),
}
