//! Error types for JARM construction, parsing, and hashing.

/// Result type alias for `jarm-core` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, parsing, or hashing JARM material.
///
/// Network, proxy, and timeout errors (the rest of spec §7's table) live in
/// `jarm-cli::Error` instead — this crate never touches a socket.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `ProbeProfile` was assembled with a combination of enum values the
    /// catalog has no entry for. `ProbeProfile`'s fields are themselves
    /// closed enums, so the ten canonical profiles can never trigger this —
    /// kept for API parity with the source project's own error surface.
    #[error("unsupported profile value: {0}")]
    UnsupportedProfileValue(String),
}
