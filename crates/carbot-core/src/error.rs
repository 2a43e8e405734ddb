//! Store error types.

use thiserror::Error;

/// Errors surfaced by the prompt store and its persistence backends.
///
/// Validation rejections (empty text, out-of-range positions) are NOT
/// errors: the store reports them as quiet no-ops so callers can tell
/// "nothing to do" apart from "the mutation did not commit".
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistence backend failed to read or write.
    #[error("backend error: {0}")]
    Backend(String),

    /// Stored data could not be decoded.
    #[error("corrupt store: {0}")]
    Corrupt(String),
}
