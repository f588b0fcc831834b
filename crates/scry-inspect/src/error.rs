//! Inspector errors.

use thiserror::Error;

/// Failures surfaced to the transport layer as explicit values.
///
/// Degraded fidelity (truncation, cycles, thrown getters) is reported through
/// the `lossless` and `overflow` preview flags instead of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InspectError {
    /// The handle does not resolve to a live value (unknown, released, or
    /// bound by another session).
    #[error("no object bound for the given handle")]
    NotFound,

    /// Entries were requested for a subtype that has none.
    #[error("entries requested for non-collection type")]
    NotACollection,

    /// A call-frame ordinal walked past the top of the stack.
    #[error("call frame ordinal {0} out of range")]
    InvalidOrdinal(u32),
}
