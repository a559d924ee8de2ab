//! Error types for boxdecode.

use thiserror::Error;

/// Result alias for boxdecode operations.
pub type BoxDecodeResult<T> = std::result::Result<T, BoxDecodeError>;

/// Errors raised when constructing a misconfigured decoder.
///
/// Malformed tensor *data* is never an error: a bad frame decodes to an
/// empty detection list instead of failing the caller's pipeline. These
/// variants cover caller preconditions only and surface at construction
/// time.
#[derive(Debug, Error)]
pub enum BoxDecodeError {
    /// A threshold lies outside `[0, 1]`.
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidThreshold {
        /// Name of the offending config field.
        name: &'static str,
        /// Value supplied by the caller.
        value: f32,
    },
    /// The model input edge length is zero.
    #[error("input_size must be positive, got {value}")]
    InvalidInputSize {
        /// Value supplied by the caller.
        value: u32,
    },
    /// The label table has no entries.
    #[error("label table must not be empty")]
    EmptyLabelTable,
}
