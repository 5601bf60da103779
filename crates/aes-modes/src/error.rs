//! Error type shared by the mode, padding and entropy layers.

use aes_core::KeyLengthError;
use thiserror::Error;

/// Failures surfaced at the buffer and entropy boundaries.
///
/// The block transforms themselves cannot fail; everything here comes from
/// untrusted lengths, untrusted padding or the random source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The buffer is not a whole number of blocks or is shorter than the mode allows.
    #[error("invalid input length {len}: {reason}")]
    InvalidLength {
        /// Length that was supplied.
        len: usize,
        /// Which requirement was violated.
        reason: &'static str,
    },

    /// Decrypted data does not end in padding this cipher could have produced.
    #[error("corrupt padding")]
    CorruptPadding,

    /// The random source did not deliver bytes within its retry budget.
    #[error("entropy unavailable after {attempts} attempts")]
    EntropyUnavailable {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// A runtime-supplied key has the wrong length for the selected key size.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required length in bytes.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
}

impl From<KeyLengthError> for Error {
    fn from(err: KeyLengthError) -> Self {
        Error::InvalidKeyLength {
            expected: err.expected,
            actual: err.actual,
        }
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
