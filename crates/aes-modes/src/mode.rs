//! Mode-of-operation abstraction.

use aes_core::{RoundKeys, BLOCK_SIZE};

use crate::entropy::EntropySource;
use crate::error::{Error, Result};

/// Extends the single-block transform to block-aligned buffers.
///
/// Modes work in place on an owned buffer so CBC can append and strip its
/// trailing IV without copying.
pub trait Mode {
    /// Human-readable mode name.
    const NAME: &'static str;

    /// Bytes the mode appends to the ciphertext beyond the padded plaintext.
    const OVERHEAD: usize;

    /// Smallest ciphertext accepted by [`Mode::decrypt`].
    const MIN_CIPHERTEXT_LEN: usize = BLOCK_SIZE + Self::OVERHEAD;

    /// Encrypts a padded buffer in place.
    fn encrypt<E>(data: &mut Vec<u8>, round_keys: &RoundKeys, entropy: &E) -> Result<()>
    where
        E: EntropySource + ?Sized;

    /// Decrypts a ciphertext buffer in place, leaving the padded plaintext.
    fn decrypt(data: &mut Vec<u8>, round_keys: &RoundKeys) -> Result<()>;
}

/// Checks that `len` is a whole, non-zero number of blocks and at least `min` bytes.
pub(crate) fn check_len(len: usize, min: usize) -> Result<()> {
    if len % BLOCK_SIZE != 0 {
        return Err(Error::InvalidLength {
            len,
            reason: "not a multiple of the block size",
        });
    }
    if len < min {
        return Err(Error::InvalidLength {
            len,
            reason: "shorter than the minimum for this mode",
        });
    }
    Ok(())
}
