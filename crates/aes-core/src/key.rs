//! Key types and the expanded round-key schedule.

use core::fmt;

use crate::block::{Block, BLOCK_SIZE};

/// Raw AES key of `N` bytes.
///
/// Only 16, 24 and 32 byte keys implement [`CipherKey`], so a key of any
/// other size cannot be handed to the key schedule.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AesKey<const N: usize>(pub [u8; N]);

/// AES-128 key.
pub type Aes128Key = AesKey<16>;
/// AES-192 key.
pub type Aes192Key = AesKey<24>;
/// AES-256 key.
pub type Aes256Key = AesKey<32>;

impl<const N: usize> From<[u8; N]> for AesKey<N> {
    fn from(value: [u8; N]) -> Self {
        Self(value)
    }
}

impl<const N: usize> TryFrom<&[u8]> for AesKey<N> {
    type Error = KeyLengthError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; N] = value.try_into().map_err(|_| KeyLengthError {
            expected: N,
            actual: value.len(),
        })?;
        Ok(Self(bytes))
    }
}

impl<const N: usize> fmt::Debug for AesKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AesKey<{}>([REDACTED])", N * 8)
    }
}

/// Returned when a byte slice has the wrong length for the requested key size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyLengthError {
    /// Required length in bytes.
    pub expected: usize,
    /// Length that was supplied.
    pub actual: usize,
}

impl fmt::Display for KeyLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AES key must be {} bytes, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for KeyLengthError {}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Aes128Key {}
    impl Sealed for super::Aes192Key {}
    impl Sealed for super::Aes256Key {}
}

/// A key of one of the three FIPS-197 sizes.
pub trait CipherKey: sealed::Sealed + Copy + Send + Sync + 'static {
    /// Key length in 32-bit words.
    const NK: usize;
    /// Number of rounds.
    const NR: usize = Self::NK + 6;
    /// Key length in bits.
    const BITS: usize = Self::NK * 32;

    /// Raw key bytes.
    fn as_bytes(&self) -> &[u8];
}

impl CipherKey for Aes128Key {
    const NK: usize = 4;

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl CipherKey for Aes192Key {
    const NK: usize = 6;

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl CipherKey for Aes256Key {
    const NK: usize = 8;

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Largest round count (AES-256).
pub const MAX_ROUNDS: usize = 14;

/// Expanded round keys: `rounds() + 1` subkeys.
#[derive(Clone, PartialEq, Eq)]
pub struct RoundKeys {
    keys: [Block; MAX_ROUNDS + 1],
    rounds: usize,
}

impl RoundKeys {
    /// Builds a schedule from `4 * (rounds + 1)` words laid out as bytes.
    pub(crate) fn from_words(words: &[[u8; 4]], rounds: usize) -> Self {
        debug_assert_eq!(words.len(), 4 * (rounds + 1));
        let mut keys = [[0u8; BLOCK_SIZE]; MAX_ROUNDS + 1];
        for (round_key, chunk) in keys.iter_mut().zip(words.chunks_exact(4)) {
            for (dst, word) in round_key.chunks_exact_mut(4).zip(chunk) {
                dst.copy_from_slice(word);
            }
        }
        Self { keys, rounds }
    }

    /// Returns the round key at the requested index (`0..=rounds()`).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        debug_assert!(round <= self.rounds);
        &self.keys[round]
    }

    /// Number of rounds this schedule drives (10, 12 or 14).
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Iterates over the `rounds() + 1` subkeys in order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.keys[..=self.rounds].iter()
    }
}

impl fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundKeys")
            .field("rounds", &self.rounds)
            .finish_non_exhaustive()
    }
}
