//! Random sources for initialization vectors.
//!
//! [`HardwareRng`] reads the CPU's RDRAND instruction with a bounded retry
//! budget. [`OsEntropy`] and [`RngEntropy`] adapt `rand` generators, the
//! latter so tests can inject a seeded generator.

use std::sync::{Mutex, PoisonError};

use aes_core::{Block, BLOCK_SIZE};
use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};

/// A source of cryptographically strong bytes.
///
/// Sources take `&self` so a single cipher can serve concurrent calls.
pub trait EntropySource {
    /// Fills `dest` entirely or fails without a partial guarantee.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()>;

    /// Draws a fresh initialization vector.
    fn iv(&self) -> Result<Block> {
        let mut iv = [0u8; BLOCK_SIZE];
        self.fill_bytes(&mut iv)?;
        Ok(iv)
    }
}

impl<S: EntropySource + ?Sized> EntropySource for &S {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill_bytes(dest)
    }
}

/// Default number of RDRAND attempts per 64-bit word.
pub const DEFAULT_RDRAND_RETRIES: u32 = 10;

/// CPU hardware random number generator (x86_64 RDRAND).
///
/// Each 64-bit word is retried up to `max_retries` times. On other
/// architectures, or CPUs without RDRAND, every request fails with
/// [`Error::EntropyUnavailable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HardwareRng {
    max_retries: u32,
}

impl HardwareRng {
    /// Creates a source with the default retry budget.
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_RDRAND_RETRIES,
        }
    }

    /// Creates a source that gives up after `max_retries` failed steps per word.
    ///
    /// A budget of 0 is raised to 1.
    pub const fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries: if max_retries == 0 { 1 } else { max_retries },
        }
    }

    /// Retry budget per 64-bit word.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Whether the running CPU advertises RDRAND.
    pub fn is_available() -> bool {
        rdrand::supported()
    }

    /// Returns 64 random bits.
    pub fn next_u64(&self) -> Result<u64> {
        for _ in 0..self.max_retries {
            if let Some(value) = rdrand::step() {
                return Ok(value);
            }
        }
        log::warn!(
            "hardware RNG produced no value after {} attempts",
            self.max_retries
        );
        Err(Error::EntropyUnavailable {
            attempts: self.max_retries,
        })
    }
}

impl Default for HardwareRng {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for HardwareRng {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        for chunk in dest.chunks_mut(8) {
            let word = self.next_u64()?.to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
        Ok(())
    }
}

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code)]
mod rdrand {
    pub(super) fn supported() -> bool {
        std::is_x86_feature_detected!("rdrand")
    }

    pub(super) fn step() -> Option<u64> {
        if !supported() {
            return None;
        }
        let mut value = 0u64;
        // SAFETY: the CPU reports RDRAND support (checked above).
        let ready = unsafe { core::arch::x86_64::_rdrand64_step(&mut value) };
        (ready == 1).then_some(value)
    }
}

#[cfg(not(target_arch = "x86_64"))]
mod rdrand {
    pub(super) fn supported() -> bool {
        false
    }

    pub(super) fn step() -> Option<u64> {
        None
    }
}

/// Operating-system randomness via `rand::rngs::OsRng`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        rand::rngs::OsRng.try_fill_bytes(dest).map_err(|err| {
            log::warn!("OS random source failed: {err}");
            Error::EntropyUnavailable { attempts: 1 }
        })
    }
}

/// Adapter for any `rand` cryptographic generator.
///
/// The generator sits behind a mutex because [`EntropySource`] takes `&self`.
#[derive(Debug)]
pub struct RngEntropy<R> {
    rng: Mutex<R>,
}

impl<R: RngCore + CryptoRng> RngEntropy<R> {
    /// Wraps `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: RngCore + CryptoRng> EntropySource for RngEntropy<R> {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.try_fill_bytes(dest)
            .map_err(|_| Error::EntropyUnavailable { attempts: 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn seeded_source_is_reproducible() {
        let a = RngEntropy::new(ChaCha20Rng::from_seed([7u8; 32]));
        let b = RngEntropy::new(ChaCha20Rng::from_seed([7u8; 32]));
        assert_eq!(a.iv().unwrap(), b.iv().unwrap());
        assert_ne!(a.iv().unwrap(), a.iv().unwrap());
    }

    #[test]
    fn os_entropy_fills_odd_lengths() {
        let mut buf = [0u8; 37];
        OsEntropy.fill_bytes(&mut buf).unwrap();
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn zero_retry_budget_is_raised_to_one() {
        assert_eq!(HardwareRng::with_retries(0).max_retries(), 1);
        assert_eq!(HardwareRng::default().max_retries(), DEFAULT_RDRAND_RETRIES);
    }

    #[test]
    fn hardware_rng_fills_partial_words() {
        let rng = HardwareRng::new();
        let mut buf = [0u8; 21];
        let result = rng.fill_bytes(&mut buf);
        if HardwareRng::is_available() {
            result.unwrap();
            assert!(buf.iter().any(|&b| b != 0));
        } else {
            assert_eq!(
                result,
                Err(Error::EntropyUnavailable {
                    attempts: DEFAULT_RDRAND_RETRIES
                })
            );
        }
    }

    #[test]
    fn hardware_ivs_differ() {
        if !HardwareRng::is_available() {
            return;
        }
        let rng = HardwareRng::new();
        assert_ne!(rng.iv().unwrap(), rng.iv().unwrap());
    }

    #[test]
    fn references_are_sources() {
        fn draw<S: EntropySource>(source: S) -> Block {
            source.iv().unwrap()
        }
        let source = RngEntropy::new(ChaCha20Rng::from_seed([8u8; 32]));
        let first = draw(&source);
        let second = draw(&source);
        assert_ne!(first, second);
    }
}
