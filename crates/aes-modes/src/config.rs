//! Runtime selection of key size, mode and padding.
//!
//! [`Cipher`] fixes its parameters at compile time. Callers that choose them
//! at runtime (the CLI, for one) go through [`CipherConfig::build`], which
//! returns the matching instantiation behind the object-safe [`Crypter`].

use core::fmt;

use aes_core::{Aes128Key, Aes192Key, Aes256Key, CipherKey};

use crate::cbc::Cbc;
use crate::cipher::Cipher;
use crate::ecb::Ecb;
use crate::entropy::{EntropySource, HardwareRng};
use crate::error::Result;
use crate::mode::Mode;
use crate::padding::{AnsiX923, Padding, Pkcs7};

/// Supported key sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyBits {
    /// AES-128, 10 rounds.
    Aes128,
    /// AES-192, 12 rounds.
    Aes192,
    /// AES-256, 14 rounds.
    #[default]
    Aes256,
}

impl KeyBits {
    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            KeyBits::Aes128 => 16,
            KeyBits::Aes192 => 24,
            KeyBits::Aes256 => 32,
        }
    }

    /// Key length in bits.
    pub const fn bits(self) -> usize {
        self.key_len() * 8
    }
}

impl fmt::Display for KeyBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}", self.bits())
    }
}

/// Supported modes of operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// Electronic codebook.
    Ecb,
    /// Cipher block chaining with a trailing IV.
    #[default]
    Cbc,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModeKind::Ecb => Ecb::NAME,
            ModeKind::Cbc => Cbc::NAME,
        })
    }
}

/// Supported padding schemes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaddingKind {
    /// PKCS#7.
    #[default]
    Pkcs7,
    /// ANSI X9.23.
    AnsiX923,
}

impl fmt::Display for PaddingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaddingKind::Pkcs7 => Pkcs7::NAME,
            PaddingKind::AnsiX923 => AnsiX923::NAME,
        })
    }
}

/// Object-safe view of a [`Cipher`] instantiation.
pub trait Crypter: Send + Sync {
    /// Pads and encrypts `plaintext`.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;
    /// Decrypts `ciphertext` and strips its padding.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
    /// Ciphertext length for a plaintext of `plaintext_len` bytes.
    fn ciphertext_len(&self, plaintext_len: usize) -> usize;
}

impl<K, M, P, E> Crypter for Cipher<K, M, P, E>
where
    K: CipherKey,
    M: Mode,
    P: Padding,
    E: EntropySource + Send + Sync,
{
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Cipher::encrypt(self, plaintext)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        Cipher::decrypt(self, ciphertext)
    }

    fn ciphertext_len(&self, plaintext_len: usize) -> usize {
        Self::ciphertext_len(plaintext_len)
    }
}

/// Cipher parameters chosen at runtime. Defaults to AES-256/CBC/PKCS#7.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CipherConfig {
    /// Key size.
    pub bits: KeyBits,
    /// Mode of operation.
    pub mode: ModeKind,
    /// Padding scheme.
    pub padding: PaddingKind,
}

impl fmt::Display for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.bits, self.mode, self.padding)
    }
}

fn boxed<K, E>(key: K, mode: ModeKind, padding: PaddingKind, entropy: E) -> Box<dyn Crypter>
where
    K: CipherKey + 'static,
    E: EntropySource + Send + Sync + 'static,
{
    match (mode, padding) {
        (ModeKind::Ecb, PaddingKind::Pkcs7) => {
            Box::new(Cipher::<K, Ecb, Pkcs7, E>::with_entropy(key, entropy))
        }
        (ModeKind::Ecb, PaddingKind::AnsiX923) => {
            Box::new(Cipher::<K, Ecb, AnsiX923, E>::with_entropy(key, entropy))
        }
        (ModeKind::Cbc, PaddingKind::Pkcs7) => {
            Box::new(Cipher::<K, Cbc, Pkcs7, E>::with_entropy(key, entropy))
        }
        (ModeKind::Cbc, PaddingKind::AnsiX923) => {
            Box::new(Cipher::<K, Cbc, AnsiX923, E>::with_entropy(key, entropy))
        }
    }
}

impl CipherConfig {
    /// Creates a configuration from its parts.
    pub const fn new(bits: KeyBits, mode: ModeKind, padding: PaddingKind) -> Self {
        Self {
            bits,
            mode,
            padding,
        }
    }

    /// Builds a cipher over `key` using the hardware random source.
    pub fn build(&self, key: &[u8]) -> Result<Box<dyn Crypter>> {
        self.build_with_entropy(key, HardwareRng::new())
    }

    /// Builds a cipher over `key` drawing IVs from `entropy`.
    ///
    /// Fails with [`crate::Error::InvalidKeyLength`] when `key` does not match
    /// [`CipherConfig::bits`].
    pub fn build_with_entropy<E>(&self, key: &[u8], entropy: E) -> Result<Box<dyn Crypter>>
    where
        E: EntropySource + Send + Sync + 'static,
    {
        let cipher = match self.bits {
            KeyBits::Aes128 => boxed(
                Aes128Key::try_from(key)?,
                self.mode,
                self.padding,
                entropy,
            ),
            KeyBits::Aes192 => boxed(
                Aes192Key::try_from(key)?,
                self.mode,
                self.padding,
                entropy,
            ),
            KeyBits::Aes256 => boxed(
                Aes256Key::try_from(key)?,
                self.mode,
                self.padding,
                entropy,
            ),
        };
        log::debug!("built {self} cipher");
        Ok(cipher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::RngEntropy;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const ALL_BITS: [KeyBits; 3] = [KeyBits::Aes128, KeyBits::Aes192, KeyBits::Aes256];
    const ALL_MODES: [ModeKind; 2] = [ModeKind::Ecb, ModeKind::Cbc];
    const ALL_PADDINGS: [PaddingKind; 2] = [PaddingKind::Pkcs7, PaddingKind::AnsiX923];

    fn entropy() -> RngEntropy<ChaCha20Rng> {
        RngEntropy::new(ChaCha20Rng::from_seed([70u8; 32]))
    }

    #[test]
    fn default_is_aes256_cbc_pkcs7() {
        let config = CipherConfig::default();
        assert_eq!(
            config,
            CipherConfig::new(KeyBits::Aes256, ModeKind::Cbc, PaddingKind::Pkcs7)
        );
        assert_eq!(config.to_string(), "AES-256/CBC/PKCS#7");
    }

    #[test]
    fn every_configuration_round_trips() {
        for bits in ALL_BITS {
            let key: Vec<u8> = (0..bits.key_len() as u8).collect();
            for mode in ALL_MODES {
                for padding in ALL_PADDINGS {
                    let config = CipherConfig::new(bits, mode, padding);
                    let cipher = config.build_with_entropy(&key, entropy()).unwrap();
                    for len in [0usize, 5, 16, 33] {
                        let data = vec![0x5au8; len];
                        let ct = cipher.encrypt(&data).unwrap();
                        assert_eq!(ct.len(), cipher.ciphertext_len(len), "{config}");
                        assert_eq!(cipher.decrypt(&ct).unwrap(), data, "{config}");
                    }
                }
            }
        }
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        let config = CipherConfig::new(KeyBits::Aes192, ModeKind::Ecb, PaddingKind::Pkcs7);
        let err = config.build_with_entropy(&[0u8; 16], entropy()).err();
        assert_eq!(
            err,
            Some(Error::InvalidKeyLength {
                expected: 24,
                actual: 16
            })
        );
    }

    #[test]
    fn configs_with_different_padding_disagree() {
        let key = [1u8; 16];
        let pkcs = CipherConfig::new(KeyBits::Aes128, ModeKind::Ecb, PaddingKind::Pkcs7)
            .build_with_entropy(&key, entropy())
            .unwrap();
        let x923 = CipherConfig::new(KeyBits::Aes128, ModeKind::Ecb, PaddingKind::AnsiX923)
            .build_with_entropy(&key, entropy())
            .unwrap();
        let ct = pkcs.encrypt(b"hello").unwrap();
        assert_eq!(x923.decrypt(&ct), Err(Error::CorruptPadding));
    }
}
