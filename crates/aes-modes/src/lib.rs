//! Modes of operation, padding and a cipher facade over `aes-core`.
//!
//! This crate provides:
//! - [`Ecb`] and [`Cbc`] modes. CBC appends its IV after the ciphertext.
//! - [`Pkcs7`] and [`AnsiX923`] padding.
//! - [`Cipher`], which binds a key size, mode and padding scheme at compile
//!   time, and [`CipherConfig`] for choosing them at runtime.
//! - IV sources: [`HardwareRng`] (RDRAND with bounded retries),
//!   [`OsEntropy`] and [`RngEntropy`].
//!
//! ```
//! use aes_modes::{CipherConfig, KeyBits, ModeKind, OsEntropy, PaddingKind};
//!
//! let config = CipherConfig::new(KeyBits::Aes128, ModeKind::Cbc, PaddingKind::AnsiX923);
//! let cipher = config.build_with_entropy(&[0x11; 16], OsEntropy).unwrap();
//! let ct = cipher.encrypt(b"hello").unwrap();
//! assert_eq!(ct.len(), 48);
//! assert_eq!(cipher.decrypt(&ct).unwrap(), b"hello");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]

mod cbc;
mod cipher;
mod config;
mod ecb;
mod entropy;
mod error;
mod mode;
mod padding;

pub use crate::cbc::{split_iv, Cbc};
pub use crate::cipher::Cipher;
pub use crate::config::{CipherConfig, Crypter, KeyBits, ModeKind, PaddingKind};
pub use crate::ecb::{Ecb, PARALLEL_THRESHOLD};
pub use crate::entropy::{
    EntropySource, HardwareRng, OsEntropy, RngEntropy, DEFAULT_RDRAND_RETRIES,
};
pub use crate::error::{Error, Result};
pub use crate::mode::Mode;
pub use crate::padding::{padding_len, AnsiX923, Padding, Pkcs7, MAX_PADDING, MIN_PADDING};
