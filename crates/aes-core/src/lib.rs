//! Table-driven AES (FIPS-197) for 128, 192 and 256-bit keys.
//!
//! This crate provides:
//! - GF(2^8) arithmetic and the derived S-box, round-constant and product
//!   tables, all evaluated at compile time.
//! - The key schedule for every key size.
//! - The round primitives and single-block encryption and decryption.
//!
//! Modes of operation and padding live in `aes-modes`. Substitution is
//! table-based; no constant-time guarantees are made.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
pub mod gf;
mod key;
pub mod round;
mod sbox;

pub use crate::block::{as_block_mut, to_block, xor_in_place, Block, BLOCK_SIZE};
pub use crate::cipher::{
    decrypt_block, decrypt_block_in_place, encrypt_block, encrypt_block_in_place, expand_key,
};
pub use crate::key::{
    Aes128Key, Aes192Key, Aes256Key, AesKey, CipherKey, KeyLengthError, RoundKeys, MAX_ROUNDS,
};
pub use crate::sbox::{inv_sbox, sbox, MulTables, SubTables, MUL_TABLES, RCON, SUB_TABLES};
