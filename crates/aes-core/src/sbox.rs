//! Substitution boxes, round constants and coefficient product tables.
//!
//! Everything here is derived from [`crate::gf`] in const context, so the
//! tables exist before any cipher is constructed and are never written.

use crate::gf::{rotl8, LOG};

/// Forward and inverse S-boxes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubTables {
    /// Forward substitution.
    pub sbox: [u8; 256],
    /// Inverse substitution.
    pub inv_sbox: [u8; 256],
}

impl SubTables {
    /// Derives both S-boxes from field inverses and the FIPS-197 affine map.
    pub const fn compute() -> Self {
        let mut sbox = [0u8; 256];
        let mut inv_sbox = [0u8; 256];

        // 0 has no inverse; the affine map of 0 is the constant alone.
        sbox[0] = 0x63;
        let mut i = 1;
        while i < 256 {
            let inv = LOG.inv(i as u8);
            sbox[i] = inv ^ rotl8(inv, 1) ^ rotl8(inv, 2) ^ rotl8(inv, 3) ^ rotl8(inv, 4) ^ 0x63;
            i += 1;
        }

        let mut i = 0;
        while i < 256 {
            let b = i as u8;
            let affine_inv = rotl8(b, 1) ^ rotl8(b, 3) ^ rotl8(b, 6) ^ 0x05;
            inv_sbox[i] = LOG.inv(affine_inv);
            i += 1;
        }

        Self { sbox, inv_sbox }
    }
}

/// Products of every byte with the MixColumns coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MulTables {
    /// `x * 0x02`
    pub mul2: [u8; 256],
    /// `x * 0x03`
    pub mul3: [u8; 256],
    /// `x * 0x09`
    pub mul9: [u8; 256],
    /// `x * 0x0b`
    pub mul11: [u8; 256],
    /// `x * 0x0d`
    pub mul13: [u8; 256],
    /// `x * 0x0e`
    pub mul14: [u8; 256],
}

impl MulTables {
    /// Fills every table with [`crate::gf::LogTables::mul`].
    pub const fn compute() -> Self {
        Self {
            mul2: products(0x02),
            mul3: products(0x03),
            mul9: products(0x09),
            mul11: products(0x0b),
            mul13: products(0x0d),
            mul14: products(0x0e),
        }
    }
}

const fn products(coefficient: u8) -> [u8; 256] {
    let mut out = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        out[i] = LOG.mul(i as u8, coefficient);
        i += 1;
    }
    out
}

/// Number of round constants kept. AES-128 consumes ten, AES-256 seven.
pub const RCON_LEN: usize = 14;

const fn compute_rcon() -> [u8; RCON_LEN] {
    let mut rcon = [0u8; RCON_LEN];
    rcon[0] = 1;
    let mut i = 1;
    while i < RCON_LEN {
        rcon[i] = LOG.mul(rcon[i - 1], 2);
        i += 1;
    }
    rcon
}

/// Shared S-boxes.
pub static SUB_TABLES: SubTables = SubTables::compute();

/// Shared coefficient product tables.
pub static MUL_TABLES: MulTables = MulTables::compute();

/// Round constants `x^(i)` for the key schedule.
pub static RCON: [u8; RCON_LEN] = compute_rcon();

/// Forward S-box lookup.
#[inline]
pub fn sbox(byte: u8) -> u8 {
    SUB_TABLES.sbox[byte as usize]
}

/// Inverse S-box lookup.
#[inline]
pub fn inv_sbox(byte: u8) -> u8 {
    SUB_TABLES.inv_sbox[byte as usize]
}
