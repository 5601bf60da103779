//! Arithmetic in GF(2^8) modulo `x^8 + x^4 + x^3 + x + 1`.
//!
//! Two multiplication routines are provided. [`mul`] is the shift-and-add
//! ("peasant") algorithm and is only used to build the log/antilog tables;
//! [`fast_mul`] and [`fast_inv`] read those tables at runtime.

/// Low byte of the reduction polynomial (`0x11b`).
pub const REDUCTION: u8 = 0x1b;

/// Generator of the multiplicative group used to build the log tables.
const GENERATOR: u8 = 0x03;

/// Field addition (XOR).
#[inline]
pub const fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Field multiplication by repeated doubling with conditional reduction.
pub const fn mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while a != 0 && b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        let carry = a & 0x80;
        a <<= 1;
        if carry != 0 {
            a ^= REDUCTION;
        }
        b >>= 1;
    }
    product
}

/// Rotates `value` left by `count` bits.
#[inline]
pub const fn rotl8(value: u8, count: u32) -> u8 {
    value.rotate_left(count)
}

/// Logarithm and antilogarithm tables over generator `0x03`.
///
/// `antilog` is oversized to 510 entries so that `log[a] + log[b]` can index
/// it directly without reducing modulo 255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogTables {
    /// `log[g^i] = i` for `i < 255`; `log[0]` is unused and left at 0.
    pub log: [u8; 256],
    /// `antilog[i] = g^i` for `i < 510`.
    pub antilog: [u8; 510],
}

impl LogTables {
    /// Builds both tables with [`mul`].
    pub const fn compute() -> Self {
        let mut log = [0u8; 256];
        let mut antilog = [0u8; 510];
        let mut x = 1u8;
        let mut i = 0;
        while i < 510 {
            if i < 255 {
                log[x as usize] = i as u8;
            }
            antilog[i] = x;
            x = mul(x, GENERATOR);
            i += 1;
        }
        Self { log, antilog }
    }

    /// Table-driven multiplication. Zero absorbs, since `log[0]` is undefined.
    #[inline]
    pub const fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = self.log[a as usize] as usize + self.log[b as usize] as usize;
        self.antilog[sum]
    }

    /// Multiplicative inverse; `0` maps to `0` by convention.
    #[inline]
    pub const fn inv(&self, a: u8) -> u8 {
        if a == 0 {
            return 0;
        }
        self.antilog[255 - self.log[a as usize] as usize]
    }
}

pub(crate) const LOG: LogTables = LogTables::compute();

/// Process-wide log/antilog tables, evaluated at compile time.
pub static LOG_TABLES: LogTables = LOG;

/// Multiplies two field elements using [`LOG_TABLES`].
#[inline]
pub fn fast_mul(a: u8, b: u8) -> u8 {
    LOG_TABLES.mul(a, b)
}

/// Returns the multiplicative inverse of `a`, or 0 for `a == 0`.
#[inline]
pub fn fast_inv(a: u8) -> u8 {
    LOG_TABLES.inv(a)
}
