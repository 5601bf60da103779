//! Block padding schemes.

use aes_core::BLOCK_SIZE;

/// Smallest padding the cipher facade appends: one whole block.
pub const MIN_PADDING: usize = BLOCK_SIZE;
/// Largest padding the cipher facade appends.
pub const MAX_PADDING: usize = 2 * BLOCK_SIZE - 1;

/// Number of padding bytes the facade appends to a plaintext of `len` bytes.
///
/// Always one full block plus whatever aligns `len` to the block size, so
/// the result lies in `MIN_PADDING..=MAX_PADDING`.
pub const fn padding_len(len: usize) -> usize {
    (BLOCK_SIZE - len % BLOCK_SIZE) % BLOCK_SIZE + BLOCK_SIZE
}

/// A reversible padding scheme whose last byte is the pad length.
pub trait Padding {
    /// Human-readable scheme name.
    const NAME: &'static str;

    /// Appends `pad_size` bytes of padding to `buf`.
    ///
    /// `pad_size` must be at least 1.
    fn apply(buf: &mut Vec<u8>, pad_size: u8);

    /// Returns the pad length encoded at the end of `buf`, or 0 when the
    /// trailing bytes are not valid padding for this scheme.
    fn detect(buf: &[u8]) -> u8;
}

/// Splits off the claimed pad length and the padding bytes preceding the last one.
fn trailer(buf: &[u8]) -> Option<(u8, &[u8])> {
    let (&last, rest) = buf.split_last()?;
    let size = last as usize;
    if size == 0 || size > buf.len() {
        return None;
    }
    Some((last, &rest[rest.len() - (size - 1)..]))
}

/// PKCS#7: every pad byte holds the pad length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pkcs7;

impl Padding for Pkcs7 {
    const NAME: &'static str = "PKCS#7";

    fn apply(buf: &mut Vec<u8>, pad_size: u8) {
        debug_assert!(pad_size > 0);
        buf.resize(buf.len() + pad_size as usize, pad_size);
    }

    fn detect(buf: &[u8]) -> u8 {
        match trailer(buf) {
            Some((size, fill)) if fill.iter().all(|&b| b == size) => size,
            _ => 0,
        }
    }
}

/// ANSI X9.23: zero bytes followed by the pad length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnsiX923;

impl Padding for AnsiX923 {
    const NAME: &'static str = "ANSI X9.23";

    fn apply(buf: &mut Vec<u8>, pad_size: u8) {
        debug_assert!(pad_size > 0);
        buf.resize(buf.len() + pad_size as usize - 1, 0);
        buf.push(pad_size);
    }

    fn detect(buf: &[u8]) -> u8 {
        match trailer(buf) {
            Some((size, fill)) if fill.iter().all(|&b| b == 0) => size,
            _ => 0,
        }
    }
}
