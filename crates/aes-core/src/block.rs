//! Block representation helpers.

use core::convert::TryInto;

/// Size of an AES block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// AES block of 16 bytes, column-major 4×4 state.
pub type Block = [u8; BLOCK_SIZE];

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Views a slice of exactly [`BLOCK_SIZE`] bytes as a block.
///
/// Returns `None` for any other length.
#[inline]
pub fn as_block_mut(bytes: &mut [u8]) -> Option<&mut Block> {
    bytes.try_into().ok()
}

/// Copies a slice of exactly [`BLOCK_SIZE`] bytes into a block.
#[inline]
pub fn to_block(bytes: &[u8]) -> Option<Block> {
    bytes.try_into().ok()
}
