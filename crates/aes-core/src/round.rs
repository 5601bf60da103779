//! AES round transformations.
//!
//! The state is column-major: byte `r + 4c` is row `r`, column `c`.

use crate::block::{xor_in_place, Block, BLOCK_SIZE};
use crate::gf::fast_mul;
use crate::sbox::{inv_sbox, sbox, MUL_TABLES};

/// Applies SubBytes to the state in place.
#[inline]
pub fn sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = sbox(*byte);
    }
}

/// Applies the inverse SubBytes transformation.
#[inline]
pub fn inv_sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = inv_sbox(*byte);
    }
}

/// Source index for each output position when row `r` rotates left by `r`.
const SHIFT_ROWS: [usize; BLOCK_SIZE] = shift_table(false);
/// Source index for each output position when row `r` rotates right by `r`.
const INV_SHIFT_ROWS: [usize; BLOCK_SIZE] = shift_table(true);

const fn shift_table(inverse: bool) -> [usize; BLOCK_SIZE] {
    let mut table = [0usize; BLOCK_SIZE];
    let mut col = 0;
    while col < 4 {
        let mut row = 0;
        while row < 4 {
            let src_col = if inverse {
                (col + 4 - row) % 4
            } else {
                (col + row) % 4
            };
            table[row + 4 * col] = row + 4 * src_col;
            row += 1;
        }
        col += 1;
    }
    table
}

#[inline]
fn permute(state: &mut Block, table: &[usize; BLOCK_SIZE]) {
    let src = *state;
    for (dst, &idx) in state.iter_mut().zip(table.iter()) {
        *dst = src[idx];
    }
}

/// Performs ShiftRows in place.
#[inline]
pub fn shift_rows(state: &mut Block) {
    permute(state, &SHIFT_ROWS);
}

/// Performs the inverse of ShiftRows in place.
#[inline]
pub fn inv_shift_rows(state: &mut Block) {
    permute(state, &INV_SHIFT_ROWS);
}

/// MixColumns as the product with the circulant matrix `{02, 03, 01, 01}`.
pub fn mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [column[0], column[1], column[2], column[3]];
        column[0] = fast_mul(2, a0) ^ fast_mul(3, a1) ^ a2 ^ a3;
        column[1] = a0 ^ fast_mul(2, a1) ^ fast_mul(3, a2) ^ a3;
        column[2] = a0 ^ a1 ^ fast_mul(2, a2) ^ fast_mul(3, a3);
        column[3] = fast_mul(3, a0) ^ a1 ^ a2 ^ fast_mul(2, a3);
    }
}

/// MixColumns via the column sum: `out[i] = in[i] ^ e ^ 2·(in[i] ^ in[i+1])`.
///
/// Equivalent to [`mix_columns`] with one multiplication per byte. This is the
/// form the encryption pipeline uses.
#[inline]
pub fn mix_columns_xor(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        let first = column[0];
        let e = column[0] ^ column[1] ^ column[2] ^ column[3];
        column[0] ^= e ^ fast_mul(2, column[0] ^ column[1]);
        column[1] ^= e ^ fast_mul(2, column[1] ^ column[2]);
        column[2] ^= e ^ fast_mul(2, column[2] ^ column[3]);
        column[3] ^= e ^ fast_mul(2, column[3] ^ first);
    }
}

/// MixColumns using the precomputed `x·02` table instead of log lookups.
#[inline]
pub fn mix_columns_table(state: &mut Block) {
    let mul2 = &MUL_TABLES.mul2;
    for column in state.chunks_exact_mut(4) {
        let first = column[0];
        let e = column[0] ^ column[1] ^ column[2] ^ column[3];
        column[0] ^= e ^ mul2[(column[0] ^ column[1]) as usize];
        column[1] ^= e ^ mul2[(column[1] ^ column[2]) as usize];
        column[2] ^= e ^ mul2[(column[2] ^ column[3]) as usize];
        column[3] ^= e ^ mul2[(column[3] ^ first) as usize];
    }
}

/// Inverse MixColumns as the product with `{0e, 0b, 0d, 09}`.
pub fn inv_mix_columns(state: &mut Block) {
    const ROW: [u8; 4] = [0x0e, 0x0b, 0x0d, 0x09];
    for column in state.chunks_exact_mut(4) {
        let input = [column[0], column[1], column[2], column[3]];
        for (row, out) in column.iter_mut().enumerate() {
            *out = (0..4).fold(0, |acc, col| acc ^ fast_mul(ROW[(col + 4 - row) % 4], input[col]));
        }
    }
}

/// Inverse MixColumns reading the coefficient product tables.
pub fn inv_mix_columns_table(state: &mut Block) {
    let t = &MUL_TABLES;
    for column in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [
            column[0] as usize,
            column[1] as usize,
            column[2] as usize,
            column[3] as usize,
        ];
        column[0] = t.mul14[a0] ^ t.mul11[a1] ^ t.mul13[a2] ^ t.mul9[a3];
        column[1] = t.mul9[a0] ^ t.mul14[a1] ^ t.mul11[a2] ^ t.mul13[a3];
        column[2] = t.mul13[a0] ^ t.mul9[a1] ^ t.mul14[a2] ^ t.mul11[a3];
        column[3] = t.mul11[a0] ^ t.mul13[a1] ^ t.mul9[a2] ^ t.mul14[a3];
    }
}

/// Adds (XORs) a round key into the state.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn sequential() -> Block {
        core::array::from_fn(|i| i as u8)
    }

    #[test]
    fn shift_rows_moves_each_row_left() {
        let mut state = sequential();
        shift_rows(&mut state);
        assert_eq!(
            state,
            [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11]
        );
    }

    #[test]
    fn inv_shift_rows_moves_each_row_right() {
        let mut state = sequential();
        inv_shift_rows(&mut state);
        assert_eq!(
            state,
            [0, 13, 10, 7, 4, 1, 14, 11, 8, 5, 2, 15, 12, 9, 6, 3]
        );
    }

    #[test]
    fn shift_rows_round_trip() {
        let mut state = sequential();
        shift_rows(&mut state);
        inv_shift_rows(&mut state);
        assert_eq!(state, sequential());
    }

    #[test]
    fn mix_columns_known_column() {
        // Column db 13 53 45 -> 8e 4d a1 bc.
        let mut state = [0u8; 16];
        state[..4].copy_from_slice(&[0xdb, 0x13, 0x53, 0x45]);
        state[4..8].copy_from_slice(&[0xf2, 0x0a, 0x22, 0x5c]);
        state[8..12].copy_from_slice(&[0x01, 0x01, 0x01, 0x01]);
        state[12..].copy_from_slice(&[0xc6, 0xc6, 0xc6, 0xc6]);
        mix_columns(&mut state);
        assert_eq!(&state[..4], &[0x8e, 0x4d, 0xa1, 0xbc]);
        assert_eq!(&state[4..8], &[0x9f, 0xdc, 0x58, 0x9d]);
        assert_eq!(&state[8..12], &[0x01, 0x01, 0x01, 0x01]);
        assert_eq!(&state[12..], &[0xc6, 0xc6, 0xc6, 0xc6]);
    }

    #[test]
    fn mix_columns_formulations_agree() {
        let mut rng = ChaCha20Rng::from_seed([30u8; 32]);
        for _ in 0..256 {
            let mut state = [0u8; 16];
            rng.fill_bytes(&mut state);
            let mut matrix = state;
            let mut xor_sum = state;
            let mut table = state;
            mix_columns(&mut matrix);
            mix_columns_xor(&mut xor_sum);
            mix_columns_table(&mut table);
            assert_eq!(matrix, xor_sum);
            assert_eq!(matrix, table);
        }
    }

    #[test]
    fn inverse_mix_columns_formulations_agree_and_invert() {
        let mut rng = ChaCha20Rng::from_seed([31u8; 32]);
        for _ in 0..256 {
            let mut state = [0u8; 16];
            rng.fill_bytes(&mut state);
            let mut mixed = state;
            mix_columns_xor(&mut mixed);
            let mut matrix = mixed;
            let mut table = mixed;
            inv_mix_columns(&mut matrix);
            inv_mix_columns_table(&mut table);
            assert_eq!(matrix, state);
            assert_eq!(table, state);
        }
    }

    #[test]
    fn sub_bytes_round_trip() {
        let mut state = sequential();
        sub_bytes(&mut state);
        assert_eq!(state[0], 0x63);
        inv_sub_bytes(&mut state);
        assert_eq!(state, sequential());
    }

    #[test]
    fn add_round_key_twice_is_identity() {
        let key = [0xa5u8; 16];
        let mut state = sequential();
        add_round_key(&mut state, &key);
        assert_ne!(state, sequential());
        add_round_key(&mut state, &key);
        assert_eq!(state, sequential());
    }
}
