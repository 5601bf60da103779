//! AES key schedule and block encryption/decryption for all three key sizes.

use core::convert::TryInto;

use crate::block::Block;
use crate::key::{CipherKey, RoundKeys, MAX_ROUNDS};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns_xor, shift_rows,
    sub_bytes,
};
use crate::sbox::{sbox, RCON};

type Word = [u8; 4];

const MAX_WORDS: usize = 4 * (MAX_ROUNDS + 1);

fn rot_word(word: Word) -> Word {
    [word[1], word[2], word[3], word[0]]
}

fn sub_word(word: Word) -> Word {
    word.map(sbox)
}

fn xor_word(a: Word, b: Word) -> Word {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

/// Expands a 128, 192 or 256-bit key into `NR + 1` round keys (FIPS-197 §5.2).
pub fn expand_key<K: CipherKey>(key: &K) -> RoundKeys {
    let nk = K::NK;
    let total = 4 * (K::NR + 1);
    let mut w = [[0u8; 4]; MAX_WORDS];

    for (word, chunk) in w.iter_mut().zip(key.as_bytes().chunks_exact(4)) {
        *word = chunk.try_into().expect("chunk length is four");
    }

    for i in nk..total {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = sub_word(rot_word(temp));
            temp[0] ^= RCON[i / nk - 1];
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        w[i] = xor_word(w[i - nk], temp);
    }

    RoundKeys::from_words(&w[..total], K::NR)
}

/// Encrypts a block in place with pre-expanded round keys.
pub fn encrypt_block_in_place(state: &mut Block, round_keys: &RoundKeys) {
    let rounds = round_keys.rounds();

    add_round_key(state, round_keys.get(0));

    for round in 1..rounds {
        sub_bytes(state);
        shift_rows(state);
        mix_columns_xor(state);
        add_round_key(state, round_keys.get(round));
    }

    sub_bytes(state);
    shift_rows(state);
    add_round_key(state, round_keys.get(rounds));
}

/// Decrypts a block in place with pre-expanded round keys.
pub fn decrypt_block_in_place(state: &mut Block, round_keys: &RoundKeys) {
    let rounds = round_keys.rounds();

    add_round_key(state, round_keys.get(rounds));
    for round in (1..rounds).rev() {
        inv_shift_rows(state);
        inv_sub_bytes(state);
        add_round_key(state, round_keys.get(round));
        inv_mix_columns(state);
    }
    inv_shift_rows(state);
    inv_sub_bytes(state);
    add_round_key(state, round_keys.get(0));
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let mut state = *block;
    encrypt_block_in_place(&mut state, round_keys);
    state
}

/// Decrypts a single 16-byte block with pre-expanded round keys.
pub fn decrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let mut state = *block;
    decrypt_block_in_place(&mut state, round_keys);
    state
}
