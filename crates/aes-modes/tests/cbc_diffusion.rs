//! Error propagation behaviour of CBC and ECB.

use aes_core::{expand_key, Aes256Key, Block, RoundKeys, BLOCK_SIZE};
use aes_modes::{Cbc, Ecb, Mode};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

const BLOCKS: usize = 6;

fn setup() -> (RoundKeys, Block, Vec<u8>) {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);
    let mut key = [0u8; 32];
    let mut iv = [0u8; 16];
    let mut data = vec![0u8; BLOCKS * BLOCK_SIZE];
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut iv);
    rng.fill_bytes(&mut data);
    (expand_key(&Aes256Key::from(key)), iv, data)
}

fn blocks_differ(a: &[u8], b: &[u8]) -> Vec<bool> {
    a.chunks_exact(BLOCK_SIZE)
        .zip(b.chunks_exact(BLOCK_SIZE))
        .map(|(x, y)| x != y)
        .collect()
}

#[test]
fn plaintext_bit_flip_changes_every_later_cbc_block() {
    let (rks, iv, data) = setup();
    for target in 0..BLOCKS {
        let mut clean = data.clone();
        let mut flipped = data.clone();
        flipped[target * BLOCK_SIZE + 3] ^= 0x10;
        Cbc::encrypt_with_iv(&mut clean, &rks, &iv).unwrap();
        Cbc::encrypt_with_iv(&mut flipped, &rks, &iv).unwrap();

        let body = BLOCKS * BLOCK_SIZE;
        let changed = blocks_differ(&clean[..body], &flipped[..body]);
        for (idx, &differs) in changed.iter().enumerate() {
            assert_eq!(differs, idx >= target, "target {target} block {idx}");
        }
        assert_eq!(&clean[body..], &flipped[body..]);
    }
}

#[test]
fn plaintext_bit_flip_stays_local_in_ecb() {
    let (rks, _, data) = setup();
    let mut clean = data.clone();
    let mut flipped = data;
    flipped[2 * BLOCK_SIZE] ^= 0x01;
    Ecb::encrypt_blocks(&mut clean, &rks).unwrap();
    Ecb::encrypt_blocks(&mut flipped, &rks).unwrap();

    let changed = blocks_differ(&clean, &flipped);
    let expected: Vec<bool> = (0..BLOCKS).map(|idx| idx == 2).collect();
    assert_eq!(changed, expected);
}

#[test]
fn ciphertext_bit_flip_garbles_one_block_and_flips_the_next() {
    let (rks, iv, data) = setup();
    let mut ct = data.clone();
    Cbc::encrypt_with_iv(&mut ct, &rks, &iv).unwrap();

    let target = 2;
    let offset = target * BLOCK_SIZE + 5;
    ct[offset] ^= 0x80;
    Cbc::decrypt(&mut ct, &rks).unwrap();

    let changed = blocks_differ(&data, &ct);
    for (idx, &differs) in changed.iter().enumerate() {
        assert_eq!(differs, idx == target || idx == target + 1, "block {idx}");
    }
    // The following block differs in exactly the flipped bit.
    assert_eq!(ct[offset + BLOCK_SIZE] ^ data[offset + BLOCK_SIZE], 0x80);
    for idx in (target + 1) * BLOCK_SIZE..(target + 2) * BLOCK_SIZE {
        if idx != offset + BLOCK_SIZE {
            assert_eq!(ct[idx], data[idx]);
        }
    }
}

#[test]
fn iv_bit_flip_only_touches_first_block() {
    let (rks, iv, data) = setup();
    let mut ct = data.clone();
    Cbc::encrypt_with_iv(&mut ct, &rks, &iv).unwrap();
    let iv_offset = ct.len() - BLOCK_SIZE;
    ct[iv_offset + 7] ^= 0x04;
    Cbc::decrypt(&mut ct, &rks).unwrap();

    assert_eq!(ct[7], data[7] ^ 0x04);
    ct[7] ^= 0x04;
    assert_eq!(ct, data);
}
