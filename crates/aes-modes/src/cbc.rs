//! Cipher block chaining mode.
//!
//! Wire format: `[block_0] .. [block_n-1] [IV]`. The IV trails the
//! ciphertext instead of leading it; other CBC implementations expect it
//! first, so convert with [`split_iv`] when interoperating.

use aes_core::{
    as_block_mut, decrypt_block_in_place, encrypt_block_in_place, to_block, xor_in_place, Block,
    RoundKeys, BLOCK_SIZE,
};

use crate::entropy::EntropySource;
use crate::error::Result;
use crate::mode::{check_len, Mode};

/// CBC mode marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cbc;

fn as_block(chunk: &mut [u8]) -> &mut Block {
    as_block_mut(chunk).expect("chunks are exactly one block")
}

/// Splits a CBC wire buffer into its ciphertext blocks and trailing IV.
///
/// Returns `None` when the buffer is too short to hold an IV.
pub fn split_iv(data: &[u8]) -> Option<(&[u8], Block)> {
    let split = data.len().checked_sub(BLOCK_SIZE)?;
    let (blocks, iv) = data.split_at(split);
    Some((blocks, to_block(iv)?))
}

impl Cbc {
    /// Chains and encrypts `data` in place starting from `iv`, then appends `iv`.
    pub fn encrypt_with_iv(data: &mut Vec<u8>, round_keys: &RoundKeys, iv: &Block) -> Result<()> {
        check_len(data.len(), BLOCK_SIZE)?;

        let mut chain = *iv;
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            let block = as_block(chunk);
            xor_in_place(block, &chain);
            encrypt_block_in_place(block, round_keys);
            chain = *block;
        }

        data.extend_from_slice(iv);
        Ok(())
    }
}

impl Mode for Cbc {
    const NAME: &'static str = "CBC";
    const OVERHEAD: usize = BLOCK_SIZE;

    fn encrypt<E>(data: &mut Vec<u8>, round_keys: &RoundKeys, entropy: &E) -> Result<()>
    where
        E: EntropySource + ?Sized,
    {
        check_len(data.len(), BLOCK_SIZE)?;
        let iv = entropy.iv()?;
        Self::encrypt_with_iv(data, round_keys, &iv)
    }

    fn decrypt(data: &mut Vec<u8>, round_keys: &RoundKeys) -> Result<()> {
        check_len(data.len(), Self::MIN_CIPHERTEXT_LEN)?;

        let body_len = data.len() - BLOCK_SIZE;
        let (body, iv) = data.split_at_mut(body_len);
        let mut chain = to_block(iv).expect("IV is exactly one block");

        for chunk in body.chunks_exact_mut(BLOCK_SIZE) {
            let block = as_block(chunk);
            let saved = *block;
            decrypt_block_in_place(block, round_keys);
            xor_in_place(block, &chain);
            chain = saved;
        }

        data.truncate(body_len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::RngEntropy;
    use crate::error::Error;
    use aes_core::{expand_key, Aes128Key};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];
    const IV: Block = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const PLAIN: [u8; 32] = [
        0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93, 0x17,
        0x2a, 0xae, 0x2d, 0x8a, 0x57, 0x1e, 0x03, 0xac, 0x9c, 0x9e, 0xb7, 0x6f, 0xac, 0x45, 0xaf,
        0x8e, 0x51,
    ];
    const CIPHER: [u8; 32] = [
        0x76, 0x49, 0xab, 0xac, 0x81, 0x19, 0xb2, 0x46, 0xce, 0xe9, 0x8e, 0x9b, 0x12, 0xe9, 0x19,
        0x7d, 0x50, 0x86, 0xcb, 0x9b, 0x50, 0x72, 0x19, 0xee, 0x95, 0xdb, 0x11, 0x3a, 0x91, 0x76,
        0x78, 0xb2,
    ];

    #[test]
    fn sp800_38a_cbc_aes128_with_trailing_iv() {
        let rks = expand_key(&Aes128Key::from(KEY));
        let mut data = PLAIN.to_vec();
        Cbc::encrypt_with_iv(&mut data, &rks, &IV).unwrap();
        assert_eq!(data.len(), 48);
        assert_eq!(&data[..32], &CIPHER);
        assert_eq!(&data[32..], &IV);

        let (blocks, iv) = split_iv(&data).unwrap();
        assert_eq!(blocks, &CIPHER);
        assert_eq!(iv, IV);

        Cbc::decrypt(&mut data, &rks).unwrap();
        assert_eq!(data, PLAIN);
    }

    #[test]
    fn encrypt_draws_iv_from_entropy_source() {
        let rks = expand_key(&Aes128Key::from(KEY));
        let entropy = RngEntropy::new(ChaCha20Rng::from_seed([60u8; 32]));
        let expected_iv = RngEntropy::new(ChaCha20Rng::from_seed([60u8; 32]))
            .iv()
            .unwrap();

        let mut data = PLAIN.to_vec();
        Cbc::encrypt(&mut data, &rks, &entropy).unwrap();
        assert_eq!(&data[32..], &expected_iv);

        Cbc::decrypt(&mut data, &rks).unwrap();
        assert_eq!(data, PLAIN);
    }

    #[test]
    fn identical_blocks_are_chained_apart() {
        let rks = expand_key(&Aes128Key::from(KEY));
        let mut data = vec![0x42u8; 3 * BLOCK_SIZE];
        Cbc::encrypt_with_iv(&mut data, &rks, &IV).unwrap();
        assert_ne!(&data[..16], &data[16..32]);
        assert_ne!(&data[16..32], &data[32..48]);
    }

    #[test]
    fn decrypt_needs_a_block_and_an_iv() {
        let rks = expand_key(&Aes128Key::from(KEY));
        let mut iv_only = vec![0u8; 16];
        assert!(matches!(
            Cbc::decrypt(&mut iv_only, &rks),
            Err(Error::InvalidLength { len: 16, .. })
        ));
        let mut unaligned = vec![0u8; 40];
        assert!(Cbc::decrypt(&mut unaligned, &rks).is_err());
        assert!(split_iv(&[0u8; 15]).is_none());
    }
}
