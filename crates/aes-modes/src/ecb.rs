//! Electronic codebook mode.
//!
//! Blocks are independent, so identical plaintext blocks always encrypt to
//! identical ciphertext blocks. That is inherent to ECB and kept as-is. The
//! independence also lets large buffers fan out across the rayon pool, each
//! worker owning a disjoint run of blocks.

use aes_core::{
    as_block_mut, decrypt_block_in_place, encrypt_block_in_place, Block, RoundKeys, BLOCK_SIZE,
};
use rayon::prelude::*;

use crate::entropy::EntropySource;
use crate::error::Result;
use crate::mode::{check_len, Mode};

/// Buffers with fewer blocks than this are processed on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 64;

/// Minimum number of blocks handed to one rayon task.
const MIN_BLOCKS_PER_TASK: usize = 16;

/// ECB mode marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ecb;

fn as_block(chunk: &mut [u8]) -> &mut Block {
    as_block_mut(chunk).expect("chunks are exactly one block")
}

impl Ecb {
    /// Transforms every block of `data` with `f`, in parallel for large buffers.
    ///
    /// `data.len()` must be a multiple of [`BLOCK_SIZE`].
    fn for_each_block(data: &mut [u8], round_keys: &RoundKeys, f: fn(&mut Block, &RoundKeys)) {
        let blocks = data.len() / BLOCK_SIZE;
        if blocks < PARALLEL_THRESHOLD {
            for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
                f(as_block(chunk), round_keys);
            }
            return;
        }

        log::trace!("ECB: dispatching {blocks} blocks to the rayon pool");
        data.par_chunks_exact_mut(BLOCK_SIZE)
            .with_min_len(MIN_BLOCKS_PER_TASK)
            .for_each(|chunk| f(as_block(chunk), round_keys));
    }

    /// Encrypts a block-aligned slice in place.
    pub fn encrypt_blocks(data: &mut [u8], round_keys: &RoundKeys) -> Result<()> {
        check_len(data.len(), BLOCK_SIZE)?;
        Self::for_each_block(data, round_keys, encrypt_block_in_place);
        Ok(())
    }

    /// Decrypts a block-aligned slice in place.
    pub fn decrypt_blocks(data: &mut [u8], round_keys: &RoundKeys) -> Result<()> {
        check_len(data.len(), BLOCK_SIZE)?;
        Self::for_each_block(data, round_keys, decrypt_block_in_place);
        Ok(())
    }
}

impl Mode for Ecb {
    const NAME: &'static str = "ECB";
    const OVERHEAD: usize = 0;

    fn encrypt<E>(data: &mut Vec<u8>, round_keys: &RoundKeys, _entropy: &E) -> Result<()>
    where
        E: EntropySource + ?Sized,
    {
        Self::encrypt_blocks(data, round_keys)
    }

    fn decrypt(data: &mut Vec<u8>, round_keys: &RoundKeys) -> Result<()> {
        Self::decrypt_blocks(data, round_keys)
    }
}
