//! Cipher facade binding a key size, mode and padding scheme.

use core::fmt;
use core::marker::PhantomData;

use aes_core::{expand_key, CipherKey, RoundKeys};

use crate::entropy::{EntropySource, HardwareRng};
use crate::error::{Error, Result};
use crate::mode::Mode;
use crate::padding::{padding_len, Padding, MAX_PADDING, MIN_PADDING};

/// AES cipher with a fixed key size `K`, mode `M` and padding `P`.
///
/// The key schedule is expanded once in the constructor and never changes,
/// so `encrypt` and `decrypt` take `&self` and may run concurrently. IVs for
/// CBC come from `E`, the CPU's hardware generator unless another source is
/// supplied through [`Cipher::with_entropy`].
///
/// ```
/// use aes_core::Aes256Key;
/// use aes_modes::{Cbc, Cipher, OsEntropy, Pkcs7};
///
/// let key = Aes256Key::from([7u8; 32]);
/// let cipher = Cipher::<_, Cbc, Pkcs7, _>::with_entropy(key, OsEntropy);
/// let ct = cipher.encrypt(b"attack at dawn").unwrap();
/// assert_eq!(cipher.decrypt(&ct).unwrap(), b"attack at dawn");
/// ```
pub struct Cipher<K, M, P, E = HardwareRng> {
    round_keys: RoundKeys,
    entropy: E,
    _params: PhantomData<fn() -> (K, M, P)>,
}

impl<K, M, P> Cipher<K, M, P, HardwareRng>
where
    K: CipherKey,
    M: Mode,
    P: Padding,
{
    /// Expands `key` and binds the hardware random source.
    pub fn new(key: K) -> Self {
        Self::with_entropy(key, HardwareRng::new())
    }
}

impl<K, M, P, E> Cipher<K, M, P, E>
where
    K: CipherKey,
    M: Mode,
    P: Padding,
    E: EntropySource,
{
    /// Expands `key` and binds `entropy` as the IV source.
    pub fn with_entropy(key: K, entropy: E) -> Self {
        let round_keys = expand_key(&key);
        log::debug!(
            "AES-{}/{}/{} cipher ready ({} rounds)",
            K::BITS,
            M::NAME,
            P::NAME,
            round_keys.rounds()
        );
        Self {
            round_keys,
            entropy,
            _params: PhantomData,
        }
    }

    /// Ciphertext length produced for a plaintext of `plaintext_len` bytes.
    pub const fn ciphertext_len(plaintext_len: usize) -> usize {
        plaintext_len + padding_len(plaintext_len) + M::OVERHEAD
    }

    /// The expanded key schedule.
    pub fn round_keys(&self) -> &RoundKeys {
        &self.round_keys
    }

    /// The IV source.
    pub fn entropy(&self) -> &E {
        &self.entropy
    }

    /// Pads and encrypts `plaintext`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let pad_size = padding_len(plaintext.len());
        let mut buf = Vec::with_capacity(Self::ciphertext_len(plaintext.len()));
        buf.extend_from_slice(plaintext);
        // padding_len never exceeds MAX_PADDING, which fits in a byte.
        P::apply(&mut buf, pad_size as u8);

        M::encrypt(&mut buf, &self.round_keys, &self.entropy)?;
        log::debug!(
            "encrypted {} bytes into {} ({} {})",
            plaintext.len(),
            buf.len(),
            M::NAME,
            P::NAME
        );
        Ok(buf)
    }

    /// Decrypts `ciphertext` and strips its padding.
    ///
    /// Fails with [`Error::InvalidLength`] for a malformed length and with
    /// [`Error::CorruptPadding`] when the recovered padding is not what
    /// [`Cipher::encrypt`] appends; no plaintext is returned in that case.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut buf = ciphertext.to_vec();
        M::decrypt(&mut buf, &self.round_keys)?;

        let pad_size = P::detect(&buf) as usize;
        if !(MIN_PADDING..=MAX_PADDING).contains(&pad_size) {
            log::debug!(
                "rejecting {} byte ciphertext: {} padding invalid",
                ciphertext.len(),
                P::NAME
            );
            return Err(Error::CorruptPadding);
        }

        buf.truncate(buf.len() - pad_size);
        log::debug!(
            "decrypted {} bytes into {} ({} {})",
            ciphertext.len(),
            buf.len(),
            M::NAME,
            P::NAME
        );
        Ok(buf)
    }
}

impl<K, M, P, E> fmt::Debug for Cipher<K, M, P, E>
where
    K: CipherKey,
    M: Mode,
    P: Padding,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("key_bits", &K::BITS)
            .field("mode", &M::NAME)
            .field("padding", &P::NAME)
            .field("entropy", &self.entropy)
            .finish_non_exhaustive()
    }
}
