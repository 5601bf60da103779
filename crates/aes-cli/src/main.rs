//! Command-line interface for `aes-modes`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use aes_core::{
    decrypt_block, encrypt_block, expand_key, Aes128Key, Aes192Key, Aes256Key, Block, RoundKeys,
};
use aes_modes::{
    Cbc, CipherConfig, Crypter, HardwareRng, KeyBits, Mode, ModeKind, OsEntropy, PaddingKind,
    RngEntropy,
};
use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// AES file encryption CLI.
#[derive(Parser)]
#[command(name = "aes", version, author, about = "AES-128/192/256 in ECB or CBC mode")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pad and encrypt a file.
    Enc {
        #[command(flatten)]
        cipher: CipherArgs,
        /// Source of CBC initialization vectors.
        #[arg(long, value_enum, default_value_t = EntropyArg::Hardware)]
        entropy: EntropyArg,
        /// Plaintext input path.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Ciphertext output path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Decrypt a file and strip its padding.
    Dec {
        #[command(flatten)]
        cipher: CipherArgs,
        /// Ciphertext input path.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Plaintext output path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Run the built-in known-answer self test.
    Check,
    /// Round-trip random data under every key size, mode and padding.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
        /// Plaintext length in bytes.
        #[arg(long, default_value_t = 40)]
        len: usize,
    },
}

#[derive(clap::Args)]
struct CipherArgs {
    /// Key as hex (32, 48 or 64 characters depending on --bits).
    #[arg(long, value_name = "HEX")]
    key_hex: String,
    /// Key size in bits.
    #[arg(long, value_enum, default_value_t = BitsArg::B256)]
    bits: BitsArg,
    /// Mode of operation.
    #[arg(long, value_enum, default_value_t = ModeArg::Cbc)]
    mode: ModeArg,
    /// Padding scheme.
    #[arg(long, value_enum, default_value_t = PaddingArg::Pkcs7)]
    padding: PaddingArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum BitsArg {
    #[value(name = "128")]
    B128,
    #[value(name = "192")]
    B192,
    #[value(name = "256")]
    B256,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Ecb,
    Cbc,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaddingArg {
    Pkcs7,
    Ansix923,
}

#[derive(Clone, Copy, ValueEnum)]
enum EntropyArg {
    /// CPU RDRAND.
    Hardware,
    /// Operating-system randomness.
    Os,
}

impl CipherArgs {
    fn config(&self) -> CipherConfig {
        let bits = match self.bits {
            BitsArg::B128 => KeyBits::Aes128,
            BitsArg::B192 => KeyBits::Aes192,
            BitsArg::B256 => KeyBits::Aes256,
        };
        let mode = match self.mode {
            ModeArg::Ecb => ModeKind::Ecb,
            ModeArg::Cbc => ModeKind::Cbc,
        };
        let padding = match self.padding {
            PaddingArg::Pkcs7 => PaddingKind::Pkcs7,
            PaddingArg::Ansix923 => PaddingKind::AnsiX923,
        };
        CipherConfig::new(bits, mode, padding)
    }

    fn build(&self, entropy: EntropyArg) -> Result<Box<dyn Crypter>> {
        let config = self.config();
        let key = hex::decode(self.key_hex.trim()).context("decode key hex")?;
        ensure!(
            key.len() == config.bits.key_len(),
            "{} key must be {} bytes ({} hex characters)",
            config.bits,
            config.bits.key_len(),
            config.bits.key_len() * 2
        );
        let cipher = match entropy {
            EntropyArg::Hardware => {
                if config.mode == ModeKind::Cbc && !HardwareRng::is_available() {
                    bail!("RDRAND is not available on this CPU; retry with --entropy os");
                }
                config.build_with_entropy(&key, HardwareRng::new())
            }
            EntropyArg::Os => config.build_with_entropy(&key, OsEntropy),
        };
        cipher.with_context(|| format!("build {config} cipher"))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Enc {
            cipher,
            entropy,
            input,
            output,
        } => cmd_enc(&cipher, entropy, &input, &output),
        Commands::Dec {
            cipher,
            input,
            output,
        } => cmd_dec(&cipher, &input, &output),
        Commands::Check => cmd_check(),
        Commands::Demo { seed, len } => cmd_demo(seed, len),
    }
}

fn cmd_enc(args: &CipherArgs, entropy: EntropyArg, input: &Path, output: &Path) -> Result<()> {
    let cipher = args.build(entropy)?;
    let data = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let ciphertext = cipher.encrypt(&data).context("encrypt")?;
    fs::write(output, &ciphertext).with_context(|| format!("write {}", output.display()))?;
    log::info!(
        "encrypted {} bytes into {} with {}",
        data.len(),
        ciphertext.len(),
        args.config()
    );
    Ok(())
}

fn cmd_dec(args: &CipherArgs, input: &Path, output: &Path) -> Result<()> {
    // Decryption never draws an IV, so the OS source is never touched.
    let cipher = args.build(EntropyArg::Os)?;
    let data = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let plaintext = cipher.decrypt(&data).context("decrypt")?;
    fs::write(output, &plaintext).with_context(|| format!("write {}", output.display()))?;
    log::info!(
        "decrypted {} bytes into {} with {}",
        data.len(),
        plaintext.len(),
        args.config()
    );
    Ok(())
}

/// FIPS-197 appendix C: plaintext 00112233..ff under key 000102..
const KAT_PLAIN: Block = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
];
const KAT_128: &str = "69c4e0d86a7b0430d8cdb78070b4c55a";
const KAT_192: &str = "dda97ca4864cdfe06eaf70a0ec0d7191";
const KAT_256: &str = "8ea2b7ca516745bfeafc49904b496089";

/// SP 800-38A F.2.1, first block.
const CBC_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
const CBC_IV: &str = "000102030405060708090a0b0c0d0e0f";
const CBC_PLAIN: &str = "6bc1bee22e409f96e93d7e117393172a";
const CBC_CIPHER: &str = "7649abac8119b246cee98e9b12e9197d";

fn sequential<const N: usize>() -> [u8; N] {
    core::array::from_fn(|i| i as u8)
}

fn check_block(label: &str, round_keys: &RoundKeys, expected_hex: &str) -> Result<()> {
    let ciphertext = encrypt_block(&KAT_PLAIN, round_keys);
    ensure!(
        hex::encode(ciphertext) == expected_hex,
        "{label}: expected {expected_hex}, got {}",
        hex::encode(ciphertext)
    );
    ensure!(
        decrypt_block(&ciphertext, round_keys) == KAT_PLAIN,
        "{label}: decryption does not invert encryption"
    );
    println!("{label}: ok");
    Ok(())
}

fn self_test() -> Result<()> {
    check_block("AES-128", &expand_key(&Aes128Key::from(sequential())), KAT_128)?;
    check_block("AES-192", &expand_key(&Aes192Key::from(sequential())), KAT_192)?;
    check_block("AES-256", &expand_key(&Aes256Key::from(sequential())), KAT_256)?;

    let key = Aes128Key::try_from(hex::decode(CBC_KEY)?.as_slice())?;
    let round_keys = expand_key(&key);
    let iv: Block = hex::decode(CBC_IV)?
        .try_into()
        .map_err(|_| anyhow::anyhow!("IV must be one block"))?;
    let mut data = hex::decode(CBC_PLAIN)?;
    Cbc::encrypt_with_iv(&mut data, &round_keys, &iv)?;
    ensure!(
        hex::encode(&data) == format!("{CBC_CIPHER}{CBC_IV}"),
        "AES-128-CBC: unexpected ciphertext {}",
        hex::encode(&data)
    );
    Cbc::decrypt(&mut data, &round_keys)?;
    ensure!(
        hex::encode(&data) == CBC_PLAIN,
        "AES-128-CBC: round trip failed"
    );
    println!("AES-128-CBC: ok");
    Ok(())
}

fn cmd_check() -> Result<()> {
    self_test()?;
    println!(
        "hardware RNG: {}",
        if HardwareRng::is_available() {
            "available"
        } else {
            "unavailable"
        }
    );
    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}

fn cmd_demo(seed: Option<u64>, len: usize) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut plaintext = vec![0u8; len];
    rng.fill_bytes(&mut plaintext);
    println!("plaintext: {}", hex::encode(&plaintext));

    for bits in [KeyBits::Aes128, KeyBits::Aes192, KeyBits::Aes256] {
        let mut key = vec![0u8; bits.key_len()];
        rng.fill_bytes(&mut key);
        for mode in [ModeKind::Ecb, ModeKind::Cbc] {
            for padding in [PaddingKind::Pkcs7, PaddingKind::AnsiX923] {
                let config = CipherConfig::new(bits, mode, padding);
                let entropy = RngEntropy::new(ChaCha20Rng::seed_from_u64(rng.next_u64()));
                let cipher = config.build_with_entropy(&key, entropy)?;
                let ciphertext = cipher.encrypt(&plaintext)?;
                let decrypted = cipher.decrypt(&ciphertext)?;
                if decrypted != plaintext {
                    bail!("{config}: demo roundtrip failed");
                }
                println!("{:<24} {}", config.to_string(), hex::encode(&ciphertext));
            }
        }
    }
    Ok(())
}
