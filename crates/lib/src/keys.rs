//! Random secret keys for the supported symmetric algorithms.

use rand::{rngs::OsRng, CryptoRng, RngCore};
use tracing::debug;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyAlgorithm {
    Aes,
    Hmac { default_bits: usize },
}

impl KeyAlgorithm {
    fn parse(name: &str) -> Result<Self> {
        let algorithm = match name.to_ascii_uppercase().as_str() {
            "AES" => KeyAlgorithm::Aes,
            "HMACMD5" => KeyAlgorithm::Hmac { default_bits: 512 },
            "HMACSHA1" => KeyAlgorithm::Hmac { default_bits: 512 },
            "HMACSHA224" => KeyAlgorithm::Hmac { default_bits: 224 },
            "HMACSHA256" => KeyAlgorithm::Hmac { default_bits: 256 },
            "HMACSHA384" => KeyAlgorithm::Hmac { default_bits: 384 },
            "HMACSHA512" => KeyAlgorithm::Hmac { default_bits: 512 },
            _ => return Err(Error::UnsupportedAlgorithm(name.to_string())),
        };
        Ok(algorithm)
    }

    fn default_bits(self) -> usize {
        match self {
            KeyAlgorithm::Aes => 128,
            KeyAlgorithm::Hmac { default_bits } => default_bits,
        }
    }

    fn check_bits(self, bits: usize) -> Result<()> {
        let valid = match self {
            KeyAlgorithm::Aes => matches!(bits, 128 | 192 | 256),
            KeyAlgorithm::Hmac { .. } => bits > 0 && bits % 8 == 0,
        };
        if valid {
            Ok(())
        } else {
            Err(Error::invalid(
                "key_size",
                format!("{bits} bits is not a valid size for {:?}", self),
            ))
        }
    }
}

/// A fresh key of the algorithm's default size, e.g. `generate("AES")`.
///
/// Algorithm names are matched ignoring case: `AES`, `HmacMD5`, `HmacSHA1`,
/// `HmacSHA224`, `HmacSHA256`, `HmacSHA384` and `HmacSHA512`.
pub fn generate(algorithm: &str) -> Result<Vec<u8>> {
    generate_with_rng(algorithm, &mut OsRng)
}

/// A fresh key of `key_size` bits.
pub fn generate_with_size(algorithm: &str, key_size: usize) -> Result<Vec<u8>> {
    fill(KeyAlgorithm::parse(algorithm)?, key_size, &mut OsRng)
}

/// A key of the default size drawn from a caller supplied generator.
pub fn generate_with_rng<R: RngCore + CryptoRng>(algorithm: &str, rng: &mut R) -> Result<Vec<u8>> {
    let algorithm = KeyAlgorithm::parse(algorithm)?;
    fill(algorithm, algorithm.default_bits(), rng)
}

fn fill<R: RngCore + CryptoRng>(algorithm: KeyAlgorithm, bits: usize, rng: &mut R) -> Result<Vec<u8>> {
    algorithm.check_bits(bits)?;
    debug!(?algorithm, bits, "generating key");
    let mut key = vec![0u8; bits / 8];
    rng.try_fill_bytes(&mut key)
        .map_err(|e| Error::Computation(format!("random source failed: {e}")))?;
    Ok(key)
}
