//! The naive keyed hash, `H(key || message)`.
//!
//! This construction is weaker than [`Hmac`](crate::Hmac): over a
//! Merkle-Damgard hash an attacker can extend a signed message without the
//! key unless the verifier bounds message length on its own. It exists for
//! parity with [`Hmac`](crate::Hmac); prefer the latter for new protocols.

use std::fmt;

use zeroize::Zeroizing;

use crate::{bytes, hash::HashFunction, Result};

/// Something that can tag messages and check tags under a fixed key.
pub trait Authenticator {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;

    /// `Ok(false)` means the tag is wrong; errors mean the tag could not be
    /// recomputed.
    fn verify(&self, message: &[u8], tag: &[u8]) -> Result<bool>;
}

/// `H(key || message)`. The key is used as is, whatever its length.
pub fn sign<H: HashFunction + ?Sized>(message: &[u8], key: &[u8], hash: &H) -> Result<Vec<u8>> {
    let input = Zeroizing::new(bytes::concatenate(&[key, message]));
    hash.compute(&input)
}

/// Recompute [`sign`] and compare with `tag` byte for byte.
pub fn verify<H: HashFunction + ?Sized>(
    message: &[u8],
    tag: &[u8],
    key: &[u8],
    hash: &H,
) -> Result<bool> {
    let expected = sign(message, key, hash)?;
    Ok(expected == tag)
}

/// The naive construction bound to a key and a hash function.
#[derive(Clone)]
pub struct Mac<H> {
    key: Zeroizing<Vec<u8>>,
    hash: H,
}

impl<H: HashFunction> Mac<H> {
    pub fn new(key: impl AsRef<[u8]>, hash: H) -> Self {
        Mac {
            key: Zeroizing::new(key.as_ref().to_vec()),
            hash,
        }
    }

    /// An independent copy of the secret key.
    pub fn key(&self) -> Vec<u8> {
        self.key.to_vec()
    }

    pub fn hash_function(&self) -> &H {
        &self.hash
    }
}

impl<H: HashFunction> Authenticator for Mac<H> {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        sign(message, &self.key, &self.hash)
    }

    fn verify(&self, message: &[u8], tag: &[u8]) -> Result<bool> {
        verify(message, tag, &self.key, &self.hash)
    }
}

impl<H: fmt::Debug> fmt::Debug for Mac<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mac")
            .field("key", &"<redacted>")
            .field("hash", &self.hash)
            .finish()
    }
}
