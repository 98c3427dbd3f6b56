//! Hash-based message authentication (RFC 2104).

use std::{cmp::Ordering, fmt};

use tracing::debug;
use zeroize::Zeroizing;

use crate::{bytes, hash::HashFunction, mac::Authenticator, Error, Result};

const OUTER_PADDING_BYTE: u8 = 0x5c;
const INNER_PADDING_BYTE: u8 = 0x36;

/// An HMAC keyed with a secret over a [`HashFunction`].
///
/// The block-sized key and both padded keys are derived once, when the value
/// is built, and wiped from memory when it is dropped.
#[derive(Clone)]
pub struct Hmac<H> {
    key: Zeroizing<Vec<u8>>,
    hash: H,
    outer_padded_key: Zeroizing<Vec<u8>>,
    inner_padded_key: Zeroizing<Vec<u8>>,
}

impl<H: HashFunction> Hmac<H> {
    /// Key an HMAC over `hash`. The key may have any length, including zero.
    ///
    /// Keys longer than the block size are hashed, which is the only point at
    /// which construction can fail with [`Error::Computation`].
    pub fn new(key: impl AsRef<[u8]>, hash: H) -> Result<Self> {
        let key = Zeroizing::new(key.as_ref().to_vec());
        let block_size = hash.block_size();
        if block_size == 0 {
            return Err(Error::invalid("hash", "block size must be positive"));
        }

        let block_sized_key = block_sized_key(&key, &hash)?;
        let outer_padded_key = Zeroizing::new(bytes::xor(
            &block_sized_key,
            &vec![OUTER_PADDING_BYTE; block_size],
        )?);
        let inner_padded_key = Zeroizing::new(bytes::xor(
            &block_sized_key,
            &vec![INNER_PADDING_BYTE; block_size],
        )?);

        Ok(Hmac {
            key,
            hash,
            outer_padded_key,
            inner_padded_key,
        })
    }

    /// `H((K ^ opad) || H((K ^ ipad) || message))`
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let inner_input = Zeroizing::new(bytes::concatenate(&[
            self.inner_padded_key.as_slice(),
            message,
        ]));
        let inner = self.hash.compute(&inner_input)?;
        let outer_input = Zeroizing::new(bytes::concatenate(&[
            self.outer_padded_key.as_slice(),
            &inner,
        ]));
        self.hash.compute(&outer_input)
    }

    /// Recompute the tag of `message` and compare it with `tag` in constant
    /// time.
    ///
    /// A failed recomputation is returned as an error, never as `Ok(false)`.
    pub fn verify(&self, message: &[u8], tag: &[u8]) -> Result<bool> {
        let expected = self.sign(message)?;
        Ok(bytes::constant_time_eq(&expected, tag))
    }

    /// An independent copy of the secret key.
    pub fn key(&self) -> Vec<u8> {
        self.key.to_vec()
    }

    pub fn hash_function(&self) -> &H {
        &self.hash
    }
}

// Hash keys that are too long, then right-pad with zeros up to the block size.
fn block_sized_key<H: HashFunction>(key: &[u8], hash: &H) -> Result<Zeroizing<Vec<u8>>> {
    let block_size = hash.block_size();
    let mut block_sized_key = match key.len().cmp(&block_size) {
        Ordering::Greater => {
            debug!(
                key_len = key.len(),
                block_size, "hmac key exceeds block size, hashing it down"
            );
            Zeroizing::new(hash.compute(key)?)
        }
        Ordering::Less | Ordering::Equal => Zeroizing::new(key.to_vec()),
    };
    if block_sized_key.len() > block_size {
        return Err(Error::invalid(
            "hash",
            format!(
                "digest of {} bytes does not fit a {} byte block",
                block_sized_key.len(),
                block_size
            ),
        ));
    }
    block_sized_key.resize(block_size, 0);
    Ok(block_sized_key)
}

impl<H: HashFunction> Authenticator for Hmac<H> {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        Hmac::sign(self, message)
    }

    fn verify(&self, message: &[u8], tag: &[u8]) -> Result<bool> {
        Hmac::verify(self, message, tag)
    }
}

impl<H: PartialEq> PartialEq for Hmac<H> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.key.as_slice() == other.key.as_slice()
    }
}

impl<H: Eq> Eq for Hmac<H> {}

impl<H: fmt::Debug> fmt::Debug for Hmac<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hmac")
            .field("key", &"<redacted>")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}
