//! The hash-function capability and the stock implementations.
//!
//! Constructions in this crate only ever see a [`HashFunction`]: an immutable
//! object that maps bytes to a fixed-size digest and reports the block size of
//! its compression function. Stock implementations live in a process-wide
//! registry of statics, reachable through [`HashAlgorithm`] or [`lookup`].

use std::{fmt, marker::PhantomData, str::FromStr, sync::Arc};

use digest::{core_api::BlockSizeUser, Digest};

use crate::{Error, Result};

/// A cryptographic hash function.
///
/// Implementations must be immutable: `compute` never mutates its input and
/// `block_size`/`output_size` never change for a given instance.
pub trait HashFunction: Send + Sync + fmt::Debug {
    /// Hash `input`.
    ///
    /// Failures of the underlying provider are reported as
    /// [`Error::Computation`].
    fn compute(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Bytes consumed per compression round, e.g. 64 for SHA-1.
    fn block_size(&self) -> usize;

    /// Digest length in bytes, e.g. 20 for SHA-1.
    fn output_size(&self) -> usize;
}

impl<H: HashFunction + ?Sized> HashFunction for &H {
    fn compute(&self, input: &[u8]) -> Result<Vec<u8>> {
        (**self).compute(input)
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn output_size(&self) -> usize {
        (**self).output_size()
    }
}

impl<H: HashFunction + ?Sized> HashFunction for Box<H> {
    fn compute(&self, input: &[u8]) -> Result<Vec<u8>> {
        (**self).compute(input)
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn output_size(&self) -> usize {
        (**self).output_size()
    }
}

impl<H: HashFunction + ?Sized> HashFunction for Arc<H> {
    fn compute(&self, input: &[u8]) -> Result<Vec<u8>> {
        (**self).compute(input)
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn output_size(&self) -> usize {
        (**self).output_size()
    }
}

/// Adapter exposing any RustCrypto [`Digest`] as a [`HashFunction`].
pub struct Digested<D> {
    _digest: PhantomData<fn() -> D>,
}

impl<D> Digested<D> {
    pub const fn new() -> Self {
        Digested {
            _digest: PhantomData,
        }
    }
}

impl<D> Default for Digested<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for Digested<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Digested<D> {}

impl<D> PartialEq for Digested<D> {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl<D> Eq for Digested<D> {}

impl<D> fmt::Debug for Digested<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Digested")
            .field(&std::any::type_name::<D>())
            .finish()
    }
}

impl<D: Digest + BlockSizeUser> HashFunction for Digested<D> {
    fn compute(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(D::digest(input).to_vec())
    }

    fn block_size(&self) -> usize {
        <D as BlockSizeUser>::block_size()
    }

    fn output_size(&self) -> usize {
        <D as Digest>::output_size()
    }
}

#[cfg(feature = "sha1")]
pub type Sha1 = Digested<sha1::Sha1>;
#[cfg(feature = "sha2")]
pub type Sha224 = Digested<sha2::Sha224>;
#[cfg(feature = "sha2")]
pub type Sha256 = Digested<sha2::Sha256>;
#[cfg(feature = "sha2")]
pub type Sha384 = Digested<sha2::Sha384>;
#[cfg(feature = "sha2")]
pub type Sha512 = Digested<sha2::Sha512>;

/// MD5, kept for interoperability with legacy verifiers.
#[cfg(feature = "md5")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Md5;

#[cfg(feature = "md5")]
impl Md5 {
    pub const BLOCK_SIZE: usize = 64;
    pub const OUTPUT_SIZE: usize = 16;
}

#[cfg(feature = "md5")]
impl HashFunction for Md5 {
    fn compute(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(md5::compute(input).0.to_vec())
    }

    fn block_size(&self) -> usize {
        Self::BLOCK_SIZE
    }

    fn output_size(&self) -> usize {
        Self::OUTPUT_SIZE
    }
}

#[cfg(feature = "md5")]
static MD5: Md5 = Md5;
#[cfg(feature = "sha1")]
static SHA1: Sha1 = Digested::new();
#[cfg(feature = "sha2")]
static SHA224: Sha224 = Digested::new();
#[cfg(feature = "sha2")]
static SHA256: Sha256 = Digested::new();
#[cfg(feature = "sha2")]
static SHA384: Sha384 = Digested::new();
#[cfg(feature = "sha2")]
static SHA512: Sha512 = Digested::new();

/// Names of the stock hash functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    /// Canonical name, e.g. `"SHA-256"`.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha224 => "SHA-224",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// The shared instance for this algorithm.
    ///
    /// Fails with [`Error::UnsupportedAlgorithm`] when the backing crate was
    /// compiled out.
    pub fn hash_function(self) -> Result<&'static dyn HashFunction> {
        match self {
            #[cfg(feature = "md5")]
            HashAlgorithm::Md5 => Ok(&MD5),
            #[cfg(feature = "sha1")]
            HashAlgorithm::Sha1 => Ok(&SHA1),
            #[cfg(feature = "sha2")]
            HashAlgorithm::Sha224 => Ok(&SHA224),
            #[cfg(feature = "sha2")]
            HashAlgorithm::Sha256 => Ok(&SHA256),
            #[cfg(feature = "sha2")]
            HashAlgorithm::Sha384 => Ok(&SHA384),
            #[cfg(feature = "sha2")]
            HashAlgorithm::Sha512 => Ok(&SHA512),
            #[allow(unreachable_patterns)]
            _ => Err(Error::UnsupportedAlgorithm(self.name().to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    /// Accepts the canonical names with or without the dash, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.replace('-', "").to_ascii_uppercase();
        match normalized.as_str() {
            "MD5" => Ok(HashAlgorithm::Md5),
            "SHA1" => Ok(HashAlgorithm::Sha1),
            "SHA224" => Ok(HashAlgorithm::Sha224),
            "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA384" => Ok(HashAlgorithm::Sha384),
            "SHA512" => Ok(HashAlgorithm::Sha512),
            _ => Err(Error::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Resolve a hash function by name, e.g. `lookup("SHA-1")`.
pub fn lookup(name: &str) -> Result<&'static dyn HashFunction> {
    name.parse::<HashAlgorithm>()?.hash_function()
}

#[cfg(all(test, feature = "md5", feature = "sha1", feature = "sha2"))]
mod test {
    use test_case::test_case;

    use super::*;
    use crate::bytes::to_hex;

    const INPUT: &[u8] = b"Hello, World!";

    #[test_case("MD5", "65a8e27d8879283831b664bd8b7f0ad4")]
    #[test_case("SHA-1", "0a0a9f2a6772942557ab5355d76af442f8f65e01")]
    #[test_case("SHA-224", "72a23dfa411ba6fde01dbfabf3b00a709c93ebf273dc29e2d8b261ff")]
    #[test_case("SHA-256", "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f")]
    #[test_case("SHA-384", "5485cc9b3365b4305dfb4e8337e0a598a574f8242bf17289e0dd6c20a3cd44a089de16ab4ab308f63e44b1170eb5f515")]
    #[test_case("SHA-512", "374d794a95cdcfd8b35993185fef9ba368f160d8daf432d08ba9f1ed1e5abe6cc69291e0fa2fe0006a52570ef18c19def4e617c33ce52ef0a6e5fbe318cb0387")]
    fn it_computes_known_digests(name: &str, expected: &str) {
        let hash = lookup(name).unwrap();
        let digest = hash.compute(INPUT).unwrap();
        assert_eq!(to_hex(&digest), expected);
        assert_eq!(digest.len(), hash.output_size());
    }

    #[test_case(HashAlgorithm::Md5, 64, 16)]
    #[test_case(HashAlgorithm::Sha1, 64, 20)]
    #[test_case(HashAlgorithm::Sha224, 64, 28)]
    #[test_case(HashAlgorithm::Sha256, 64, 32)]
    #[test_case(HashAlgorithm::Sha384, 128, 48)]
    #[test_case(HashAlgorithm::Sha512, 128, 64)]
    fn it_reports_fixed_sizes(algorithm: HashAlgorithm, block: usize, output: usize) {
        let hash = algorithm.hash_function().unwrap();
        assert_eq!(hash.block_size(), block);
        assert_eq!(hash.output_size(), output);
    }

    #[test_case("sha1", HashAlgorithm::Sha1)]
    #[test_case("Sha-256", HashAlgorithm::Sha256)]
    #[test_case("md5", HashAlgorithm::Md5)]
    fn it_parses_names_loosely(name: &str, expected: HashAlgorithm) {
        assert_eq!(name.parse::<HashAlgorithm>().unwrap(), expected);
    }

    #[test]
    fn it_round_trips_canonical_names() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<HashAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn it_rejects_unknown_names() {
        let err = lookup("MD2").unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(name) if name == "MD2"));
    }

    #[test]
    fn it_shares_one_instance_per_algorithm() {
        let first = HashAlgorithm::Sha1.hash_function().unwrap();
        let second = lookup("SHA1").unwrap();
        assert!(std::ptr::eq(
            first as *const dyn HashFunction as *const u8,
            second as *const dyn HashFunction as *const u8,
        ));
    }

    #[test]
    fn it_does_not_mutate_input() {
        let input = INPUT.to_vec();
        let hash = Sha256::new();
        hash.compute(&input).unwrap();
        assert_eq!(input, INPUT);
    }

    #[test]
    fn it_forwards_through_smart_pointers() {
        let direct = Sha1::new().compute(INPUT).unwrap();
        let boxed: Box<dyn HashFunction> = Box::new(Sha1::new());
        let shared: Arc<dyn HashFunction> = Arc::new(Sha1::new());
        assert_eq!(boxed.compute(INPUT).unwrap(), direct);
        assert_eq!(shared.compute(INPUT).unwrap(), direct);
        assert_eq!(boxed.block_size(), 64);
    }
}
