use subtle::ConstantTimeEq;
use tracing::debug;

use crate::{hash::HashFunction, hmac::Hmac, Error, Result};

/// Most common passcode length.
pub const DEFAULT_DIGITS: u32 = 6;
/// Longest supported passcode. 10^9 would cut too deep into the 31 bits left
/// after dynamic truncation.
pub const MAX_DIGITS: u32 = 8;

// The offset nibble can point at byte 15, and four bytes are read from there.
const MIN_DIGEST_LEN: usize = 0x0f + 4;

/// HMAC-based one-time passcode (RFC 4226).
///
/// A pure function of the counter: the caller owns the counter and any
/// resynchronisation window.
#[derive(Clone, Debug, PartialEq)]
pub struct Hotp<H> {
    digits: u32,
    modulus: u32,
    hmac: Hmac<H>,
}

impl<H: HashFunction> Hotp<H> {
    /// Get a HOTP generator with the given `key` and `hash`, which generates
    /// passcodes of `digits` decimal digits (at most [`MAX_DIGITS`]).
    pub fn new(digits: u32, key: impl AsRef<[u8]>, hash: H) -> Result<Self> {
        if digits > MAX_DIGITS {
            return Err(Error::invalid(
                "digits",
                format!("{digits} is more than {MAX_DIGITS}"),
            ));
        }
        if hash.output_size() < MIN_DIGEST_LEN {
            return Err(Error::invalid(
                "hash",
                format!(
                    "{} byte digest is too short for dynamic truncation",
                    hash.output_size()
                ),
            ));
        }
        debug!(digits, "building hotp generator");
        Ok(Hotp {
            digits,
            modulus: 10_u32.pow(digits),
            hmac: Hmac::new(key, hash)?,
        })
    }

    /// The passcode for `counter`, as an integer. Render it left-padded with
    /// zeros to [`Self::digits`] characters.
    pub fn compute(&self, counter: u64) -> Result<u32> {
        // Step 1: Generate an HMAC value over the big-endian counter
        let hs = self.hmac.sign(&counter.to_be_bytes())?;

        // Step 2: Generate a 31-bit value (Dynamic Truncation)
        let snum = truncate(&hs)?;

        // Step 3: Reduce it to the requested number of digits
        Ok(snum % self.modulus)
    }

    /// Check `code` against the passcode for `counter`, in constant time.
    pub fn verify(&self, code: u32, counter: u64) -> Result<bool> {
        let expected = self.compute(counter)?;
        Ok(expected.ct_eq(&code).into())
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// An independent copy of the secret key.
    pub fn key(&self) -> Vec<u8> {
        self.hmac.key()
    }

    pub fn hash_function(&self) -> &H {
        self.hmac.hash_function()
    }
}

fn truncate(hs: &[u8]) -> Result<u32> {
    let last = hs
        .last()
        .ok_or_else(|| Error::Computation("hash function returned an empty digest".to_string()))?;
    let offset = (last & 0x0f) as usize;
    let substr = hs.get(offset..offset + 4).ok_or_else(|| {
        Error::Computation(format!(
            "{} byte digest is too short for dynamic truncation",
            hs.len()
        ))
    })?;
    Ok(u32::from_be_bytes([
        // Strip the leading bit so the value reads the same signed or unsigned
        substr[0] & 0x7f,
        substr[1],
        substr[2],
        substr[3],
    ]))
}

#[cfg(all(test, feature = "sha1"))]
mod test {
    use test_case::test_case;

    use super::*;
    use crate::hash::Sha1;

    const KEY: &[u8] = b"12345678901234567890";

    #[test]
    fn it_truncates_the_rfc_example() {
        let s = hex_literal::hex!("1f8698690e02ca16618550ef7f19da8e945b555a");
        // Last byte is 0x5a, with low 4 bits 0xa
        assert_eq!(truncate(&s).unwrap(), 0x50ef7f19);
    }

    #[test]
    fn it_masks_the_top_bit() {
        let s = hex_literal::hex!("1f8698690e02ca166185ffef7f19da8e945b555a");
        assert_eq!(truncate(&s).unwrap(), 0x7fef7f19);
    }

    #[test]
    fn it_reads_from_the_last_possible_offset() {
        let mut s = [0u8; 20];
        s[15..19].copy_from_slice(&[0xff, 0x01, 0x02, 0x03]);
        s[19] = 0x0f;
        assert_eq!(truncate(&s).unwrap(), 0x7f010203);
    }

    #[test]
    fn it_rejects_short_digests() {
        assert!(matches!(truncate(&[]), Err(Error::Computation(_))));
        assert!(matches!(truncate(&[0x0f; 16]), Err(Error::Computation(_))));
    }

    // These test cases are copied from RFC 4226
    // https://datatracker.ietf.org/doc/html/rfc4226#appendix-D
    #[test_case(0, 755224)]
    #[test_case(1, 287082)]
    #[test_case(2, 359152)]
    #[test_case(3, 969429)]
    #[test_case(4, 338314)]
    #[test_case(5, 254676)]
    #[test_case(6, 287922)]
    #[test_case(7, 162583)]
    #[test_case(8, 399871)]
    #[test_case(9, 520489)]
    fn it_computes_correct_hotp(counter: u64, expected: u32) {
        let hotp = Hotp::new(DEFAULT_DIGITS, KEY, Sha1::new()).unwrap();
        assert_eq!(hotp.compute(counter).unwrap(), expected);
        assert!(hotp.verify(expected, counter).unwrap());
        assert!(!hotp.verify(expected ^ 1, counter).unwrap());
    }

    #[test_case(0, 0x4c93cf18)]
    #[test_case(1, 0x41397eea)]
    #[test_case(2, 0x082fef30)]
    #[test_case(3, 0x66ef7655)]
    #[test_case(9, 0x2679dc69)]
    fn it_keeps_eight_digits_within_range(counter: u64, truncated: u32) {
        let hotp = Hotp::new(MAX_DIGITS, KEY, Sha1::new()).unwrap();
        assert_eq!(hotp.compute(counter).unwrap(), truncated % 100_000_000);
    }

    #[test]
    fn it_yields_zero_for_zero_digits() {
        let hotp = Hotp::new(0, KEY, Sha1::new()).unwrap();
        for counter in 0..32 {
            assert_eq!(hotp.compute(counter).unwrap(), 0);
        }
    }

    #[test]
    fn it_handles_the_largest_counter() {
        let hotp = Hotp::new(DEFAULT_DIGITS, KEY, Sha1::new()).unwrap();
        assert!(hotp.compute(u64::MAX).unwrap() < 1_000_000);
    }

    #[test]
    fn it_rejects_more_than_eight_digits() {
        let err = Hotp::new(9, KEY, Sha1::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "digits", .. }));
    }

    #[cfg(feature = "md5")]
    #[test]
    fn it_rejects_digests_too_short_to_truncate() {
        let err = Hotp::new(DEFAULT_DIGITS, KEY, crate::hash::Md5).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "hash", .. }));
    }

    #[test]
    fn it_returns_an_independent_key_copy() {
        let hotp = Hotp::new(DEFAULT_DIGITS, KEY, Sha1::new()).unwrap();
        let mut key = hotp.key();
        key.clear();
        assert_eq!(hotp.key(), KEY);
        assert_eq!(hotp.digits(), DEFAULT_DIGITS);
    }

    #[test]
    fn it_compares_configuration() {
        let a = Hotp::new(6, KEY, Sha1::new()).unwrap();
        assert_eq!(a, Hotp::new(6, KEY, Sha1::new()).unwrap());
        assert_ne!(a, Hotp::new(7, KEY, Sha1::new()).unwrap());
        assert_ne!(a, Hotp::new(6, b"another key", Sha1::new()).unwrap());
    }

    #[test]
    fn it_is_shareable_across_threads() {
        let hotp = std::sync::Arc::new(Hotp::new(DEFAULT_DIGITS, KEY, Sha1::new()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|counter| {
                let hotp = hotp.clone();
                std::thread::spawn(move || hotp.compute(counter).unwrap())
            })
            .collect();
        let codes: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(codes, [755224, 287082, 359152, 969429]);
    }
}
