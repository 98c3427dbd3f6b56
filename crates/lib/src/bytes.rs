//! Byte-array helpers shared by the constructions.

use subtle::ConstantTimeEq;

use crate::{Error, Result};

/// Join `parts` into one freshly allocated buffer.
pub fn concatenate(parts: &[&[u8]]) -> Vec<u8> {
    let len = parts.iter().map(|part| part.len()).sum();
    let mut out = Vec::with_capacity(len);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// XOR two equally long byte strings.
///
/// Fails with [`Error::InvalidArgument`] when the lengths differ.
pub fn xor(left: &[u8], right: &[u8]) -> Result<Vec<u8>> {
    if left.len() != right.len() {
        return Err(Error::invalid(
            "right",
            format!("length mismatch ({} != {})", left.len(), right.len()),
        ));
    }
    Ok(left.iter().zip(right).map(|(l, r)| l ^ r).collect())
}

/// Lowercase hex rendering of `bytes`.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Compare two byte strings without short-circuiting on the first difference.
///
/// Strings of different length compare unequal.
pub fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.ct_eq(right).into()
}
