//! Keyed message authentication and one-time passcodes over a pluggable
//! hash function.
//!
//! The crate provides the naive [`mac`] construction, [`Hmac`] (RFC 2104),
//! [`Hotp`] (RFC 4226) and [`Totp`] (RFC 6238). Every construction is generic
//! over a [`HashFunction`], so any digest can be plugged in.
//!
//! ```rust
//! use keyed_otp::{hash::Sha1, Hotp};
//!
//! let hotp = Hotp::new(6, b"12345678901234567890", Sha1::new()).unwrap();
//! assert_eq!(hotp.compute(0).unwrap(), 755224);
//! ```

pub mod bytes;
pub mod hash;
pub mod hmac;
pub mod hotp;
pub mod keys;
pub mod mac;
pub mod totp;

pub use crate::hash::{HashAlgorithm, HashFunction};
pub use crate::hmac::Hmac;
pub use crate::hotp::{Hotp, DEFAULT_DIGITS, MAX_DIGITS};
pub use crate::mac::{Authenticator, Mac};
pub use crate::totp::{Totp, DEFAULT_TIME_STEP};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("error when computing hash: {0}")]
    Computation(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
