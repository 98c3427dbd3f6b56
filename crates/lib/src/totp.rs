use std::time::{Duration, SystemTime};

use tracing::{debug, trace};

use crate::{hash::HashFunction, hotp::Hotp, Error, Result};

/// Most common time step.
pub const DEFAULT_TIME_STEP: Duration = Duration::from_secs(30);

/// Time-based one-time passcode (RFC 6238).
///
/// Maps a point in time onto an [`Hotp`] counter: the number of whole time
/// steps elapsed since the start time. Repeated calls within one step return
/// the same passcode.
#[derive(Clone, Debug, PartialEq)]
pub struct Totp<H> {
    hotp: Hotp<H>,
    time_step: Duration,
    start_time: SystemTime,
}

impl<H: HashFunction> Totp<H> {
    /// Get a TOTP generator counting `time_step`s from `start_time`.
    pub fn new(
        digits: u32,
        time_step: Duration,
        start_time: SystemTime,
        key: impl AsRef<[u8]>,
        hash: H,
    ) -> Result<Self> {
        if time_step.is_zero() {
            return Err(Error::invalid("time_step", "must be positive"));
        }
        let hotp = Hotp::new(digits, key, hash)?;
        debug!(?time_step, ?start_time, "building totp generator");
        Ok(Totp {
            hotp,
            time_step,
            start_time,
        })
    }

    /// Like [`Self::new`], with the start time frozen at the current instant.
    pub fn starting_now(
        digits: u32,
        time_step: Duration,
        key: impl AsRef<[u8]>,
        hash: H,
    ) -> Result<Self> {
        Self::new(digits, time_step, SystemTime::now(), key, hash)
    }

    /// The HOTP counter for `time`: whole steps elapsed since the start time.
    ///
    /// Fails with [`Error::InvalidArgument`] when `time` precedes the start.
    pub fn counter(&self, time: SystemTime) -> Result<u64> {
        let elapsed = time
            .duration_since(self.start_time)
            .map_err(|_| Error::invalid("time", "precedes the start time"))?;
        let steps = u64::try_from(elapsed.as_nanos() / self.time_step.as_nanos())
            .map_err(|_| Error::invalid("time", "too far past the start time"))?;
        trace!(steps, "mapped time onto counter");
        Ok(steps)
    }

    pub fn compute(&self, time: SystemTime) -> Result<u32> {
        self.hotp.compute(self.counter(time)?)
    }

    pub fn compute_now(&self) -> Result<u32> {
        self.compute(SystemTime::now())
    }

    /// Check `code` against the passcode for the step containing `time`.
    pub fn verify(&self, code: u32, time: SystemTime) -> Result<bool> {
        self.hotp.verify(code, self.counter(time)?)
    }

    pub fn hotp(&self) -> &Hotp<H> {
        &self.hotp
    }

    pub fn time_step(&self) -> Duration {
        self.time_step
    }

    pub fn start_time(&self) -> SystemTime {
        self.start_time
    }
}
