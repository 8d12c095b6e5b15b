use thiserror::Error;

/// Errors returned by the fallible parts of the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input is neither a 32-character base32hex string nor a 40-character
    /// hexadecimal string.
    #[error("invalid identifier format: {0:?}")]
    InvalidFormat(String),

    /// The operating system's secure random number source could not be read.
    #[error("secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),
}

/// Diagnostic emitted when the clock did not move past the last timestamp
/// within the configured number of polls after a counter overflow.
///
/// This is never returned to callers. The generator logs it, reinitializes its
/// state with the stalled clock reading and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "reinitialized internal state as clock did not go forward after {iterations} polls \
     (last timestamp {last_timestamp}, now {now}); monotonicity may be broken"
)]
pub struct ClockStallRisk {
    pub last_timestamp: u64,
    pub now: u64,
    pub iterations: u32,
}
