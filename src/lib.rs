//! # scru160
//!
//! SCRU-160: Sortable, Clock and Random number-based Unique identifier.
//!
//! A thread-safe generator of 160-bit identifiers that sort by creation time
//! without any coordination between generators. Each identifier combines a
//! millisecond timestamp, a per-millisecond counter and 96 bits of
//! cryptographically secure randomness.
//!
//! ## Features
//! - **Sortable**: Identifiers from one generator are strictly increasing, as bytes and as text.
//! - **Thread-Safe**: The generator state is a single atomic word updated with compare-and-swap.
//! - **Clock-Tolerant**: Survives clocks that stall or go backwards.
//! - **Two Encodings**: 32-character base32hex (`0-9A-V`) and 40-character lowercase hex.
//! - **Inspection**: Decode any identifier back into its fields.
//!
//! ## Feature Flags
//! - `cli` (default): Enables the [`inspect()`] report and the `scru160` / `scru160-inspect` binaries.
//!
//! ## Quick Start
//!
//! ```rust
//! use scru160::{scru160, scru160f};
//!
//! // 32-character base32hex string, e.g. "05VIMNKQ1G939AUDTS0I6HB7H6LSRRO1"
//! let id = scru160();
//! assert_eq!(id.len(), 32);
//!
//! // 40-character hex string, e.g. "017f2b5e9a0c1234abcdef0123456789abcdef01"
//! let id = scru160f();
//! assert_eq!(id.len(), 40);
//! ```
//!
//! ## ID Structure
//!
//! ```text
//!  bytes 0-5    bytes 6-7    bytes 8-19
//! +------------+------------+------------------------+
//! | timestamp  | counter    | random                 |
//! | 48 bits    | 16 bits    | 96 bits                |
//! +------------+------------+------------------------+
//! ```
//!
//! - **timestamp**: Milliseconds since the Unix epoch.
//! - **counter**: Seeded with a random 15-bit value whenever the timestamp
//!   changes and incremented for every further identifier in the same millisecond.
//! - **random**: Fresh secure random bits for every identifier.
//!
//! When the counter overflows within one millisecond the generator waits for
//! the clock to move on. If the clock does not move within
//! [`GeneratorConfig::clock_wait_limit`] polls, the generator logs a
//! [`ClockStallRisk`] warning, restarts from the current clock reading and
//! keeps going, so generation never blocks forever.
//!
//! ## Advanced Usage
//!
//! ### Independent Generators
//! ```rust
//! use scru160::{Generator, GeneratorConfig};
//!
//! let g = Generator::with_config(GeneratorConfig { clock_wait_limit: 10_000 });
//! let a = g.generate();
//! let b = g.generate();
//! assert!(a < b);
//! assert!(a.to_sortable_string() < b.to_sortable_string());
//! ```
//!
//! ### Decoding
//! ```rust
//! use scru160::Scru160Id;
//!
//! let id: Scru160Id = "05VIMNKQ1G939AUDTS0I6HB7H6LSRRO1".parse().unwrap();
//! assert_eq!(id.to_hex_string(), "017f2b5e9a0c1234abcdef0123456789abcdef01");
//! assert_eq!(id.timestamp(), 1645700094476);
//! ```

use std::sync::OnceLock;

mod error;
mod generator;
mod id;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
mod inspect;

pub use error::{ClockStallRisk, Error};
pub use generator::{
    Clock, DEFAULT_CLOCK_WAIT_LIMIT, Generator, GeneratorConfig, SystemClock, ensure_random_source,
};
pub use id::{Fields, ID_LEN, Scru160Id, decode};
#[cfg(feature = "cli")]
pub use inspect::{Inspection, inspect};

/// Process-wide generator, initialized on first use.
static GENERATOR: OnceLock<Generator> = OnceLock::new();

/// Get the process-wide [`Generator`].
///
/// It is created on the first call and lives until the process exits. All
/// free functions in this crate use it.
pub fn default_generator() -> &'static Generator {
    GENERATOR.get_or_init(Generator::new)
}

/// Generate a new identifier from the default generator.
pub fn scru160_id() -> Scru160Id {
    default_generator().generate()
}

/// Generate a new identifier encoded as a 32-character base32hex string.
///
/// # Example
/// ```
/// let id = scru160::scru160();
/// assert!(id.bytes().all(|c| matches!(c, b'0'..=b'9' | b'A'..=b'V')));
/// ```
pub fn scru160() -> String {
    default_generator().scru160()
}

/// Generate a new identifier encoded as a 40-character hexadecimal string.
///
/// # Example
/// ```
/// let id = scru160::scru160f();
/// assert!(id.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f')));
/// ```
pub fn scru160f() -> String {
    default_generator().scru160f()
}
