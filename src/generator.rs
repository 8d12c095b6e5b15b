use std::hint::spin_loop;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::{Rng, RngCore, TryRngCore};
use tracing::{trace, warn};

use crate::{ClockStallRisk, Error, Scru160Id};

/// Maximum value of the 48-bit timestamp field.
const TIMESTAMP_MAX: u64 = (1 << 48) - 1;
/// Width of the counter field in the packed state word.
const COUNTER_BITS: u32 = 16;
/// A fresh counter only uses the low 15 bits, leaving at least 32768
/// increments before the field overflows.
const COUNTER_SEED_MASK: u16 = 0x7FFF;

/// Default number of clock polls after a counter overflow before the
/// generator gives up waiting.
pub const DEFAULT_CLOCK_WAIT_LIMIT: u32 = 1_000_000;

/// A source of wall-clock time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// The system's real-time clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Tunables for a [`Generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// How many times to poll the clock after the counter overflows before
    /// reinitializing the state with the current (stalled) reading.
    pub clock_wait_limit: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            clock_wait_limit: DEFAULT_CLOCK_WAIT_LIMIT,
        }
    }
}

/// A SCRU-160 generator.
///
/// The last issued timestamp and counter are packed into one 64-bit word
/// (`timestamp << 16 | counter`) and advanced with a compare-and-swap loop, so
/// a generator can be shared between threads by reference. Every pair handed
/// out by [`Generator::next_pair`] is strictly greater than the ones before it,
/// unless the clock stalls for longer than
/// [`GeneratorConfig::clock_wait_limit`] polls after a counter overflow.
///
/// Independent generators share no state. Most programs use the process-wide
/// instance returned by [`default_generator`](crate::default_generator).
#[derive(Debug)]
pub struct Generator<C = SystemClock> {
    state: AtomicU64,
    clock_stalls: AtomicU64,
    config: GeneratorConfig,
    clock: C,
}

impl Generator {
    /// Create a generator reading the system clock, with default settings.
    ///
    /// # Example
    /// ```
    /// use scru160::Generator;
    /// let g = Generator::new();
    /// let (a, b) = (g.generate(), g.generate());
    /// assert!(a < b);
    /// ```
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    /// Create a generator reading the system clock.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self::with_clock(SystemClock, config)
    }

    /// Create a generator after checking that the secure random source works.
    ///
    /// # Errors
    /// [`Error::RandomSourceUnavailable`] if the operating system cannot
    /// supply random bytes.
    pub fn try_new() -> Result<Self, Error> {
        ensure_random_source()?;
        Ok(Self::new())
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Generator<C> {
    /// Create a generator with a custom clock source.
    ///
    /// # Arguments
    /// * `clock` - Source of the current time in milliseconds.
    /// * `config` - Generator tunables.
    pub fn with_clock(clock: C, config: GeneratorConfig) -> Self {
        Self {
            state: AtomicU64::new(0),
            clock_stalls: AtomicU64::new(0),
            config,
            clock,
        }
    }

    /// Generate a new identifier.
    ///
    /// The random part is drawn after the timestamp and counter have been
    /// reserved, outside the state update.
    pub fn generate(&self) -> Scru160Id {
        let (timestamp, counter) = self.next_pair();
        let mut random = [0u8; 12];
        rand::rng().fill_bytes(&mut random);
        Scru160Id::from_parts(timestamp, counter, random)
    }

    /// Generate a new identifier encoded as a 32-character base32hex string.
    pub fn scru160(&self) -> String {
        self.generate().to_sortable_string()
    }

    /// Generate a new identifier encoded as a 40-character hexadecimal string.
    pub fn scru160f(&self) -> String {
        self.generate().to_hex_string()
    }

    /// Reserve the next `(timestamp, counter)` pair.
    ///
    /// - If the clock moved past the last timestamp, take the new time and a
    ///   random 15-bit counter.
    /// - Otherwise increment the counter under the last timestamp.
    /// - If the counter would overflow, wait for the clock to move forward
    ///   (bounded by [`GeneratorConfig::clock_wait_limit`]) and start over with
    ///   a new timestamp and random counter.
    ///
    /// # Returns
    /// The 48-bit timestamp and 16-bit counter.
    pub fn next_pair(&self) -> (u64, u16) {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let (last_ts, last_cnt) = unpack(current);
            let now = self.now();

            let mut stall = None;
            let next = if now > last_ts {
                pack(now, seed_counter())
            } else if last_cnt < u16::MAX {
                pack(last_ts, last_cnt + 1)
            } else {
                let (now, risk) = self.wait_for_clock(last_ts);
                stall = risk;
                pack(now, seed_counter())
            };

            match self.state.compare_exchange(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    // only the caller that installed the reinitialized state reports it
                    if let Some(risk) = stall {
                        self.clock_stalls.fetch_add(1, Ordering::Relaxed);
                        warn!("scru160: {}", risk);
                    }
                    return unpack(next);
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// How many times this generator had to reinitialize its state because the
    /// clock stalled after a counter overflow.
    pub fn clock_stalls(&self) -> u64 {
        self.clock_stalls.load(Ordering::Relaxed)
    }

    fn now(&self) -> u64 {
        self.clock.now_ms() & TIMESTAMP_MAX
    }

    /// Poll the clock until it passes `last_ts`, giving up after the
    /// configured number of polls and returning whatever the clock reads
    /// together with the stall that caused it.
    fn wait_for_clock(&self, last_ts: u64) -> (u64, Option<ClockStallRisk>) {
        trace!(last_timestamp = last_ts, "counter overflow, waiting for clock");
        let limit = self.config.clock_wait_limit;
        let mut iterations = 0;
        loop {
            let now = self.now();
            if now > last_ts {
                return (now, None);
            }
            if iterations >= limit {
                let risk = ClockStallRisk {
                    last_timestamp: last_ts,
                    now,
                    iterations,
                };
                return (now, Some(risk));
            }
            iterations += 1;
            spin_loop();
        }
    }
}

/// Check that the operating system's secure random source can be read.
///
/// # Errors
/// [`Error::RandomSourceUnavailable`] with the platform's error message.
pub fn ensure_random_source() -> Result<(), Error> {
    let mut sample = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut sample)
        .map_err(|err| Error::RandomSourceUnavailable(err.to_string()))
}

fn seed_counter() -> u16 {
    rand::rng().random::<u16>() & COUNTER_SEED_MASK
}

fn pack(timestamp: u64, counter: u16) -> u64 {
    ((timestamp & TIMESTAMP_MAX) << COUNTER_BITS) | counter as u64
}

fn unpack(state: u64) -> (u64, u16) {
    (state >> COUNTER_BITS, state as u16)
}
