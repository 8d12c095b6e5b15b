//! Helpers shared by the `scru160` and `scru160-inspect` binaries.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::Path;

use tracing::{Level, Subscriber, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{Clock, Generator};

/// Install a stderr logger that shows warnings and errors only.
///
/// Colours are used only when stderr is a terminal.
pub fn init_logging() {
    log_subscriber(io::stderr, io::stderr().is_terminal()).init();
}

fn log_subscriber<W>(writer: W, ansi: bool) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(Level::WARN)
        .with_target(false)
        .without_time()
        .with_ansi(ansi)
        .finish()
}

/// Open `path` for line-by-line reading, with `-` meaning standard input.
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Write `count` new identifiers to `out`, one per line.
///
/// # Arguments
/// * `generator` - Generator to draw identifiers from.
/// * `count` - Number of identifiers.
/// * `hex` - Use the 40-character hex encoding instead of base32hex.
/// * `out` - Destination.
pub fn write_ids<C: Clock>(
    generator: &Generator<C>,
    count: u64,
    hex: bool,
    mut out: impl Write,
) -> io::Result<()> {
    for _ in 0..count {
        let id = generator.generate();
        if hex {
            writeln!(out, "{}", id.to_hex_string())?;
        } else {
            writeln!(out, "{}", id)?;
        }
    }
    out.flush()
}

/// Lines handled by [`inspect_lines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InspectSummary {
    pub printed: usize,
    pub skipped: usize,
}

/// Print a JSON report to `out` for every identifier read from `input`.
///
/// Lines are trimmed and blank lines ignored. Lines that are not identifiers
/// are logged as warnings and skipped.
pub fn inspect_lines(input: impl BufRead, mut out: impl Write) -> io::Result<InspectSummary> {
    let mut summary = InspectSummary::default();
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match crate::inspect(line) {
            Ok(report) => {
                writeln!(out, "{}", report.to_json()?)?;
                summary.printed += 1;
            }
            Err(_) => {
                warn!("skipped invalid identifier: {}", line);
                summary.skipped += 1;
            }
        }
    }
    out.flush()?;
    Ok(summary)
}
