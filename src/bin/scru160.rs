use std::io::{self, BufWriter};

use clap::Parser;

/// Generate SCRU-160 identifiers.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print identifiers in hex encoding
    #[arg(short = 'f')]
    hex: bool,
    /// Generate given number of identifiers
    #[arg(short = 'n', value_name = "count", default_value_t = 1)]
    count: u64,
}

fn main() {
    scru160::cli::init_logging();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("scru160: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    scru160::ensure_random_source()?;
    let out = BufWriter::new(io::stdout().lock());
    scru160::cli::write_ids(scru160::default_generator(), args.count, args.hex, out)?;

    Ok(())
}
