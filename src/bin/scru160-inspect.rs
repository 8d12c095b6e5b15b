use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;

/// Show components of SCRU-160 identifiers read from stdin or a file.
/// Print a human-readable JSON object for each valid line read.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read identifiers from file ("-" for stdin)
    #[arg(value_name = "FILE", default_value = "-")]
    file: PathBuf,
}

fn main() {
    scru160::cli::init_logging();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("scru160-inspect: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let input = scru160::cli::open_input(&args.file)?;
    let out = BufWriter::new(io::stdout().lock());
    scru160::cli::inspect_lines(input, out)?;

    Ok(())
}
