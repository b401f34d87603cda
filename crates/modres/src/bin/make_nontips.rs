//! `make-nontips` writes the basic algebra of a catalogue group.
//!
//! **Usage:**
//! ```text
//! make-nontips [-v] <group> <stem> [--ordering R|L|J] [--dims 1,1,...]
//! ```
//!
//! Groups: `c<order>` (cyclic), `c<p>^<n>` (elementary abelian), `d8`, `q8`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use modres::cli::init_tracing;
use modres_algebra::{save_group, small_groups, PathOrdering};

/// Write the basic algebra of a catalogue group.
#[derive(Parser)]
#[command(name = "make-nontips", about = "Write the basic algebra of a catalogue group")]
struct Args {
    /// Group name: c<order>, c<p>^<n>, d8 or q8.
    group: String,

    /// Output path without extension.
    stem: PathBuf,

    /// Ordering: R (reverse length-lex), L (length-lex) or J (Jennings).
    #[arg(long, default_value = "R")]
    ordering: char,

    /// Jennings dimensions of the generators.
    #[arg(long, value_delimiter = ',')]
    dims: Vec<u32>,

    /// Log more; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    init_tracing(args.verbose)?;
    let ordering = PathOrdering::from_byte(u8::try_from(args.ordering).unwrap_or(b'?'))?;
    let group = small_groups::by_name(&args.group)?
        .builder()
        .with_ordering(ordering)
        .with_dims(args.dims.clone())
        .build()?;
    save_group(&group, &args.stem)?;
    println!(
        "{}: order {}^{}, {} generators, {} nontips",
        args.group,
        group.p(),
        group.order_exponent(),
        group.arrows(),
        group.nontips()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("make-nontips: {e:#}");
            ExitCode::FAILURE
        }
    }
}
