//! `group-info` prints the header of a basic algebra.
//!
//! **Usage:**
//! ```text
//! group-info [-v] <stem>
//! ```
//!
//! Reads `<stem>.nontips`, and `<stem>.dims` for the Jennings ordering.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use modres::cli::{group_info, init_tracing};

/// Print the header of a basic algebra.
#[derive(Parser)]
#[command(name = "group-info", about = "Print the header of a basic algebra")]
struct Args {
    /// Path of the group without extension.
    stem: PathBuf,

    /// Log more; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    init_tracing(args.verbose)?;
    print!("{}", group_info(&args.stem)?);
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
            eprintln!("group-info: {e:#}");
            ExitCode::FAILURE
        }
    }
}
