//! `resolve` computes a minimal resolution of the trivial module.
//!
//! **Usage:**
//! ```text
//! resolve [-v] <stem> <n> [--root <dir>] [--write] [--disk-slices]
//! ```
//!
//! Prints the rank of `P_k` for `k = 0..=n`, one per line. With `--write`
//! the differentials and urbild bases go to `<root>/<name>/`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use modres::cli::init_tracing;
use modres_algebra::load_group;
use modres_groebner::BuchbergerConfig;
use modres_resolution::{Resolution, ResolutionConfig, ResolutionStore};

/// Compute a minimal projective resolution.
#[derive(Parser)]
#[command(name = "resolve", about = "Compute a minimal projective resolution")]
struct Args {
    /// Path of the group without extension.
    stem: PathBuf,

    /// Highest degree to compute.
    n: usize,

    /// Directory receiving the resolution files.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Write the differentials and urbild bases.
    #[arg(long)]
    write: bool,

    /// Keep expansion slices on disk.
    #[arg(long)]
    disk_slices: bool,

    /// Live general vectors allowed per Gröbner set.
    #[arg(long, default_value_t = 1 << 20)]
    vector_limit: usize,

    /// Log more; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    init_tracing(args.verbose)?;
    let group = load_group(&args.stem)
        .with_context(|| format!("loading {}", args.stem.display()))?;
    let name = args
        .stem
        .file_name()
        .map_or_else(|| "group".to_owned(), |s| s.to_string_lossy().into_owned());
    let config = ResolutionConfig::default()
        .with_buchberger(BuchbergerConfig::default().with_vector_limit(args.vector_limit))
        .with_store(ResolutionStore::new(&args.root, name))
        .with_write_differentials(args.write)
        .with_disk_slices(args.disk_slices);

    let mut res = Resolution::new(&group, config);
    res.extend_to(args.n)
        .with_context(|| format!("resolving to degree {}", args.n))?;
    for (k, rank) in res.ranks().into_iter().enumerate() {
        println!("rank P_{k} = {rank}");
    }
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
            eprintln!("resolve: {e:#}");
            ExitCode::FAILURE
        }
    }
}
