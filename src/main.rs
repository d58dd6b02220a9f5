//! Benchmark runner: provisions the scratch database, executes every
//! cataloged workload through the DuckDB shell, and prints the report.
//!
//! Usage:
//!   cargo run --release -- --extension-dir build/reldebug/extension
//!   cargo run --release -- --shell ./duckdb \
//!       --bson-extension build/reldebug/extension/bson/bson.duckdb_extension \
//!       --rows 50000 --runs 7 --warmup 1 --threads 4

use anyhow::{bail, Context, Result};
use bson_bench::populate::{self, SetupPlan};
use bson_bench::report::{self, BenchmarkResult};
use bson_bench::scratch::ScratchDb;
use bson_bench::shell::{DuckDbShell, Repetitions};
use bson_bench::{stats, workloads};
use clap::Parser;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "bson-bench", about = "Benchmark JSON vs BSON performance in DuckDB")]
struct Args {
    /// Path to the DuckDB CLI binary (default: probe common build dirs).
    #[arg(long)]
    shell: Option<PathBuf>,

    /// Path for the benchmark database (default: fresh temporary file).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Number of rows to generate.
    #[arg(long, default_value_t = 100_000)]
    rows: u64,

    /// Number of measured runs per query.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    runs: u32,

    /// Number of warmup runs per query (timings discarded).
    #[arg(long, default_value_t = 1)]
    warmup: u32,

    /// Worker thread count for the engine (default: engine default).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    threads: Option<u32>,

    /// Extension directory (applied via SET extension_directory).
    #[arg(long)]
    extension_dir: Option<PathBuf>,

    /// Direct path to the bson extension file.
    #[arg(long)]
    bson_extension: Option<PathBuf>,

    /// Keep the database after the benchmark (for debugging).
    #[arg(long)]
    keep_db: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        log::error!("{err:#}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.extension_dir.is_none() && args.bson_extension.is_none() {
        bail!("must specify either --extension-dir or --bson-extension");
    }

    let shell = match &args.shell {
        Some(path) => {
            if !path.is_file() {
                bail!("shell not found: {}", path.display());
            }
            DuckDbShell::new(path)
        }
        None => DuckDbShell::discover()
            .context("could not find a DuckDB shell; specify --shell")?,
    };
    log::info!("using shell {}", shell.binary().display());

    let reps = Repetitions::new(args.warmup, args.runs)?;
    let plan = SetupPlan {
        rows: args.rows,
        extension_dir: args.extension_dir,
        bson_extension: args.bson_extension,
    };

    let scratch = ScratchDb::acquire(args.db)?;
    let outcome = execute(&shell, &scratch, &plan, reps, args.threads);
    scratch.release(args.keep_db);

    println!("{}", outcome?);
    Ok(())
}

/// Provision once, then run each workload in turn. Per-workload failures are
/// recorded and the run continues; only setup failures abort.
fn execute(
    shell: &DuckDbShell,
    scratch: &ScratchDb,
    plan: &SetupPlan,
    reps: Repetitions,
    threads: Option<u32>,
) -> Result<String> {
    log::info!("setting up database at {}", scratch.path().display());
    populate::provision(shell, scratch.path(), plan)?;
    log::info!("database setup complete ({} rows)", plan.rows);

    log::info!(
        "running benchmarks (warmup={}, runs={})",
        reps.warmup,
        reps.measured
    );
    let mut results = BenchmarkResult::new();
    for spec in workloads::catalog() {
        match shell.run_timed(scratch.path(), spec.statement, reps, threads) {
            Ok(sample) => {
                let summary = stats::summarize(&sample);
                log::info!("{}: ok (median {:.4}s)", spec.name, summary.median);
                results.insert(spec.name, Ok(summary));
            }
            Err(failure) => {
                log::warn!("{}: {failure}", spec.name);
                results.insert(spec.name, Err(failure));
            }
        }
    }

    Ok(report::render(
        &results,
        workloads::comparison_pairs(),
        plan.rows,
    ))
}
