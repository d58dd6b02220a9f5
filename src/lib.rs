//! JSON vs BSON Performance Benchmark for DuckDB
//!
//! Creates comparable JSON and BSON tables inside a scratch DuckDB database
//! and measures wall-clock performance across five access patterns:
//! bulk conversion, field extraction, existence checks, grouped aggregation,
//! and storage size.
//!
//! Timings come from the DuckDB shell's own `.timer on` instrumentation: each
//! workload is executed warmup + measured times in a single batch process and
//! the per-statement `Run Time (s): real …` lines are parsed back out of the
//! captured console output.
//!
//! Run: `cargo run --release -- --shell ./duckdb --extension-dir build/reldebug/extension`

pub mod populate;
pub mod report;
pub mod scratch;
pub mod shell;
pub mod stats;
pub mod workloads;
