//! DuckDB shell invocation and timing extraction.
//!
//! Every measurement flows through here: a workload is executed as a single
//! batch process (`duckdb <db> -c <cmd> -c <cmd> …`) with `.timer on`
//! enabled, and the per-statement `Run Time (s): real …` lines are parsed
//! out of the captured stdout. The console text is the only timing channel
//! the shell offers, so any count mismatch between statements sent and
//! timings received is treated as a hard failure rather than a partial read.

use regex::Regex;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Ceiling for the one-time dataset setup batch.
pub const SETUP_TIMEOUT: Duration = Duration::from_secs(1800);

/// Ceiling for a single workload batch (all warmup + measured repetitions).
pub const WORKLOAD_TIMEOUT: Duration = Duration::from_secs(600);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shell locations probed when no explicit binary is given.
const SHELL_CANDIDATES: [&str; 4] = [
    "build/reldebug/duckdb",
    "build/release/duckdb",
    "build/debug/duckdb",
    "./duckdb",
];

/// Why a batch invocation produced no usable timings.
///
/// These are per-workload failures: the run records them and moves on to the
/// next workload. Only dataset setup treats them as fatal.
#[derive(Debug, Error)]
pub enum ExecutionFailure {
    #[error("query timeout (>{}s)", .limit.as_secs())]
    Timeout { limit: Duration },

    #[error("query failed ({status}):\n{output}")]
    NonZeroExit {
        status: std::process::ExitStatus,
        output: String,
    },

    #[error("expected {expected} timing results, got {actual}")]
    MalformedOutput { expected: usize, actual: usize },

    #[error("failed to launch {shell}: {source}")]
    Launch {
        shell: String,
        #[source]
        source: std::io::Error,
    },
}

/// Warmup/measured repetition counts for one workload run.
///
/// `measured` must be at least 1 — a zero-measurement run would produce an
/// empty sample with undefined statistics, so it is rejected up front.
#[derive(Debug, Clone, Copy)]
pub struct Repetitions {
    pub warmup: u32,
    pub measured: u32,
}

impl Repetitions {
    pub fn new(warmup: u32, measured: u32) -> anyhow::Result<Self> {
        anyhow::ensure!(measured >= 1, "measured run count must be at least 1");
        Ok(Self { warmup, measured })
    }

    pub fn total(&self) -> usize {
        (self.warmup + self.measured) as usize
    }
}

/// Captured console output of a completed (exit code 0) batch.
#[derive(Debug)]
pub struct BatchOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Handle to the DuckDB CLI binary being benchmarked.
pub struct DuckDbShell {
    binary: PathBuf,
}

impl DuckDbShell {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Probe common build directories for a runnable shell.
    pub fn discover() -> Option<Self> {
        SHELL_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|p| is_executable(p))
            .map(Self::new)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run an ordered command sequence as one shell process against `db`.
    ///
    /// Blocks until the process exits or `limit` elapses; an overrun kills
    /// the child and yields [`ExecutionFailure::Timeout`]. A non-zero exit
    /// yields [`ExecutionFailure::NonZeroExit`] carrying the combined
    /// stderr + stdout diagnostic.
    pub fn run_batch(
        &self,
        db: &Path,
        commands: &[String],
        limit: Duration,
    ) -> Result<BatchOutput, ExecutionFailure> {
        let launch = |source| ExecutionFailure::Launch {
            shell: self.binary.display().to_string(),
            source,
        };

        // Child output goes to unlinked temp files, not pipes: the child can
        // never block on a full pipe buffer while we poll for exit.
        let mut out_capture = tempfile::tempfile().map_err(launch)?;
        let mut err_capture = tempfile::tempfile().map_err(launch)?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg(db);
        for command in commands {
            cmd.arg("-c").arg(command);
        }
        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::from(out_capture.try_clone().map_err(launch)?))
            .stderr(Stdio::from(err_capture.try_clone().map_err(launch)?))
            .spawn()
            .map_err(launch)?;

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if started.elapsed() >= limit {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ExecutionFailure::Timeout { limit });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(launch(source));
                }
            }
        };

        let stdout = read_back(&mut out_capture);
        let stderr = read_back(&mut err_capture);

        if !status.success() {
            return Err(ExecutionFailure::NonZeroExit {
                status,
                output: format!("{stderr}\n{stdout}"),
            });
        }

        Ok(BatchOutput { stdout, stderr })
    }

    /// Execute `statement` warmup + measured times with timing enabled and
    /// return the measured wall-clock durations in seconds, in execution
    /// order, warmup timings discarded.
    pub fn run_timed(
        &self,
        db: &Path,
        statement: &str,
        reps: Repetitions,
        threads: Option<u32>,
    ) -> Result<Vec<f64>, ExecutionFailure> {
        let commands = timed_commands(statement, reps, threads);
        let output = self.run_batch(db, &commands, WORKLOAD_TIMEOUT)?;

        let timings = parse_real_times(&output.stdout);
        if timings.len() != reps.total() {
            return Err(ExecutionFailure::MalformedOutput {
                expected: reps.total(),
                actual: timings.len(),
            });
        }

        Ok(timings[reps.warmup as usize..].to_vec())
    }
}

/// Build the instruction sequence for one timed workload batch.
///
/// The thread directive must precede `.timer on` so that its own execution
/// does not emit a timing line; everything after the timer directive emits
/// exactly one line per statement.
fn timed_commands(statement: &str, reps: Repetitions, threads: Option<u32>) -> Vec<String> {
    let mut commands = Vec::with_capacity(reps.total() + 2);
    if let Some(n) = threads {
        commands.push(format!("SET threads={n}"));
    }
    commands.push(".timer on".to_string());
    for _ in 0..reps.total() {
        commands.push(statement.trim().to_string());
    }
    commands
}

/// Extract every `Run Time (s): real <seconds>` value from shell output, in
/// emission order. Emission order matches statement execution order because
/// the shell prints one report per executed statement.
pub fn parse_real_times(stdout: &str) -> Vec<f64> {
    static TIMING_RE: OnceLock<Regex> = OnceLock::new();
    let re = TIMING_RE
        .get_or_init(|| Regex::new(r"Run Time \(s\): real (\d+\.\d+)").expect("valid pattern"));
    re.captures_iter(stdout)
        .map(|caps| caps[1].parse::<f64>().expect("digits parse as f64"))
        .collect()
}

fn read_back(capture: &mut File) -> String {
    let mut buf = Vec::new();
    let _ = capture.seek(SeekFrom::Start(0));
    let _ = capture.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && path
            .metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
