//! Scratch database lifecycle: allocation and cleanup of the benchmark file.
//!
//! The database file is the only state shared across the run: created here,
//! written once by provisioning, read by every workload, removed on drop.
//! Cleanup problems are warnings, never errors — a failed unlink must not
//! mask benchmark results that were already produced.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Write-ahead / shared-memory files DuckDB may leave beside the database.
const SIDECAR_SUFFIXES: [&str; 3] = [".wal", "-wal", "-shm"];

/// Handle to the benchmark database location.
///
/// An auto-allocated location is removed (primary file plus sidecars) when
/// the handle drops, unless [`ScratchDb::release`] marked it retained. An
/// explicit user-supplied path is never deleted.
#[derive(Debug)]
pub struct ScratchDb {
    path: PathBuf,
    auto_allocated: bool,
    retained: bool,
}

impl ScratchDb {
    /// Use `explicit` if given, otherwise allocate a fresh unique `*.duckdb`
    /// path with no pre-existing file so the engine creates the database
    /// itself.
    pub fn acquire(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) => Ok(Self {
                path,
                auto_allocated: false,
                retained: false,
            }),
            None => {
                let placeholder = tempfile::Builder::new()
                    .prefix("bson_bench_")
                    .suffix(".duckdb")
                    .tempfile()
                    .context("allocate scratch database path")?;
                let path = placeholder.path().to_path_buf();
                // The engine must create the database file itself; keep only
                // the unique name.
                placeholder
                    .close()
                    .context("remove scratch placeholder file")?;
                Ok(Self {
                    path,
                    auto_allocated: true,
                    retained: false,
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Finish with the database. `retain = true` keeps the files on disk and
    /// tells the user where they are.
    pub fn release(mut self, retain: bool) {
        if retain {
            self.retained = true;
            log::info!("database kept at {}", self.path.display());
        }
    }
}

impl Drop for ScratchDb {
    fn drop(&mut self) {
        if !self.auto_allocated || self.retained {
            return;
        }
        remove_quietly(&self.path);
        for suffix in SIDECAR_SUFFIXES {
            let mut sidecar = self.path.clone().into_os_string();
            sidecar.push(suffix);
            remove_quietly(Path::new(&sidecar));
        }
    }
}

fn remove_quietly(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(err) = std::fs::remove_file(path) {
        log::warn!("could not clean up {}: {err}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch_with_sidecars(path: &Path) -> Vec<PathBuf> {
        let mut created = vec![path.to_path_buf()];
        fs::write(path, b"db").unwrap();
        for suffix in SIDECAR_SUFFIXES {
            let mut sidecar = path.to_path_buf().into_os_string();
            sidecar.push(suffix);
            let sidecar = PathBuf::from(sidecar);
            fs::write(&sidecar, b"x").unwrap();
            created.push(sidecar);
        }
        created
    }

    #[test]
    fn auto_allocated_path_is_fresh() {
        let db = ScratchDb::acquire(None).unwrap();
        assert!(!db.path().exists());
        assert_eq!(db.path().extension().unwrap(), "duckdb");
    }

    #[test]
    fn release_removes_primary_and_all_sidecars() {
        let db = ScratchDb::acquire(None).unwrap();
        let files = touch_with_sidecars(db.path());
        db.release(false);
        for file in &files {
            assert!(!file.exists(), "{} survived cleanup", file.display());
        }
    }

    #[test]
    fn retain_keeps_everything() {
        let db = ScratchDb::acquire(None).unwrap();
        let files = touch_with_sidecars(db.path());
        db.release(true);
        for file in &files {
            assert!(file.exists(), "{} was deleted despite retain", file.display());
            fs::remove_file(file).unwrap();
        }
    }

    #[test]
    fn explicit_path_is_never_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.duckdb");
        fs::write(&path, b"db").unwrap();

        let db = ScratchDb::acquire(Some(path.clone())).unwrap();
        db.release(false);
        assert!(path.exists());
    }

    #[test]
    fn drop_cleans_up_like_release() {
        let db = ScratchDb::acquire(None).unwrap();
        let files = touch_with_sidecars(db.path());
        drop(db);
        for file in &files {
            assert!(!file.exists());
        }
    }
}
