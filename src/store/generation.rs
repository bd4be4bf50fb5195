// src/store/generation.rs
//! Database generation layout and atomic install
//!
//! A crawl database directory holds the live generation under `current/`
//! and the previous one under `old/`. Installing a freshly written store
//! swaps the `current` pointer with two renames performed under an
//! exclusive lock file; the final rename is the commit point, so a failure
//! anywhere earlier leaves the previous generation untouched.

use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name of the live generation.
pub const CURRENT_NAME: &str = "current";
/// Directory name of the retired generation kept after an install.
pub const OLD_NAME: &str = "old";
/// Lock file serializing installs against a database directory.
pub const LOCK_NAME: &str = ".locked";

pub fn current_dir(db: &Path) -> PathBuf {
    db.join(CURRENT_NAME)
}

pub fn old_dir(db: &Path) -> PathBuf {
    db.join(OLD_NAME)
}

pub fn lock_path(db: &Path) -> PathBuf {
    db.join(LOCK_NAME)
}

/// Exclusive lock on a database directory, held for the duration of an
/// install. Released on drop.
#[derive(Debug)]
pub struct DbLock {
    file: File,
}

impl DbLock {
    pub fn acquire(db: &Path) -> Result<Self> {
        fs::create_dir_all(db)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(lock_path(db))?;
        file.try_lock_exclusive().map_err(|source| {
            if source.kind() == fs2::lock_contended_error().kind() {
                Error::Locked(db.to_path_buf())
            } else {
                Error::Io(source)
            }
        })?;
        Ok(Self { file })
    }
}

impl Drop for DbLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Promote a completed store at `tmp` to the current generation of `db`.
///
/// Under the database lock: an existing `current` replaces `old`, then
/// `tmp` is renamed to `current`. Both moves are plain filesystem renames,
/// so `tmp` must live on the same filesystem as `db`.
pub fn install(tmp: &Path, db: &Path) -> Result<()> {
    let _lock = DbLock::acquire(db)?;

    let current = current_dir(db);
    let old = old_dir(db);

    if current.exists() {
        if old.exists() {
            fs::remove_dir_all(&old)?;
        }
        fs::rename(&current, &old)?;
        debug!("retired previous generation to {}", old.display());
    }

    fs::rename(tmp, &current)?;
    debug!("installed new generation at {}", current.display());
    Ok(())
}
