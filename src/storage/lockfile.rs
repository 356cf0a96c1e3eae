//! Process lock on the state directory
//!
//! Two runs writing the same directory would interleave day files and race
//! on `base.json`. The lock is a PID file inside the directory.

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Held for the lifetime of a writing run; removed on drop.
#[derive(Debug)]
pub struct ProcessLock {
    lock_path: PathBuf,
    owned: bool,
}

impl ProcessLock {
    const LOCK_FILE_NAME: &'static str = ".frontline-sync.lock";

    /// Acquire the lock for `data_dir`, creating the directory if needed.
    ///
    /// Fails if a live `frontline-sync` process holds it. Stale or
    /// unreadable lock files are replaced.
    pub fn acquire<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();

        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let lock_path = data_dir.join(Self::LOCK_FILE_NAME);

        if lock_path.exists() {
            match Self::holder(&lock_path) {
                Ok(Some(pid)) => {
                    bail!(
                        "Another frontline-sync run is using {} (PID: {pid})\n\
                         \n\
                         Wait for it to finish, or remove the stale lock file:\n\
                            rm {}",
                        data_dir.display(),
                        lock_path.display()
                    );
                }
                Ok(None) => {
                    tracing::info!(path = %lock_path.display(), "Removing stale lock file");
                    fs::remove_file(&lock_path).context("Failed to remove stale lock file")?;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Unreadable lock file, replacing it");
                    let _ = fs::remove_file(&lock_path);
                }
            }
        }

        let pid = std::process::id();
        let mut file = File::create(&lock_path)
            .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;
        writeln!(file, "{pid}").context("Failed to write PID to lock file")?;

        tracing::debug!(pid, path = %lock_path.display(), "Acquired process lock");

        Ok(Self {
            lock_path,
            owned: true,
        })
    }

    /// PID of a live holder, `None` if the lock is stale.
    fn holder(lock_path: &Path) -> Result<Option<u32>> {
        let contents = fs::read_to_string(lock_path).context("Failed to read lock file")?;
        let pid: u32 = contents
            .trim()
            .parse()
            .context("Failed to parse PID from lock file")?;

        Ok(Self::is_running(pid).then_some(pid))
    }

    #[cfg(unix)]
    fn is_running(pid: u32) -> bool {
        fs::read_to_string(format!("/proc/{pid}/cmdline"))
            .is_ok_and(|cmdline| cmdline.contains("frontline-sync") || cmdline.contains("frontline_sync"))
    }

    #[cfg(not(unix))]
    fn is_running(_pid: u32) -> bool {
        true
    }

    pub fn release(&mut self) {
        if self.owned {
            if let Err(e) = fs::remove_file(&self.lock_path) {
                tracing::warn!(error = %e, "Failed to remove lock file");
            } else {
                tracing::debug!(path = %self.lock_path.display(), "Released process lock");
            }
            self.owned = false;
        }
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        self.release();
    }
}
