//! Advisory file locks with a bounded wait

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use backoff::ExponentialBackoffBuilder;
use fs2::FileExt;

use crate::{Error, Result};

/// An exclusive advisory lock held on a file.
///
/// The lock is released when the guard is dropped.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`, creating the file if needed.
    ///
    /// Contention is retried with exponential backoff until `timeout`
    /// has elapsed, after which [`Error::LockTimeout`] is returned.
    pub fn exclusive(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::io(path, e))?;

        let started = Instant::now();
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(5))
            .with_max_interval(Duration::from_millis(200))
            .with_max_elapsed_time(Some(timeout))
            .build();

        let attempt = || match FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                tracing::debug!(path = %path.display(), "lock contended, retrying");
                Err(backoff::Error::transient(e))
            }
            Err(e) => Err(backoff::Error::permanent(e)),
        };

        match backoff::retry(policy, attempt) {
            Ok(()) => Ok(Self {
                file,
                path: path.to_path_buf(),
            }),
            Err(backoff::Error::Transient { .. }) => Err(Error::LockTimeout {
                path: path.to_path_buf(),
                waited: started.elapsed(),
            }),
            Err(backoff::Error::Permanent(e)) => {
                tracing::debug!(path = %path.display(), error = %e, "lock failed");
                Err(Error::LockFailed {
                    path: path.to_path_buf(),
                })
            }
        }
    }

    /// Path of the locked file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release lock");
        }
    }
}
