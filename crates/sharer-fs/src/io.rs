//! Atomic I/O operations

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::{Error, Result};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Tuning knobs for durable writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to wait for a contended lock before giving up.
    pub lock_timeout: Duration,
    /// Whether to fsync the temp file before renaming it into place.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename so a reader observes either the old
/// content or the new content, never a partial write. The temp file lives
/// next to the target to keep the rename on one filesystem.
pub fn write_atomic(path: &Path, content: &[u8], config: RobustnessConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let temp_path = temp_path_for(path);

    let result = (|| {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .write_all(content)
            .map_err(|e| Error::io(&temp_path, e))?;

        if config.enable_fsync {
            temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
        }
        drop(temp_file);

        fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Read a UTF-8 file, returning `None` when it does not exist.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Read a UTF-8 file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Move a file out of the way by appending `.{suffix}` to its name.
///
/// An existing file is never replaced: if the target is taken, `.1`, `.2`
/// and so on are appended until a free name is found. Returns the new
/// location. The original path no longer exists afterwards.
pub fn move_aside(path: &Path, suffix: &str) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = path.with_file_name(format!("{}.{}", file_name, suffix));

    let mut attempt = 0u32;
    let target = loop {
        let candidate = if attempt == 0 {
            base.clone()
        } else {
            path.with_file_name(format!("{}.{}.{}", file_name, suffix, attempt))
        };
        if claim_target(path, &candidate)? {
            break candidate;
        }
        attempt += 1;
    };

    tracing::warn!(
        from = %path.display(),
        to = %target.display(),
        "moved unreadable file aside"
    );
    Ok(target)
}

/// Move `path` to `target` unless `target` already exists.
///
/// A hard link is created first, which fails atomically on an existing
/// target. Filesystems without hard links fall back to a checked rename.
fn claim_target(path: &Path, target: &Path) -> Result<bool> {
    match fs::hard_link(path, target) {
        Ok(()) => {
            fs::remove_file(path).map_err(|e| Error::io(path, e))?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => {
            tracing::debug!(target = %target.display(), error = %e, "hard link failed, renaming");
            if target.exists() {
                return Ok(false);
            }
            fs::rename(path, target).map_err(|e| Error::io(path, e))?;
            Ok(true)
        }
    }
}

/// Sibling path used for the lock file guarding `path`.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.lock", file_name))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(
        ".{}.{}.{}.tmp",
        file_name,
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ))
}
