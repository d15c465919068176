//! Singleton pattern to ensure only one daybook-server runs per port.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::PathBuf;

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

// One lock per port, so servers for different calendar roots can run side by side.
fn lock_path(port: u16) -> Result<PathBuf> {
    let runtime_dir = dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine runtime directory"))?;

    let dir = runtime_dir.join("daybook");
    fs::create_dir_all(&dir)?;

    Ok(dir.join(format!("server-{}.lock", port)))
}

/// Acquire an exclusive lock, failing if another instance serves `port`
pub fn acquire_lock(port: u16) -> Result<LockGuard> {
    let path = lock_path(port)?;
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another daybook-server is already running on port {}.\n\
            If you believe this is an error, remove: {}",
            port,
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}
