//! Busy device registries
//!
//! [`InMemoryRegistry`] serves a single process. [`FileRegistry`] keeps the
//! busy set in a JSON file so that several test runners on one host share
//! it; writers serialize through a lock file next to it.

use crate::error::{PoolError, Result};
use crate::instance::BusyDevice;
use crate::provider::{BusyRegistry, DeviceClaims};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const LOCK_RETRIES: u32 = 50;
const LOCK_RETRY_DELAY: std::time::Duration = std::time::Duration::from_millis(100);

/// Process-local busy registry
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    devices: Arc<RwLock<Vec<BusyDevice>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> PoolError {
    PoolError::RegistryError("Lock poisoned".to_string())
}

#[async_trait]
impl BusyRegistry for InMemoryRegistry {
    async fn list_busy_devices(&self) -> Result<Vec<BusyDevice>> {
        let devices = self.devices.read().map_err(|_| poisoned())?;
        Ok(devices.clone())
    }
}

#[async_trait]
impl DeviceClaims for InMemoryRegistry {
    async fn try_claim(&self, device: BusyDevice) -> Result<bool> {
        let mut devices = self.devices.write().map_err(|_| poisoned())?;
        if devices.iter().any(|d| d.id == device.id) {
            return Ok(false);
        }
        devices.push(device);
        Ok(true)
    }

    async fn release(&self, id: &str) -> Result<bool> {
        let mut devices = self.devices.write().map_err(|_| poisoned())?;
        let before = devices.len();
        devices.retain(|d| d.id != id);
        Ok(devices.len() != before)
    }
}

/// Lock file contents
#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    acquired_at: DateTime<Utc>,
}

/// RAII guard for the registry lock file
struct RegistryLock {
    lock_path: PathBuf,
    released: bool,
}

impl RegistryLock {
    async fn release(mut self) -> Result<()> {
        if !self.released {
            match fs::remove_file(&self.lock_path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            self.released = true;
            tracing::debug!("Released registry lock");
        }
        Ok(())
    }
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        if !self.released {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

/// Busy registry persisted as a JSON array of [`BusyDevice`]
pub struct FileRegistry {
    path: PathBuf,
    stale_after: Duration,
    lock_retries: u32,
    lock_retry_delay: std::time::Duration,
}

impl FileRegistry {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            stale_after: Duration::hours(1),
            lock_retries: LOCK_RETRIES,
            lock_retry_delay: LOCK_RETRY_DELAY,
        }
    }

    /// Age after which a leftover lock file is considered abandoned
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// How often and how fast to retry a held lock before giving up
    pub fn with_lock_retries(mut self, retries: u32, delay: std::time::Duration) -> Self {
        self.lock_retries = retries.max(1);
        self.lock_retry_delay = delay;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut p = self.path.clone().into_os_string();
        p.push(".lock");
        PathBuf::from(p)
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).await?;
                tracing::debug!("Created registry directory: {}", dir.display());
            }
        }
        Ok(())
    }

    async fn read(&self) -> Result<Vec<BusyDevice>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    /// Write through a temp file so lock-free readers never see a partial file
    async fn write(&self, devices: &[BusyDevice]) -> Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let content = serde_json::to_string_pretty(devices)?;
        fs::write(&tmp, content).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!("Saved registry with {} busy devices", devices.len());
        Ok(())
    }

    async fn acquire_lock(&self) -> Result<RegistryLock> {
        self.ensure_parent_dir().await?;
        let lock_path = self.lock_path();

        for _ in 0..self.lock_retries {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
                .await
            {
                Ok(mut file) => {
                    let info = LockInfo {
                        holder: lock_holder(),
                        acquired_at: Utc::now(),
                    };
                    file.write_all(serde_json::to_string(&info)?.as_bytes())
                        .await?;
                    file.flush().await?;
                    tracing::debug!("Acquired registry lock");
                    return Ok(RegistryLock {
                        lock_path,
                        released: false,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if self.remove_if_stale(&lock_path).await? {
                        continue;
                    }
                    tokio::time::sleep(self.lock_retry_delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(PoolError::LockError(format!(
            "Registry {} is locked by another process",
            self.path.display()
        )))
    }

    async fn remove_if_stale(&self, lock_path: &Path) -> Result<bool> {
        let content = match fs::read_to_string(lock_path).await {
            Ok(content) => content,
            // released between our open and read
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        // Unreadable info: the holder has not written it yet or died first,
        // so fall back to the file's own age
        let (holder, acquired_at) = match serde_json::from_str::<LockInfo>(&content) {
            Ok(info) => (info.holder, info.acquired_at),
            Err(_) => {
                let modified = match fs::metadata(lock_path).await {
                    Ok(meta) => meta.modified()?,
                    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
                    Err(e) => return Err(e.into()),
                };
                ("unknown holder".to_string(), DateTime::<Utc>::from(modified))
            }
        };

        let age = Utc::now().signed_duration_since(acquired_at);
        if age < self.stale_after {
            return Ok(false);
        }

        tracing::warn!("Removing stale registry lock from {}", holder);
        match fs::remove_file(lock_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

fn lock_holder() -> String {
    let host = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("HOST"))
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{}:{}", host, std::process::id())
}

#[async_trait]
impl BusyRegistry for FileRegistry {
    async fn list_busy_devices(&self) -> Result<Vec<BusyDevice>> {
        self.read().await
    }
}

#[async_trait]
impl DeviceClaims for FileRegistry {
    async fn try_claim(&self, device: BusyDevice) -> Result<bool> {
        let lock = self.acquire_lock().await?;

        let mut devices = self.read().await?;
        let claimed = if devices.iter().any(|d| d.id == device.id) {
            false
        } else {
            devices.push(device);
            self.write(&devices).await?;
            true
        };

        lock.release().await?;
        Ok(claimed)
    }

    async fn release(&self, id: &str) -> Result<bool> {
        let lock = self.acquire_lock().await?;

        let mut devices = self.read().await?;
        let before = devices.len();
        devices.retain(|d| d.id != id);
        let released = devices.len() != before;
        if released {
            self.write(&devices).await?;
        }

        lock.release().await?;
        Ok(released)
    }
}
