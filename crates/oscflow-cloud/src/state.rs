//! Local record of managed resources
//!
//! `.oscflow/state.json` maps `type:name` keys to the last known
//! [`ResourceData`] of every resource created through the CLI. Mutating
//! commands work on a [`LockedState`]: the lock file is taken before the
//! state is read and dropped after it is written back.

use crate::error::{CloudError, Result};
use crate::resource::ResourceData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind as IoErrorKind;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".oscflow";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";
const STATE_TEMP: &str = "state.json.tmp";
const LOCK_FILE: &str = "lock.json";
const STALE_LOCK_HOURS: i64 = 1;

/// Key of a resource in the state file
pub fn resource_key(resource_type: &str, name: &str) -> String {
    format!("{}:{}", resource_type, name)
}

/// Contents of the state file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalState {
    pub version: u32,

    pub updated_at: DateTime<Utc>,

    /// Records keyed by `type:name`
    pub resources: BTreeMap<String, ResourceRecord>,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            resources: BTreeMap::new(),
        }
    }
}

impl GlobalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_type(&self, resource_type: &str) -> Vec<&ResourceRecord> {
        self.resources
            .values()
            .filter(|r| r.resource_type == resource_type)
            .collect()
    }

    pub fn get_resource(&self, key: &str) -> Option<&ResourceRecord> {
        self.resources.get(key)
    }

    /// Insert or replace the record under its own key.
    pub fn set_resource(&mut self, record: ResourceRecord) {
        self.updated_at = Utc::now();
        self.resources.insert(record.key(), record);
    }

    pub fn remove_resource(&mut self, key: &str) -> Option<ResourceRecord> {
        let removed = self.resources.remove(key)?;
        self.updated_at = Utc::now();
        Some(removed)
    }
}

/// One managed resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Resource type (e.g., "security_group")
    pub resource_type: String,

    /// Local name chosen by the user
    pub name: String,

    pub data: ResourceData,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl ResourceRecord {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>, data: ResourceData) -> Self {
        let now = Utc::now();
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            data,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> String {
        resource_key(&self.resource_type, &self.name)
    }

    pub fn update_data(&mut self, data: ResourceData) {
        self.updated_at = Utc::now();
        self.data = data;
    }
}

/// Reads and writes the state directory
#[derive(Debug, Clone)]
pub struct StateManager {
    dir: PathBuf,
}

impl StateManager {
    /// Manager for `<root>/.oscflow`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join(STATE_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Current state; a missing file is an empty state.
    pub async fn load(&self) -> Result<GlobalState> {
        let content = match fs::read_to_string(self.dir.join(STATE_FILE)).await {
            Ok(content) => content,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                tracing::debug!("No state file in {}", self.dir.display());
                return Ok(GlobalState::new());
            }
            Err(e) => return Err(e.into()),
        };

        let state: GlobalState = serde_json::from_str(&content)?;
        if state.version > STATE_VERSION {
            return Err(CloudError::StateError(format!(
                "state file version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }

        tracing::debug!("Loaded {} records", state.resources.len());
        Ok(state)
    }

    /// Write `state`, copying the previous file to the backup first.
    ///
    /// The new content goes to a temporary file renamed over the old one.
    pub async fn save(&self, state: &GlobalState) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(STATE_FILE);
        if fs::try_exists(&path).await? {
            fs::copy(&path, self.dir.join(STATE_BACKUP)).await?;
        }

        let temp = self.dir.join(STATE_TEMP);
        fs::write(&temp, serde_json::to_vec_pretty(state)?).await?;
        fs::rename(&temp, &path).await?;

        tracing::debug!("Saved {} records", state.resources.len());
        Ok(())
    }

    /// Take the lock, then load the state under it.
    pub async fn lock(&self) -> Result<LockedState> {
        fs::create_dir_all(&self.dir).await?;
        let lock = self.acquire().await?;
        let state = self.load().await?;

        Ok(LockedState {
            manager: self.clone(),
            state,
            lock,
        })
    }

    async fn acquire(&self) -> Result<StateLock> {
        let path = self.dir.join(LOCK_FILE);
        let info = LockInfo {
            holder: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            pid: std::process::id(),
            acquired_at: Utc::now(),
        };

        // One retry after clearing a stale lock
        for _ in 0..2 {
            let open = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match open {
                Ok(mut file) => {
                    file.write_all(&serde_json::to_vec_pretty(&info)?).await?;
                    file.flush().await?;
                    tracing::debug!("Acquired state lock {}", path.display());
                    return Ok(StateLock {
                        path,
                        released: false,
                    });
                }
                Err(e) if e.kind() == IoErrorKind::AlreadyExists => {
                    let holder = self.current_holder(&path).await?;
                    let age = Utc::now().signed_duration_since(holder.acquired_at);
                    if age.num_hours() < STALE_LOCK_HOURS {
                        return Err(CloudError::LockError(format!(
                            "state is locked by {} (pid {}) since {}",
                            holder.holder, holder.pid, holder.acquired_at
                        )));
                    }
                    tracing::warn!("Removing stale lock held by {}", holder.holder);
                    fs::remove_file(&path).await?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CloudError::LockError(format!(
            "could not create {}",
            path.display()
        )))
    }

    async fn current_holder(&self, path: &Path) -> Result<LockInfo> {
        let content = fs::read_to_string(path).await?;
        serde_json::from_str(&content)
            .map_err(|e| CloudError::LockError(format!("unreadable lock file {}: {}", path.display(), e)))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    #[serde(default)]
    pid: u32,
    acquired_at: DateTime<Utc>,
}

/// Lock file guard; removes the file when dropped.
#[derive(Debug)]
struct StateLock {
    path: PathBuf,
    released: bool,
}

impl StateLock {
    async fn release(mut self) -> Result<()> {
        self.released = true;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if !self.released {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// State held under the lock
///
/// Changes reach the disk only through [`LockedState::commit`]; dropping the
/// value discards them and releases the lock.
#[derive(Debug)]
pub struct LockedState {
    manager: StateManager,
    state: GlobalState,
    lock: StateLock,
}

impl LockedState {
    /// Save the state and release the lock.
    pub async fn commit(self) -> Result<()> {
        self.manager.save(&self.state).await?;
        self.lock.release().await
    }
}

impl Deref for LockedState {
    type Target = GlobalState;

    fn deref(&self) -> &GlobalState {
        &self.state
    }
}

impl DerefMut for LockedState {
    fn deref_mut(&mut self) -> &mut GlobalState {
        &mut self.state
    }
}
