//! Durable Storage Module
//!
//! String key/value backends the cache persists its envelopes into.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

// == Storage Error ==
#[derive(Error, Debug)]
pub enum StorageError {
    /// Write would push the store over its byte quota
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Backing file could not be read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// Backing file holds malformed JSON
    #[error("Storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

// == Storage Trait ==
/// A persistent string-to-string store with a total byte quota.
pub trait Storage: Send {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Vec<String>;
    fn clear(&mut self) -> Result<(), StorageError>;
    /// Bytes currently used by keys and values.
    fn used_bytes(&self) -> usize;
}

// == Memory Storage ==
/// In-process store, lost on shutdown.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
    quota: usize,
}

impl MemoryStorage {
    pub fn new(quota: usize) -> Self {
        Self {
            items: BTreeMap::new(),
            quota,
        }
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        check_quota(&self.items, key, &value, self.quota)?;
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.items.clear();
        Ok(())
    }

    fn used_bytes(&self) -> usize {
        size_of_items(&self.items)
    }
}

// == File Storage ==
/// Store persisted as a single JSON document, rewritten on every mutation.
///
/// Reads are served from memory. Inside a tokio runtime the rewrite runs on
/// the blocking pool, so callers holding the cache lock never wait on the
/// disk; outside one it runs inline. Writes carry a generation number and
/// an older snapshot never replaces a newer one on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
    quota: usize,
    generation: u64,
    written: Arc<Mutex<u64>>,
}

impl FileStorage {
    /// Opens (or creates) `<dir>/<name>.json`.
    ///
    /// A corrupt document is discarded rather than failing startup.
    pub fn open(dir: impl AsRef<Path>, name: &str, quota: usize) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", name));

        let items = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened store {} with {} items", path.display(), items.len());

        Ok(Self {
            path,
            items,
            quota,
            generation: 0,
            written: Arc::new(Mutex::new(0)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        self.generation += 1;
        let write = SnapshotWrite {
            path: self.path.clone(),
            bytes: serde_json::to_vec(&self.items)?,
            generation: self.generation,
            written: self.written.clone(),
        };

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    if let Err(e) = write.run() {
                        error!("Failed to persist store {}: {}", write.path.display(), e);
                    }
                });
                Ok(())
            }
            Err(_) => write.run(),
        }
    }
}

/// One serialized state of a [`FileStorage`], waiting to reach the disk.
#[derive(Debug)]
struct SnapshotWrite {
    path: PathBuf,
    bytes: Vec<u8>,
    generation: u64,
    written: Arc<Mutex<u64>>,
}

impl SnapshotWrite {
    fn run(&self) -> Result<(), StorageError> {
        let mut written = self.written.lock();
        if self.generation <= *written {
            debug!("Skipping stale snapshot {} of {}", self.generation, self.path.display());
            return Ok(());
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &self.bytes)?;
        fs::rename(&tmp, &self.path)?;
        *written = self.generation;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        check_quota(&self.items, key, &value, self.quota)?;
        let previous = self.items.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            // keep memory consistent with disk
            match previous {
                Some(old) => self.items.insert(key.to_string(), old),
                None => self.items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.items.clear();
        self.flush()
    }

    fn used_bytes(&self) -> usize {
        size_of_items(&self.items)
    }
}

// == Helpers ==
fn size_of_items(items: &BTreeMap<String, String>) -> usize {
    items.iter().map(|(k, v)| k.len() + v.len()).sum()
}

fn check_quota(
    items: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota: usize,
) -> Result<(), StorageError> {
    let replaced = items.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
    let needed = size_of_items(items) - replaced + key.len() + value.len();
    if needed > quota {
        return Err(StorageError::QuotaExceeded { needed, quota });
    }
    Ok(())
}
