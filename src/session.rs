//! Session pointer: which user is currently authenticated.
//!
//! At most one value exists — the active username — stored as a small JSON
//! entry beside the durable partitions. Unlike those, this entry is
//! lifecycle-managed by the controller: logout removes it, and a pointer
//! naming an account that no longer exists is discarded on the next
//! restore. Malformed contents read as "no session".

use crate::keys;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

const PARTITION_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SessionEntry {
    version: u32,
    user: String,
}

/// Record the active username.
pub fn persist(data_dir: &Path, username: &str) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let entry = SessionEntry {
        version: PARTITION_VERSION,
        user: username.to_string(),
    };
    let json = serde_json::to_string_pretty(&entry)?;
    std::fs::write(data_dir.join(keys::SESSION_FILE), json)
}

/// Remove any recorded session. Removing an absent entry is fine.
pub fn clear(data_dir: &Path) -> io::Result<()> {
    match std::fs::remove_file(data_dir.join(keys::SESSION_FILE)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// The recorded username, or `None` if absent or malformed.
pub fn restore(data_dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(data_dir.join(keys::SESSION_FILE)).ok()?;
    let entry: SessionEntry = serde_json::from_str(&content).ok()?;
    if entry.version != PARTITION_VERSION {
        return None;
    }
    Some(entry.user)
}
