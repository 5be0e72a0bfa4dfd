//! Per-user image partitions.
//!
//! Each username owns one JSON partition file holding its ordered image
//! collection, most-recent-first (uploads prepend). This module only
//! serializes and deserializes whole partitions; ordering and mutation
//! (prepend, remove) belong to the controller in [`crate::gallery`].
//!
//! The same degradation policy as [`crate::credentials`] applies: missing,
//! corrupt, or version-mismatched partitions load as an empty collection.
//! A partition whose owning account has disappeared is simply never loaded
//! again — orphans persist harmlessly on disk.

use crate::keys;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// Version of the image partition format.
const PARTITION_VERSION: u32 = 1;

/// One stored image.
///
/// Records are immutable after upload except for deletion; nothing updates
/// them in place. Wire keys are camelCase so exports match the shape the
/// web-era stores used (`dataUrl`, `uploadedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Opaque token generated at upload, stable for the record's lifetime.
    /// Deletion looks records up by this id.
    pub id: String,
    /// Original filename, e.g. `cat.png`.
    pub name: String,
    /// Full image content as `data:<mime>;base64,<payload>`.
    pub data_url: String,
    /// When the upload batch containing this record settled.
    pub uploaded_at: DateTime<Utc>,
}

/// On-disk wrapper for one user's partition.
#[derive(Debug, Serialize, Deserialize)]
struct ImagePartition {
    version: u32,
    images: Vec<ImageRecord>,
}

/// Load a user's collection. Returns an empty collection if nothing is
/// persisted or the partition is malformed.
pub fn load_for(data_dir: &Path, username: &str) -> Vec<ImageRecord> {
    let path = data_dir.join(keys::images_file(username));
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let parsed: ImagePartition = match serde_json::from_str(&content) {
        Ok(p) => p,
        Err(_) => return Vec::new(),
    };
    if parsed.version != PARTITION_VERSION {
        return Vec::new();
    }
    parsed.images
}

/// Persist a user's full collection, replacing prior contents.
///
/// The filename encodes the username ([`keys::images_file`]), so each user
/// gets a distinct partition and no username can collide with another's.
pub fn save_for(data_dir: &Path, username: &str, images: &[ImageRecord]) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let partition = ImagePartition {
        version: PARTITION_VERSION,
        images: images.to_vec(),
    };
    let json = serde_json::to_string_pretty(&partition)?;
    std::fs::write(data_dir.join(keys::images_file(username)), json)
}
