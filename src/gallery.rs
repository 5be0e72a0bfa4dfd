//! The gallery session controller.
//!
//! [`GallerySession`] is the single owner of all working state — current
//! user, working collection, selection index — and the only component that
//! mutates the persisted partitions. Presentation layers (the CLI, or any
//! other front end) call its operations and read its accessors; they never
//! touch the stores directly.
//!
//! # State machine
//!
//! Two states: **Anonymous** and **Authenticated(username)**.
//!
//! ```text
//! Anonymous ── login / restore_session ──▶ Authenticated(user)
//! Authenticated ── logout(confirmed) ────▶ Anonymous
//! ```
//!
//! `register` does not auto-login; it writes the credential entry and an
//! empty image partition and stays Anonymous. Store-touching operations
//! (`upload`, deletion, `export_collection`) fail with
//! [`GalleryError::Auth`] in Anonymous rather than silently doing nothing.
//!
//! # Persistence discipline
//!
//! Every mutation persists the full affected partition immediately:
//! `register` writes credentials plus an empty collection, `upload`
//! persists once after its join barrier, deletion persists before
//! adjusting the selection. There is exactly one logical thread of
//! control for store mutations; the only concurrency in the crate is the
//! upload read fan-out in [`crate::upload`], which is joined before any
//! shared state changes.
//!
//! # Confirmation gates
//!
//! `logout` and both delete operations take an explicit `confirmed` flag
//! instead of prompting. An unconfirmed call is an observable no-op
//! returning `false`, which keeps interactive prompting (or `--yes`
//! flags) entirely in the caller's hands.

use crate::credentials::Credentials;
use crate::hashing;
use crate::images::{self, ImageRecord};
use crate::keys;
use crate::session;
use crate::upload::{self, FileBlob, ReadFailure, SkipReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Username already exists: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("File read error: {0}")]
    Read(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One file that validation skipped, with the per-file warning to surface.
#[derive(Debug, Clone)]
pub struct UploadSkip {
    pub name: String,
    pub reason: SkipReason,
}

/// What an upload batch did.
///
/// Skips and read failures are reported here per file — they are warnings
/// to surface, not errors, and they never abort sibling files. Only the
/// all-reads-failed case is raised as [`GalleryError::Read`].
#[derive(Debug, Default)]
pub struct UploadOutcome {
    /// Records prepended to the collection (and persisted).
    pub added: usize,
    /// Files rejected by validation before any read.
    pub skipped: Vec<UploadSkip>,
    /// Files accepted by validation whose read then failed.
    pub failed: Vec<ReadFailure>,
}

/// Snapshot produced by [`GallerySession::export_collection`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub exported_at: DateTime<Utc>,
    pub user: String,
    pub images: Vec<ImageRecord>,
}

impl ExportDocument {
    /// Deterministic download filename for this snapshot.
    pub fn filename(&self) -> String {
        keys::export_file(&self.user, self.exported_at)
    }
}

/// The controller instance. See the module docs for the state machine.
#[derive(Debug)]
pub struct GallerySession {
    data_dir: PathBuf,
    user: Option<String>,
    images: Vec<ImageRecord>,
    selection: Option<usize>,
}

impl GallerySession {
    /// Open a session over a data directory, starting Anonymous.
    pub fn open(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            user: None,
            images: Vec::new(),
            selection: None,
        }
    }

    // =========================================================================
    // Accessors (read-only surface for presentation layers)
    // =========================================================================

    pub fn current_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The working collection, most-recent-first.
    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// The currently selected record, if any.
    pub fn selected_image(&self) -> Option<&ImageRecord> {
        self.selection.and_then(|i| self.images.get(i))
    }

    // =========================================================================
    // Account lifecycle
    // =========================================================================

    /// Create an account. Stays Anonymous — registration does not log in.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), GalleryError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(GalleryError::Validation(
                "username and password must not be empty".to_string(),
            ));
        }
        if password != confirm {
            return Err(GalleryError::Validation(
                "passwords do not match".to_string(),
            ));
        }

        let mut creds = Credentials::load(&self.data_dir);
        if creds.contains(username) {
            return Err(GalleryError::Conflict(username.to_string()));
        }
        creds.insert(username, hashing::digest(password));
        creds.save(&self.data_dir)?;

        // The account starts with an explicit empty collection.
        images::save_for(&self.data_dir, username, &[])?;
        Ok(())
    }

    /// Authenticate and load the user's collection into working state.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), GalleryError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(GalleryError::Validation(
                "username and password must not be empty".to_string(),
            ));
        }

        let creds = Credentials::load(&self.data_dir);
        let stored = creds
            .digest_for(username)
            .ok_or_else(|| GalleryError::NotFound(username.to_string()))?;
        if hashing::digest(password) != stored {
            return Err(GalleryError::Auth("incorrect password".to_string()));
        }

        self.images = images::load_for(&self.data_dir, username);
        self.selection = None;
        self.user = Some(username.to_string());
        session::persist(&self.data_dir, username)?;
        Ok(())
    }

    /// End the session. Unconfirmed calls are no-ops returning `false`.
    pub fn logout(&mut self, confirmed: bool) -> Result<bool, GalleryError> {
        if !confirmed {
            return Ok(false);
        }
        session::clear(&self.data_dir)?;
        self.user = None;
        self.images.clear();
        self.selection = None;
        Ok(true)
    }

    /// Re-enter Authenticated from a persisted session pointer.
    ///
    /// A pointer naming an account that no longer exists is stale: it is
    /// discarded and the session stays Anonymous. With no pointer at all
    /// this does nothing. Never errors — a session that can't be restored
    /// is just not a session.
    pub fn restore_session(&mut self) -> bool {
        let Some(user) = session::restore(&self.data_dir) else {
            return false;
        };
        let creds = Credentials::load(&self.data_dir);
        if !creds.contains(&user) {
            // Stale pointer; best-effort cleanup.
            let _ = session::clear(&self.data_dir);
            return false;
        }
        self.images = images::load_for(&self.data_dir, &user);
        self.selection = None;
        self.user = Some(user);
        true
    }

    // =========================================================================
    // Collection mutation
    // =========================================================================

    /// Upload a batch of files into the current user's collection.
    ///
    /// Each file is validated independently (type, size); failures are
    /// skipped with a per-file warning in the outcome, never aborting the
    /// batch. Accepted files are read concurrently and joined; successful
    /// reads are prepended in completion order — which is not guaranteed
    /// to match input order — and the collection is persisted exactly once
    /// after the join. If every accepted file fails to read, nothing is
    /// persisted and [`GalleryError::Read`] is returned.
    pub fn upload(&mut self, blobs: Vec<FileBlob>) -> Result<UploadOutcome, GalleryError> {
        let user = self.require_user()?.to_string();

        let mut skipped = Vec::new();
        let mut accepted = Vec::new();
        for blob in blobs {
            match upload::validate(&blob) {
                Ok(kind) => accepted.push((blob, kind)),
                Err(reason) => skipped.push(UploadSkip {
                    name: blob.name,
                    reason,
                }),
            }
        }
        if accepted.is_empty() {
            return Ok(UploadOutcome {
                added: 0,
                skipped,
                failed: Vec::new(),
            });
        }

        let total = accepted.len();
        let mut loaded = Vec::new();
        let mut failed = Vec::new();
        for result in upload::read_all(accepted) {
            match result {
                Ok(blob) => loaded.push(blob),
                Err(failure) => failed.push(failure),
            }
        }
        if loaded.is_empty() {
            return Err(GalleryError::Read(format!(
                "all {total} file reads failed"
            )));
        }

        // One timestamp for the whole batch, taken after the join.
        let now = Utc::now();
        let added = loaded.len();
        for blob in loaded {
            self.images.insert(
                0,
                ImageRecord {
                    id: Uuid::new_v4().to_string(),
                    name: blob.name,
                    data_url: blob.data_url,
                    uploaded_at: now,
                },
            );
        }
        // Prepending shifted every index; keep the selection on the same
        // record it pointed at before the batch.
        if let Some(sel) = self.selection {
            self.selection = Some(sel + added);
        }
        images::save_for(&self.data_dir, &user, &self.images)?;

        Ok(UploadOutcome {
            added,
            skipped,
            failed,
        })
    }

    /// Delete the currently selected image. Unconfirmed calls are no-ops.
    pub fn delete_selected(&mut self, confirmed: bool) -> Result<bool, GalleryError> {
        self.require_user()?;
        let index = self
            .selection
            .ok_or_else(|| GalleryError::NotFound("no image selected".to_string()))?;
        if !confirmed {
            return Ok(false);
        }
        self.remove_at(index)?;
        Ok(true)
    }

    /// Delete one image by id. Unconfirmed calls are no-ops.
    pub fn delete_by_id(&mut self, id: &str, confirmed: bool) -> Result<bool, GalleryError> {
        self.require_user()?;
        let index = self
            .images
            .iter()
            .position(|img| img.id == id)
            .ok_or_else(|| GalleryError::NotFound(format!("image id {id}")))?;
        if !confirmed {
            return Ok(false);
        }
        self.remove_at(index)?;
        Ok(true)
    }

    /// Remove exactly one record, persist, and repair the selection:
    /// empty collection clears it, otherwise it moves to the nearest
    /// remaining valid index (clamped to the new bounds).
    fn remove_at(&mut self, index: usize) -> Result<(), GalleryError> {
        let user = self.require_user()?.to_string();
        self.images.remove(index);
        images::save_for(&self.data_dir, &user, &self.images)?;

        if self.images.is_empty() {
            self.selection = None;
        } else if let Some(sel) = self.selection {
            let adjusted = if sel > index { sel - 1 } else { sel };
            self.selection = Some(adjusted.min(self.images.len() - 1));
        }
        Ok(())
    }

    // =========================================================================
    // Selection navigation
    // =========================================================================

    /// Select an image by index.
    pub fn select(&mut self, index: usize) -> Result<(), GalleryError> {
        if index >= self.images.len() {
            return Err(GalleryError::Validation(format!(
                "index {index} out of range ({} images)",
                self.images.len()
            )));
        }
        self.selection = Some(index);
        Ok(())
    }

    /// Advance the selection, wrapping at the end. With no selection the
    /// first image is selected; with no images nothing happens.
    pub fn select_next(&mut self) -> Option<usize> {
        if self.images.is_empty() {
            return None;
        }
        let next = match self.selection {
            Some(i) => (i + 1) % self.images.len(),
            None => 0,
        };
        self.selection = Some(next);
        self.selection
    }

    /// Move the selection back, wrapping at the start.
    pub fn select_prev(&mut self) -> Option<usize> {
        if self.images.is_empty() {
            return None;
        }
        let len = self.images.len();
        let prev = match self.selection {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.selection = Some(prev);
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Snapshot the current collection. Read-only — no store mutation.
    pub fn export_collection(&self) -> Result<ExportDocument, GalleryError> {
        let user = self.require_user()?;
        Ok(ExportDocument {
            exported_at: Utc::now(),
            user: user.to_string(),
            images: self.images.clone(),
        })
    }

    fn require_user(&self) -> Result<&str, GalleryError> {
        self.user
            .as_deref()
            .ok_or_else(|| GalleryError::Auth("not logged in".to_string()))
    }
}
