//! Credential store: the `username → password digest` partition.
//!
//! One JSON file ([`keys::USERS_FILE`]) holds the full mapping. Loads that
//! hit a missing file, unparseable JSON, or a version mismatch return an
//! empty mapping instead of an error — a deliberate availability-over-
//! integrity trade-off shared by all partitions: a corrupt store degrades
//! to "no accounts", it never takes the gallery down.
//!
//! Saves replace the whole file. There is no merging and no locking, so
//! concurrent writers from independent processes are last-writer-wins.
//! This is a documented limitation of the single-tenant design.

use crate::hashing;
use crate::keys;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// Version of the credential partition format. Bump to invalidate
/// existing stores when the schema or digest scheme changes.
const PARTITION_VERSION: u32 = 1;

/// Bootstrap account seeded by [`ensure_default_account`].
pub const DEFAULT_USERNAME: &str = "demo";
pub const DEFAULT_PASSWORD: &str = "demo123";

/// On-disk credential mapping. Digests are 64-char lowercase hex
/// (see [`hashing::digest`]); plaintext passwords are never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub version: u32,
    /// BTreeMap so the persisted file is stable and diffable.
    pub users: BTreeMap<String, String>,
}

impl Credentials {
    /// Empty mapping (first run, or fallback for a corrupt partition).
    pub fn empty() -> Self {
        Self {
            version: PARTITION_VERSION,
            users: BTreeMap::new(),
        }
    }

    /// Load from the data directory. Returns an empty mapping if the file
    /// doesn't exist or can't be parsed (corruption, version mismatch).
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(keys::USERS_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let parsed: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if parsed.version != PARTITION_VERSION {
            return Self::empty();
        }
        parsed
    }

    /// Persist to the data directory, replacing prior contents.
    pub fn save(&self, data_dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(data_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(data_dir.join(keys::USERS_FILE), json)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Stored digest for a username, if the account exists.
    pub fn digest_for(&self, username: &str) -> Option<&str> {
        self.users.get(username).map(String::as_str)
    }

    /// Insert or replace an account's digest.
    pub fn insert(&mut self, username: &str, digest: String) {
        self.users.insert(username.to_string(), digest);
    }
}

/// Idempotently seed the bootstrap `demo` account.
///
/// Checks existence first, so calling this on every startup is safe: an
/// already-present account (even one whose password was changed) is left
/// untouched.
pub fn ensure_default_account(data_dir: &Path) -> io::Result<()> {
    let mut creds = Credentials::load(data_dir);
    if creds.contains(DEFAULT_USERNAME) {
        return Ok(());
    }
    creds.insert(DEFAULT_USERNAME, hashing::digest(DEFAULT_PASSWORD));
    creds.save(data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // Load / save
    // =========================================================================

    #[test]
    fn load_missing_file_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let creds = Credentials::load(tmp.path());
        assert!(creds.users.is_empty());
    }

    #[test]
    fn load_corrupt_json_returns_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(keys::USERS_FILE), "not json").unwrap();
        let creds = Credentials::load(tmp.path());
        assert!(creds.users.is_empty());
    }

    #[test]
    fn load_wrong_version_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let json = format!(
            r#"{{"version": {}, "users": {{"alice": "deadbeef"}}}}"#,
            PARTITION_VERSION + 1
        );
        fs::write(tmp.path().join(keys::USERS_FILE), json).unwrap();
        let creds = Credentials::load(tmp.path());
        assert!(creds.users.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut creds = Credentials::empty();
        creds.insert("alice", crate::hashing::digest("pw1"));
        creds.insert("bob", crate::hashing::digest("pw2"));
        creds.save(tmp.path()).unwrap();

        let loaded = Credentials::load(tmp.path());
        assert_eq!(loaded.users.len(), 2);
        assert_eq!(
            loaded.digest_for("alice"),
            Some(crate::hashing::digest("pw1").as_str())
        );
    }

    #[test]
    fn save_replaces_prior_contents() {
        let tmp = TempDir::new().unwrap();
        let mut creds = Credentials::empty();
        creds.insert("alice", "d1".into());
        creds.save(tmp.path()).unwrap();

        let mut replacement = Credentials::empty();
        replacement.insert("bob", "d2".into());
        replacement.save(tmp.path()).unwrap();

        let loaded = Credentials::load(tmp.path());
        assert!(!loaded.contains("alice"));
        assert!(loaded.contains("bob"));
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let mut creds = Credentials::empty();
        creds.insert("Alice", "d1".into());
        assert!(creds.contains("Alice"));
        assert!(!creds.contains("alice"));
    }

    // =========================================================================
    // Default account
    // =========================================================================

    #[test]
    fn ensure_default_account_seeds_demo() {
        let tmp = TempDir::new().unwrap();
        ensure_default_account(tmp.path()).unwrap();

        let creds = Credentials::load(tmp.path());
        assert_eq!(
            creds.digest_for(DEFAULT_USERNAME),
            Some(crate::hashing::digest(DEFAULT_PASSWORD).as_str())
        );
    }

    #[test]
    fn ensure_default_account_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        ensure_default_account(tmp.path()).unwrap();
        ensure_default_account(tmp.path()).unwrap();

        let creds = Credentials::load(tmp.path());
        assert_eq!(creds.users.len(), 1);
    }

    #[test]
    fn ensure_default_account_keeps_changed_password() {
        let tmp = TempDir::new().unwrap();
        let mut creds = Credentials::empty();
        creds.insert(DEFAULT_USERNAME, crate::hashing::digest("rotated"));
        creds.save(tmp.path()).unwrap();

        ensure_default_account(tmp.path()).unwrap();

        let loaded = Credentials::load(tmp.path());
        assert_eq!(
            loaded.digest_for(DEFAULT_USERNAME),
            Some(crate::hashing::digest("rotated").as_str())
        );
    }

    #[test]
    fn ensure_default_account_leaves_other_accounts_alone() {
        let tmp = TempDir::new().unwrap();
        let mut creds = Credentials::empty();
        creds.insert("alice", "d1".into());
        creds.save(tmp.path()).unwrap();

        ensure_default_account(tmp.path()).unwrap();

        let loaded = Credentials::load(tmp.path());
        assert!(loaded.contains("alice"));
        assert!(loaded.contains(DEFAULT_USERNAME));
    }
}
