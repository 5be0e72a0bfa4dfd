//! Shared test utilities for the local-gal test suite.
//!
//! Provides an isolated data directory per test, synthetic image blobs of
//! arbitrary size, and a register-and-login shortcut so controller tests
//! can start from an Authenticated session in one line.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = store_dir();
//! let mut gallery = register_and_login(tmp.path(), "alice", "pw1");
//! gallery.upload(vec![png_blob("cat.png", 2 * 1024 * 1024)]).unwrap();
//! assert_eq!(gallery.images().len(), 1);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::gallery::GallerySession;
use crate::upload::FileBlob;

/// PNG file signature, enough for magic-byte sniffing.
pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Fresh, isolated data directory. Tests get their own partitions and can
/// corrupt them freely without affecting other tests.
pub fn store_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// A synthetic PNG blob of exactly `size` bytes (magic header plus zero
/// padding), declared as `image/png`.
pub fn png_blob(name: &str, size: usize) -> FileBlob {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.resize(size.max(PNG_MAGIC.len()), 0);
    FileBlob::from_bytes(name, "image/png", bytes)
}

/// Register `username` and log in, returning the authenticated session.
/// Panics with context on failure — test setup, not behavior under test.
pub fn register_and_login(data_dir: &Path, username: &str, password: &str) -> GallerySession {
    let mut gallery = GallerySession::open(data_dir);
    gallery
        .register(username, password, password)
        .unwrap_or_else(|e| panic!("register '{username}' failed: {e}"));
    gallery
        .login(username, password)
        .unwrap_or_else(|e| panic!("login '{username}' failed: {e}"));
    gallery
}
