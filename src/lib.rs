//! # Local Gal
//!
//! A local-first personal image gallery with account-scoped storage.
//! Accounts, images, and the active session all live as JSON partition
//! files in a single data directory — no server, no database, no network.
//!
//! # Architecture: Stores + One Controller
//!
//! Three independent stores persist one concern each, and a single
//! controller owns all working state and orchestration:
//!
//! ```text
//! credentials   users-v1.json            username → password digest
//! images        images-v1-<user>.json    per-user ordered collection
//! session       session-v1.json          the "current user" pointer
//!                      ▲
//!                      │ load / save (whole partitions)
//!              GallerySession             login, register, upload,
//!                      ▲                  delete, restore, export
//!                      │ operations + read accessors
//!              CLI (or any front end)
//! ```
//!
//! Presentation layers never touch the stores directly; everything flows
//! through [`gallery::GallerySession`]. This keeps the authentication
//! invariants (a session pointer must reference an existing account, store
//! access requires Authenticated state) enforceable in one place.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`hashing`] | SHA-256 password digests (lowercase hex) |
//! | [`keys`] | Partition and export filename conventions, username encoding |
//! | [`credentials`] | Credential partition: load/save, default-account seeding |
//! | [`images`] | Per-user image partitions and the `ImageRecord` schema |
//! | [`session`] | Session pointer: persist, clear, restore |
//! | [`upload`] | Per-file validation, data-URL encoding, concurrent reads |
//! | [`gallery`] | The session controller — state machine and all operations |
//! | [`output`] | CLI output formatting — information-first display |
//!
//! # Design Decisions
//!
//! ## Corruption Reads as Absence
//!
//! Every partition loader returns empty data when its file is missing,
//! unparseable, or carries the wrong format version. This favors
//! availability over strict integrity reporting: a corrupt store degrades
//! to a fresh one instead of wedging the gallery. It is a deliberate
//! trade-off, applied uniformly, and the flip side — silent data loss on
//! corruption — is accepted for a single-tenant local tool.
//!
//! ## Whole-Partition Writes, Last Writer Wins
//!
//! Every save replaces its entire partition file; there is no merging and
//! no cross-process locking. Two concurrent processes over the same data
//! directory race, and the last writer wins. This is a documented
//! limitation, not a hidden one — the design targets exactly one gallery
//! process at a time.
//!
//! ## Joined Uploads
//!
//! File reads during upload are the only concurrent operations in the
//! crate. Each accepted file is read independently on the rayon pool, and
//! all completions are joined before the working collection is touched,
//! so a batch persists exactly once and partial writes cannot interleave.
//! Completion order across files is not guaranteed — an accepted
//! nondeterminism in the collection's prepend order within one batch.
//!
//! ## Inline Payloads
//!
//! Images are stored as data URLs (`data:<mime>;base64,…`) inside their
//! partition, not as separate files. A record is therefore fully
//! self-describing, survives export/import as plain JSON, and deletion is
//! a single partition write. The 5 MiB per-file cap keeps partitions at a
//! size where whole-file rewrites stay cheap.

pub mod credentials;
pub mod gallery;
pub mod hashing;
pub mod images;
pub mod keys;
pub mod output;
pub mod session;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;
