//! Centralized filename conventions for the persisted partitions.
//!
//! Every store keeps its data as one JSON file per logical partition inside
//! the data directory. All filename derivation lives here so the layout is
//! defined in exactly one place:
//!
//! ```text
//! <data-dir>/
//! ├── users-v1.json            # credential partition
//! ├── images-v1-<user>.json    # one partition per username
//! └── session-v1.json          # session pointer
//! ```
//!
//! The `v1` infix is the partition format version. Loaders additionally
//! check a `version` field inside each file; bumping either invalidates
//! old data by making it look absent.
//!
//! ## Username encoding
//!
//! Usernames are case-sensitive and otherwise unconstrained, so they cannot
//! be spliced into a filename verbatim (`../`, `/`, `.` would escape the
//! data directory or collide with the fixed partitions). `encode_component`
//! keeps `[A-Za-z0-9_-]` as-is and escapes every other byte as `%XX`, which
//! is injective: distinct usernames always map to distinct filenames.

/// Credential partition filename.
pub const USERS_FILE: &str = "users-v1.json";

/// Session pointer filename.
pub const SESSION_FILE: &str = "session-v1.json";

/// Filename of a user's image partition.
pub fn images_file(username: &str) -> String {
    format!("images-v1-{}.json", encode_component(username))
}

/// Deterministic export filename: username plus export time in epoch
/// milliseconds, e.g. `gallery_alice_1724400000000.json`.
pub fn export_file(username: &str, exported_at: chrono::DateTime<chrono::Utc>) -> String {
    format!(
        "gallery_{}_{}.json",
        encode_component(username),
        exported_at.timestamp_millis()
    )
}

/// Escape a username (or any key component) into a filename-safe token.
///
/// ASCII alphanumerics, `-` and `_` pass through; everything else becomes
/// `%XX` per byte. `%` itself is escaped, so the mapping is unambiguous.
pub fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn plain_username_passes_through() {
        assert_eq!(encode_component("alice"), "alice");
        assert_eq!(encode_component("Bob-2_x"), "Bob-2_x");
    }

    #[test]
    fn path_separators_are_escaped() {
        assert_eq!(encode_component("../etc"), "%2E%2E%2Fetc");
        assert_eq!(encode_component("a/b"), "a%2Fb");
    }

    #[test]
    fn percent_is_escaped() {
        assert_eq!(encode_component("50%"), "50%25");
    }

    #[test]
    fn non_ascii_is_escaped_per_byte() {
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn distinct_usernames_never_collide() {
        // The tricky pair: one pre-escaped, one raw.
        assert_ne!(encode_component("a%2Fb"), encode_component("a/b"));
    }

    #[test]
    fn case_sensitive_usernames_stay_distinct() {
        assert_ne!(images_file("Alice"), images_file("alice"));
    }

    #[test]
    fn images_file_shape() {
        assert_eq!(images_file("alice"), "images-v1-alice.json");
        assert_eq!(images_file("a b"), "images-v1-a%20b.json");
    }

    #[test]
    fn export_file_is_deterministic() {
        let t = chrono::Utc.timestamp_millis_opt(1_724_400_000_000).unwrap();
        assert_eq!(export_file("alice", t), "gallery_alice_1724400000000.json");
        assert_eq!(export_file("alice", t), export_file("alice", t));
    }
}
