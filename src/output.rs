//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary line
//! for every record is its semantic identity — positional index and name —
//! with storage details (id, upload time, payload size) as indented
//! context lines. This keeps `list` readable as a collection inventory
//! while still letting users grab the id they need for `delete`.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! 3 images
//! 001 cat.png  *
//!     Id: 1f9f2c6a-…
//!     Uploaded: 2026-08-23 14:02 UTC  (2.0 MB)
//! 002 dog.jpg
//!     Id: 7d01ab44-…
//!     Uploaded: 2026-08-22 09:15 UTC  (312 KB)
//! ```
//!
//! The `*` marks the current selection.
//!
//! ## Upload
//!
//! ```text
//! Added 2 images
//! Skipped huge.png: file too large (6291457 bytes, max 5242880)
//! Failed gone.png: No such file or directory (os error 2)
//! ```
//!
//! # Architecture
//!
//! Each concern has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::gallery::UploadOutcome;
use crate::images::ImageRecord;

// ============================================================================
// Collection listing
// ============================================================================

/// Format the working collection, most-recent-first, marking the selection.
pub fn format_collection(images: &[ImageRecord], selection: Option<usize>) -> Vec<String> {
    if images.is_empty() {
        return vec!["No images yet. Use `local-gal upload <file>...` to add some.".to_string()];
    }

    let mut lines = Vec::new();
    lines.push(format!(
        "{} image{}",
        images.len(),
        if images.len() == 1 { "" } else { "s" }
    ));
    for (idx, img) in images.iter().enumerate() {
        let marker = if selection == Some(idx) { "  *" } else { "" };
        lines.push(format!("{:03} {}{}", idx + 1, img.name, marker));
        lines.push(format!("    Id: {}", img.id));
        lines.push(format!(
            "    Uploaded: {}  ({})",
            img.uploaded_at.format("%Y-%m-%d %H:%M UTC"),
            human_size(payload_bytes(&img.data_url))
        ));
    }
    lines
}

pub fn print_collection(images: &[ImageRecord], selection: Option<usize>) {
    for line in format_collection(images, selection) {
        println!("{line}");
    }
}

// ============================================================================
// Upload outcome
// ============================================================================

/// Format what an upload batch did: additions first, then per-file
/// warnings for skips and read failures.
pub fn format_upload_outcome(outcome: &UploadOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Added {} image{}",
        outcome.added,
        if outcome.added == 1 { "" } else { "s" }
    ));
    for skip in &outcome.skipped {
        lines.push(format!("Skipped {}: {}", skip.name, skip.reason));
    }
    for failure in &outcome.failed {
        lines.push(format!("Failed {}: {}", failure.name, failure.error));
    }
    lines
}

pub fn print_upload_outcome(outcome: &UploadOutcome) {
    for line in format_upload_outcome(outcome) {
        println!("{line}");
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Decoded payload size of a data URL, estimated from the base64 body.
///
/// Partition loads only validate schema, not payload contents, so the
/// body may be arbitrary garbage (e.g. a lone `=`); the estimate
/// saturates at zero rather than trusting it.
fn payload_bytes(data_url: &str) -> u64 {
    let body = data_url.split_once(',').map(|(_, b)| b).unwrap_or("");
    let padding = body.bytes().rev().take_while(|&b| b == b'=').count() as u64;
    ((body.len() as u64 / 4) * 3).saturating_sub(padding)
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{MimeKind, encode_data_url};
    use chrono::TimeZone;

    fn record(name: &str, payload: &[u8]) -> ImageRecord {
        ImageRecord {
            id: "test-id".to_string(),
            name: name.to_string(),
            data_url: encode_data_url(MimeKind::Png, payload),
            uploaded_at: chrono::Utc.with_ymd_and_hms(2026, 8, 23, 14, 2, 0).unwrap(),
        }
    }

    #[test]
    fn empty_collection_shows_hint() {
        let lines = format_collection(&[], None);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("No images yet"));
    }

    #[test]
    fn collection_lines_are_information_first() {
        let lines = format_collection(&[record("cat.png", b"abc")], None);
        assert_eq!(lines[0], "1 image");
        assert_eq!(lines[1], "001 cat.png");
        assert_eq!(lines[2], "    Id: test-id");
        assert!(lines[3].starts_with("    Uploaded: 2026-08-23 14:02 UTC"));
    }

    #[test]
    fn selection_is_marked() {
        let imgs = vec![record("a.png", b"x"), record("b.png", b"y")];
        let lines = format_collection(&imgs, Some(1));
        assert_eq!(lines[1], "001 a.png");
        assert_eq!(lines[4], "002 b.png  *");
    }

    #[test]
    fn upload_outcome_lists_warnings_per_file() {
        let outcome = UploadOutcome {
            added: 1,
            skipped: vec![crate::gallery::UploadSkip {
                name: "huge.png".to_string(),
                reason: crate::upload::SkipReason::TooLarge(6_291_457),
            }],
            failed: vec![crate::upload::ReadFailure {
                name: "gone.png".to_string(),
                error: "no such file".to_string(),
            }],
        };
        let lines = format_upload_outcome(&outcome);
        assert_eq!(lines[0], "Added 1 image");
        assert!(lines[1].starts_with("Skipped huge.png: file too large"));
        assert_eq!(lines[2], "Failed gone.png: no such file");
    }

    #[test]
    fn payload_bytes_reverses_base64_growth() {
        let url = encode_data_url(MimeKind::Png, &[0u8; 300]);
        assert_eq!(payload_bytes(&url), 300);
    }

    #[test]
    fn garbage_data_url_body_lists_as_zero_bytes() {
        // A schema-valid record can carry a body shorter than its padding
        // count; listing it must not underflow the size estimate.
        let mut img = record("junk.png", b"");
        img.data_url = "data:image/png;base64,=".to_string();
        let lines = format_collection(&[img], None);
        assert!(lines[3].contains("(0 B)"));

        assert_eq!(payload_bytes("data:image/png;base64,="), 0);
        assert_eq!(payload_bytes("data:image/png;base64,"), 0);
        assert_eq!(payload_bytes("no comma at all"), 0);
    }

    #[test]
    fn human_size_picks_sensible_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(4096), "4 KB");
        assert_eq!(human_size(2 * 1024 * 1024), "2.0 MB");
    }
}
