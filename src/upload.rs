//! Upload intake: per-file validation and concurrent reads.
//!
//! Uploads arrive as [`FileBlob`]s — a filename, a declared mime type, a
//! declared size, and a content source. Validation runs against the
//! declared type and size *before* any content is read, so an oversized
//! file is rejected without touching its bytes. Files failing validation
//! are skipped individually; they never abort their siblings.
//!
//! ## Concurrent reads
//!
//! Accepted files are read in parallel on the rayon pool, each worker
//! streaming its result through an `mpsc` channel. The receiving side is
//! the join barrier: [`read_all`] returns only after every read has
//! settled, and results come back in **completion order**, not input
//! order — reads run concurrently and the caller accepts that
//! nondeterminism. The controller mutates shared working state only after
//! this barrier, so a batch lands in the collection all at once.
//!
//! Content is stored as a data URL (`data:<mime>;base64,<payload>`), a
//! self-describing inline representation that survives JSON round-trips
//! and export files unchanged.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Per-file size cap: 5 MiB, checked against the declared size.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// The three accepted image kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeKind {
    Jpeg,
    Png,
    Gif,
}

impl MimeKind {
    /// Canonical mime string, used in the stored data URL.
    pub fn mime(self) -> &'static str {
        match self {
            MimeKind::Jpeg => "image/jpeg",
            MimeKind::Png => "image/png",
            MimeKind::Gif => "image/gif",
        }
    }

    /// Map a declared mime string to an accepted kind, if it is one.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" | "image/jpg" => Some(MimeKind::Jpeg),
            "image/png" => Some(MimeKind::Png),
            "image/gif" => Some(MimeKind::Gif),
            _ => None,
        }
    }
}

/// Where a blob's bytes come from.
#[derive(Debug, Clone)]
pub enum BlobSource {
    /// Read from disk at upload time (CLI path).
    Path(PathBuf),
    /// Already in memory (tests, embedding callers).
    Bytes(Vec<u8>),
}

/// A candidate upload: name, declared type and size, and a content source.
#[derive(Debug, Clone)]
pub struct FileBlob {
    pub name: String,
    /// Declared mime type, e.g. `image/png`. Validation trusts this;
    /// content is not re-sniffed after acceptance.
    pub mime: String,
    /// Declared size in bytes, known without reading the content.
    pub size: u64,
    pub source: BlobSource,
}

impl FileBlob {
    /// Build a blob from a file on disk.
    ///
    /// The declared mime type is sniffed from the file's magic bytes
    /// (`image::guess_format`), falling back to the extension via
    /// `mime_guess` for files whose signature isn't recognized.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut head = [0u8; 64];
        let mut file = std::fs::File::open(path)?;
        let read = file.read(&mut head)?;
        let mime = sniff_mime(&head[..read])
            .or_else(|| mime_guess::from_path(path).first_raw())
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Self {
            name,
            mime,
            size: meta.len(),
            source: BlobSource::Path(path.to_path_buf()),
        })
    }

    /// Build a blob from in-memory bytes with an explicitly declared type.
    pub fn from_bytes(name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.to_string(),
            size: bytes.len() as u64,
            source: BlobSource::Bytes(bytes),
        }
    }

    /// Read the content and encode it as a data URL.
    ///
    /// Consumes the blob; on failure the filename travels with the error
    /// so the caller can report which sibling failed.
    pub fn read(self, kind: MimeKind) -> Result<LoadedBlob, ReadFailure> {
        let bytes = match self.source {
            BlobSource::Path(ref path) => std::fs::read(path),
            BlobSource::Bytes(bytes) => Ok(bytes),
        };
        match bytes {
            Ok(bytes) => Ok(LoadedBlob {
                name: self.name,
                data_url: encode_data_url(kind, &bytes),
            }),
            Err(e) => Err(ReadFailure {
                name: self.name,
                error: e.to_string(),
            }),
        }
    }
}

/// Magic-byte mime sniffing for the formats the gallery accepts.
fn sniff_mime(head: &[u8]) -> Option<&'static str> {
    match image::guess_format(head).ok()? {
        image::ImageFormat::Jpeg => Some("image/jpeg"),
        image::ImageFormat::Png => Some("image/png"),
        image::ImageFormat::Gif => Some("image/gif"),
        _ => None,
    }
}

/// Why a file was skipped during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Declared type is not jpeg, png, or gif.
    UnsupportedType(String),
    /// Declared size exceeds [`MAX_FILE_SIZE`].
    TooLarge(u64),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedType(mime) => write!(f, "unsupported file type ({mime})"),
            SkipReason::TooLarge(size) => {
                write!(f, "file too large ({size} bytes, max {MAX_FILE_SIZE})")
            }
        }
    }
}

/// Validate a blob's declared type and size. Content is not read here.
pub fn validate(blob: &FileBlob) -> Result<MimeKind, SkipReason> {
    let kind = MimeKind::from_mime(&blob.mime)
        .ok_or_else(|| SkipReason::UnsupportedType(blob.mime.clone()))?;
    if blob.size > MAX_FILE_SIZE {
        return Err(SkipReason::TooLarge(blob.size));
    }
    Ok(kind)
}

/// A successfully read upload, ready to become an image record.
#[derive(Debug, Clone)]
pub struct LoadedBlob {
    pub name: String,
    pub data_url: String,
}

/// A read that failed after validation accepted the file.
#[derive(Debug, Clone)]
pub struct ReadFailure {
    pub name: String,
    pub error: String,
}

/// Read every accepted blob concurrently and wait for all of them.
///
/// Results arrive in completion order. Individual failures are returned
/// alongside sibling successes; nothing is aborted mid-batch and there is
/// no cancellation — every read runs to completion or fails on its own.
pub fn read_all(accepted: Vec<(FileBlob, MimeKind)>) -> Vec<Result<LoadedBlob, ReadFailure>> {
    let (tx, rx) = mpsc::channel();
    rayon::scope(|s| {
        for (blob, kind) in accepted {
            let tx = tx.clone();
            s.spawn(move |_| {
                let _ = tx.send(blob.read(kind));
            });
        }
        drop(tx);
    });
    rx.into_iter().collect()
}

/// Encode bytes as a `data:<mime>;base64,<payload>` URL.
pub fn encode_data_url(kind: MimeKind, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", kind.mime(), BASE64.encode(bytes))
}
