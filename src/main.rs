use clap::{Parser, Subcommand};
use local_gal::{credentials, gallery, output, upload};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "local-gal")]
#[command(about = "Local-first personal image gallery")]
#[command(long_about = "\
Local-first personal image gallery

Accounts, images, and the active session live as JSON partition files in
a single data directory. Log in once; the session is restored on every
invocation until you log out.

A demo account (demo / demo123) is seeded on first run.

Storage layout:

  <data-dir>/
  ├── users-v1.json            # accounts (password digests only)
  ├── images-v1-<user>.json    # one image partition per account
  └── session-v1.json          # the \"current user\" pointer

Images are capped at 5 MiB each; jpeg, png, and gif are accepted. Files
failing either check are skipped individually with a warning.")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to the platform data dir, e.g.
    /// ~/.local/share/local-gal)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account (does not log in)
    Register {
        username: String,
        password: String,
        /// Password confirmation — must match exactly
        confirm: String,
    },
    /// Authenticate and start a session
    Login { username: String, password: String },
    /// End the current session
    Logout {
        /// Confirm — logout refuses to run without it
        #[arg(long)]
        yes: bool,
    },
    /// Show who is logged in
    Status,
    /// List the current user's images, most recent first
    List,
    /// Upload images (directories are searched recursively)
    Upload { paths: Vec<PathBuf> },
    /// Delete one image by id (ids are shown by `list`)
    Delete {
        id: String,
        /// Confirm — delete refuses to run without it
        #[arg(long)]
        yes: bool,
    },
    /// Export the collection as a JSON snapshot
    Export {
        /// Directory to write the export file into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir);

    credentials::ensure_default_account(&data_dir)?;
    let mut gallery = gallery::GallerySession::open(&data_dir);
    gallery.restore_session();

    match cli.command {
        Command::Register {
            username,
            password,
            confirm,
        } => {
            gallery.register(&username, &password, &confirm)?;
            println!("Account created. You can now log in.");
        }
        Command::Login { username, password } => {
            gallery.login(&username, &password)?;
            println!("Hi, {}", username.trim());
        }
        Command::Logout { yes } => {
            if gallery.logout(yes)? {
                println!("Logged out.");
            } else {
                println!("Refusing to log out without --yes.");
            }
        }
        Command::Status => match gallery.current_user() {
            Some(user) => println!("Logged in as {} ({} images)", user, gallery.images().len()),
            None => println!("Not logged in."),
        },
        Command::List => {
            require_login(&gallery)?;
            output::print_collection(gallery.images(), gallery.selection());
        }
        Command::Upload { paths } => {
            require_login(&gallery)?;
            let blobs = collect_blobs(&paths);
            let outcome = gallery.upload(blobs)?;
            output::print_upload_outcome(&outcome);
        }
        Command::Delete { id, yes } => {
            require_login(&gallery)?;
            if gallery.delete_by_id(&id, yes)? {
                println!("Deleted {} ({} images left)", id, gallery.images().len());
            } else {
                println!("Refusing to delete without --yes.");
            }
        }
        Command::Export { out } => {
            require_login(&gallery)?;
            let doc = gallery.export_collection()?;
            std::fs::create_dir_all(&out)?;
            let path = out.join(doc.filename());
            std::fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
            println!("Exported {} images → {}", doc.images.len(), path.display());
        }
    }

    Ok(())
}

/// Fail early with a friendly message instead of the controller's
/// per-operation auth error.
fn require_login(gallery: &gallery::GallerySession) -> Result<(), Box<dyn std::error::Error>> {
    if gallery.is_authenticated() {
        Ok(())
    } else {
        Err("not logged in — run `local-gal login <username> <password>` first".into())
    }
}

/// Resolve the data directory: explicit flag, else the platform data dir.
fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("local-gal")
    })
}

/// Turn CLI paths into upload candidates. Directories are walked
/// recursively; unreadable entries are skipped with a warning — upload
/// validation handles type and size, this only handles access.
fn collect_blobs(paths: &[PathBuf]) -> Vec<upload::FileBlob> {
    let mut blobs = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() {
                    push_blob(entry.path(), &mut blobs);
                }
            }
        } else {
            push_blob(path, &mut blobs);
        }
    }
    blobs
}

fn push_blob(path: &Path, blobs: &mut Vec<upload::FileBlob>) {
    match upload::FileBlob::from_path(path) {
        Ok(blob) => blobs.push(blob),
        Err(e) => println!("Skipping {}: {}", path.display(), e),
    }
}
