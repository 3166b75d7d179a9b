use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Containers the planner will consider for renaming
const MEDIA_EXTENSIONS: &[&str] = &["avi", "mkv", "mp4"];

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read directory: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct MediaFile {
    pub name: String,
    pub path: PathBuf,
}

pub fn is_media_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| {
            let ext = e.to_string_lossy().to_lowercase();
            MEDIA_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Shallow listing of media files in `target`.
///
/// Entries keep the order the directory listing produced them in; the
/// plan inherits that order, so it stays stable within a run.
pub fn scan_media_files(target: &Path) -> Result<Vec<MediaFile>, ScannerError> {
    debug!(path = ?target, "Scanning directory");

    if !target.exists() {
        return Err(ScannerError::PathNotFound(target.to_path_buf()));
    }
    if !target.is_dir() {
        return Err(ScannerError::NotADirectory(target.to_path_buf()));
    }

    let read_dir = fs::read_dir(target).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ScannerError::PermissionDenied(target.to_path_buf())
        } else {
            ScannerError::IoError(e)
        }
    })?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            trace!(path = ?path, "Skipping directory");
            continue;
        }

        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().to_string(),
            None => continue,
        };

        if !is_media_file(&name) {
            trace!(name = %name, "Skipping non-media file");
            continue;
        }

        files.push(MediaFile { name, path });
    }

    debug!(count = files.len(), "Scan complete");
    Ok(files)
}
