//! Input folder scanning.
//!
//! The input is a flat directory. Every regular file directly inside it whose
//! extension is one of [`IMAGE_EXTENSIONS`] (case-insensitive) is eligible.
//! Subdirectories are not descended into, and anything else is ignored:
//!
//! ```text
//! input/
//! ├── frame.toml        # optional config, ignored by the scan
//! ├── beach.JPG         # eligible
//! ├── dog.png           # eligible
//! ├── notes.txt         # ignored
//! └── raw/              # ignored, never descended into
//!     └── dog.png
//! ```
//!
//! Results are sorted by path so reports and dry runs are stable.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Input path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// List the eligible images directly inside `dir`, sorted.
pub fn eligible_images(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.exists() {
        return Err(ScanError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if is_image(&path) {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

/// Whether `path` is a regular file with a supported image extension.
pub fn is_image(path: &Path) -> bool {
    path.is_file() && has_image_extension(path)
}

fn has_image_extension(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}
