//! Output filename convention.
//!
//! Every framed image is written as `<stem>-<label>.<ext>`: the source name
//! with the label inserted before the extension, joined by a hyphen.
//!
//! - `photo.jpg` + `frame` → `photo-frame.jpg`
//! - `IMG_0042.JPEG` + `ig` → `IMG_0042-ig.JPEG` (extension case preserved)
//!
//! The extension is kept verbatim because it also selects the encoder. Names
//! are built from `OsStr`, so bytes that aren't valid UTF-8 survive unchanged.
//! Labels are never empty (see [`is_valid_label`]), so an output name always
//! differs from its source name.

use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Joins the source stem and the label.
pub const LABEL_SEPARATOR: &str = "-";

/// Derive the output file name for `file_name` tagged with `label`.
pub fn framed_file_name(file_name: &OsStr, label: &str) -> OsString {
    let path = Path::new(file_name);
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(LABEL_SEPARATOR);
    name.push(label.trim());
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// A label must be non-empty, stay inside the output directory and keep the
/// extension last.
pub fn is_valid_label(label: &str) -> bool {
    !label.trim().is_empty()
        && !label.contains(['/', '\\', '.'])
        && !label.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(file_name: &str, label: &str) -> OsString {
        framed_file_name(OsStr::new(file_name), label)
    }

    #[test]
    fn inserts_label_before_extension() {
        assert_eq!(framed("photo.jpg", "frame"), "photo-frame.jpg");
    }

    #[test]
    fn preserves_extension_case() {
        assert_eq!(framed("IMG_0042.JPEG", "ig"), "IMG_0042-ig.JPEG");
    }

    #[test]
    fn only_last_dot_starts_extension() {
        assert_eq!(framed("trip.day1.png", "frame"), "trip.day1-frame.png");
    }

    #[test]
    fn empty_label_still_changes_the_name() {
        assert_eq!(framed("photo.webp", ""), "photo-.webp");
        assert_ne!(framed("photo.webp", "  "), "photo.webp");
    }

    #[test]
    fn label_is_trimmed() {
        assert_eq!(framed("a.png", " square "), "a-square.png");
    }

    #[test]
    fn name_without_extension() {
        assert_eq!(framed("README", "frame"), "README-frame");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_stem_is_kept_byte_for_byte() {
        use std::os::unix::ffi::OsStrExt;

        let source = OsStr::from_bytes(b"caf\xe9.png");
        let name = framed_file_name(source, "frame");
        assert_eq!(name.as_bytes(), b"caf\xe9-frame.png");
    }

    #[test]
    fn labels_with_separators_are_invalid() {
        assert!(is_valid_label("frame"));
        assert!(is_valid_label("4x5 white"));
        assert!(!is_valid_label("../escape"));
        assert!(!is_valid_label("a\\b"));
        assert!(!is_valid_label("x.png"));
        assert!(!is_valid_label("tab\there"));
    }

    #[test]
    fn empty_labels_are_invalid() {
        assert!(!is_valid_label(""));
        assert!(!is_valid_label("   "));
    }
}
