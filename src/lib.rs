//! # Simple Frame
//!
//! Pads a folder of photos with a solid border so every output image has the
//! same aspect ratio, ready for feeds that crop anything else. Photos are never
//! cropped or scaled: the canvas grows around them.
//!
//! # Architecture
//!
//! ```text
//! text params ──parse──▶ FrameSettings ──┐
//!                                        ▼
//! input/ ──scan──▶ [photo, …] ──rayon pool──▶ frame one image ──▶ output/
//!                                   │
//!                                   └──▶ BatchEvent progress ──▶ CLI / session
//! ```
//!
//! Parameters are parsed in full before any file is opened, so a typo in a
//! color or ratio never leaves a half-written output folder behind.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`params`] | Color, aspect-ratio and thickness parsers |
//! | [`imaging`] | Canvas geometry and single-image framing on the `image` crate |
//! | [`scan`] | Eligible-file enumeration of the (flat) input folder |
//! | [`naming`] | `photo.jpg` → `photo-frame.jpg` output naming |
//! | [`batch`] | Bounded parallel batch with progress, cancellation, error policy |
//! | [`session`] | Background batch driven from a form, for interactive front ends |
//! | [`config`] | Optional `frame.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Exact Integer Geometry
//!
//! Canvas sizes are computed with 64-bit integer math, never floats. The
//! "is the photo wider than the target?" test is a cross-multiplication and
//! both branches truncate the same way, so a 1000×1000 photo at 4:5 is always
//! exactly 1000×1250 with the photo at (0, 125).
//!
//! ## Orientation Before Geometry
//!
//! The EXIF orientation tag is applied to the pixels before anything is
//! measured. Phone photos stored sideways come out upright and get padded on
//! the correct sides.
//!
//! ## Continue on Failure
//!
//! One unreadable file doesn't stop the batch. Failures are collected in the
//! [`batch::BatchReport`] and the CLI exits non-zero at the end. Opt into
//! stop-at-first-failure with `--fail-fast` or `on_error = "abort"`.
//!
//! ## Hyphenated Output Names
//!
//! Outputs are named `<stem>-<label>.<ext>` everywhere, CLI and session alike.
//! The extension (and its case) is kept, and it picks the encoder.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod logging;
pub mod naming;
pub mod output;
pub mod params;
pub mod scan;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
