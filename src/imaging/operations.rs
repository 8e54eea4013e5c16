//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They take the
//! batch-wide [`FrameSettings`], build per-file parameters, and call the backend.

use super::backend::{BackendError, Dimensions, FramedImage, ImageBackend};
use super::calculations::{CanvasLayout, plan_canvas};
use super::params::{FrameParams, FrameSettings};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan a frame without decoding or writing anything.
///
/// Returns `None` if the canvas would overflow 32-bit dimensions or the
/// memory budget.
pub fn plan_frame(source: Dimensions, settings: &FrameSettings) -> Option<CanvasLayout> {
    plan_canvas(source.as_tuple(), settings.aspect, settings.thickness)
}

/// Frame one image: decode `source`, pad it to the target ratio, write `dest`.
///
/// Any existing file at `dest` is overwritten.
pub fn frame_image(
    backend: &impl ImageBackend,
    source: &Path,
    dest: &Path,
    settings: &FrameSettings,
) -> Result<FramedImage> {
    backend.frame(&FrameParams {
        source: source.to_path_buf(),
        output: dest.to_path_buf(),
        settings: *settings,
    })
}
