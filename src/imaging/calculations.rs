//! Pure calculation functions for canvas geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Ratios are compared and scaled with 64-bit integer arithmetic rather than
//! floats, so `1000 × 5 / 4` is exactly `1250` and the truncation rule is the
//! same in both branches.

use crate::params::{AspectRatio, Thickness};
use serde::Serialize;

/// Largest canvas, in bytes of 8-bit RGB, a single file may allocate.
///
/// Matches the `image` crate's default decoding allocation limit (512 MiB).
pub const MAX_CANVAS_BYTES: u64 = 512 * 1024 * 1024;

const BYTES_PER_PIXEL: u64 = 3;

/// Where a source image lands on its padded canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasLayout {
    /// Full canvas width, border included.
    pub width: u32,
    /// Full canvas height, border included.
    pub height: u32,
    /// Paste position of the source's top-left corner.
    pub offset_x: u32,
    pub offset_y: u32,
    /// Resolved border thickness in pixels.
    pub thickness: u32,
}

/// Smallest box with the target ratio that contains `source` unscaled.
///
/// # Examples
/// ```
/// # use simple_frame::imaging::calculate_content_dimensions;
/// # use simple_frame::params::AspectRatio;
/// let portrait = AspectRatio::new(4, 5).unwrap();
/// // Square source is wider than 4:5 → keep width, extend height
/// assert_eq!(calculate_content_dimensions((1000, 1000), portrait), (1000, 1250));
///
/// let landscape = AspectRatio::new(16, 9).unwrap();
/// // Square source is taller than 16:9 → keep height, extend width
/// assert_eq!(calculate_content_dimensions((900, 900), landscape), (1600, 900));
/// ```
pub fn calculate_content_dimensions(source: (u32, u32), aspect: AspectRatio) -> (u64, u64) {
    let (src_w, src_h) = (u64::from(source.0), u64::from(source.1));
    let (aspect_w, aspect_h) = (u64::from(aspect.width()), u64::from(aspect.height()));

    if src_w * aspect_h > src_h * aspect_w {
        // Source is wider than the target: width stays, height grows
        (src_w, src_w * aspect_h / aspect_w)
    } else {
        // Source is taller (or equal): height stays, width grows
        (src_h * aspect_w / aspect_h, src_h)
    }
}

/// Plan the canvas for a source of the given oriented dimensions.
///
/// Returns `None` when the canvas would not fit in `u32` pixel dimensions or
/// would take more than [`MAX_CANVAS_BYTES`] to hold in memory.
pub fn calculate_canvas_layout(
    source: (u32, u32),
    aspect: AspectRatio,
    thickness: u32,
) -> Option<CanvasLayout> {
    let (content_w, content_h) = calculate_content_dimensions(source, aspect);
    let border = 2 * u64::from(thickness);

    let width = u32::try_from(content_w + border).ok()?;
    let height = u32::try_from(content_h + border).ok()?;
    if u64::from(width) * u64::from(height) * BYTES_PER_PIXEL > MAX_CANVAS_BYTES {
        return None;
    }

    Some(CanvasLayout {
        width,
        height,
        offset_x: (width - source.0) / 2,
        offset_y: (height - source.1) / 2,
        thickness,
    })
}

/// Resolve `thickness` against the source's short side, then plan the canvas.
pub fn plan_canvas(
    source: (u32, u32),
    aspect: AspectRatio,
    thickness: Thickness,
) -> Option<CanvasLayout> {
    let short_side = source.0.min(source.1);
    calculate_canvas_layout(source, aspect, thickness.resolve(short_side))
}
