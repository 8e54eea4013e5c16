//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify and frame.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the `MockBackend` below, which records operations and can
//! simulate slow or failing files without touching pixels.

use super::calculations::CanvasLayout;
use super::params::FrameParams;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("failed to encode {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },
    #[error("canvas for {} is too large to allocate", .path.display())]
    CanvasTooLarge { path: PathBuf },
}

/// Result of an identify operation, after orientation correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// What a frame operation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FramedImage {
    /// Source dimensions as displayed (orientation applied).
    pub source: Dimensions,
    pub layout: CanvasLayout,
}

/// Trait for image processing backends.
///
/// `Sync` is required because the batch orchestrator shares one backend
/// across every worker thread.
pub trait ImageBackend: Sync {
    /// Get display dimensions (EXIF orientation applied) without decoding pixels.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, pad onto a solid canvas, and write the result.
    fn frame(&self, params: &FrameParams) -> Result<FramedImage, BackendError>;
}
