//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! and the [`backend`](super::backend) that does the pixel work, so a mock
//! backend can stand in during tests.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1–100, default 95). Clamped on construction.
//! - [`FrameSettings`]: the parameter bundle shared by every file in a batch.
//! - [`FrameParams`]: one concrete framing job: source, output, settings.

use crate::params::{AspectRatio, Color, Thickness};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Fully parsed framing parameters.
///
/// Thickness stays unresolved here; a percentage only becomes pixels once the
/// concrete source image has been decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSettings {
    pub aspect: AspectRatio,
    pub thickness: Thickness,
    pub color: Color,
    pub quality: Quality,
}

/// Parameters for framing a single image.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub settings: FrameSettings,
}
