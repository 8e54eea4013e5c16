//! Single-image framing in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageDecoder::dimensions` + EXIF orientation |
//! | **Plan** | integer canvas math in [`calculations`] |
//! | **Frame** | decode → orient → fill canvas → paste → encode |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for canvas geometry (unit testable)
//! - **Parameters**: Data structures describing a framing job
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, FramedImage, ImageBackend};
pub use calculations::{
    CanvasLayout, MAX_CANVAS_BYTES, calculate_canvas_layout, calculate_content_dimensions, plan_canvas,
};
pub use operations::{frame_image, plan_frame};
pub use params::{FrameParams, FrameSettings, Quality};
pub use rust_backend::RustBackend;
