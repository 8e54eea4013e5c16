//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader::into_decoder` |
//! | EXIF orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Canvas fill + paste | `RgbImage::from_pixel` + `image::imageops::replace` |
//! | Encode → JPEG | `jpeg_encoder::Encoder`: requested quality, 4:4:4, optimized Huffman tables |
//! | Encode → PNG, WebP | the format's default (lossless) encoder |
//!
//! JPEGs are never chroma subsampled, so the border edge does not pick up
//! chroma bleed. JPEG caps each side at 65535 pixels; larger canvases fail
//! as an encode error.

use super::backend::{BackendError, Dimensions, FramedImage, ImageBackend};
use super::calculations::{CanvasLayout, plan_canvas};
use super::params::{FrameParams, Quality};
use crate::params::Color;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, Rgb, RgbImage, imageops};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use jpeg_encoder::{ColorType, Encoder as JpegEncoder, SamplingFactor};
use std::path::Path;
use tracing::debug;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: impl Display) -> BackendError {
    BackendError::Decode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn encode_error(path: &Path, err: impl Display) -> BackendError {
    BackendError::Encode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Open a decoder, sniffing the format from content rather than trusting the extension.
fn open_decoder(path: &Path) -> Result<impl ImageDecoder, BackendError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| decode_error(path, e))?;
    reader.into_decoder().map_err(|e| decode_error(path, e))
}

/// Orientation stored in the file. Unreadable EXIF counts as upright.
fn read_orientation(decoder: &mut impl ImageDecoder) -> Orientation {
    decoder.orientation().unwrap_or(Orientation::NoTransforms)
}

fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// Decode an image and rotate/flip it so pixels match the displayed orientation.
fn load_oriented(path: &Path) -> Result<DynamicImage, BackendError> {
    let mut decoder = open_decoder(path)?;
    let orientation = read_orientation(&mut decoder);
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Fill a canvas with `color` and paste `source` at the layout offset.
pub(crate) fn compose_canvas(source: &RgbImage, layout: &CanvasLayout, color: Color) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(layout.width, layout.height, Rgb(color.to_array()));
    imageops::replace(
        &mut canvas,
        source,
        i64::from(layout.offset_x),
        i64::from(layout.offset_y),
    );
    canvas
}

/// Save a canvas to the given path, choosing the encoder from the extension.
///
/// JPEG honours `quality`; every other writable format uses its default encoder.
fn save_image(img: &RgbImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let format = ImageFormat::from_extension(&ext)
        .filter(|f| f.writing_enabled())
        .ok_or_else(|| encode_error(path, format!("unsupported output format: {ext:?}")))?;

    let file = File::create(path).map_err(|e| encode_error(path, e))?;
    let mut writer = BufWriter::new(file);

    match format {
        ImageFormat::Jpeg => {
            write_jpeg(img, &mut writer, quality).map_err(|e| encode_error(path, e))?
        }
        other => img
            .write_to(&mut writer, other)
            .map_err(|e| encode_error(path, e))?,
    }

    writer.flush().map_err(|e| encode_error(path, e))
}

/// Baseline JPEG with 1×1 sampling on every component and optimized Huffman tables.
fn write_jpeg(img: &RgbImage, writer: &mut impl Write, quality: Quality) -> Result<(), String> {
    let width = u16::try_from(img.width())
        .map_err(|_| format!("width {} exceeds the JPEG limit of 65535", img.width()))?;
    let height = u16::try_from(img.height())
        .map_err(|_| format!("height {} exceeds the JPEG limit of 65535", img.height()))?;

    let mut encoder = JpegEncoder::new(writer, quality.value() as u8);
    encoder.set_sampling_factor(SamplingFactor::R_4_4_4);
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(img.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| e.to_string())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let mut decoder = open_decoder(path)?;
        let (width, height) = decoder.dimensions();
        if swaps_axes(read_orientation(&mut decoder)) {
            Ok(Dimensions {
                width: height,
                height: width,
            })
        } else {
            Ok(Dimensions { width, height })
        }
    }

    fn frame(&self, params: &FrameParams) -> Result<FramedImage, BackendError> {
        let source = load_oriented(&params.source)?.to_rgb8();
        let dims = Dimensions {
            width: source.width(),
            height: source.height(),
        };

        let settings = &params.settings;
        let layout = plan_canvas(dims.as_tuple(), settings.aspect, settings.thickness).ok_or_else(
            || BackendError::CanvasTooLarge {
                path: params.source.clone(),
            },
        )?;
        debug!(
            source = %params.source.display(),
            width = layout.width,
            height = layout.height,
            thickness = layout.thickness,
            "planned canvas"
        );

        let canvas = compose_canvas(&source, &layout, settings.color);
        save_image(&canvas, &params.output, settings.quality)?;

        Ok(FramedImage {
            source: dims,
            layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::test_settings;
    use crate::imaging::params::FrameSettings;
    use crate::params::{AspectRatio, Thickness};
    use crate::test_helpers::{create_jpeg_with_orientation, create_test_jpeg, create_test_png};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const RED: [u8; 3] = [255, 0, 0];

    fn params(source: PathBuf, output: PathBuf, settings: FrameSettings) -> FrameParams {
        FrameParams {
            source,
            output,
            settings,
        }
    }

    #[test]
    fn compose_fills_border_and_pastes_centered() {
        let source = RgbImage::from_pixel(2, 2, Rgb(RED));
        let layout = CanvasLayout {
            width: 4,
            height: 6,
            offset_x: 1,
            offset_y: 2,
            thickness: 1,
        };
        let canvas = compose_canvas(&source, &layout, Color::new(0, 0, 255));

        assert_eq!(canvas.dimensions(), (4, 6));
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 255]);
        assert_eq!(canvas.get_pixel(1, 2).0, RED);
        assert_eq!(canvas.get_pixel(2, 3).0, RED);
        assert_eq!(canvas.get_pixel(3, 3).0, [0, 0, 255]);
        assert_eq!(canvas.get_pixel(1, 4).0, [0, 0, 255]);
    }

    #[test]
    fn frame_square_png_to_portrait() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("square.png");
        create_test_png(&source, 100, 100, RED);
        let output = tmp.path().join("square-frame.png");

        let framed = RustBackend::new()
            .frame(&params(source, output.clone(), test_settings()))
            .unwrap();
        assert_eq!((framed.layout.offset_x, framed.layout.offset_y), (0, 12));

        let result = image::open(&output).unwrap().to_rgb8();
        assert_eq!(result.dimensions(), (100, 125));
        assert_eq!(result.get_pixel(50, 5).0, [255, 255, 255]);
        assert_eq!(result.get_pixel(50, 12).0, RED);
        assert_eq!(result.get_pixel(50, 111).0, RED);
        assert_eq!(result.get_pixel(50, 112).0, [255, 255, 255]);
    }

    #[test]
    fn frame_resolves_percent_thickness_per_image() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("wide.png");
        create_test_png(&source, 200, 100, RED);
        let output = tmp.path().join("wide-frame.png");

        let settings = FrameSettings {
            aspect: AspectRatio::new(1, 1).unwrap(),
            thickness: Thickness::Percent(10.0),
            color: Color::BLACK,
            ..test_settings()
        };
        let framed = RustBackend::new()
            .frame(&params(source, output.clone(), settings))
            .unwrap();

        // short side 100 → 10px border; content 200x200 → canvas 220x220
        assert_eq!(framed.layout.thickness, 10);
        assert_eq!((framed.layout.offset_x, framed.layout.offset_y), (10, 60));
        let result = image::open(&output).unwrap().to_rgb8();
        assert_eq!(result.dimensions(), (220, 220));
        assert_eq!(result.get_pixel(5, 110).0, [0, 0, 0]);
        assert_eq!(result.get_pixel(110, 110).0, RED);
    }

    #[test]
    fn frame_jpeg_keeps_dimensions_exact() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpg");
        create_test_jpeg(&source, 160, 90);
        let output = tmp.path().join("photo-frame.jpg");

        let settings = FrameSettings {
            aspect: AspectRatio::new(1, 1).unwrap(),
            thickness: Thickness::Pixels(5),
            ..test_settings()
        };
        RustBackend::new()
            .frame(&params(source, output.clone(), settings))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (170, 170));
    }

    /// Per-component (h, v) sampling factors from a baseline JPEG's SOF0 segment.
    fn jpeg_sampling_factors(bytes: &[u8]) -> Vec<(u8, u8)> {
        let mut pos = 2; // skip SOI
        while pos + 4 <= bytes.len() {
            assert_eq!(bytes[pos], 0xFF, "expected a marker at {pos}");
            let marker = bytes[pos + 1];
            let len = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
            if marker == 0xC0 {
                let segment = &bytes[pos + 4..pos + 2 + len];
                let components = usize::from(segment[5]);
                return (0..components)
                    .map(|i| {
                        let factors = segment[6 + i * 3 + 1];
                        (factors >> 4, factors & 0x0F)
                    })
                    .collect();
            }
            pos += 2 + len;
        }
        panic!("no SOF0 segment");
    }

    #[test]
    fn frame_jpeg_is_not_chroma_subsampled() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpg");
        create_test_jpeg(&source, 64, 48);
        let output = tmp.path().join("photo-frame.jpg");

        RustBackend::new()
            .frame(&params(source, output.clone(), test_settings()))
            .unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(jpeg_sampling_factors(&bytes), vec![(1, 1); 3]);
        // 64x48 is wider than 4:5 → height = 64 * 5 / 4 = 80
        assert_eq!(image::image_dimensions(&output).unwrap(), (64, 80));
    }

    #[test]
    fn write_jpeg_rejects_sides_over_65535() {
        let wide = RgbImage::new(70_000, 1);
        let mut out = Vec::new();
        let err = write_jpeg(&wide, &mut out, Quality::new(90)).unwrap_err();
        assert!(err.contains("65535"));
    }

    #[test]
    fn frame_webp_output() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("tile.png");
        create_test_png(&source, 30, 60, RED);
        let output = tmp.path().join("tile-frame.webp");

        RustBackend::new()
            .frame(&params(source, output.clone(), test_settings()))
            .unwrap();

        // 30x60 is taller than 4:5 → width = 60 * 4 / 5 = 48
        let result = image::open(&output).unwrap().to_rgb8();
        assert_eq!(result.dimensions(), (48, 60));
        assert_eq!(result.get_pixel(24, 30).0, RED);
    }

    #[test]
    fn frame_png_rerun_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("same.png");
        create_test_png(&source, 64, 48, RED);
        let first = tmp.path().join("first.png");
        let second = tmp.path().join("second.png");
        let backend = RustBackend::new();

        backend
            .frame(&params(source.clone(), first.clone(), test_settings()))
            .unwrap();
        backend
            .frame(&params(source, second.clone(), test_settings()))
            .unwrap();

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }

    #[test]
    fn frame_applies_exif_orientation() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("rotated.jpg");
        // Stored 40x20, EXIF 6 = rotate 90° clockwise → displayed 20x40
        create_jpeg_with_orientation(&source, 40, 20, 6);
        let output = tmp.path().join("rotated-frame.png");

        let framed = RustBackend::new()
            .frame(&params(source, output.clone(), test_settings()))
            .unwrap();

        assert_eq!(framed.source.as_tuple(), (20, 40));
        // 20x40 is taller than 4:5 → width = 40 * 4 / 5 = 32
        assert_eq!(image::image_dimensions(&output).unwrap(), (32, 40));
    }

    #[test]
    fn identify_applies_exif_orientation() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("rotated.jpg");
        create_jpeg_with_orientation(&source, 40, 20, 6);

        let dims = RustBackend::new().identify(&source).unwrap();
        assert_eq!(dims.as_tuple(), (20, 40));
    }

    #[test]
    fn identify_plain_png() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("plain.png");
        create_test_png(&source, 200, 150, RED);

        let dims = RustBackend::new().identify(&source).unwrap();
        assert_eq!(dims.as_tuple(), (200, 150));
    }

    #[test]
    fn missing_source_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let result = RustBackend::new().frame(&params(
            tmp.path().join("missing.jpg"),
            tmp.path().join("out.jpg"),
            test_settings(),
        ));
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn corrupt_source_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("corrupt.png");
        std::fs::write(&source, b"definitely not a png").unwrap();

        let result = RustBackend::new().frame(&params(
            source,
            tmp.path().join("out.png"),
            test_settings(),
        ));
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn unsupported_output_extension_is_encode_error() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("ok.png");
        create_test_png(&source, 10, 10, RED);
        let output = tmp.path().join("out.txt");

        let result = RustBackend::new().frame(&params(source, output.clone(), test_settings()));
        assert!(matches!(result, Err(BackendError::Encode { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn unwritable_destination_is_encode_error() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("ok.png");
        create_test_png(&source, 10, 10, RED);

        let result = RustBackend::new().frame(&params(
            source,
            tmp.path().join("no-such-dir/out.png"),
            test_settings(),
        ));
        assert!(matches!(result, Err(BackendError::Encode { .. })));
    }
}
