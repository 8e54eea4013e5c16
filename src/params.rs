//! Parsers for the loosely-typed frame parameters.
//!
//! Users type colors, aspect ratios and border thickness as free text (on the
//! command line, in `frame.toml`, or in a form). This module turns that text
//! into strict values and rejects malformed input before any image is opened.
//!
//! | Input | Accepted forms | Result |
//! |---|---|---|
//! | Color | CSS name, `#rgb`, `#rrggbb`, `rgb(...)`, `hsl(...)` | [`Color`] |
//! | Aspect ratio | `square`, `portrait`, `story`, `landscape`, `W:H` | [`AspectRatio`] |
//! | Thickness | `60` (pixels), `5%` (of the image's short side) | [`Thickness`] |
//!
//! Thickness is the odd one out: a percentage can only be turned into pixels
//! once the concrete image is known, so [`Thickness::parse`] validates the text
//! up front and [`Thickness::resolve`] is called per image.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    #[error("invalid aspect ratio: {0:?} (expected W:H or one of square, portrait, story, landscape)")]
    InvalidAspectRatio(String),
    #[error("invalid thickness: {0:?} (expected pixels like 60 or a percentage like 5%)")]
    InvalidThickness(String),
}

/// An opaque RGB border color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Resolve a color name, hex code or functional notation.
///
/// Alpha is dropped: the canvas is always opaque RGB.
pub fn resolve_color(input: &str) -> Result<Color, ParamError> {
    let parsed = csscolorparser::parse(input.trim())
        .map_err(|_| ParamError::InvalidColor(input.to_string()))?;
    let [r, g, b, _] = parsed.to_rgba8();
    Ok(Color { r, g, b })
}

/// Named aspect ratios and what they expand to.
pub const ASPECT_PRESETS: &[(&str, (u32, u32))] = &[
    ("square", (1, 1)),
    ("portrait", (4, 5)),
    ("story", (9, 16)),
    ("landscape", (16, 9)),
];

/// Target width:height proportion. Both components are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Resolve a preset keyword (case-insensitive) or a `W:H` string.
///
/// - `"portrait"` → `4:5`
/// - `"16:9"` → `16:9`
/// - `"0:5"`, `"4:5:6"`, `"abc"` → [`ParamError::InvalidAspectRatio`]
pub fn resolve_aspect_ratio(input: &str) -> Result<AspectRatio, ParamError> {
    let invalid = || ParamError::InvalidAspectRatio(input.to_string());
    let trimmed = input.trim();

    if let Some((_, (w, h))) = ASPECT_PRESETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
    {
        return AspectRatio::new(*w, *h).ok_or_else(invalid);
    }

    let (w, h) = trimmed.split_once(':').ok_or_else(invalid)?;
    let w: u32 = w.trim().parse().map_err(|_| invalid())?;
    let h: u32 = h.trim().parse().map_err(|_| invalid())?;
    AspectRatio::new(w, h).ok_or_else(invalid)
}

/// Border thickness as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Thickness {
    /// Absolute pixel count on every side.
    Pixels(u32),
    /// Percentage of the source image's shorter side.
    Percent(f64),
}

impl Thickness {
    /// Validate thickness text without knowing the image yet.
    pub fn parse(input: &str) -> Result<Self, ParamError> {
        let invalid = || ParamError::InvalidThickness(input.to_string());
        let trimmed = input.trim();

        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: f64 = percent.trim().parse().map_err(|_| invalid())?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid());
            }
            return Ok(Thickness::Percent(value));
        }

        trimmed
            .parse::<u32>()
            .map(Thickness::Pixels)
            .map_err(|_| invalid())
    }

    /// Pixel thickness for an image whose shorter side is `short_side`.
    ///
    /// Percentages are floored: `5%` of 999 is 49.
    pub fn resolve(self, short_side: u32) -> u32 {
        match self {
            Thickness::Pixels(px) => px,
            Thickness::Percent(percent) => {
                (f64::from(short_side) * percent / 100.0).floor() as u32
            }
        }
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thickness::Pixels(px) => write!(f, "{px}px"),
            Thickness::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

/// Parse and resolve in one step, for callers that already know the image size.
pub fn resolve_thickness(input: &str, image_short_side: u32) -> Result<u32, ParamError> {
    Thickness::parse(input).map(|t| t.resolve(image_short_side))
}
