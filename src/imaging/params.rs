//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between callers (CLI, batch processing, config) and the
//! [`editor`](super::editor), which does the actual pixel work.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 80). Clamped on construction.
//! - [`ImageKind`]: The three supported container formats (JPEG, PNG, GIF).
//! - [`ResampleFilter`]: Resampling kernel used when scaling.
//! - [`Rotation`]: Quarter-turn rotations.
//! - [`Colorize`]: Per-channel offsets for the colorize filter.
//! - [`PasteParams`]: Source region, destination placement and size for pasting one image onto another.

use super::calculations::Size;
use image::ImageFormat;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Quality setting for lossy (JPEG) encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

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
        Self(80)
    }
}

/// Image container formats the editor can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    /// Map a sniffed `image` format onto a supported kind.
    pub fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
        }
    }

    /// Upper-case short name: `JPEG`, `PNG` or `GIF`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

/// Resampling kernel for scale operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Quarter-turn rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// 90° clockwise.
    Clockwise,
    /// 90° counter-clockwise.
    CounterClockwise,
    /// 180°.
    Half,
}

/// Channel offsets for the colorize filter.
///
/// - `red`, `green`, `blue`: added to each pixel's channel, `-255..=255`, result clamped
/// - `alpha`: `0..=127`, where `0` leaves opacity untouched and `127` makes the image fully transparent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Colorize {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub alpha: u8,
}

impl Colorize {
    pub fn rgb(red: i32, green: i32, blue: i32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 0,
        }
    }
}

/// How to paste one image onto another.
///
/// The source region (`src_origin` + `src_size`, whole image when `None`) is
/// resampled to `dst_size` (the source region's size when `None`) and
/// alpha-blended at `dst_origin`. The destination may hang off any edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasteParams {
    pub dst_origin: (i64, i64),
    pub dst_size: Option<Size>,
    pub src_origin: (u32, u32),
    pub src_size: Option<Size>,
}

impl PasteParams {
    /// Paste the whole source, unscaled, at `(x, y)`.
    pub fn at(x: i64, y: i64) -> Self {
        Self {
            dst_origin: (x, y),
            ..Self::default()
        }
    }
}
