//! Shared test utilities: small generated images and on-disk fixtures.
//!
//! Fixtures are generated rather than checked in, so every test gets its own
//! copy in a temp directory and pixel values are known exactly.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = write_fixture(tmp.path(), "photo.jpg", 256, 256, ImageKind::Jpeg);
//! let editor = ImageEditor::open(&path).unwrap();
//! ```

use crate::imaging::ImageKind;
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Image whose pixel at `(x, y)` is `[x, y, 0, 255]` (coordinates truncated
/// to `u8`). Makes crops and rotations easy to check.
pub fn coordinate_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([x as u8, y as u8, 0, 255])
    }))
}

/// Single-colour image.
pub fn solid_image(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
}

/// Encode a coordinate image as `kind` and write it to `dir/name`.
pub fn write_fixture(dir: &Path, name: &str, width: u32, height: u32, kind: ImageKind) -> PathBuf {
    let path = dir.join(name);
    let image = coordinate_image(width, height);
    let image = match kind {
        ImageKind::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image,
    };
    image.save_with_format(&path, kind.format()).unwrap();
    path
}
