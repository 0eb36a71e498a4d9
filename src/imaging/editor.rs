//! `image`-crate implementation of [`ImageHost`], plus the editing
//! operations that sit on top of it.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format | `image::guess_format` (content, not extension) |
//! | Decode (JPEG, PNG, GIF) | `image::load_from_memory_with_format` |
//! | Scale | `DynamicImage::resize_exact` with the configured [`ResampleFilter`] |
//! | Crop | `DynamicImage::crop_imm` |
//! | Rotate | `DynamicImage::rotate90` / `rotate180` / `rotate270` |
//! | Grayscale / brightness | `DynamicImage::grayscale` / `brighten` |
//! | Paste | `image::imageops::overlay` (alpha blended) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with [`Quality`] |
//! | Encode → PNG / GIF | `DynamicImage::write_to` |
//!
//! ## Buffer ownership
//!
//! An [`ImageEditor`] owns exactly one decoded buffer. Every mutating call
//! builds a new buffer and hands it to a single private `replace` method,
//! which drops the previous one. Nothing else holds a reference to a buffer
//! once it has been replaced.

use super::backend::{BackendError, ImageHost};
use super::calculations::{PlanError, Rect, ResizePlan, Size, check_crop_bounds};
use super::operations;
use super::params::{Colorize, ImageKind, PasteParams, Quality, ResampleFilter, Rotation};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, imageops};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// An image loaded into memory, with the format it was read as and the
/// file it came from (if any).
#[derive(Debug, Clone)]
pub struct ImageEditor {
    image: DynamicImage,
    kind: ImageKind,
    path: Option<PathBuf>,
    filter: ResampleFilter,
}

impl ImageEditor {
    /// Open and decode a JPEG, PNG or GIF file.
    ///
    /// The format is sniffed from the file contents; the extension is ignored.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BackendError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let mut editor = Self::from_bytes(&bytes).map_err(|e| match e {
            BackendError::UnsupportedFormat(detail) => {
                BackendError::UnsupportedFormat(format!("{} ({detail})", path.display()))
            }
            other => other,
        })?;
        editor.path = Some(path.to_path_buf());
        tracing::debug!(kind = editor.kind.name(), size = %editor.size(), "opened image");
        Ok(editor)
    }

    /// Decode an in-memory JPEG, PNG or GIF.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        let format = image::guess_format(bytes)
            .map_err(|e| BackendError::UnsupportedFormat(e.to_string()))?;
        let kind = ImageKind::from_format(format)
            .ok_or_else(|| BackendError::UnsupportedFormat(format!("{format:?}")))?;
        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Self::from_image(image, kind))
    }

    /// Wrap an already-decoded image. It has no backing file.
    pub fn from_image(image: DynamicImage, kind: ImageKind) -> Self {
        Self {
            image,
            kind,
            path: None,
            filter: ResampleFilter::default(),
        }
    }

    /// Use `filter` for subsequent scale operations.
    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// `JPEG`, `PNG` or `GIF`.
    pub fn format_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Swap in a new buffer, releasing the current one.
    fn replace(&mut self, image: DynamicImage) {
        tracing::debug!(
            from = %self.size(),
            to = %Size::new(image.width(), image.height()),
            "replacing image buffer"
        );
        self.image = image;
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Shrink to fit within `max_width` × `max_height`; never enlarges.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resize_to_within(
        &mut self,
        max_width: u32,
        max_height: u32,
    ) -> Result<ResizePlan, BackendError> {
        operations::resize_to_within(self, max_width, max_height)
    }

    /// Resize to exact dimensions, center-cropping any overhang.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resize_to(
        &mut self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<ResizePlan, BackendError> {
        operations::resize_to(self, width, height)
    }

    /// Scale to exactly `width` × `height` without preserving aspect ratio.
    pub fn stretch_to(&mut self, width: u32, height: u32) -> Result<ResizePlan, BackendError> {
        operations::stretch_to(self, width, height)
    }

    /// Crop to `window`. Fails with `InvalidArgument` if it leaves the image.
    pub fn crop(&mut self, window: Rect) -> Result<Size, BackendError> {
        operations::crop(self, window)
    }

    /// Crop a centered window; `height` defaults to `width`.
    pub fn crop_from_center(
        &mut self,
        width: u32,
        height: Option<u32>,
    ) -> Result<Size, BackendError> {
        operations::crop_from_center(self, width, height)
    }

    pub fn rotate(&mut self, rotation: Rotation) -> &mut Self {
        let rotated = match rotation {
            Rotation::Clockwise => self.image.rotate90(),
            Rotation::CounterClockwise => self.image.rotate270(),
            Rotation::Half => self.image.rotate180(),
        };
        self.replace(rotated);
        self
    }

    pub fn rotate_clockwise(&mut self) -> &mut Self {
        self.rotate(Rotation::Clockwise)
    }

    pub fn rotate_counter_clockwise(&mut self) -> &mut Self {
        self.rotate(Rotation::CounterClockwise)
    }

    pub fn rotate_180(&mut self) -> &mut Self {
        self.rotate(Rotation::Half)
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Convert to grayscale, keeping the alpha channel.
    pub fn grayscale(&mut self) -> &mut Self {
        let gray = DynamicImage::ImageRgba8(self.image.grayscale().to_rgba8());
        self.replace(gray);
        self
    }

    /// Add `value` (clamped to `-255..=255`) to every colour channel.
    pub fn brightness(&mut self, value: i32) -> &mut Self {
        let brightened = self.image.brighten(value.clamp(-255, 255));
        self.replace(brightened);
        self
    }

    /// Shift every pixel by the given channel offsets and fade opacity by
    /// `alpha / 127`.
    pub fn colorize(&mut self, colorize: Colorize) -> &mut Self {
        let keep = 127 - u32::from(colorize.alpha.min(127));
        let mut rgba = self.image.to_rgba8();
        for pixel in rgba.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            pixel.0 = [
                shift_channel(r, colorize.red),
                shift_channel(g, colorize.green),
                shift_channel(b, colorize.blue),
                (u32::from(a) * keep / 127) as u8,
            ];
        }
        self.replace(DynamicImage::ImageRgba8(rgba));
        self
    }

    // ------------------------------------------------------------------
    // Compositing
    // ------------------------------------------------------------------

    /// Paste (a region of) `other` onto this image. See [`PasteParams`].
    pub fn paste(&mut self, other: &ImageEditor, params: PasteParams) -> Result<(), BackendError> {
        let (sx, sy) = params.src_origin;
        let src_size = params.src_size.unwrap_or_else(|| {
            Size::new(
                other.width().saturating_sub(sx),
                other.height().saturating_sub(sy),
            )
        });
        let region = Rect::new(sx, sy, src_size.width, src_size.height);
        check_crop_bounds(other.size(), region)?;

        let dst_size = params.dst_size.unwrap_or(src_size);
        if dst_size.width == 0 || dst_size.height == 0 {
            return Err(PlanError::InvalidArgument(format!(
                "paste destination must be non-empty, got {dst_size}"
            ))
            .into());
        }

        let mut patch = other
            .image
            .crop_imm(region.x, region.y, region.width, region.height);
        if dst_size != src_size {
            patch = patch.resize_exact(dst_size.width, dst_size.height, self.filter.filter_type());
        }

        let mut canvas = self.image.to_rgba8();
        let (dx, dy) = params.dst_origin;
        imageops::overlay(&mut canvas, &patch.to_rgba8(), dx, dy);
        self.replace(DynamicImage::ImageRgba8(canvas));
        Ok(())
    }

    /// Open `path` and paste it onto this image.
    pub fn paste_file(
        &mut self,
        path: impl AsRef<Path>,
        params: PasteParams,
    ) -> Result<(), BackendError> {
        let other = Self::open(path)?;
        self.paste(&other, params)
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Forget the backing file so the next write must go through
    /// [`save_as`](Self::save_as).
    pub fn duplicate(&mut self) -> &mut Self {
        self.path = None;
        self
    }

    /// Encode in the image's own format. `quality` applies to JPEG only.
    pub fn encode(&self, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let mut buf = Cursor::new(Vec::new());
        let result = match self.kind {
            ImageKind::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
                DynamicImage::ImageRgb8(self.image.to_rgb8()).write_with_encoder(encoder)
            }
            ImageKind::Png => self.image.write_to(&mut buf, ImageFormat::Png),
            ImageKind::Gif => {
                DynamicImage::ImageRgba8(self.image.to_rgba8()).write_to(&mut buf, ImageFormat::Gif)
            }
        };
        result.map_err(|e| BackendError::Encode(format!("{}: {e}", self.kind.name())))?;
        Ok(buf.into_inner())
    }

    /// Overwrite the file this image was opened from (or last saved to).
    pub fn save(&self, quality: Quality) -> Result<(), BackendError> {
        let path = self.path.as_deref().ok_or(BackendError::Unnamed)?;
        self.write_file(path, quality)
    }

    /// Write to `path` and make it the backing file.
    pub fn save_as(
        &mut self,
        path: impl AsRef<Path>,
        quality: Quality,
    ) -> Result<(), BackendError> {
        let path = path.as_ref();
        self.write_file(path, quality)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    fn write_file(&self, path: &Path, quality: Quality) -> Result<(), BackendError> {
        let bytes = self.encode(quality)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn shift_channel(value: u8, offset: i32) -> u8 {
    (i32::from(value) + offset).clamp(0, 255) as u8
}

impl ImageHost for ImageEditor {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    fn scale_to(&mut self, target: Size) -> Result<(), BackendError> {
        let scaled = self
            .image
            .resize_exact(target.width, target.height, self.filter.filter_type());
        self.replace(scaled);
        Ok(())
    }

    fn crop_window(&mut self, window: Rect) -> Result<(), BackendError> {
        let cropped = self
            .image
            .crop_imm(window.x, window.y, window.width, window.height);
        self.replace(cropped);
        Ok(())
    }
}
