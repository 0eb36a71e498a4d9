//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images. They
//! take a source [`Size`] and a resize intent and return a [`ResizePlan`]
//! that an [`ImageHost`](super::backend::ImageHost) executes as at most two
//! backend calls: scale, then an optional centered crop.
//!
//! Ratios are computed in `f64` and rounded half away from zero
//! (`f64::round`). Any rounded dimension that would be `0` is clamped to `1`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl PlanError {
    fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Width × height in pixels. Both fields are expected to be ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn validate(self, what: &str) -> Result<Self, PlanError> {
        if self.width == 0 || self.height == 0 {
            return Err(PlanError::invalid(format!(
                "{what} must be positive, got {self}"
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `"WxH"` (either `x` or `X`). Zero dimensions are rejected.
impl FromStr for Size {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| PlanError::invalid(format!("expected WIDTHxHEIGHT, got '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| PlanError::invalid(format!("bad dimension '{v}': {e}")))
        };
        Size::new(parse(w)?, parse(h)?).validate("size")
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Which axis carries the overhang that gets cropped away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CropAxis {
    /// Excess width, cropped equally from left and right.
    Horizontal,
    /// Excess height, cropped equally from top and bottom.
    Vertical,
}

/// Result of a planning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResizePlan {
    /// The source already satisfies the request.
    NoChange,
    /// Scale to `target`; no crop.
    Scaled { target: Size },
    /// Scale to `canvas_before_crop`, then center-crop to `target`.
    ScaledWithCrop {
        target: Size,
        canvas_before_crop: Size,
        crop_axis: CropAxis,
    },
}

impl ResizePlan {
    pub fn is_no_change(&self) -> bool {
        matches!(self, Self::NoChange)
    }

    /// Dimensions the backend resamples to, if any resampling is needed.
    pub fn scale_target(&self) -> Option<Size> {
        match *self {
            Self::NoChange => None,
            Self::Scaled { target } => Some(target),
            Self::ScaledWithCrop {
                canvas_before_crop, ..
            } => Some(canvas_before_crop),
        }
    }

    /// Centered crop window in post-scale coordinates.
    pub fn crop_window(&self) -> Option<Rect> {
        match *self {
            Self::ScaledWithCrop {
                target,
                canvas_before_crop,
                ..
            } => Some(centered_crop_rect(canvas_before_crop, target)),
            _ => None,
        }
    }

    /// Final dimensions once the plan has been applied to `source`.
    pub fn output_size(&self, source: Size) -> Size {
        match *self {
            Self::NoChange => source,
            Self::Scaled { target } | Self::ScaledWithCrop { target, .. } => target,
        }
    }
}

/// Scale to `value * ratio`, rounded half away from zero, at least 1.
fn scaled(value: u32, ratio: f64) -> u32 {
    (value as f64 * ratio).round().max(1.0) as u32
}

/// Plan a "fit within bounds" resize: shrink (never enlarge) so both sides
/// are within `max_width` × `max_height`, preserving aspect ratio.
///
/// # Examples
/// ```
/// # use pixfit::imaging::{plan_fit_within, ResizePlan, Size};
/// let plan = plan_fit_within(Size::new(200, 100), 100, 100).unwrap();
/// assert_eq!(plan, ResizePlan::Scaled { target: Size::new(100, 50) });
/// ```
pub fn plan_fit_within(
    source: Size,
    max_width: u32,
    max_height: u32,
) -> Result<ResizePlan, PlanError> {
    let source = source.validate("source size")?;
    Size::new(max_width, max_height).validate("maximum size")?;

    if source.width <= max_width && source.height <= max_height {
        return Ok(ResizePlan::NoChange);
    }

    let mut ratio = max_width as f64 / source.width as f64;
    if source.height as f64 * ratio > max_height as f64 {
        // Width-driven scale would overflow the height bound.
        ratio = max_height as f64 / source.height as f64;
    }

    Ok(ResizePlan::Scaled {
        target: Size::new(scaled(source.width, ratio), scaled(source.height, ratio)),
    })
}

/// Plan a "fit to exact dimensions" resize.
///
/// With both targets the result is exactly `target_width` × `target_height`:
/// the source is scaled until it covers the target on both axes and the
/// overhang is center-cropped. With one target the other axis follows the
/// source aspect ratio and nothing is cropped.
///
/// # Examples
/// ```
/// # use pixfit::imaging::{plan_fit_exact, CropAxis, ResizePlan, Size};
/// let plan = plan_fit_exact(Size::new(256, 256), Some(50), Some(100)).unwrap();
/// assert_eq!(
///     plan,
///     ResizePlan::ScaledWithCrop {
///         target: Size::new(50, 100),
///         canvas_before_crop: Size::new(100, 100),
///         crop_axis: CropAxis::Horizontal,
///     }
/// );
/// ```
pub fn plan_fit_exact(
    source: Size,
    target_width: Option<u32>,
    target_height: Option<u32>,
) -> Result<ResizePlan, PlanError> {
    let source = source.validate("source size")?;

    match (target_width, target_height) {
        (None, None) => Err(PlanError::invalid(
            "at least one of target width or height is required",
        )),
        (Some(0), _) | (_, Some(0)) => Err(PlanError::invalid(format!(
            "target dimensions must be positive, got {}x{}",
            display_opt(target_width),
            display_opt(target_height)
        ))),
        (Some(width), None) => {
            if source.width == width {
                return Ok(ResizePlan::NoChange);
            }
            let ratio = width as f64 / source.width as f64;
            Ok(ResizePlan::Scaled {
                target: Size::new(width, scaled(source.height, ratio)),
            })
        }
        (None, Some(height)) => {
            if source.height == height {
                return Ok(ResizePlan::NoChange);
            }
            let ratio = height as f64 / source.height as f64;
            Ok(ResizePlan::Scaled {
                target: Size::new(scaled(source.width, ratio), height),
            })
        }
        (Some(width), Some(height)) => Ok(plan_fill(source, Size::new(width, height))),
    }
}

fn plan_fill(source: Size, target: Size) -> ResizePlan {
    if source == target {
        return ResizePlan::NoChange;
    }

    let ratio = target.width as f64 / source.width as f64;
    let scaled_height = source.height as f64 * ratio;
    let wanted_height = target.height as f64;

    if scaled_height < wanted_height {
        // Too short: match height, crop excess width.
        let ratio = target.height as f64 / source.height as f64;
        ResizePlan::ScaledWithCrop {
            target,
            canvas_before_crop: Size::new(scaled(source.width, ratio), target.height),
            crop_axis: CropAxis::Horizontal,
        }
    } else if scaled_height > wanted_height {
        // Too tall: match width, crop excess height.
        ResizePlan::ScaledWithCrop {
            target,
            canvas_before_crop: Size::new(target.width, scaled(source.height, ratio)),
            crop_axis: CropAxis::Vertical,
        }
    } else {
        ResizePlan::Scaled { target }
    }
}

fn display_opt(v: Option<u32>) -> String {
    v.map_or_else(|| "auto".to_string(), |v| v.to_string())
}

/// Top-left origin of a `target`-sized window centered in `canvas`.
///
/// Uses truncating division, so odd overhang leaves the extra pixel on the
/// right/bottom.
pub fn centered_crop_origin(canvas: Size, target: Size) -> (u32, u32) {
    (
        canvas.width.saturating_sub(target.width) / 2,
        canvas.height.saturating_sub(target.height) / 2,
    )
}

/// A `size` window centered in `bounds`.
pub fn centered_crop_rect(bounds: Size, size: Size) -> Rect {
    let (x, y) = centered_crop_origin(bounds, size);
    Rect::new(x, y, size.width, size.height)
}

/// Fail with `InvalidArgument` unless `window` lies inside `bounds`.
pub fn check_crop_bounds(bounds: Size, window: Rect) -> Result<(), PlanError> {
    if window.width == 0 || window.height == 0 {
        return Err(PlanError::invalid(format!(
            "crop window must be non-empty, got {}",
            window.size()
        )));
    }
    let right = window.x as u64 + window.width as u64;
    let bottom = window.y as u64 + window.height as u64;
    if right > bounds.width as u64 || bottom > bounds.height as u64 {
        return Err(PlanError::invalid("crop out of bounds"));
    }
    Ok(())
}
