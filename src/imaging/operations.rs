//! High-level image operations.
//!
//! These functions combine calculations with host execution: they read the
//! current size from an [`ImageHost`], compute a plan, and issue at most one
//! scale and one crop.

use super::backend::{BackendError, ImageHost};
use super::calculations::{
    PlanError, Rect, ResizePlan, Size, centered_crop_rect, plan_fit_exact, plan_fit_within,
};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Execute a plan: scale, then center-crop when the plan calls for it.
///
/// Returns the host's size afterwards.
pub fn apply_plan(host: &mut impl ImageHost, plan: &ResizePlan) -> Result<Size> {
    if let Some(target) = plan.scale_target() {
        host.scale_to(target)?;
    }
    if let Some(window) = plan.crop_window() {
        host.crop(window)?;
    }
    Ok(host.size())
}

/// Shrink the image to fit within `max_width` × `max_height`.
pub fn resize_to_within(
    host: &mut impl ImageHost,
    max_width: u32,
    max_height: u32,
) -> Result<ResizePlan> {
    let plan = plan_fit_within(host.size(), max_width, max_height)?;
    apply_plan(host, &plan)?;
    Ok(plan)
}

/// Resize to exact dimensions, cropping any overhang from the center.
///
/// A `None` dimension follows the source aspect ratio.
pub fn resize_to(
    host: &mut impl ImageHost,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<ResizePlan> {
    let plan = plan_fit_exact(host.size(), width, height)?;
    apply_plan(host, &plan)?;
    Ok(plan)
}

/// Scale to exactly `width` × `height`, ignoring the aspect ratio.
pub fn stretch_to(host: &mut impl ImageHost, width: u32, height: u32) -> Result<ResizePlan> {
    if width == 0 || height == 0 {
        return Err(PlanError::InvalidArgument(format!(
            "stretch dimensions must be positive, got {width}x{height}"
        ))
        .into());
    }
    let target = Size::new(width, height);
    let plan = if host.size() == target {
        ResizePlan::NoChange
    } else {
        ResizePlan::Scaled { target }
    };
    apply_plan(host, &plan)?;
    Ok(plan)
}

/// Crop an arbitrary window. Out-of-bounds windows are rejected.
pub fn crop(host: &mut impl ImageHost, window: Rect) -> Result<Size> {
    host.crop(window)?;
    Ok(host.size())
}

/// Crop a `width` × `height` window from the center. A missing height
/// gives a square window.
pub fn crop_from_center(
    host: &mut impl ImageHost,
    width: u32,
    height: Option<u32>,
) -> Result<Size> {
    let size = Size::new(width, height.unwrap_or(width));
    let window = centered_crop_rect(host.size(), size);
    crop(host, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::CropAxis;
    use crate::imaging::backend::tests::{MockHost, RecordedOp};

    #[test]
    fn no_change_issues_no_operations() {
        let mut host = MockHost::new(100, 80);
        let plan = resize_to_within(&mut host, 100, 100).unwrap();

        assert_eq!(plan, ResizePlan::NoChange);
        assert!(host.operations.is_empty());
    }

    #[test]
    fn within_issues_single_scale() {
        let mut host = MockHost::new(200, 100);
        resize_to_within(&mut host, 100, 100).unwrap();

        assert_eq!(host.operations, vec![RecordedOp::Scale(Size::new(100, 50))]);
    }

    #[test]
    fn exact_scales_then_crops_from_center() {
        let mut host = MockHost::new(300, 200);
        let plan = resize_to(&mut host, Some(100), Some(100)).unwrap();

        assert!(matches!(
            plan,
            ResizePlan::ScaledWithCrop {
                crop_axis: CropAxis::Horizontal,
                ..
            }
        ));
        assert_eq!(
            host.operations,
            vec![
                RecordedOp::Scale(Size::new(150, 100)),
                RecordedOp::Crop(Rect::new(25, 0, 100, 100)),
            ]
        );
        assert_eq!(host.size(), Size::new(100, 100));
    }

    #[test]
    fn exact_vertical_overhang() {
        let mut host = MockHost::new(256, 256);
        resize_to(&mut host, Some(100), Some(50)).unwrap();

        assert_eq!(
            host.operations,
            vec![
                RecordedOp::Scale(Size::new(100, 100)),
                RecordedOp::Crop(Rect::new(0, 25, 100, 50)),
            ]
        );
    }

    #[test]
    fn exact_single_axis_never_crops() {
        let mut host = MockHost::new(284, 200);
        resize_to(&mut host, Some(100), None).unwrap();

        assert_eq!(host.operations, vec![RecordedOp::Scale(Size::new(100, 70))]);
    }

    #[test]
    fn invalid_plan_touches_nothing() {
        let mut host = MockHost::new(50, 50);
        let err = resize_to(&mut host, None, None).unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(host.operations.is_empty());
    }

    #[test]
    fn stretch_ignores_aspect_ratio() {
        let mut host = MockHost::new(300, 200);
        stretch_to(&mut host, 50, 50).unwrap();
        assert_eq!(host.operations, vec![RecordedOp::Scale(Size::new(50, 50))]);

        let plan = stretch_to(&mut host, 50, 50).unwrap();
        assert_eq!(plan, ResizePlan::NoChange);
        assert!(stretch_to(&mut host, 0, 10).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn crop_from_center_defaults_to_square() {
        let mut host = MockHost::new(200, 100);
        crop_from_center(&mut host, 50, None).unwrap();

        assert_eq!(host.operations, vec![RecordedOp::Crop(Rect::new(75, 25, 50, 50))]);
    }

    #[test]
    fn crop_from_center_larger_than_image_fails() {
        let mut host = MockHost::new(40, 40);
        let err = crop_from_center(&mut host, 50, Some(10)).unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(host.operations.is_empty());
    }

    #[test]
    fn crop_returns_new_size() {
        let mut host = MockHost::new(40, 40);
        assert_eq!(
            crop(&mut host, Rect::new(0, 0, 10, 20)).unwrap(),
            Size::new(10, 20)
        );
    }
}
