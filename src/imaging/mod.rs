//! Image resize planning and editing.
//!
//! | Operation | Where |
//! |---|---|
//! | **Fit within bounds** | [`plan_fit_within`] → [`operations::resize_to_within`] |
//! | **Fit to exact size** | [`plan_fit_exact`] → [`operations::resize_to`] (scale + centered crop) |
//! | **Crop / rotate / filters / paste** | [`ImageEditor`] |
//! | **Decode / encode** | `image` crate (JPEG, PNG, GIF) |
//!
//! The module is split into:
//! - **Calculations**: Pure dimension math producing a [`ResizePlan`] (unit testable, no pixels)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageHost`] trait, the boundary a plan is executed against
//! - **Operations**: Functions that plan against a host's current size and apply the plan
//! - **Editor**: [`ImageEditor`], the `image`-crate host

pub mod backend;
pub mod calculations;
pub mod editor;
pub mod operations;
mod params;

pub use backend::{BackendError, ImageHost};
pub use calculations::{
    CropAxis, PlanError, Rect, ResizePlan, Size, centered_crop_origin, centered_crop_rect,
    check_crop_bounds, plan_fit_exact, plan_fit_within,
};
pub use editor::ImageEditor;
pub use params::{Colorize, ImageKind, PasteParams, Quality, ResampleFilter, Rotation};
