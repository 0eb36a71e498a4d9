//! Image host trait and shared error type.
//!
//! The [`ImageHost`] trait is the boundary between pure planning and pixel
//! work: a host owns one current image buffer, reports its size, and can
//! replace it with a resampled or cropped copy. Plans from
//! [`calculations`](super::calculations) are executed against any host by
//! [`operations`](super::operations).
//!
//! The production implementation is
//! [`ImageEditor`](super::editor::ImageEditor), backed by the `image` crate.

use super::calculations::{PlanError, Rect, Size, check_crop_bounds};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("File does not exist: {0}")]
    NotFound(PathBuf),
    #[error("Wrong file type: {0}")]
    UnsupportedFormat(String),
    #[error("Decoding failed: {0}")]
    Decode(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Image has no file path; use save_as() instead")]
    Unnamed,
}

impl BackendError {
    /// True for caller errors (bad dimensions, out-of-bounds crops).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Plan(PlanError::InvalidArgument(_)))
    }
}

/// Owner of a single mutable image buffer.
///
/// Mutating methods replace the current buffer; the previous one is released
/// before they return.
pub trait ImageHost {
    /// Current buffer dimensions.
    fn size(&self) -> Size;

    /// Resample the full current image to exactly `target`.
    fn scale_to(&mut self, target: Size) -> Result<(), BackendError>;

    /// Replace the image with the `window` sub-image.
    ///
    /// Callers go through [`crop`](Self::crop), which checks bounds first.
    fn crop_window(&mut self, window: Rect) -> Result<(), BackendError>;

    /// Bounds-checked crop. Fails with `InvalidArgument` ("crop out of
    /// bounds") when `window` does not fit inside the current image.
    fn crop(&mut self, window: Rect) -> Result<(), BackendError> {
        check_crop_bounds(self.size(), window)?;
        self.crop_window(window)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock host that tracks dimensions and records operations without
    /// touching any pixels.
    #[derive(Debug)]
    pub struct MockHost {
        pub size: Size,
        pub operations: Vec<RecordedOp>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Scale(Size),
        Crop(Rect),
    }

    impl MockHost {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                size: Size::new(width, height),
                operations: Vec::new(),
            }
        }
    }

    impl ImageHost for MockHost {
        fn size(&self) -> Size {
            self.size
        }

        fn scale_to(&mut self, target: Size) -> Result<(), BackendError> {
            self.operations.push(RecordedOp::Scale(target));
            self.size = target;
            Ok(())
        }

        fn crop_window(&mut self, window: Rect) -> Result<(), BackendError> {
            self.operations.push(RecordedOp::Crop(window));
            self.size = window.size();
            Ok(())
        }
    }

    #[test]
    fn mock_records_scale() {
        let mut host = MockHost::new(800, 600);
        host.scale_to(Size::new(400, 300)).unwrap();

        assert_eq!(host.size(), Size::new(400, 300));
        assert_eq!(host.operations, vec![RecordedOp::Scale(Size::new(400, 300))]);
    }

    #[test]
    fn crop_checks_bounds_before_delegating() {
        let mut host = MockHost::new(100, 100);
        let err = host.crop(Rect::new(50, 50, 60, 10)).unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "invalid argument: crop out of bounds");
        assert!(host.operations.is_empty());
        assert_eq!(host.size(), Size::new(100, 100));
    }

    #[test]
    fn crop_in_bounds_reaches_host() {
        let mut host = MockHost::new(100, 100);
        host.crop(Rect::new(10, 20, 30, 40)).unwrap();

        assert_eq!(host.size(), Size::new(30, 40));
        assert_eq!(
            host.operations,
            vec![RecordedOp::Crop(Rect::new(10, 20, 30, 40))]
        );
    }

    #[test]
    fn io_errors_are_not_invalid_argument() {
        let err = BackendError::from(std::io::Error::other("disk"));
        assert!(!err.is_invalid_argument());
    }
}
