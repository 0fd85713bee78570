use common::buffer2::Buffer2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SobelError};

/// Single-channel float image, row-major.
pub type GrayImage = Buffer2<f32>;

/// Width and height shared by the input and output buffers of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: usize,
    pub height: usize,
}

impl ImageDimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Rejects empty images and sizes whose pixel count overflows `usize`.
    pub fn validate(&self) -> Result<()> {
        self.pixel_count().map(|_| ())
    }

    pub fn pixel_count(&self) -> Result<usize> {
        if self.width == 0 || self.height == 0 {
            return Err(self.invalid());
        }
        self.width
            .checked_mul(self.height)
            .ok_or_else(|| self.invalid())
    }

    fn invalid(&self) -> SobelError {
        SobelError::InvalidDimensions {
            width: self.width,
            height: self.height,
        }
    }
}

impl<T> From<&Buffer2<T>> for ImageDimensions {
    fn from(buffer: &Buffer2<T>) -> Self {
        Self::new(buffer.width(), buffer.height())
    }
}

/// Allocate a zeroed image, reporting allocator failure instead of aborting.
pub fn allocate_image(dims: ImageDimensions) -> Result<GrayImage> {
    let len = dims.pixel_count()?;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| SobelError::Allocation { len })?;
    pixels.resize(len, 0.0f32);
    Ok(Buffer2::new(dims.width, dims.height, pixels))
}

/// Wrap existing samples, checking they fill `dims` exactly.
pub fn image_from_vec(dims: ImageDimensions, pixels: Vec<f32>) -> Result<GrayImage> {
    let expected = dims.pixel_count()?;
    Buffer2::try_new(dims.width, dims.height, pixels).map_err(|pixels| {
        SobelError::BufferLength {
            width: dims.width,
            height: dims.height,
            expected,
            got: pixels.len(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        for (w, h) in [(0, 4), (4, 0), (0, 0)] {
            let err = ImageDimensions::new(w, h).validate().unwrap_err();
            assert!(matches!(err, SobelError::InvalidDimensions { .. }), "{err}");
        }
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let dims = ImageDimensions::new(usize::MAX, 2);
        assert!(matches!(
            dims.pixel_count(),
            Err(SobelError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_allocate_image_is_zeroed_with_exact_length() {
        let img = allocate_image(ImageDimensions::new(7, 3)).unwrap();
        assert_eq!(img.len(), 21);
        assert_eq!((img.width(), img.height()), (7, 3));
        assert!(img.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_allocate_image_reports_exhaustion() {
        let dims = ImageDimensions::new(usize::MAX / 2, 1);
        assert!(matches!(
            allocate_image(dims),
            Err(SobelError::Allocation { .. })
        ));
    }

    #[test]
    fn test_image_from_vec_checks_length() {
        let dims = ImageDimensions::new(2, 2);
        assert!(image_from_vec(dims, vec![0.0; 4]).is_ok());
        let err = image_from_vec(dims, vec![0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            SobelError::BufferLength {
                expected: 4,
                got: 3,
                ..
            }
        ));
    }
}
