//! Fixed 3x3 derivative kernels.

/// Immutable 3x3 weight grid stored row-major.
///
/// Weight for neighbor offset `(dy, dx)`, both in `-1..=1`, sits at
/// `(dy + 1) * 3 + (dx + 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilKernel {
    weights: [f32; 9],
}

impl StencilKernel {
    pub const fn new(weights: [f32; 9]) -> Self {
        Self { weights }
    }

    /// Weight applied to the neighbor at `(row + dy, col + dx)`.
    #[inline]
    pub fn weight(&self, dy: isize, dx: isize) -> f32 {
        debug_assert!((-1..=1).contains(&dy) && (-1..=1).contains(&dx));
        self.weights[((dy + 1) * 3 + (dx + 1)) as usize]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Horizontal derivative.
pub const SOBEL_GX: StencilKernel =
    StencilKernel::new([1.0, 0.0, -1.0, 2.0, 0.0, -2.0, 1.0, 0.0, -1.0]);

/// Vertical derivative.
pub const SOBEL_GY: StencilKernel =
    StencilKernel::new([1.0, 2.0, 1.0, 0.0, 0.0, 0.0, -1.0, -2.0, -1.0]);

/// The `Gx`/`Gy` pair combined into one gradient magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SobelStencil {
    pub gx: StencilKernel,
    pub gy: StencilKernel,
}

impl Default for SobelStencil {
    fn default() -> Self {
        Self {
            gx: SOBEL_GX,
            gy: SOBEL_GY,
        }
    }
}
