//! Sobel gradient magnitude at a single pixel.
//!
//! Neighbors that fall outside the image are skipped: they add nothing to
//! either directional sum. There is no padding, mirroring or edge replication.


use crate::error::{Result, SobelError};
use crate::kernel::{SobelStencil, StencilKernel};

/// Gradient magnitude `sqrt(tx^2 + ty^2)` centered on `(row, col)`.
///
/// `tx` and `ty` are the `gx`/`gy` weighted sums over the in-bounds part of
/// the 3x3 neighborhood. The result is non-negative and unbounded above.
///
/// Requires `source.len() == width * height`, `row < height` and `col < width`.
/// These are only checked in debug builds; see [`evaluate_checked`].
#[inline]
pub fn evaluate(
    source: &[f32],
    row: usize,
    col: usize,
    width: usize,
    height: usize,
    gx: &StencilKernel,
    gy: &StencilKernel,
) -> f32 {
    debug_assert_eq!(source.len(), width * height, "source length mismatch");
    debug_assert!(
        row < height && col < width,
        "pixel ({row}, {col}) outside {width}x{height}"
    );

    let mut tx = 0.0f32;
    let mut ty = 0.0f32;

    for dy in -1isize..=1 {
        let Some(ny) = row.checked_add_signed(dy) else {
            continue;
        };
        if ny >= height {
            continue;
        }
        let line = &source[ny * width..(ny + 1) * width];

        for dx in -1isize..=1 {
            let Some(nx) = col.checked_add_signed(dx) else {
                continue;
            };
            if nx >= width {
                continue;
            }
            let sample = line[nx];
            tx += gx.weight(dy, dx) * sample;
            ty += gy.weight(dy, dx) * sample;
        }
    }

    (tx * tx + ty * ty).sqrt()
}

/// [`evaluate`] with its preconditions turned into errors.
pub fn evaluate_checked(
    source: &[f32],
    row: usize,
    col: usize,
    width: usize,
    height: usize,
    gx: &StencilKernel,
    gy: &StencilKernel,
) -> Result<f32> {
    let expected = width
        .checked_mul(height)
        .filter(|&n| n > 0)
        .ok_or(SobelError::InvalidDimensions { width, height })?;
    if source.len() != expected {
        return Err(SobelError::BufferLength {
            width,
            height,
            expected,
            got: source.len(),
        });
    }
    if row >= height || col >= width {
        return Err(SobelError::OutOfBounds {
            row,
            col,
            width,
            height,
        });
    }
    Ok(evaluate(source, row, col, width, height, gx, gy))
}

/// Fill `out_row` with the magnitudes of every pixel in `row`.
#[inline]
pub fn evaluate_row(
    source: &[f32],
    row: usize,
    width: usize,
    height: usize,
    stencil: &SobelStencil,
    out_row: &mut [f32],
) {
    debug_assert_eq!(out_row.len(), width);
    for (col, out) in out_row.iter_mut().enumerate() {
        *out = evaluate(source, row, col, width, height, &stencil.gx, &stencil.gy);
    }
}
