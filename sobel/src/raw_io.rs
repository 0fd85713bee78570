//! Headerless 8-bit grayscale files and the byte <-> intensity mapping.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SobelError};
use crate::image::ImageDimensions;

/// How output magnitudes are narrowed back to bytes.
///
/// Magnitudes routinely exceed 1.0 (the Sobel weights sum to 4 in absolute
/// value per direction), so `v * 255` can leave the byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteConversion {
    /// Truncate toward zero and keep the low 8 bits, so 256 becomes 0 and
    /// 300 becomes 44. Bright edges wrap around. Byte-compatible with the
    /// historical output files.
    #[default]
    Wrapping,
    /// Clamp to `[0, 255]`, then truncate.
    Saturating,
}

impl ByteConversion {
    /// The product is formed in `f64`. An `f32` product can round up to the
    /// next integer before truncation and shift the byte by one.
    #[inline]
    pub fn convert(self, value: f32) -> u8 {
        let scaled = value as f64 * 255.0;
        match self {
            // `as i64` truncates and saturates; `as u8` then keeps the low byte.
            ByteConversion::Wrapping => scaled as i64 as u8,
            ByteConversion::Saturating => scaled.clamp(0.0, 255.0) as u8,
        }
    }
}

/// Read the first `width * height` bytes of `path`.
///
/// Trailing bytes beyond that are ignored.
pub fn load_raw(path: &Path, dims: ImageDimensions) -> Result<Vec<u8>> {
    let expected = dims.pixel_count()?;
    let io_err = |source| SobelError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(expected)
        .map_err(|_| SobelError::Allocation { len: expected })?;
    file.take(expected as u64)
        .read_to_end(&mut bytes)
        .map_err(io_err)?;

    if bytes.len() < expected {
        return Err(SobelError::ShortRead {
            path: path.to_path_buf(),
            expected,
            got: bytes.len(),
        });
    }

    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Create or truncate `path` and write all of `bytes`.
pub fn store_raw(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(|source| SobelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_all_counted(file, path, bytes)
}

/// Write `bytes` to `writer`, reporting how far it got if the writer stops
/// accepting data.
fn write_all_counted<W: Write>(mut writer: W, path: &Path, bytes: &[u8]) -> Result<()> {
    let io_err = |source| SobelError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut written = 0;
    while written < bytes.len() {
        match writer.write(&bytes[written..]) {
            Ok(0) => {
                return Err(SobelError::ShortWrite {
                    path: path.to_path_buf(),
                    expected: bytes.len(),
                    written,
                });
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(io_err(e)),
        }
    }
    writer.flush().map_err(io_err)?;

    tracing::debug!("Wrote {} bytes to {}", written, path.display());
    Ok(())
}

/// Map bytes `0..=255` onto intensities `0.0..=1.0`.
pub fn bytes_to_intensities(bytes: &[u8]) -> Vec<f32> {
    bytes.iter().map(|&b| b as f32 / 255.0).collect()
}

/// Scale intensities by 255 and narrow each one with `conversion`.
pub fn intensities_to_bytes(values: &[f32], conversion: ByteConversion) -> Vec<u8> {
    values.iter().map(|&v| conversion.convert(v)).collect()
}
