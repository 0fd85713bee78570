//! Sobel - gradient-magnitude edge detection on raw grayscale images.
//!
//! The crate provides:
//! - A 3x3 stencil evaluator combining the Sobel `Gx`/`Gy` responses
//! - A row-parallel convolution driver with a configurable worker count
//! - A benchmark sweep that times one full pass per worker count
//! - Raw 8-bit file I/O and the end-to-end program flow
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sobel::{ConvolutionDriver, ImageDimensions, StdoutReport, image_from_vec};
//!
//! let dims = ImageDimensions::new(640, 480);
//! let input = image_from_vec(dims, intensities)?;
//! let mut driver = ConvolutionDriver::new(input)?;
//! driver.run_sweep(&[1, 2, 4, 8], &mut StdoutReport)?;
//! let edges = driver.output();
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod image;
pub mod kernel;
pub mod pipeline;
pub mod raw_io;
pub mod report;
pub mod stencil;

// ============================================================================
// Core types
// ============================================================================

pub use error::{Result, SobelError};
pub use image::{allocate_image, image_from_vec, GrayImage, ImageDimensions};
pub use kernel::{SobelStencil, StencilKernel, SOBEL_GX, SOBEL_GY};

// ============================================================================
// Evaluation and driving
// ============================================================================

pub use driver::{run_benchmark_sweep, run_pass, ConvolutionDriver, PassRecord};
pub use stencil::{evaluate, evaluate_checked, evaluate_row};

// ============================================================================
// Program flow
// ============================================================================

pub use config::SobelConfig;
pub use pipeline::{run, SweepSummary};
pub use raw_io::{
    bytes_to_intensities, intensities_to_bytes, load_raw, store_raw, ByteConversion,
};
pub use report::{format_record, ReportSink, StdoutReport, SweepReport};
