use std::path::PathBuf;

use common::file_format::FileFormatError;
use thiserror::Error;

/// Everything that can abort a filtering run.
#[derive(Debug, Error)]
pub enum SobelError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Short read from '{path}': expected {expected} bytes, got {got}")]
    ShortRead {
        path: PathBuf,
        expected: usize,
        got: usize,
    },

    #[error("Short write to '{path}': expected {expected} bytes, wrote {written}")]
    ShortWrite {
        path: PathBuf,
        expected: usize,
        written: usize,
    },

    #[error("Failed to allocate a buffer of {len} samples")]
    Allocation { len: usize },

    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Buffer holds {got} samples but {width}x{height} needs {expected}")]
    BufferLength {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },

    #[error("Output is {output_width}x{output_height} but input is {input_width}x{input_height}")]
    ShapeMismatch {
        input_width: usize,
        input_height: usize,
        output_width: usize,
        output_height: usize,
    },

    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(usize),

    #[error("Sweep has no worker counts")]
    EmptySweep,

    #[error("Pixel ({row}, {col}) is outside a {width}x{height} image")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("Failed to build a pool of {threads} workers: {source}")]
    ThreadPool {
        threads: usize,
        source: rayon::ThreadPoolBuildError,
    },

    #[error("Invalid configuration file '{path}': {source}")]
    Config {
        path: PathBuf,
        source: FileFormatError,
    },

    #[error("Failed to serialize sweep report: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SobelError>;
