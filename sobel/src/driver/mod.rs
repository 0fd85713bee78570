//! Full-image Sobel passes and the worker-count scaling sweep.
//!
//! A pass splits the output into row-aligned chunks; every chunk is owned by
//! exactly one task, so each output sample is written once and no locking is
//! needed. The input is shared read-only. Because every sample is computed
//! independently, the result does not depend on the worker count.


use std::time::{Duration, Instant};

use common::parallel::{par_rows_mut_auto, worker_pool};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SobelError};
use crate::image::{allocate_image, GrayImage, ImageDimensions};
use crate::kernel::SobelStencil;
use crate::report::ReportSink;
use crate::stencil::evaluate_row;

const WORKER_THREAD_PREFIX: &str = "sobel-worker";

/// Timing of one pass at a given degree of parallelism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRecord {
    pub worker_count: usize,
    pub elapsed: Duration,
}

impl PassRecord {
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Run one Sobel pass over `input` into `output` using `worker_count` threads.
///
/// Returns the wall-clock time of the pass itself. Building the worker pool
/// happens before the clock starts. Every sample of `output` is overwritten.
pub fn run_pass(input: &GrayImage, output: &mut GrayImage, worker_count: usize) -> Result<Duration> {
    run_pass_with(input, output, worker_count, &SobelStencil::default())
}

/// [`run_pass`] with an explicit kernel pair.
pub fn run_pass_with(
    input: &GrayImage,
    output: &mut GrayImage,
    worker_count: usize,
    stencil: &SobelStencil,
) -> Result<Duration> {
    check_shapes(input, output)?;
    check_worker_count(worker_count)?;

    let pool = worker_pool(worker_count, WORKER_THREAD_PREFIX).map_err(|source| {
        SobelError::ThreadPool {
            threads: worker_count,
            source,
        }
    })?;

    let start = Instant::now();
    pool.install(|| convolve_rows(input, output.pixels_mut(), stencil));
    let elapsed = start.elapsed();

    tracing::debug!(
        "Sobel pass: {}x{}, {} workers, {:.6}s",
        input.width(),
        input.height(),
        worker_count,
        elapsed.as_secs_f64()
    );

    Ok(elapsed)
}

/// Run one pass per entry of `worker_counts`, in order.
///
/// Each record is handed to `sink` as soon as it is measured. After the
/// sweep `output` holds the result of the last pass. All counts are checked
/// before the first pass starts.
pub fn run_benchmark_sweep(
    input: &GrayImage,
    output: &mut GrayImage,
    worker_counts: &[usize],
    sink: &mut dyn ReportSink,
) -> Result<Vec<PassRecord>> {
    sweep_with(input, output, worker_counts, &SobelStencil::default(), sink)
}

fn sweep_with(
    input: &GrayImage,
    output: &mut GrayImage,
    worker_counts: &[usize],
    stencil: &SobelStencil,
    sink: &mut dyn ReportSink,
) -> Result<Vec<PassRecord>> {
    if worker_counts.is_empty() {
        return Err(SobelError::EmptySweep);
    }
    check_shapes(input, output)?;
    for &count in worker_counts {
        check_worker_count(count)?;
    }

    let mut records = Vec::with_capacity(worker_counts.len());
    for &worker_count in worker_counts {
        let elapsed = run_pass_with(input, output, worker_count, stencil)?;
        let record = PassRecord {
            worker_count,
            elapsed,
        };
        sink.record(&record);
        records.push(record);
    }
    Ok(records)
}

/// Evaluate every row of `input` into the matching row of `output`.
///
/// Runs on whichever rayon pool is current.
fn convolve_rows(input: &GrayImage, output: &mut [f32], stencil: &SobelStencil) {
    let width = input.width();
    let height = input.height();
    let source = input.pixels();

    par_rows_mut_auto(output, width).for_each(|(chunk_start_row, chunk)| {
        for (local_y, out_row) in chunk.chunks_exact_mut(width).enumerate() {
            evaluate_row(
                source,
                chunk_start_row + local_y,
                width,
                height,
                stencil,
                out_row,
            );
        }
    });
}

fn check_shapes(input: &GrayImage, output: &GrayImage) -> Result<()> {
    ImageDimensions::from(input).validate()?;
    if !input.same_shape(output) {
        return Err(SobelError::ShapeMismatch {
            input_width: input.width(),
            input_height: input.height(),
            output_width: output.width(),
            output_height: output.height(),
        });
    }
    Ok(())
}

fn check_worker_count(worker_count: usize) -> Result<()> {
    if worker_count == 0 {
        return Err(SobelError::InvalidWorkerCount(worker_count));
    }
    Ok(())
}

/// Owns the buffers of a run: the input intensities, one output buffer that
/// every pass overwrites, and the kernel pair.
#[derive(Debug, Clone)]
pub struct ConvolutionDriver {
    input: GrayImage,
    output: GrayImage,
    stencil: SobelStencil,
}

impl ConvolutionDriver {
    /// Take ownership of `input` and allocate a matching output buffer.
    pub fn new(input: GrayImage) -> Result<Self> {
        let output = allocate_image(ImageDimensions::from(&input))?;
        Ok(Self {
            input,
            output,
            stencil: SobelStencil::default(),
        })
    }

    pub fn with_stencil(mut self, stencil: SobelStencil) -> Self {
        self.stencil = stencil;
        self
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::from(&self.input)
    }

    pub fn run_pass(&mut self, worker_count: usize) -> Result<Duration> {
        run_pass_with(&self.input, &mut self.output, worker_count, &self.stencil)
    }

    pub fn run_sweep(
        &mut self,
        worker_counts: &[usize],
        sink: &mut dyn ReportSink,
    ) -> Result<Vec<PassRecord>> {
        sweep_with(
            &self.input,
            &mut self.output,
            worker_counts,
            &self.stencil,
            sink,
        )
    }

    pub fn input(&self) -> &GrayImage {
        &self.input
    }

    pub fn output(&self) -> &GrayImage {
        &self.output
    }

    pub fn into_output(self) -> GrayImage {
        self.output
    }
}
