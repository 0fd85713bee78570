//! Load, filter, sweep, store.

use crate::config::SobelConfig;
use crate::driver::{ConvolutionDriver, PassRecord};
use crate::error::Result;
use crate::image::{image_from_vec, ImageDimensions};
use crate::raw_io::{bytes_to_intensities, intensities_to_bytes, load_raw, store_raw};
use crate::report::{ReportSink, SweepReport};

/// What an end-to-end run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub dimensions: ImageDimensions,
    pub records: Vec<PassRecord>,
}

/// Execute the whole program flow described by `config`.
///
/// Reads the raw input, runs one pass per configured worker count (handing
/// every record to `sink`), then writes the last pass's output. Nothing is
/// written if any step before the store fails.
pub fn run(config: &SobelConfig, sink: &mut dyn ReportSink) -> Result<SweepSummary> {
    config.validate()?;
    let dims = config.dimensions();

    if common::is_debug() {
        tracing::warn!("Debug build: timings are not representative");
    }

    let bytes = load_raw(&config.input_path, dims)?;
    tracing::info!("Read data from the file {}", config.input_path.display());

    let input = image_from_vec(dims, bytes_to_intensities(&bytes))?;
    drop(bytes);

    let mut driver = ConvolutionDriver::new(input)?;
    let records = driver.run_sweep(&config.worker_counts, sink)?;

    let output = intensities_to_bytes(driver.output(), config.byte_conversion);
    store_raw(&config.output_path, &output)?;
    tracing::info!("Wrote the output file {}", config.output_path.display());

    if let Some(report_path) = &config.report_path {
        SweepReport::new(&config.input_path, &config.output_path, dims, &records)
            .write_json(report_path)?;
        tracing::info!("Wrote the timing report {}", report_path.display());
    }

    Ok(SweepSummary {
        dimensions: dims,
        records,
    })
}
