//! Consumers of per-pass timing records.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::driver::PassRecord;
use crate::error::{Result, SobelError};
use crate::image::ImageDimensions;

/// Receives one record per sweep iteration, in sweep order.
pub trait ReportSink {
    fn record(&mut self, record: &PassRecord);
}

const SIGNIFICANT_DIGITS: usize = 6;

/// The classic timing line, e.g.
/// `Number of threads: 4, Elapsed time is: 0.0123457 seconds`.
pub fn format_record(record: &PassRecord) -> String {
    format!(
        "Number of threads: {}, Elapsed time is: {} seconds",
        record.worker_count,
        format_significant(record.elapsed_secs())
    )
}

/// `value` rounded to six significant digits with trailing zeros dropped.
///
/// Switches to `d.ddddde±XX` notation below `1e-4` and from `1e6` up, the
/// same shape a default-configured C++ stream prints.
fn format_significant(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }

    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_owned()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Prints [`format_record`] lines to stdout.
#[derive(Debug, Default)]
pub struct StdoutReport;

impl ReportSink for StdoutReport {
    fn record(&mut self, record: &PassRecord) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        // A closed stdout must not abort the sweep.
        let _ = writeln!(lock, "{}", format_record(record));
        let _ = lock.flush();
    }
}

impl ReportSink for Vec<PassRecord> {
    fn record(&mut self, record: &PassRecord) {
        self.push(*record);
    }
}

/// One sweep entry as written to the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub threads: usize,
    pub elapsed_seconds: f64,
    /// First entry's time divided by this one's; `None` for a zero-length pass.
    pub speedup: Option<f64>,
}

/// Machine-readable summary of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub entries: Vec<ReportEntry>,
}

impl SweepReport {
    pub fn new(
        input_path: &Path,
        output_path: &Path,
        dims: ImageDimensions,
        records: &[PassRecord],
    ) -> Self {
        let base = records.first().map(PassRecord::elapsed_secs).unwrap_or(0.0);
        Self {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            width: dims.width,
            height: dims.height,
            entries: records
                .iter()
                .map(|r| {
                    let elapsed_seconds = r.elapsed_secs();
                    ReportEntry {
                        threads: r.worker_count,
                        elapsed_seconds,
                        speedup: (elapsed_seconds > 0.0).then(|| base / elapsed_seconds),
                    }
                })
                .collect(),
        }
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SobelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(worker_count: usize, millis: u64) -> PassRecord {
        PassRecord {
            worker_count,
            elapsed: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_format_record_matches_reference_line() {
        assert_eq!(
            format_record(&record(4, 250)),
            "Number of threads: 4, Elapsed time is: 0.25 seconds"
        );
        assert_eq!(
            format_record(&record(1, 2000)),
            "Number of threads: 1, Elapsed time is: 2 seconds"
        );
        let precise = PassRecord {
            worker_count: 8,
            elapsed: Duration::from_nanos(12_345_678),
        };
        assert_eq!(
            format_record(&precise),
            "Number of threads: 8, Elapsed time is: 0.0123457 seconds"
        );
    }

    #[test]
    fn test_seconds_use_six_significant_digits() {
        assert_eq!(format_significant(0.0), "0");
        assert_eq!(format_significant(0.012345678912), "0.0123457");
        assert_eq!(format_significant(1.5), "1.5");
        assert_eq!(format_significant(123.4567891), "123.457");
        assert_eq!(format_significant(9.9999996), "10");
        assert_eq!(format_significant(0.0001), "0.0001");
        assert_eq!(format_significant(0.0000123456), "1.23456e-05");
        assert_eq!(format_significant(1234567.0), "1.23457e+06");
    }

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<PassRecord> = Vec::new();
        for (n, ms) in [(1, 40), (2, 20), (4, 10)] {
            sink.record(&record(n, ms));
        }
        let counts: Vec<usize> = sink.iter().map(|r| r.worker_count).collect();
        assert_eq!(counts, vec![1, 2, 4]);
    }

    #[test]
    fn test_speedups_relative_to_first_entry() {
        let records = [record(1, 400), record(2, 200), record(4, 100)];
        let report = SweepReport::new(
            Path::new("in.raw"),
            Path::new("out.raw"),
            ImageDimensions::new(8, 8),
            &records,
        );
        let speedups: Vec<f64> = report.entries.iter().filter_map(|e| e.speedup).collect();
        assert_eq!(speedups.len(), 3);
        assert!((speedups[0] - 1.0).abs() < 1e-12);
        assert!((speedups[1] - 2.0).abs() < 1e-12);
        assert!((speedups[2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_length_pass_has_no_speedup() {
        let report = SweepReport::new(
            Path::new("in.raw"),
            Path::new("out.raw"),
            ImageDimensions::new(2, 2),
            &[record(1, 10), record(2, 0)],
        );
        assert_eq!(report.entries[0].speedup, Some(1.0));
        assert_eq!(report.entries[1].speedup, None);
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = SweepReport::new(
            Path::new("in.raw"),
            Path::new("out.raw"),
            ImageDimensions::new(3, 2),
            &[record(1, 500), record(8, 250)],
        );
        let path = common::test_utils::test_output_path("sobel_report_round_trip.json");
        report.write_json(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: SweepReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }
}
