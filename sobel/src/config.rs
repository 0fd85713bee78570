use std::path::{Path, PathBuf};

use common::file_format::SerdeFormat;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SobelError};
use crate::image::ImageDimensions;
use crate::raw_io::ByteConversion;

pub const DEFAULT_INPUT_PATH: &str = "../data/zebra-gray-int8-4x";
pub const DEFAULT_OUTPUT_PATH: &str = "../data/processed-raw-int8-4x-cpu.dat";
pub const DEFAULT_WIDTH: usize = 7112;
pub const DEFAULT_HEIGHT: usize = 5146;
pub const DEFAULT_MAX_WORKERS: usize = 16;

/// Settings for one end-to-end filtering run.
///
/// Every field has a default, so a settings file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SobelConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub width: usize,
    pub height: usize,
    /// Sweep order. The output file holds the result of the last entry.
    pub worker_counts: Vec<usize>,
    pub byte_conversion: ByteConversion,
    /// Where to write the JSON timing report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl Default for SobelConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            worker_counts: powers_of_two(DEFAULT_MAX_WORKERS),
            byte_conversion: ByteConversion::default(),
            report_path: None,
        }
    }
}

/// `1, 2, 4, ...` up to and including `max` (if `max` is a power of two).
pub fn powers_of_two(max: usize) -> Vec<usize> {
    std::iter::successors(Some(1usize), |n| n.checked_mul(2))
        .take_while(|&n| n <= max)
        .collect()
}

impl SobelConfig {
    /// Load settings from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let config_err = |source| SobelError::Config {
            path: path.to_path_buf(),
            source,
        };

        let format = SerdeFormat::from_path(path).map_err(config_err)?;
        let text = std::fs::read_to_string(path).map_err(|source| SobelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = format.deserialize(&text).map_err(config_err)?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        self.dimensions().validate()?;
        if self.worker_counts.is_empty() {
            return Err(SobelError::EmptySweep);
        }
        if let Some(&bad) = self.worker_counts.iter().find(|&&n| n == 0) {
            return Err(SobelError::InvalidWorkerCount(bad));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::file_format::FileFormatError;
    use common::test_utils::test_output_path;

    #[test]
    fn test_powers_of_two() {
        assert_eq!(powers_of_two(16), vec![1, 2, 4, 8, 16]);
        assert_eq!(powers_of_two(12), vec![1, 2, 4, 8]);
        assert_eq!(powers_of_two(1), vec![1]);
        assert!(powers_of_two(0).is_empty());
        assert_eq!(powers_of_two(usize::MAX).len(), usize::BITS as usize);
    }

    #[test]
    fn test_default_matches_reference_run() {
        let config = SobelConfig::default();
        assert_eq!(config.dimensions(), ImageDimensions::new(7112, 5146));
        assert_eq!(config.worker_counts, vec![1, 2, 4, 8, 16]);
        assert_eq!(config.byte_conversion, ByteConversion::Wrapping);
        assert!(config.report_path.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = SobelConfig::default();
        config.worker_counts = vec![1, 0, 4];
        assert!(matches!(
            config.validate(),
            Err(SobelError::InvalidWorkerCount(0))
        ));

        config.worker_counts.clear();
        assert!(matches!(config.validate(), Err(SobelError::EmptySweep)));

        let config = SobelConfig {
            height: 0,
            ..SobelConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SobelError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_load_partial_yaml_keeps_defaults() {
        let path = test_output_path("sobel_config_partial.yaml");
        std::fs::write(
            &path,
            "width: 64\nheight: 32\nworker_counts: [1, 3]\nbyte_conversion: saturating\n",
        )
        .unwrap();

        let config = SobelConfig::load(&path).unwrap();
        assert_eq!(config.dimensions(), ImageDimensions::new(64, 32));
        assert_eq!(config.worker_counts, vec![1, 3]);
        assert_eq!(config.byte_conversion, ByteConversion::Saturating);
        assert_eq!(config.input_path, PathBuf::from(DEFAULT_INPUT_PATH));
    }

    #[test]
    fn test_load_json() {
        let path = test_output_path("sobel_config.json");
        let written = SobelConfig {
            input_path: PathBuf::from("in.raw"),
            output_path: PathBuf::from("out.raw"),
            width: 10,
            height: 20,
            worker_counts: vec![2, 1],
            byte_conversion: ByteConversion::Saturating,
            report_path: Some(PathBuf::from("report.json")),
        };
        let text = SerdeFormat::Json.serialize(&written).unwrap();
        std::fs::write(&path, text).unwrap();

        assert_eq!(SobelConfig::load(&path).unwrap(), written);
    }

    #[test]
    fn test_load_errors() {
        let err = SobelConfig::load(Path::new("settings.toml")).unwrap_err();
        assert!(matches!(
            err,
            SobelError::Config {
                source: FileFormatError::UnsupportedFileExtension(_),
                ..
            }
        ));

        let missing = test_output_path("sobel_config_missing.yaml");
        let _ = std::fs::remove_file(&missing);
        assert!(matches!(
            SobelConfig::load(&missing),
            Err(SobelError::Io { .. })
        ));

        let broken = test_output_path("sobel_config_broken.json");
        std::fs::write(&broken, "{ \"width\": \"wide\" }").unwrap();
        assert!(matches!(
            SobelConfig::load(&broken),
            Err(SobelError::Config {
                source: FileFormatError::Json(_),
                ..
            })
        ));
    }
}
