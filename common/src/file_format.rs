use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum FileFormatError {
    #[error("Failed to get file extension for: {0}")]
    MissingFileExtension(String),
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

pub type FileFormatResult<T> = Result<T, FileFormatError>;

/// Text formats a settings file may be written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerdeFormat {
    Yaml,
    Json,
}

impl SerdeFormat {
    pub fn from_path(path: &Path) -> FileFormatResult<Self> {
        let display = path.display().to_string();
        let ext = path
            .extension()
            .and_then(|os_str| os_str.to_str())
            .ok_or_else(|| FileFormatError::MissingFileExtension(display.clone()))?;

        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Ok(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(FileFormatError::UnsupportedFileExtension(display))
        }
    }

    pub fn serialize<T: Serialize>(self, value: &T) -> FileFormatResult<String> {
        Ok(match self {
            Self::Yaml => serde_yml::to_string(value)?,
            Self::Json => serde_json::to_string_pretty(value)?,
        })
    }

    pub fn deserialize<T: DeserializeOwned>(self, text: &str) -> FileFormatResult<T> {
        Ok(match self {
            Self::Yaml => serde_yml::from_str(text)?,
            Self::Json => serde_json::from_str(text)?,
        })
    }
}
