//! Filter a raw grayscale image and time one pass per worker count.
//!
//! Usage: `sobel-sweep [settings.yaml|settings.json]`. Without an argument the
//! built-in defaults are used.

use std::path::PathBuf;

use anyhow::{Context, Result};
use common::log_setup::setup_logging;
use sobel::{SobelConfig, StdoutReport};

fn main() -> Result<()> {
    setup_logging("info");

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => SobelConfig::load(&path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => SobelConfig::default(),
    };

    let summary = sobel::run(&config, &mut StdoutReport).context("sobel sweep failed")?;
    tracing::info!(
        "Finished {} passes over a {}x{} image",
        summary.records.len(),
        summary.dimensions.width,
        summary.dimensions.height
    );

    Ok(())
}
