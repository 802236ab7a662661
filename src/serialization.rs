//! Output writers for loaded test suites.
//!
//! Suites are written either as one JSON array or as NDJSON, one suite per
//! line.

use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

use crate::suite::TestSuite;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON array holding every suite
    #[default]
    Json,
    /// One JSON object per line
    Ndjson,
}

/// Write `suites` to `writer` in the requested format.
///
/// JSON output is a single array followed by a newline; NDJSON output is one
/// suite object per line. The writer is flushed before returning.
pub fn write_suites<W: Write>(
    mut writer: W,
    suites: &[TestSuite],
    format: OutputFormat,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut writer, suites)?;
            writeln!(writer)?;
        }
        OutputFormat::Ndjson => {
            for suite in suites {
                serde_json::to_writer(&mut writer, suite)?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
