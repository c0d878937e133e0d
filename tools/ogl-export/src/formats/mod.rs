//! Output formats
//!
//! The only format is the C/C++ array header written by [`header`].

pub mod header;

use std::io::Write;
use std::path::Path;

use serde::Deserialize;

use crate::bundle::ExportBundle;
use crate::error::ExportError;

pub use header::{render_header, write_header};

/// How float literals are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FloatFormat {
    /// Shortest representation that reads back to the same value (`0.5f`)
    #[default]
    Shortest,
    /// Six fixed decimals (`0.500000f`)
    #[value(name = "fixed")]
    #[serde(rename = "fixed")]
    Fixed6,
}

/// Emitter settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    pub float_format: FloatFormat,
}

/// Write a complete header document to `output`
///
/// The document is rendered in memory, written to a temporary file next to
/// `output` and then renamed over it, so a failed export never leaves a
/// truncated header behind.
pub fn save_header(
    output: &Path,
    bundles: &[ExportBundle],
    options: &EmitOptions,
) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: output.to_path_buf(),
        source,
    };

    let file_name = output.to_string_lossy();
    let document = render_header(&file_name, bundles, options);

    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(document.as_bytes()).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(output).map_err(|e| io_err(e.error))?;

    tracing::info!(
        "Wrote {:?}: {} objects, {} bytes",
        output,
        bundles.len(),
        document.len()
    );
    Ok(())
}
