// Artifact output: directory preparation and the CodeSystem writer

pub mod codesystem_xml;

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::common::error::{Result, ScraperError};

pub use codesystem_xml::{render_codesystem, write_codesystem};

/// Create the output directory (and parents) if it does not exist yet.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| ScraperError::OutputDir {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "created output directory");
    Ok(())
}
