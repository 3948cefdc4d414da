//! Dataset loader
//!
//! Reads the full county dataset from a JSON file once at startup. The
//! interpreter treats the loaded sequence as opaque and never goes back to
//! disk.

use super::CountyRecord;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load all county records from a JSON array at `path`.
///
/// Any I/O or parse failure is fatal to the run; there is no partial load.
pub fn load_counties(path: &Path) -> Result<Vec<CountyRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Unable to open dataset file '{}'", path.display()))?;

    let records: Vec<CountyRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Malformed dataset file '{}'", path.display()))?;

    debug!("loaded {} county records from {}", records.len(), path.display());
    Ok(records)
}
