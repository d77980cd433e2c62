//! Utility functions for derived output paths

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Timestamp layout used in derived artifact names
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build the shared basename `taxid_<id>_<timestamp>` for one run's
/// artifacts
pub fn output_basename(taxon_id: &str, timestamp: DateTime<Local>) -> String {
    format!("taxid_{}_{}", taxon_id, timestamp.format(TIMESTAMP_FORMAT))
}

/// Derive the CSV and PNG artifact paths for a run started now
pub fn artifact_paths(out_dir: &Path, taxon_id: &str) -> (PathBuf, PathBuf) {
    let base = output_basename(taxon_id, Local::now());
    (
        out_dir.join(format!("{base}.csv")),
        out_dir.join(format!("{base}.png")),
    )
}
