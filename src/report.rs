//! CSV report artifact

use crate::error::Result;
use crate::types::SequenceRecord;
use std::path::Path;

/// Write the tabular summary: one header row then one row per record, in
/// the exact order the records were received (no sorting).
///
/// Creates or overwrites the file at `path`.
///
/// # Errors
///
/// Write failures propagate as [`Error::Csv`](crate::error::Error::Csv) or
/// [`Error::Io`](crate::error::Error::Io); there is no recovery here.
pub fn write_csv(records: &[SequenceRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Accession", "Length", "Description"])?;
    for record in records {
        writer.write_record([
            record.accession.as_str(),
            &record.length.to_string(),
            record.description.as_str(),
        ])?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = records.len(), "CSV report written");
    Ok(())
}
