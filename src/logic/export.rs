use crate::error::{AgroError, Result};
use crate::models::DayRecord;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Write report rows to a new CSV file under `output_dir`.
///
/// Each call gets its own file name, so concurrent exports never share an artifact.
/// Columns follow `DayRecord` field order with a single header row.
pub fn export_csv(records: &[DayRecord], output_dir: &Path) -> Result<PathBuf> {
    if records.is_empty() {
        return Err(AgroError::EmptyExport);
    }

    // Render fully before touching disk so a failed row never leaves a partial file
    let mut writer = csv::Writer::from_writer(vec![]);
    for record in records {
        writer.serialize(record)?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| AgroError::Io(e.into_error()))?;

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("forecast-{}.csv", Uuid::new_v4()));
    std::fs::write(&path, data)?;

    tracing::info!(path = %path.display(), rows = records.len(), "Exported forecast report");
    Ok(path)
}
