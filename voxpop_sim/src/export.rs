//! JSON export of session reports.

use crate::runner::SessionReport;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Writes a session report as pretty-printed JSON.
pub fn write_report(report: &SessionReport, path: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    info!(path = %path.display(), "report exported");
    Ok(())
}
