//! Run log files: `log_<date>.json` per run plus a rolling `log.json`.

use std::path::Path;

use newsflow_core::errors::{NewsflowResult, StorageError};
use newsflow_core::models::RunReport;

/// Serialise the report under `log_path`, creating the directory on
/// first use.
pub fn write_run_log(log_path: &Path, date: &str, report: &RunReport) -> NewsflowResult<()> {
    std::fs::create_dir_all(log_path).map_err(|e| StorageError::OutputUnwritable {
        path: log_path.display().to_string(),
        reason: e.to_string(),
    })?;

    let payload = serde_json::to_string(report).map_err(|e| StorageError::OutputUnwritable {
        path: log_path.display().to_string(),
        reason: e.to_string(),
    })?;

    for name in [format!("log_{date}.json"), "log.json".to_string()] {
        let path = log_path.join(&name);
        std::fs::write(&path, &payload).map_err(|e| StorageError::OutputUnwritable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}
