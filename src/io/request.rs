//! Read request payloads (single JSON documents or NDJSON batches).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Read one JSON document (e.g. an `ApplicantProfile`).
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open request JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid request JSON '{}': {e}", path.display())))
}

/// Read an NDJSON file, one request per non-blank line.
///
/// Lines that fail to parse are returned as `Err(message)` in place, so a batch
/// reports them alongside the requests that did parse.
pub fn read_ndjson<T: DeserializeOwned>(path: &Path) -> Result<Vec<Result<T, String>>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open batch file '{}': {e}", path.display())))?;

    let mut out = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| AppError::new(2, format!("Failed to read batch line {}: {e}", idx + 1)))?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line).map_err(|e| format!("line {}: {e}", idx + 1)));
    }
    Ok(out)
}
