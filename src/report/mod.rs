//! Report generation for load results
//!
//! - **JSON**: Machine-readable format for programmatic consumption
//! - **CSV**: Spreadsheet-compatible format for bulk listings
//!
//! # Usage
//!
//! ```ignore
//! use mp3meta::report;
//!
//! // Automatically picks format based on extension
//! report::generate("report.json", &results)?;  // JSON
//! report::generate("report.csv", &results)?;   // CSV
//! ```

pub mod csv;
pub mod json;

use crate::loader::LoadResult;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Generate a report in the appropriate format based on file extension
pub fn generate<P: AsRef<Path>>(path: P, results: &[LoadResult]) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "json" => json::write(&mut file, results),
        _ => csv::write(&mut file, results),
    }
}

/// Summary statistics for a batch of results
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub ok: usize,
    pub error: usize,
    /// Sum of durations of the files that loaded
    pub total_duration: f64,
}

impl Summary {
    pub fn from_results(results: &[LoadResult]) -> Self {
        let mut summary = Self::default();
        summary.total = results.len();

        for r in results {
            match r.metadata {
                Some(ref meta) => {
                    summary.ok += 1;
                    summary.total_duration += meta.duration;
                }
                None => summary.error += 1,
            }
        }

        summary
    }
}
