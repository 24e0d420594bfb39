//! CSV export of a follower series.
//!
//! Output is UTF-8 with a byte-order mark so spreadsheet tools pick the
//! right encoding, a `time,followers` header, and one row per sample.

use csv::Writer;
use fwatch_common::{format_timestamp, FwatchError, Result, Sample};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// UTF-8 byte-order mark written before the header.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes samples as CSV.
#[derive(Debug, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Creates an exporter.
    pub fn new() -> Self {
        Self
    }

    /// Writes the BOM, header and rows to `writer`.
    pub fn write<W: Write>(&self, mut writer: W, samples: &[Sample]) -> Result<()> {
        if samples.is_empty() {
            return Err(FwatchError::export("No data to export"));
        }

        writer
            .write_all(UTF8_BOM)
            .map_err(|e| FwatchError::export_with_source("Failed to write CSV", e))?;

        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(["time", "followers"])
            .map_err(|e| FwatchError::export_with_source("Failed to write CSV header", e))?;

        for sample in samples {
            wtr.write_record([
                format_timestamp(&sample.timestamp),
                sample.followers.to_string(),
            ])
            .map_err(|e| FwatchError::export_with_source("Failed to write CSV row", e))?;
        }

        wtr.flush()
            .map_err(|e| FwatchError::export_with_source("Failed to write CSV", e))?;
        Ok(())
    }

    /// Renders the CSV document in memory.
    pub fn export(&self, samples: &[Sample]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, samples)?;
        Ok(buffer)
    }

    /// Writes the CSV document to `path`, replacing any existing file.
    pub fn export_to_file(&self, samples: &[Sample], path: &Path) -> Result<()> {
        if samples.is_empty() {
            return Err(FwatchError::export("No data to export"));
        }

        let file = File::create(path).map_err(|e| {
            FwatchError::export_with_source(format!("Cannot create {}", path.display()), e)
        })?;
        self.write(BufWriter::new(file), samples)?;

        info!("Exported {} samples to {:?}", samples.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, TimeZone};

    fn samples() -> Vec<Sample> {
        let start = Local.with_ymd_and_hms(2024, 2, 29, 23, 59, 30).unwrap();
        vec![
            Sample::new(start, 1000),
            Sample::new(start + Duration::seconds(60), 1002),
        ]
    }

    #[test]
    fn test_export_layout() {
        let bytes = CsvExporter::new().export(&samples()).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "time,followers",
                "2024-02-29 23:59:30,1000",
                "2024-03-01 00:00:30,1002"
            ]
        );
    }

    #[test]
    fn test_empty_export_refused() {
        let err = CsvExporter::new().export(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Export error: No data to export");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("followers.csv");
        CsvExporter::new().export_to_file(&samples(), &path).unwrap();

        let content = std::fs::read(&path).unwrap();
        assert!(content.starts_with(UTF8_BOM));
        assert!(String::from_utf8_lossy(&content).contains("2024-02-29 23:59:30,1000"));
    }

    #[test]
    fn test_unwritable_path_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("followers.csv");
        let err = CsvExporter::new().export_to_file(&samples(), &path).unwrap_err();
        assert!(matches!(err, FwatchError::Export { .. }));
    }
}
