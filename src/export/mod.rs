//! CSV export of a score result.
//!
//! The file starts with a UTF-8 byte order mark so spreadsheet tools pick the
//! right encoding for non-ASCII text, and its name carries a timestamp to the
//! second.

use crate::reference::Dimension;
use crate::scoring::ScoreResult;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, TimeZone};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXPORT_COLUMNS: [&str; 3] = ["dimension", "score_mean", "score_percent"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One row of the exported table
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub dimension: Dimension,
    pub score_mean: f64,
    pub score_percent: f64,
}

/// The four rows of the export, in canonical order
pub fn export_table(result: &ScoreResult) -> Vec<ExportRow> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| ExportRow {
            dimension,
            score_mean: result.means().get(dimension),
            score_percent: result.normalized().get(dimension),
        })
        .collect()
}

/// Encode the result as BOM-prefixed UTF-8 CSV
pub fn encode_csv(result: &ScoreResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(EXPORT_COLUMNS)?;
    for row in export_table(result) {
        writer.write_record([
            row.dimension.display_name().to_string(),
            format_float(row.score_mean),
            format_float(row.score_percent),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e.error()))
}

/// File name for an export taken at `timestamp`, e.g. `popa_scores_20250101_093000.csv`
pub fn export_filename<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("popa_scores_{}.csv", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Write the export into `dir` atomically and return the file path.
///
/// Creates `dir` if it does not exist.
pub fn write_export<Tz: TimeZone>(
    dir: &Path,
    result: &ScoreResult,
    timestamp: &DateTime<Tz>,
) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory at {}", dir.display()))?;
    }

    let path = dir.join(export_filename(timestamp));
    let bytes = encode_csv(result)?;

    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;
    file.commit().context("Failed to save export")?;

    info!("Exported scores to {}", path.display());
    Ok(path)
}

/// Shortest round-trip rendering that always keeps a decimal point
/// (`4.0`, `75.0`, `-25.0`, `3.3333333333333335`).
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::types::tests::sample_reference;
    use crate::scoring::{answers_from_responses, compute_scores, Answer};
    use chrono::{Local, Utc};
    use pretty_assertions::assert_eq;

    fn result_all(response: i64) -> ScoreResult {
        let reference = sample_reference();
        let responses = vec![response; reference.questions().len()];
        compute_scores(&answers_from_responses(reference.questions(), &responses).unwrap())
    }

    #[test]
    fn test_export_table_canonical_order() {
        let rows = export_table(&result_all(4));
        let dims: Vec<_> = rows.iter().map(|r| r.dimension).collect();
        assert_eq!(dims, Dimension::ALL.to_vec());
        assert!(rows.iter().all(|r| r.score_mean == 4.0 && r.score_percent == 75.0));
    }

    #[test]
    fn test_encode_csv_bom_header_and_rows() {
        let bytes = encode_csv(&result_all(4)).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text,
            "dimension,score_mean,score_percent\n\
             Outcome,4.0,75.0\n\
             Relation,4.0,75.0\n\
             Process,4.0,75.0\n\
             Value,4.0,75.0\n"
        );
    }

    #[test]
    fn test_encode_csv_keeps_negative_fallback() {
        let answers = vec![Answer::new(Dimension::Outcome, 5).unwrap()];
        let bytes = encode_csv(&compute_scores(&answers)).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Outcome,5.0,100.0"));
        assert!(text.contains("Value,0.0,-25.0"));
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(4.0), "4.0");
        assert_eq!(format_float(-25.0), "-25.0");
        assert_eq!(format_float(87.5), "87.5");
        assert_eq!(format_float(10.0 / 3.0), "3.3333333333333335");
    }

    #[test]
    fn test_export_filename_to_the_second() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(export_filename(&ts), "popa_scores_20250307_090502.csv");
    }

    #[test]
    fn test_write_export_creates_dir_and_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("exports");
        let now = Local::now();

        let path = write_export(&target, &result_all(3), &now).unwrap();
        assert_eq!(path.parent().unwrap(), target.as_path());
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            export_filename(&now)
        );

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        assert!(String::from_utf8_lossy(&bytes).contains("Relation,3.0,50.0"));
    }
}
