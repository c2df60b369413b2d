//! Violation report output

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use rolescope_engine::{report, ViolationRecord};
use std::path::Path;

/// Write the report in the configured format
pub fn write_report(path: &Path, format: OutputFormat, records: &[ViolationRecord]) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(path, records),
        OutputFormat::Json => write_json(path, records),
    }
}

/// Header row followed by one rendered row per record
fn write_csv(path: &Path, records: &[ViolationRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;

    writer
        .write_record(report::REPORT_HEADER)
        .context("Failed to write report header")?;
    for record in records {
        writer
            .write_record(report::render(record))
            .with_context(|| format!("Failed to write report row for {}", record.identity))?;
    }
    writer.flush().context("Failed to flush report")?;

    Ok(())
}

fn write_json(path: &Path, records: &[ViolationRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    serde_json::to_writer_pretty(file, records).context("Failed to serialize report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolescope_engine::RolePair;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn sample_records() -> Vec<ViolationRecord> {
        vec![
            ViolationRecord {
                identity: "alice".to_string(),
                toxic_privileges: BTreeSet::from(["pay".to_string()]),
                conflicting_pairs: vec![RolePair::new("Admin", "Approver")],
            },
            ViolationRecord {
                identity: "carol".to_string(),
                toxic_privileges: BTreeSet::new(),
                conflicting_pairs: vec![RolePair::new("Payer", "Auditor")],
            },
        ]
    }

    #[test]
    fn test_csv_report_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analysis_result.csv");

        write_report(&path, OutputFormat::Csv, &sample_records()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "User,Unauthorized Privilege Escalation,Toxic Privileges,SoD Violation,Conflicting Roles"
        );
        assert_eq!(lines[1], "alice,Yes,pay,Yes,Admin-Approver");
        assert_eq!(lines[2], "carol,No,,Yes,Payer-Auditor");
    }

    #[test]
    fn test_json_report_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analysis_result.json");
        let records = sample_records();

        write_report(&path, OutputFormat::Json, &records).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<ViolationRecord> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_unwritable_destination_is_an_error() {
        let result = write_report(
            Path::new("/nonexistent/report.csv"),
            OutputFormat::Csv,
            &sample_records(),
        );
        assert!(result.is_err());
    }
}
