//! Deterministic rendering of violation records into report rows

use crate::types::ViolationRecord;

/// Column headers for the violation report, in field order
pub const REPORT_HEADER: [&str; 5] = [
    "User",
    "Unauthorized Privilege Escalation",
    "Toxic Privileges",
    "SoD Violation",
    "Conflicting Roles",
];

/// Secondary delimiter joining list fields inside a row
const LIST_SEPARATOR: &str = ";";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Render a record into its five report fields
///
/// List fields join on the separator with no trailing delimiter and stay
/// empty when the matching flag is "No". Field order and format are
/// fixed; row order across identities is the pipeline's concern.
pub fn render(record: &ViolationRecord) -> [String; 5] {
    let toxic = record
        .toxic_privileges
        .iter()
        .cloned()
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR);
    let conflicts = record
        .conflicting_pairs
        .iter()
        .map(|pair| pair.to_string())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR);

    [
        record.identity.clone(),
        yes_no(record.has_escalation()).to_string(),
        toxic,
        yes_no(record.has_conflict()).to_string(),
        conflicts,
    ]
}
