//! CSV loaders for the five relation tables
//!
//! The engine assumes well-formed tables; malformed rows are this
//! module's problem and are skipped with a warning before they reach it.
//! Every table has a header row, which the reader consumes.

use crate::config::InputsSection;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use rolescope_engine::{RelationStore, RelationStoreBuilder};
use std::path::Path;
use tracing::warn;

/// Secondary delimiter inside the grants table's privilege column
const PRIVILEGE_SEPARATOR: char = ';';

/// Load all five relation tables into a ready-to-evaluate store
pub fn load_store(inputs: &InputsSection) -> Result<RelationStore> {
    let mut builder = RelationStore::builder();

    load_assignments(&inputs.assignments, &mut builder)?;
    load_grants(&inputs.grants, &mut builder)?;
    load_sod(&inputs.sod, &mut builder)?;
    load_toxic(&inputs.toxic, &mut builder)?;
    load_hierarchy(&inputs.hierarchy, &mut builder)?;

    Ok(builder.build())
}

/// Identity→role assignments: `identity, role [, role ...]`
pub fn load_assignments(path: &Path, builder: &mut RelationStoreBuilder) -> Result<()> {
    for record in records(path, "assignments")? {
        let Some(identity) = field(&record, 0) else {
            warn!(table = "assignments", "skipping row with no identity");
            continue;
        };
        for role in record.iter().skip(1) {
            let role = role.trim();
            if !role.is_empty() {
                builder.assign(identity, role)?;
            }
        }
    }
    Ok(())
}

/// Role→privilege grants: `role, privilege[;privilege...]`
pub fn load_grants(path: &Path, builder: &mut RelationStoreBuilder) -> Result<()> {
    for record in records(path, "grants")? {
        let Some(role) = field(&record, 0) else {
            warn!(table = "grants", "skipping row with no role");
            continue;
        };
        let Some(privileges) = field(&record, 1) else {
            warn!(table = "grants", role, "skipping grant row with no privileges");
            continue;
        };
        for privilege in privileges.split(PRIVILEGE_SEPARATOR) {
            let privilege = privilege.trim();
            if !privilege.is_empty() {
                builder.grant(role, privilege)?;
            }
        }
    }
    Ok(())
}

/// Separation-of-duties policy: `roleA, roleB`
pub fn load_sod(path: &Path, builder: &mut RelationStoreBuilder) -> Result<()> {
    for record in records(path, "sod")? {
        let (Some(first), Some(second)) = (field(&record, 0), field(&record, 1)) else {
            warn!(table = "sod", "skipping pair row with a missing role");
            continue;
        };
        if first == second {
            warn!(table = "sod", role = first, "skipping self-conflicting pair");
            continue;
        }
        builder.forbid(first, second)?;
    }
    Ok(())
}

/// Toxic privileges: `privilege`
pub fn load_toxic(path: &Path, builder: &mut RelationStoreBuilder) -> Result<()> {
    for record in records(path, "toxic")? {
        let Some(privilege) = field(&record, 0) else {
            warn!(table = "toxic", "skipping row with no privilege");
            continue;
        };
        builder.mark_toxic(privilege)?;
    }
    Ok(())
}

/// Role hierarchy: `parentRole, childRole`
pub fn load_hierarchy(path: &Path, builder: &mut RelationStoreBuilder) -> Result<()> {
    for record in records(path, "hierarchy")? {
        let (Some(parent), Some(child)) = (field(&record, 0), field(&record, 1)) else {
            warn!(table = "hierarchy", "skipping edge row with a missing role");
            continue;
        };
        builder.inherit(parent, child)?;
    }
    Ok(())
}

/// Open a table and iterate its data rows, dropping unreadable ones
fn records(path: &Path, table: &'static str) -> Result<impl Iterator<Item = StringRecord>> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open input table {}", path.display()))?;

    Ok(reader
        .into_records()
        .filter_map(move |result| match result {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(table, %err, "skipping unreadable row");
                None
            }
        }))
}

fn field<'r>(record: &'r StringRecord, index: usize) -> Option<&'r str> {
    let value = record.get(index)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_assignments_are_variable_arity() {
        let file = table("User,Roles\nalice,Admin,Approver\nbob,Viewer\n");
        let mut builder = RelationStore::builder();
        load_assignments(file.path(), &mut builder).unwrap();

        let store = builder.build();
        assert_eq!(store.assigned_roles("alice").count(), 2);
        assert_eq!(store.assigned_roles("bob").count(), 1);
    }

    #[test]
    fn test_grants_split_on_secondary_delimiter() {
        let file = table("Role,Privileges\nAdmin,approve;pay\nViewer,view\n");
        let mut builder = RelationStore::builder();
        load_grants(file.path(), &mut builder).unwrap();

        let store = builder.build();
        let mut privileges: Vec<_> = store.direct_privileges("Admin").cloned().collect();
        privileges.sort();
        assert_eq!(privileges, vec!["approve", "pay"]);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let file = table("Role,Privileges\n,orphaned\nAdmin,\nViewer,view\n");
        let mut builder = RelationStore::builder();
        load_grants(file.path(), &mut builder).unwrap();

        let store = builder.build();
        assert_eq!(store.direct_privileges("Viewer").count(), 1);
        assert_eq!(store.direct_privileges("Admin").count(), 0);
    }

    #[test]
    fn test_self_conflicting_sod_row_is_skipped() {
        let file = table("RoleA,RoleB\nAdmin,Admin\nAdmin,Approver\n");
        let mut builder = RelationStore::builder();
        load_sod(file.path(), &mut builder).unwrap();

        assert_eq!(builder.build().sod_pairs().count(), 1);
    }

    #[test]
    fn test_header_row_is_not_data() {
        let file = table("Privilege\npay\n");
        let mut builder = RelationStore::builder();
        load_toxic(file.path(), &mut builder).unwrap();

        let store = builder.build();
        assert!(store.is_toxic("pay"));
        assert!(!store.is_toxic("Privilege"));
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let mut builder = RelationStore::builder();
        assert!(load_hierarchy(Path::new("/nonexistent/edges.csv"), &mut builder).is_err());
    }

    #[test]
    fn test_full_store_load() {
        let assignments = table("User,Roles\nalice,Admin\n");
        let grants = table("Role,Privileges\nAdmin,approve;pay\nApprover,approve\n");
        let sod = table("RoleA,RoleB\nAdmin,Approver\n");
        let toxic = table("Privilege\npay\n");
        let hierarchy = table("Parent,Child\nAdmin,Approver\n");

        let inputs = InputsSection {
            assignments: assignments.path().to_path_buf(),
            grants: grants.path().to_path_buf(),
            sod: sod.path().to_path_buf(),
            toxic: toxic.path().to_path_buf(),
            hierarchy: hierarchy.path().to_path_buf(),
        };

        let store = load_store(&inputs).unwrap();
        let summary = store.summary();
        assert_eq!(summary.identities, 1);
        assert_eq!(summary.roles, 2);
        assert_eq!(summary.hierarchy_edges, 1);
        assert_eq!(summary.toxic_privileges, 1);
        assert_eq!(summary.sod_pairs, 1);
    }
}
