//! Immutable relation tables backing an analysis run

use crate::error::{EngineError, Result};
use crate::types::{IdentityId, PrivilegeId, RoleId, RolePair};
use std::collections::{HashMap, HashSet};

/// Immutable-after-build relation tables
///
/// Holds the five relations an audit run consumes: role→privilege grants,
/// the role hierarchy, identity→role assignments, the toxic privilege
/// set, and the separation-of-duties pair set. Built once through
/// [`RelationStoreBuilder`] and shared read-only across evaluation
/// workers; no operation mutates state after `build`.
///
/// Unknown identifiers are not errors: a role mentioned in the hierarchy
/// but never granted anything simply contributes no privileges.
#[derive(Debug, Default)]
pub struct RelationStore {
    role_privileges: HashMap<RoleId, HashSet<PrivilegeId>>,
    role_children: HashMap<RoleId, HashSet<RoleId>>,
    identity_roles: HashMap<IdentityId, HashSet<RoleId>>,
    toxic_privileges: HashSet<PrivilegeId>,
    sod_pairs: HashSet<RolePair>,
}

impl RelationStore {
    /// Start building a new store
    pub fn builder() -> RelationStoreBuilder {
        RelationStoreBuilder::default()
    }

    /// Privileges directly granted by a role; empty for unknown roles
    pub fn direct_privileges<'a>(&'a self, role: &str) -> impl Iterator<Item = &'a PrivilegeId> {
        self.role_privileges.get(role).into_iter().flatten()
    }

    /// Child roles a role inherits privileges from; empty for roles with
    /// no hierarchy entry
    pub fn children<'a>(&'a self, role: &str) -> impl Iterator<Item = &'a RoleId> {
        self.role_children.get(role).into_iter().flatten()
    }

    /// Roles directly assigned to an identity; empty for unassigned ones
    pub fn assigned_roles<'a>(&'a self, identity: &str) -> impl Iterator<Item = &'a RoleId> {
        self.identity_roles.get(identity).into_iter().flatten()
    }

    /// Every identity with at least one role assignment
    pub fn identities(&self) -> impl Iterator<Item = &IdentityId> {
        self.identity_roles.keys()
    }

    /// Membership test for the toxic privilege set
    pub fn is_toxic(&self, privilege: &str) -> bool {
        self.toxic_privileges.contains(privilege)
    }

    /// Membership test for the separation-of-duties policy; matches
    /// either orientation of the pair
    pub fn is_forbidden(&self, pair: &RolePair) -> bool {
        self.sod_pairs.contains(pair)
    }

    /// Every forbidden role pair in the policy
    pub fn sod_pairs(&self) -> impl Iterator<Item = &RolePair> {
        self.sod_pairs.iter()
    }

    /// Table sizes, for run logging
    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            roles: self.role_privileges.len(),
            identities: self.identity_roles.len(),
            hierarchy_edges: self.role_children.values().map(|children| children.len()).sum(),
            toxic_privileges: self.toxic_privileges.len(),
            sod_pairs: self.sod_pairs.len(),
        }
    }
}

/// Sizes of the loaded relation tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSummary {
    /// Roles with at least one direct grant
    pub roles: usize,
    /// Identities with at least one assignment
    pub identities: usize,
    /// Total parent→child hierarchy edges
    pub hierarchy_edges: usize,
    /// Privileges flagged as toxic
    pub toxic_privileges: usize,
    /// Forbidden role pairs
    pub sod_pairs: usize,
}

/// Accumulates relation rows and freezes them into a [`RelationStore`]
///
/// Each insert validates its identifiers immediately, so `build` cannot
/// fail. Duplicate rows are idempotent; a separation-of-duties pair
/// stored once matches both orientations, and the first-authored
/// orientation wins for rendering.
#[derive(Debug, Default)]
pub struct RelationStoreBuilder {
    store: RelationStore,
}

impl RelationStoreBuilder {
    /// Record a direct privilege grant for a role
    pub fn grant(&mut self, role: impl Into<String>, privilege: impl Into<String>) -> Result<()> {
        let role = role.into();
        let privilege = privilege.into();
        require_id(&role, "grants")?;
        require_id(&privilege, "grants")?;

        self.store
            .role_privileges
            .entry(role)
            .or_default()
            .insert(privilege);
        Ok(())
    }

    /// Record a hierarchy edge: `parent` inherits the privileges of `child`
    pub fn inherit(&mut self, parent: impl Into<String>, child: impl Into<String>) -> Result<()> {
        let parent = parent.into();
        let child = child.into();
        require_id(&parent, "hierarchy")?;
        require_id(&child, "hierarchy")?;

        self.store
            .role_children
            .entry(parent)
            .or_default()
            .insert(child);
        Ok(())
    }

    /// Record a role assignment for an identity
    pub fn assign(&mut self, identity: impl Into<String>, role: impl Into<String>) -> Result<()> {
        let identity = identity.into();
        let role = role.into();
        require_id(&identity, "assignments")?;
        require_id(&role, "assignments")?;

        self.store
            .identity_roles
            .entry(identity)
            .or_default()
            .insert(role);
        Ok(())
    }

    /// Flag a privilege as toxic (escalation-capable)
    pub fn mark_toxic(&mut self, privilege: impl Into<String>) -> Result<()> {
        let privilege = privilege.into();
        require_id(&privilege, "toxic privileges")?;

        self.store.toxic_privileges.insert(privilege);
        Ok(())
    }

    /// Record a forbidden role pair in the separation-of-duties policy
    pub fn forbid(&mut self, first: impl Into<String>, second: impl Into<String>) -> Result<()> {
        let pair = RolePair::new(first, second);
        require_id(&pair.first, "sod policy")?;
        require_id(&pair.second, "sod policy")?;
        if pair.first == pair.second {
            return Err(EngineError::SelfConflict(pair.first));
        }

        self.store.sod_pairs.insert(pair);
        Ok(())
    }

    /// Freeze the accumulated tables
    pub fn build(self) -> RelationStore {
        self.store
    }
}

fn require_id(value: &str, table: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(EngineError::InvalidIdentifier { table });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_identifiers_resolve_empty() {
        let store = RelationStore::builder().build();

        assert_eq!(store.direct_privileges("ghost").count(), 0);
        assert_eq!(store.children("ghost").count(), 0);
        assert_eq!(store.assigned_roles("nobody").count(), 0);
        assert!(!store.is_toxic("anything"));
    }

    #[test]
    fn test_duplicate_rows_are_idempotent() {
        let mut builder = RelationStore::builder();
        builder.grant("Admin", "pay").unwrap();
        builder.grant("Admin", "pay").unwrap();
        builder.assign("alice", "Admin").unwrap();
        builder.assign("alice", "Admin").unwrap();

        let store = builder.build();
        assert_eq!(store.direct_privileges("Admin").count(), 1);
        assert_eq!(store.assigned_roles("alice").count(), 1);
    }

    #[test]
    fn test_reversed_sod_pair_dedupes() {
        let mut builder = RelationStore::builder();
        builder.forbid("Admin", "Approver").unwrap();
        builder.forbid("Approver", "Admin").unwrap();

        let store = builder.build();
        assert_eq!(store.sod_pairs().count(), 1);
        assert!(store.is_forbidden(&RolePair::new("Approver", "Admin")));

        // First-authored orientation wins
        let stored = store.sod_pairs().next().unwrap();
        assert_eq!(stored.first, "Admin");
        assert_eq!(stored.second, "Approver");
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let mut builder = RelationStore::builder();

        let result = builder.grant("", "pay");
        assert_eq!(
            result,
            Err(EngineError::InvalidIdentifier { table: "grants" })
        );
        assert!(builder.assign("alice", "").is_err());
    }

    #[test]
    fn test_self_conflicting_pair_rejected() {
        let mut builder = RelationStore::builder();

        let result = builder.forbid("Admin", "Admin");
        assert_eq!(result, Err(EngineError::SelfConflict("Admin".to_string())));
    }

    #[test]
    fn test_summary_counts() {
        let mut builder = RelationStore::builder();
        builder.grant("Admin", "pay").unwrap();
        builder.grant("Admin", "approve").unwrap();
        builder.inherit("Admin", "Approver").unwrap();
        builder.assign("alice", "Admin").unwrap();
        builder.mark_toxic("pay").unwrap();
        builder.forbid("Admin", "Approver").unwrap();

        let summary = builder.build().summary();
        assert_eq!(summary.roles, 1);
        assert_eq!(summary.identities, 1);
        assert_eq!(summary.hierarchy_edges, 1);
        assert_eq!(summary.toxic_privileges, 1);
        assert_eq!(summary.sod_pairs, 1);
    }
}
