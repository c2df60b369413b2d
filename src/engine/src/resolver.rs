//! Role-hierarchy resolution
//!
//! Expands an identity's directly assigned roles through the hierarchy
//! into the transitive closure of roles held and privileges granted.
//! Traversal is an iterative worklist walk with a visited set, so cyclic
//! hierarchies terminate without any separate cycle detection and deep
//! hierarchies cannot exhaust the call stack.

use crate::store::RelationStore;
use crate::types::{PrivilegeId, ResolvedProfile, RoleId};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

/// Reachable closure of a single role: every role the hierarchy reaches
/// from it plus the union of their direct privileges.
#[derive(Debug, Default)]
struct RoleClosure {
    roles: HashSet<RoleId>,
    privileges: HashSet<PrivilegeId>,
}

/// Resolves identities into their effective role and privilege sets
///
/// Closures of individual roles are cached for the lifetime of the
/// resolver, so identities sharing a role do not re-walk the hierarchy.
/// The cache is keyed by role, value-stable once inserted, and safe to
/// share across evaluation threads; it is an optimization only and never
/// changes resolution results.
pub struct RoleResolver {
    store: Arc<RelationStore>,
    closures: DashMap<RoleId, Arc<RoleClosure>>,
}

impl RoleResolver {
    /// Create a resolver over a frozen relation store
    pub fn new(store: Arc<RelationStore>) -> Self {
        Self {
            store,
            closures: DashMap::new(),
        }
    }

    /// Expand an identity's assigned roles into its resolved profile
    ///
    /// Identities absent from the assignment table resolve to an empty
    /// profile; the caller decides whether that is interesting.
    pub fn resolve(&self, identity: &str) -> ResolvedProfile {
        let mut profile = ResolvedProfile::new(identity);
        for role in self.store.assigned_roles(identity) {
            let closure = self.closure_of(role);
            profile.roles.extend(closure.roles.iter().cloned());
            profile
                .privileges
                .extend(closure.privileges.iter().cloned());
        }
        profile
    }

    /// Number of role closures currently cached
    pub fn cached_closures(&self) -> usize {
        self.closures.len()
    }

    /// Reachable closure of one role, computed once and cached
    fn closure_of(&self, role: &str) -> Arc<RoleClosure> {
        if let Some(cached) = self.closures.get(role) {
            return Arc::clone(cached.value());
        }

        let computed = Arc::new(self.walk(role));
        let entry = self.closures.entry(role.to_string()).or_insert(computed);
        Arc::clone(entry.value())
    }

    /// Worklist depth-first expansion from a single role
    ///
    /// The visited set is the sole cycle guard: a role already in the
    /// closure is never expanded again, so traversal is bounded by the
    /// reachable roles and edges even on cyclic input.
    fn walk(&self, start: &str) -> RoleClosure {
        let mut closure = RoleClosure::default();
        let mut work: Vec<String> = vec![start.to_string()];

        while let Some(role) = work.pop() {
            if closure.roles.contains(&role) {
                continue;
            }
            closure
                .privileges
                .extend(self.store.direct_privileges(&role).cloned());
            work.extend(self.store.children(&role).cloned());
            closure.roles.insert(role);
        }

        trace!(
            role = start,
            roles = closure.roles.len(),
            privileges = closure.privileges.len(),
            "expanded role closure"
        );
        closure
    }
}
