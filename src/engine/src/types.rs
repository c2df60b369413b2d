//! Core analysis types

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Unique role identifier
pub type RoleId = String;

/// Unique privilege identifier
pub type PrivilegeId = String;

/// Unique identity (user) identifier
pub type IdentityId = String;

/// Unordered pair of roles forbidden by the separation-of-duties policy.
///
/// Equality, hashing, and ordering ignore orientation, so `(A, B)` and
/// `(B, A)` are the same pair. The orientation given at construction is
/// preserved and used for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePair {
    /// First role as authored in the policy
    pub first: RoleId,

    /// Second role as authored in the policy
    pub second: RoleId,
}

impl RolePair {
    /// Create a new pair, keeping the given orientation
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Endpoints in lexicographic order, independent of orientation
    fn normalized(&self) -> (&str, &str) {
        if self.first <= self.second {
            (&self.first, &self.second)
        } else {
            (&self.second, &self.first)
        }
    }

    /// Check whether both endpoints are members of the given role set
    pub fn both_in(&self, roles: &HashSet<RoleId>) -> bool {
        roles.contains(&self.first) && roles.contains(&self.second)
    }
}

impl PartialEq for RolePair {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for RolePair {}

impl Hash for RolePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl PartialOrd for RolePair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RolePair {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized().cmp(&other.normalized())
    }
}

impl fmt::Display for RolePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// Transitive closure of an identity's roles and the privileges they grant
///
/// Created fresh per identity per run and discarded after reporting.
#[derive(Debug, Clone, Default)]
pub struct ResolvedProfile {
    /// Identity the profile belongs to
    pub identity: IdentityId,

    /// Every role reachable from the identity's assignments, including
    /// the assignments themselves
    pub roles: HashSet<RoleId>,

    /// Union of the direct privileges of every reachable role
    pub privileges: HashSet<PrivilegeId>,
}

impl ResolvedProfile {
    /// Create an empty profile for an identity
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            roles: HashSet::new(),
            privileges: HashSet::new(),
        }
    }

    /// True when the identity holds no roles and no privileges
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.privileges.is_empty()
    }
}

/// Violations found for a single identity
///
/// Constructed only when at least one detector fired; identities with a
/// clean profile produce no record at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Identity the violations belong to
    pub identity: IdentityId,

    /// Toxic privileges held, sorted
    pub toxic_privileges: BTreeSet<PrivilegeId>,

    /// Forbidden role pairs fully contained in the resolved role set,
    /// sorted, each in the orientation the policy stored it with
    pub conflicting_pairs: Vec<RolePair>,
}

impl ViolationRecord {
    /// True when the identity holds at least one toxic privilege
    pub fn has_escalation(&self) -> bool {
        !self.toxic_privileges.is_empty()
    }

    /// True when the identity holds both roles of a forbidden pair
    pub fn has_conflict(&self) -> bool {
        !self.conflicting_pairs.is_empty()
    }
}
