//! Violation detectors
//!
//! Two independent, stateless predicates over a resolved profile. Both
//! operate purely on immutable inputs and need no synchronization.

use crate::store::RelationStore;
use crate::types::{PrivilegeId, ResolvedProfile, RolePair};
use std::collections::BTreeSet;

/// Toxic privileges held by the profile
///
/// Exactly the intersection of the profile's privilege set with the
/// store's toxic set; empty means no violation. Returned sorted so report
/// rows are deterministic.
pub fn detect_toxic(store: &RelationStore, profile: &ResolvedProfile) -> BTreeSet<PrivilegeId> {
    profile
        .privileges
        .iter()
        .filter(|privilege| store.is_toxic(privilege.as_str()))
        .cloned()
        .collect()
}

/// Forbidden role pairs fully contained in the profile's role set
///
/// Membership is checked against the full reachable closure, not merely
/// the directly assigned roles, so an identity inheriting both halves of
/// a pair transitively still violates. Pairs keep the orientation the
/// policy stored them with and are sorted for determinism.
pub fn detect_sod(store: &RelationStore, profile: &ResolvedProfile) -> Vec<RolePair> {
    let mut conflicts: Vec<RolePair> = store
        .sod_pairs()
        .filter(|pair| pair.both_in(&profile.roles))
        .cloned()
        .collect();
    conflicts.sort();
    conflicts
}
