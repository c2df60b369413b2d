//! Parallel per-identity evaluation
//!
//! Fans one unit of work out per assigned identity, runs the resolver and
//! both detectors in each unit, and merges identities with at least one
//! violation into a single sink. Units never depend on each other, so the
//! fan-out is embarrassingly parallel; the sink mutex is held only for
//! the append, never while computing.

use crate::detect;
use crate::resolver::RoleResolver;
use crate::store::RelationStore;
use crate::types::{IdentityId, ViolationRecord};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Drives resolution and detection across every assigned identity
///
/// Every identity in the store's assignment table is evaluated exactly
/// once per run; concurrency degree is a performance choice and never
/// changes the result set.
pub struct EvaluationPipeline {
    store: Arc<RelationStore>,
    resolver: RoleResolver,
}

impl EvaluationPipeline {
    /// Create a pipeline over a frozen relation store
    pub fn new(store: Arc<RelationStore>) -> Self {
        let resolver = RoleResolver::new(Arc::clone(&store));
        Self { store, resolver }
    }

    /// Evaluate every assigned identity and return the violations found
    ///
    /// Identities with a clean profile produce no record. Row order
    /// follows parallel completion order and is unspecified.
    pub fn evaluate_all(&self) -> Vec<ViolationRecord> {
        let identities: Vec<&IdentityId> = self.store.identities().collect();
        let sink = Mutex::new(Vec::new());

        identities.par_iter().copied().for_each(|identity| {
            if let Some(record) = self.evaluate(identity) {
                sink.lock().push(record);
            }
        });

        let records = sink.into_inner();
        info!(
            identities = identities.len(),
            violations = records.len(),
            "evaluation complete"
        );
        records
    }

    /// Evaluate a single identity
    ///
    /// Returns `None` when the resolved profile holds no toxic privilege
    /// and no forbidden pair.
    fn evaluate(&self, identity: &str) -> Option<ViolationRecord> {
        let profile = self.resolver.resolve(identity);
        let toxic = detect::detect_toxic(&self.store, &profile);
        let conflicts = detect::detect_sod(&self.store, &profile);

        if toxic.is_empty() && conflicts.is_empty() {
            return None;
        }

        debug!(
            identity,
            toxic = toxic.len(),
            conflicts = conflicts.len(),
            "violation recorded"
        );
        Some(ViolationRecord {
            identity: identity.to_string(),
            toxic_privileges: toxic,
            conflicting_pairs: conflicts,
        })
    }
}
