//! # RoleScope Engine
//!
//! Offline role-resolution and violation-detection engine for RBAC
//! audit runs.
//!
//! ## Features
//!
//! - **Role-hierarchy resolution** with visited-set cycle safety and a
//!   thread-safe per-role closure cache
//! - **Toxic-privilege detection**: effective privileges intersected
//!   with an escalation-capable privilege set
//! - **Separation-of-duties detection** over the full reachable role
//!   closure, with orientation-insensitive pair matching
//! - **Parallel evaluation pipeline**: one unit per identity, single
//!   mutex-guarded result sink
//! - **Deterministic report rendering** of each violation row
//!
//! ## Example
//!
//! ```rust
//! use rolescope_engine::{EvaluationPipeline, RelationStore};
//! use std::sync::Arc;
//!
//! # fn main() -> rolescope_engine::Result<()> {
//! let mut builder = RelationStore::builder();
//! builder.grant("Admin", "pay")?;
//! builder.grant("Approver", "approve")?;
//! builder.inherit("Admin", "Approver")?;
//! builder.assign("alice", "Admin")?;
//! builder.mark_toxic("pay")?;
//! builder.forbid("Admin", "Approver")?;
//!
//! let pipeline = EvaluationPipeline::new(Arc::new(builder.build()));
//! let violations = pipeline.evaluate_all();
//!
//! assert_eq!(violations.len(), 1);
//! assert!(violations[0].has_escalation());
//! assert!(violations[0].has_conflict());
//! # Ok(())
//! # }
//! ```

pub mod detect;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use pipeline::EvaluationPipeline;
pub use resolver::RoleResolver;
pub use store::{RelationStore, RelationStoreBuilder, StoreSummary};
pub use types::{
    IdentityId, PrivilegeId, ResolvedProfile, RoleId, RolePair, ViolationRecord,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
