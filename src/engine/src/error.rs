//! Error types for the analysis engine

use thiserror::Error;

/// Analysis engine errors
///
/// The engine raises no fatal conditions during evaluation; these cover
/// the store construction phase only.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Empty identifier handed to the store builder
    #[error("Invalid identifier in {table} table: identifiers must be non-empty")]
    InvalidIdentifier {
        /// Relation table the identifier was destined for
        table: &'static str,
    },

    /// Separation-of-duties pair naming the same role twice
    #[error("Invalid separation-of-duties pair: role '{0}' cannot conflict with itself")]
    SelfConflict(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
