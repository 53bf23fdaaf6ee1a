//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed documents and failed lookups.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unbalanced '}}' at line {line}: no open branch to close")]
    UnbalancedClose { line: usize },

    #[error("unexpected end of input: branch '{name}' is never closed")]
    UnclosedBranch { name: String },

    #[error("no such branch: {0}")]
    BranchNotFound(String),

    #[error("ambiguous branch name: {name} ({count} matches)")]
    AmbiguousBranch { name: String, count: usize },

    #[error("unknown branch handle")]
    UnknownBranch,

    #[error("cycle detected: branch '{0}' cannot become its own descendant")]
    CycleDetected(String),

    #[error("branch '{branch}' is missing required key '{key}'")]
    MissingLeaf { branch: String, key: String },

    #[error("branch '{branch}' has more than one '{key}' entry")]
    DuplicateLeaf { branch: String, key: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
