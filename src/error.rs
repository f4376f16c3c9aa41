//! Error taxonomy for the hierarchy store and resolver.
//!
//! Every failure is terminal for the current request: callers get an
//! `Err` and never a partially-built result.

use thiserror::Error;

/// All errors produced by `orgchart`.
#[derive(Debug, Error)]
pub enum OrgChartError {
    /// No node with this id exists in storage.
    #[error("node {0} not found")]
    NodeNotFound(i64),

    /// A traversal revisited a node or exceeded its depth bound.
    #[error("cycle detected at node {node_id} after {hops} hops")]
    CycleDetected { node_id: i64, hops: usize },

    /// A node's `parent_id` points at a row that does not exist.
    #[error("node {node_id} references missing parent {parent_id}")]
    DanglingParent { node_id: i64, parent_id: i64 },

    /// The underlying SQLite calls failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    /// The caller's cancel token tripped or its deadline passed.
    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid node kind: {0:?}")]
    InvalidKind(String),

    #[error("invalid node id: {0:?}")]
    InvalidNodeId(String),

    #[error("seed error: {0}")]
    Seed(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, OrgChartError>;
