//! SQLite-backed node store.
//!
//! Uses `rusqlite` with `prepare_cached` for the two fixed lookups, so the
//! first call compiles the statement and later calls reuse it. The batched
//! per-level child fetch builds its `IN (...)` list dynamically and is
//! prepared fresh each time.

use std::time::Duration;

use rusqlite::{params, params_from_iter, Connection, ErrorCode};

use crate::db::converters::{row_to_node, NODE_COLUMNS};
use crate::db::schema::initialize_database;
use crate::error::{OrgChartError, Result};
use crate::hierarchy::source::NodeSource;
use crate::types::Node;

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const GET_BY_ID_SQL: &str = "SELECT id, parent_id, name, type FROM department WHERE id = ?1";

const GET_CHILDREN_SQL: &str = "\
SELECT id, parent_id, name, type
FROM department
WHERE parent_id = ?1
ORDER BY id ASC";

const COUNT_SQL: &str = "SELECT COUNT(*) FROM department";

/// Stays well below SQLite's host-parameter limit.
const MAX_IN_LIST: usize = 500;

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Bounded retry for transient lock contention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. `1` disables retry.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled after each failure.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(25),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

/// Busy and locked databases clear up on their own; nothing else does.
fn is_transient(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

/// Run `op`, retrying transient SQLite failures according to `policy`.
///
/// The last error is returned once attempts run out, so a persistent
/// failure is never masked.
pub(crate) fn retry_transient<T>(
    policy: RetryPolicy,
    what: &str,
    mut op: impl FnMut() -> Result<T>,
) -> Result<T> {
    let attempts = policy.max_attempts.max(1);
    let mut delay = policy.backoff;
    let mut attempt = 1;
    loop {
        match op() {
            Err(OrgChartError::StorageUnavailable(e)) if attempt < attempts && is_transient(&e) => {
                tracing::warn!(what, attempt, error = %e, "transient storage error, retrying");
                std::thread::sleep(delay);
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            other => return other,
        }
    }
}

// ---------------------------------------------------------------------------
// HierarchyStore
// ---------------------------------------------------------------------------

/// Read-only accessor over the `department` table.
///
/// The store owns its connection; open one per request and drop it when the
/// request is done.
pub struct HierarchyStore {
    conn: Connection,
    retry: RetryPolicy,
}

impl std::fmt::Debug for HierarchyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyStore")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl HierarchyStore {
    /// Open (or create) the database at `db_path`, apply the schema, and
    /// return a ready-to-use store.
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = initialize_database(db_path)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already-open connection. The caller is responsible for the
    /// schema being present.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The underlying connection, for seeding and diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Total number of stored nodes.
    pub fn node_count(&self) -> Result<usize> {
        retry_transient(self.retry, "node_count", || {
            let n: i64 = self
                .conn
                .prepare_cached(COUNT_SQL)?
                .query_row([], |row| row.get(0))?;
            Ok(n as usize)
        })
    }

    fn query_nodes(&self, sql: &str, parent_ids: &[i64]) -> Result<Vec<Node>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_and_then(params_from_iter(parent_ids.iter()), row_to_node)?;
        rows.collect()
    }
}

impl NodeSource for HierarchyStore {
    fn get_by_id(&self, id: i64) -> Result<Node> {
        retry_transient(self.retry, "get_by_id", || {
            let mut stmt = self.conn.prepare_cached(GET_BY_ID_SQL)?;
            let mut rows = stmt.query_and_then(params![id], row_to_node)?;
            match rows.next() {
                Some(node) => node,
                None => Err(OrgChartError::NodeNotFound(id)),
            }
        })
    }

    fn get_children(&self, parent_id: i64) -> Result<Vec<Node>> {
        retry_transient(self.retry, "get_children", || {
            let mut stmt = self.conn.prepare_cached(GET_CHILDREN_SQL)?;
            let rows = stmt.query_and_then(params![parent_id], row_to_node)?;
            rows.collect()
        })
    }

    fn get_children_of_many(&self, parent_ids: &[i64]) -> Result<Vec<Node>> {
        let mut out = Vec::new();
        for chunk in parent_ids.chunks(MAX_IN_LIST) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT {NODE_COLUMNS} FROM department \
                 WHERE parent_id IN ({placeholders}) \
                 ORDER BY parent_id ASC, id ASC"
            );
            let nodes = retry_transient(self.retry, "get_children_of_many", || {
                self.query_nodes(&sql, chunk)
            })?;
            out.extend(nodes);
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
