//! SQLite schema initialization for the hierarchy table.
//!
//! Every statement is idempotent, so [`initialize_database`] can be called
//! at the start of each request without checking what already exists.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants
// ---------------------------------------------------------------------------

/// Name of the parent-pointer table.
pub const NODE_TABLE: &str = "department";

const CREATE_DEPARTMENT: &str = "\
CREATE TABLE IF NOT EXISTS department (
  id INTEGER PRIMARY KEY,
  parent_id INTEGER,
  name TEXT NOT NULL,
  type CHAR(2) NOT NULL
)";

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_department_parent ON department(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_department_type ON department(type)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Apply the schema to an already-open connection.
pub fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_DEPARTMENT)?;
    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }
    Ok(())
}

/// Open (or create) the SQLite database at `db_path` and apply the schema.
///
/// The returned connection has WAL mode and synchronous NORMAL configured,
/// and waits up to `busy_timeout_ms` on a locked database before failing.
///
/// # Errors
///
/// Returns a `rusqlite::Error` if the database cannot be opened or any DDL
/// statement fails.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    initialize_database_with_timeout(db_path, 5_000)
}

/// [`initialize_database`] with an explicit busy timeout.
pub fn initialize_database_with_timeout(
    db_path: &str,
    busy_timeout_ms: u64,
) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    // -- Pragmas ----------------------------------------------------------
    conn.pragma_update(None, "journal_mode", "WAL")?;
    // parent_id is a soft reference; integrity is established at seed time.
    conn.pragma_update(None, "foreign_keys", "OFF")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(std::time::Duration::from_millis(busy_timeout_ms))?;

    apply_schema(&conn)?;
    tracing::debug!(db_path, "schema ready");

    Ok(conn)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
