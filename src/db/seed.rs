//! One-time bulk seeding of the hierarchy table from a static JSON dataset.
//!
//! Seeding is a no-op when the table already holds rows. Before anything is
//! written the dataset is checked against the forest invariants: unique ids,
//! non-empty names, parents that exist, and no parent cycles. The resolver
//! relies on those checks having been made here.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{OrgChartError, Result};
use crate::types::{Node, SeedRecord};

const INSERT_NODE_SQL: &str = "\
INSERT INTO department (id, parent_id, name, type)
VALUES (?1, ?2, ?3, ?4)";

/// Whether the table currently has no rows.
pub fn is_empty(conn: &Connection) -> Result<bool> {
    let exists: Option<i64> = conn
        .query_row("SELECT 1 FROM department LIMIT 1", [], |row| row.get(0))
        .optional()?;
    Ok(exists.is_none())
}

/// Parse a JSON array of seed records.
pub fn parse_seed(json: &str) -> Result<Vec<Node>> {
    let records: Vec<SeedRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(Node::from).collect())
}

/// Read and parse the seed dataset at `path`.
pub fn read_seed_file(path: &Path) -> Result<Vec<Node>> {
    let contents = std::fs::read_to_string(path)?;
    parse_seed(&contents)
}

/// Check that `nodes` form a forest.
pub fn validate_forest(nodes: &[Node]) -> Result<()> {
    let mut parents: HashMap<i64, Option<i64>> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if node.name.trim().is_empty() {
            return Err(OrgChartError::Seed(format!("node {} has an empty name", node.id)));
        }
        if parents.insert(node.id, node.parent_id).is_some() {
            return Err(OrgChartError::Seed(format!("duplicate node id {}", node.id)));
        }
    }

    for node in nodes {
        if let Some(parent_id) = node.parent_id {
            if !parents.contains_key(&parent_id) {
                return Err(OrgChartError::Seed(format!(
                    "node {} references missing parent {parent_id}",
                    node.id
                )));
            }
        }
    }

    // Walk each chain upward; a chain that reaches a node already proven to
    // terminate stops early, so the whole pass is linear.
    let mut terminates: HashSet<i64> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        let mut chain: Vec<i64> = Vec::new();
        let mut on_chain: HashSet<i64> = HashSet::new();
        let mut current = Some(node.id);
        while let Some(id) = current {
            if terminates.contains(&id) {
                break;
            }
            if !on_chain.insert(id) {
                return Err(OrgChartError::Seed(format!(
                    "parent cycle through node {id}"
                )));
            }
            chain.push(id);
            current = parents.get(&id).copied().flatten();
        }
        terminates.extend(chain);
    }

    Ok(())
}

/// Insert `nodes` in a single transaction if the table is empty.
///
/// Returns the number of rows inserted (`0` when data was already present).
pub fn seed_if_empty(conn: &Connection, nodes: &[Node]) -> Result<usize> {
    if !is_empty(conn)? {
        tracing::debug!("hierarchy already seeded, skipping");
        return Ok(0);
    }
    validate_forest(nodes)?;

    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare_cached(INSERT_NODE_SQL)?;
        for node in nodes {
            stmt.execute(params![
                node.id,
                node.parent_id,
                node.name,
                node.kind.as_code()
            ])?;
        }
    }
    tx.commit()?;

    tracing::info!(rows = nodes.len(), "seeded hierarchy");
    Ok(nodes.len())
}

/// Seed from a JSON file if the table is empty. The file is not read at
/// all when data is already present.
pub fn seed_file_if_empty(conn: &Connection, path: &Path) -> Result<usize> {
    if !is_empty(conn)? {
        tracing::debug!(path = %path.display(), "hierarchy already seeded, skipping file");
        return Ok(0);
    }
    let nodes = read_seed_file(path)?;
    seed_if_empty(conn, &nodes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
