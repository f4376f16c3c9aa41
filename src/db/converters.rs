//! Row → domain type mapping.

use rusqlite::Row;

use crate::error::{OrgChartError, Result};
use crate::types::{Node, NodeKind};

/// Column list every node query selects, in the order [`row_to_node`] reads.
pub const NODE_COLUMNS: &str = "id, parent_id, name, type";

/// Map a `department` row to a [`Node`].
///
/// Fails with [`OrgChartError::InvalidKind`] when the `type` column holds a
/// code outside the closed set.
pub fn row_to_node(row: &Row<'_>) -> Result<Node> {
    let code: String = row.get("type")?;
    let kind = NodeKind::from_code(&code).ok_or(OrgChartError::InvalidKind(code))?;
    Ok(Node {
        id: row.get("id")?,
        parent_id: row.get("parent_id")?,
        name: row.get("name")?,
        kind,
    })
}
