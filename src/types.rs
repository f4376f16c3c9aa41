//! Core domain types for the organizational hierarchy.
//!
//! A [`Node`] is one row of the parent-pointer table. Its [`NodeKind`] is
//! persisted as a short fixed-width code and compared only for equality.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{OrgChartError, Result};

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Closed set of roles a node can play in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Office,
    Department,
    Employee,
}

impl NodeKind {
    /// All variants, in code order.
    pub const ALL: [NodeKind; 3] = [Self::Office, Self::Department, Self::Employee];

    /// The code stored in the `type` column.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Office => "1",
            Self::Department => "2",
            Self::Employee => "3",
        }
    }

    /// Decode a stored `type` column value. Surrounding whitespace is
    /// ignored because the column is fixed-width.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Office),
            "2" => Some(Self::Department),
            "3" => Some(Self::Employee),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Department => "department",
            Self::Employee => "employee",
        }
    }

    /// Parse either a kind name or its storage code, case-insensitively.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "office" | "1" => Some(Self::Office),
            "department" | "dept" | "2" => Some(Self::Department),
            "employee" | "3" => Some(Self::Employee),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = OrgChartError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_loose(s).ok_or_else(|| OrgChartError::InvalidKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single hierarchy entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    /// `None` exactly for roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// The top-level ancestor of a node, as returned by
/// [`HierarchyResolver::resolve_root_ancestor`](crate::hierarchy::resolver::HierarchyResolver::resolve_root_ancestor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootAncestor {
    pub id: i64,
    pub name: String,
}

// ---------------------------------------------------------------------------
// SeedRecord
// ---------------------------------------------------------------------------

/// One record of the static seed dataset.
///
/// Keys follow the dataset's own casing (`ParentId`, `Name`, `Type`). The
/// `Type` field may be a JSON number or a string code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedRecord {
    pub id: i64,
    #[serde(rename = "ParentId", default)]
    pub parent_id: Option<i64>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type", deserialize_with = "deserialize_kind_code")]
    pub kind: NodeKind,
}

impl From<SeedRecord> for Node {
    fn from(rec: SeedRecord) -> Self {
        Node {
            id: rec.id,
            parent_id: rec.parent_id,
            name: rec.name,
            kind: rec.kind,
        }
    }
}

fn deserialize_kind_code<'de, D>(deserializer: D) -> std::result::Result<NodeKind, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Number(u64),
        Text(String),
    }

    let text = match RawCode::deserialize(deserializer)? {
        RawCode::Number(n) => n.to_string(),
        RawCode::Text(s) => s,
    };
    NodeKind::from_str_loose(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown node kind {text:?}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
