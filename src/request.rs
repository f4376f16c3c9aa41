//! Text request/response wrapper around the resolver.
//!
//! Obtains a starting id, provisions and seeds storage, resolves the root
//! ancestor and its matching descendants, and renders the single result
//! line `"<rootName>: <name1>, <name2>, ..."`.

use std::io::{BufRead, Write};

use crate::config::OrgChartConfig;
use crate::db::seed::seed_file_if_empty;
use crate::error::{OrgChartError, Result};
use crate::hierarchy::{HierarchyResolver, HierarchyStore, Roster};
use crate::observability::TraversalMetrics;

/// Shown before reading an id from stdin.
pub const PROMPT: &str = "Enter id of employee:";

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub roster: Roster,
    pub line: String,
    pub metrics: TraversalMetrics,
}

/// Parse a textual node id, ignoring surrounding whitespace.
pub fn parse_node_id(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| OrgChartError::InvalidNodeId(trimmed.to_string()))
}

/// Write [`PROMPT`] to `output` and parse one line from `input`.
pub fn prompt_node_id(input: &mut impl BufRead, output: &mut impl Write) -> Result<i64> {
    writeln!(output, "{PROMPT}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(OrgChartError::InvalidNodeId(String::new()));
    }
    parse_node_id(&line)
}

/// `"<rootName>: <name1>, <name2>, ..."`.
pub fn render_line(roster: &Roster) -> String {
    format!("{}: {}", roster.root.name, roster.members.join(", "))
}

/// Open the configured database, apply the schema, and seed it if empty.
pub fn open_store(config: &OrgChartConfig) -> Result<HierarchyStore> {
    let db_path = config.database.to_string_lossy();
    let store = HierarchyStore::open(&db_path)?.with_retry(config.retry_policy());
    if let Some(seed) = &config.seed {
        seed_file_if_empty(store.connection(), seed)?;
    }
    tracing::debug!(db = %db_path, nodes = store.node_count()?, "store ready");
    Ok(store)
}

/// Resolve `node_id` against `store` using the configured kind, limits,
/// and deadline.
pub fn answer(store: &HierarchyStore, config: &OrgChartConfig, node_id: i64) -> Result<Answer> {
    let resolver = HierarchyResolver::new(store)
        .with_limits(config.limits())
        .with_cancel(config.cancel_token());
    let roster = resolver.resolve_roster(node_id, config.target_kind)?;
    let line = render_line(&roster);
    Ok(Answer {
        roster,
        line,
        metrics: resolver.metrics(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::seed_if_empty;
    use crate::types::{Node, NodeKind, RootAncestor};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn roster(root: &str, members: &[&str]) -> Roster {
        Roster {
            root: RootAncestor {
                id: 1,
                name: root.to_string(),
            },
            members: members.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test_case("3", 3 ; "plain")]
    #[test_case("  42\n", 42 ; "whitespace")]
    #[test_case("-1", -1 ; "negative")]
    fn parses_ids(input: &str, expected: i64) {
        assert_eq!(parse_node_id(input).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("abc" ; "letters")]
    #[test_case("3; DROP TABLE department" ; "injection")]
    fn rejects_non_integer_ids(input: &str) {
        assert!(matches!(
            parse_node_id(input),
            Err(OrgChartError::InvalidNodeId(_))
        ));
    }

    #[test]
    fn renders_joined_names() {
        assert_eq!(render_line(&roster("HQ", &["Alice", "Bob"])), "HQ: Alice, Bob");
    }

    #[test]
    fn renders_empty_roster() {
        assert_eq!(render_line(&roster("HQ", &[])), "HQ: ");
    }

    #[test]
    fn prompt_reads_one_line() {
        let mut input = std::io::Cursor::new("7\n8\n");
        let mut output = Vec::new();
        assert_eq!(prompt_node_id(&mut input, &mut output).unwrap(), 7);
        assert_eq!(String::from_utf8(output).unwrap(), "Enter id of employee:\n");
    }

    #[test]
    fn prompt_on_closed_input_is_invalid() {
        let mut input = std::io::Cursor::new("");
        let mut output = Vec::new();
        assert!(matches!(
            prompt_node_id(&mut input, &mut output),
            Err(OrgChartError::InvalidNodeId(_))
        ));
    }

    #[test]
    fn answer_renders_scenario() {
        let store = HierarchyStore::open(":memory:").unwrap();
        seed_if_empty(
            store.connection(),
            &[
                Node {
                    id: 1,
                    parent_id: None,
                    name: "HQ".into(),
                    kind: NodeKind::Office,
                },
                Node {
                    id: 2,
                    parent_id: Some(1),
                    name: "Alice".into(),
                    kind: NodeKind::Employee,
                },
            ],
        )
        .unwrap();
        let answer = answer(&store, &OrgChartConfig::default(), 2).unwrap();
        assert_eq!(answer.line, "HQ: Alice");
        assert!(answer.metrics.store_queries > 0);
    }

    #[test]
    fn expired_deadline_cancels_request() {
        let store = HierarchyStore::open(":memory:").unwrap();
        let config = OrgChartConfig {
            timeout_ms: Some(0),
            ..OrgChartConfig::default()
        };
        assert!(matches!(
            answer(&store, &config, 1),
            Err(OrgChartError::Cancelled)
        ));
    }
}
