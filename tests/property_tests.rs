//! Property-based tests using proptest.
//!
//! Random forests are seeded into an in-memory store and the resolver's
//! answers are checked against a naive walk over the same rows.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use proptest::sample::Index;

use orgchart::db::seed::seed_if_empty;
use orgchart::error::OrgChartError;
use orgchart::hierarchy::{HierarchyResolver, HierarchyStore};
use orgchart::types::{Node, NodeKind};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_kind() -> impl Strategy<Value = NodeKind> {
    prop_oneof![
        Just(NodeKind::Office),
        Just(NodeKind::Department),
        Just(NodeKind::Employee),
    ]
}

/// A forest where every parent precedes its child, with non-contiguous ids.
fn arb_forest() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec((any::<Index>(), prop::bool::weighted(0.15), arb_kind()), 1..60)
        .prop_map(|specs| {
            let ids: Vec<i64> = (0..specs.len() as i64).map(|i| i * 7 + 3).collect();
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (parent, is_root, kind))| Node {
                    id: ids[i],
                    parent_id: if i == 0 || is_root {
                        None
                    } else {
                        Some(ids[parent.index(i)])
                    },
                    name: format!("n{i}"),
                    kind,
                })
                .collect()
        })
}

fn store_for(nodes: &[Node]) -> HierarchyStore {
    let store = HierarchyStore::open(":memory:").unwrap();
    seed_if_empty(store.connection(), nodes).unwrap();
    store
}

// ---------------------------------------------------------------------------
// Naive model
// ---------------------------------------------------------------------------

fn naive_root(nodes: &[Node], id: i64) -> i64 {
    let parents: HashMap<i64, Option<i64>> = nodes.iter().map(|n| (n.id, n.parent_id)).collect();
    let mut current = id;
    while let Some(Some(parent)) = parents.get(&current) {
        current = *parent;
    }
    current
}

fn naive_descendants(nodes: &[Node], start: i64, kind: NodeKind) -> HashSet<String> {
    let parents: HashMap<i64, Option<i64>> = nodes.iter().map(|n| (n.id, n.parent_id)).collect();
    nodes
        .iter()
        .filter(|n| n.kind == kind)
        .filter(|n| {
            let mut current = Some(n.id);
            while let Some(id) = current {
                if id == start {
                    return true;
                }
                current = parents.get(&id).copied().flatten();
            }
            false
        })
        .map(|n| n.name.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn root_matches_naive_walk(nodes in arb_forest(), pick in any::<Index>()) {
        let store = store_for(&nodes);
        let resolver = HierarchyResolver::new(&store);
        let target = &nodes[pick.index(nodes.len())];

        let root = resolver.resolve_root_ancestor(target.id).unwrap();
        let expected = naive_root(&nodes, target.id);
        prop_assert_eq!(root.id, expected);

        let root_node = nodes.iter().find(|n| n.id == expected).unwrap();
        prop_assert_eq!(&root.name, &root_node.name);
        prop_assert!(root_node.parent_id.is_none());
    }

    #[test]
    fn roots_resolve_to_themselves(nodes in arb_forest()) {
        let store = store_for(&nodes);
        let resolver = HierarchyResolver::new(&store);
        for root in nodes.iter().filter(|n| n.is_root()) {
            let resolved = resolver.resolve_root_ancestor(root.id).unwrap();
            prop_assert_eq!(resolved.id, root.id);
            prop_assert_eq!(&resolved.name, &root.name);
        }
    }

    #[test]
    fn descendants_match_naive_closure(
        nodes in arb_forest(),
        pick in any::<Index>(),
        kind in arb_kind(),
    ) {
        let store = store_for(&nodes);
        let resolver = HierarchyResolver::new(&store);
        let start = nodes[pick.index(nodes.len())].id;

        let names = resolver.list_descendants_by_kind(start, kind).unwrap();
        let expected = naive_descendants(&nodes, start, kind);

        // Names are unique in generated forests, so no match is reported twice.
        prop_assert_eq!(names.len(), expected.len());
        prop_assert_eq!(names.into_iter().collect::<HashSet<_>>(), expected);
    }

    #[test]
    fn missing_ids_are_not_found(nodes in arb_forest()) {
        let store = store_for(&nodes);
        let resolver = HierarchyResolver::new(&store);
        // Generated ids are all ≡ 3 (mod 7).
        let missing = 1;
        prop_assert!(matches!(
            resolver.resolve_root_ancestor(missing),
            Err(OrgChartError::NodeNotFound(1))
        ));
        prop_assert!(matches!(
            resolver.list_descendants_by_kind(missing, NodeKind::Employee),
            Err(OrgChartError::NodeNotFound(1))
        ));
    }
}
