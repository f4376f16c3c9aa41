//! Upward and downward walks over the parent-pointer table.
//!
//! Both walks go through the two [`NodeSource`] primitives instead of a
//! recursive query, one lookup per hop upward and one batched fetch per
//! level downward. Each walk keeps a visited set and a depth bound, so a
//! corrupted table fails with `CycleDetected` instead of looping.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::error::{OrgChartError, Result};
use crate::hierarchy::cancel::CancelToken;
use crate::hierarchy::source::NodeSource;
use crate::observability::TraversalMetrics;
use crate::types::{Node, NodeKind, RootAncestor};

// ---------------------------------------------------------------------------
// Configuration and result types
// ---------------------------------------------------------------------------

/// Safety bounds for a single traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalLimits {
    /// Maximum parent hops upward, and maximum levels downward.
    pub max_depth: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self { max_depth: 4096 }
    }
}

/// A root ancestor together with its matching descendants.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Roster {
    pub root: RootAncestor,
    pub members: Vec<String>,
}

// ---------------------------------------------------------------------------
// HierarchyResolver
// ---------------------------------------------------------------------------

/// Stateless traversals bound to a node source for one request.
pub struct HierarchyResolver<S> {
    source: S,
    limits: TraversalLimits,
    cancel: CancelToken,
    metrics: Cell<TraversalMetrics>,
}

impl<S: NodeSource> HierarchyResolver<S> {
    /// Create a resolver with default limits and no cancellation.
    pub fn new(source: S) -> Self {
        Self {
            source,
            limits: TraversalLimits::default(),
            cancel: CancelToken::default(),
            metrics: Cell::new(TraversalMetrics::default()),
        }
    }

    pub fn with_limits(mut self, limits: TraversalLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Counters accumulated over every call made through this resolver.
    pub fn metrics(&self) -> TraversalMetrics {
        self.metrics.get()
    }

    // -------------------------------------------------------------------
    // Store access with bookkeeping
    // -------------------------------------------------------------------

    fn record(&self, f: impl FnOnce(&mut TraversalMetrics)) {
        let mut m = self.metrics.get();
        f(&mut m);
        self.metrics.set(m);
    }

    fn fetch(&self, id: i64) -> Result<Node> {
        self.cancel.check()?;
        self.record(|m| m.store_queries += 1);
        let node = self.source.get_by_id(id)?;
        self.record(|m| m.nodes_visited += 1);
        Ok(node)
    }

    fn fetch_children(&self, parent_ids: &[i64]) -> Result<Vec<Node>> {
        self.cancel.check()?;
        self.record(|m| m.store_queries += 1);
        let children = self.source.get_children_of_many(parent_ids)?;
        self.record(|m| m.nodes_visited += children.len() as u64);
        Ok(children)
    }

    // -------------------------------------------------------------------
    // resolve_root_ancestor
    // -------------------------------------------------------------------

    /// Follow `parent_id` links from `start_id` to the node that has none.
    ///
    /// A root resolves to itself.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if `start_id` does not exist.
    /// - `DanglingParent` if a link points at a missing row.
    /// - `CycleDetected` if an id repeats or `max_depth` hops are exceeded.
    pub fn resolve_root_ancestor(&self, start_id: i64) -> Result<RootAncestor> {
        let started = Instant::now();
        let mut current = self.fetch(start_id)?;
        let mut visited: HashSet<i64> = HashSet::from([current.id]);
        let mut hops = 0usize;

        while let Some(parent_id) = current.parent_id {
            hops += 1;
            if hops > self.limits.max_depth || !visited.insert(parent_id) {
                tracing::warn!(
                    start_id,
                    node_id = parent_id,
                    hops,
                    "upward walk did not terminate"
                );
                return Err(OrgChartError::CycleDetected {
                    node_id: parent_id,
                    hops,
                });
            }
            current = match self.fetch(parent_id) {
                Err(OrgChartError::NodeNotFound(_)) => {
                    return Err(OrgChartError::DanglingParent {
                        node_id: current.id,
                        parent_id,
                    })
                }
                other => other?,
            };
        }

        self.record(|m| {
            m.deepest = m.deepest.max(hops);
            m.elapsed_us += started.elapsed().as_micros() as u64;
        });
        tracing::debug!(start_id, root_id = current.id, hops, "resolved root ancestor");

        Ok(RootAncestor {
            id: current.id,
            name: current.name,
        })
    }

    // -------------------------------------------------------------------
    // list_descendants_by_kind
    // -------------------------------------------------------------------

    /// Names of every node at or below `start_id` whose kind is `kind`.
    ///
    /// The start node itself is checked, and a match never stops descent.
    /// Names come back in breadth-first order: level by level, parents in
    /// the order they were reached, siblings by id. Duplicate names are
    /// kept.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if `start_id` does not exist.
    /// - `CycleDetected` if a node is reached twice or the tree is deeper
    ///   than `max_depth` levels.
    pub fn list_descendants_by_kind(&self, start_id: i64, kind: NodeKind) -> Result<Vec<String>> {
        let started = Instant::now();
        let start = self.fetch(start_id)?;

        let mut matches = Vec::new();
        if start.kind == kind {
            matches.push(start.name);
        }

        let mut visited: HashSet<i64> = HashSet::from([start.id]);
        let mut frontier: Vec<i64> = vec![start.id];
        let mut depth = 0usize;

        while !frontier.is_empty() {
            let children = self.fetch_children(&frontier)?;
            if children.is_empty() {
                break;
            }
            depth += 1;
            if depth > self.limits.max_depth {
                return Err(OrgChartError::CycleDetected {
                    node_id: children[0].id,
                    hops: depth,
                });
            }

            let mut by_parent: HashMap<i64, Vec<Node>> = HashMap::new();
            for child in children {
                if let Some(parent_id) = child.parent_id {
                    by_parent.entry(parent_id).or_default().push(child);
                }
            }

            let mut next = Vec::new();
            for parent_id in &frontier {
                let Some(mut siblings) = by_parent.remove(parent_id) else {
                    continue;
                };
                siblings.sort_by_key(|n| n.id);
                for child in siblings {
                    if !visited.insert(child.id) {
                        tracing::warn!(
                            start_id,
                            node_id = child.id,
                            depth,
                            "downward walk revisited a node"
                        );
                        return Err(OrgChartError::CycleDetected {
                            node_id: child.id,
                            hops: depth,
                        });
                    }
                    next.push(child.id);
                    if child.kind == kind {
                        matches.push(child.name);
                    }
                }
            }
            frontier = next;
        }

        self.record(|m| {
            m.deepest = m.deepest.max(depth);
            m.elapsed_us += started.elapsed().as_micros() as u64;
        });
        tracing::debug!(
            start_id,
            %kind,
            levels = depth,
            matches = matches.len(),
            "listed descendants"
        );

        Ok(matches)
    }

    // -------------------------------------------------------------------
    // resolve_roster
    // -------------------------------------------------------------------

    /// Resolve the root above `node_id`, then list that root's descendants
    /// of `kind`.
    pub fn resolve_roster(&self, node_id: i64, kind: NodeKind) -> Result<Roster> {
        let root = self.resolve_root_ancestor(node_id)?;
        let members = self.list_descendants_by_kind(root.id, kind)?;
        Ok(Roster { root, members })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
