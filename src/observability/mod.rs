//! Structured logging and traversal metrics.
//!
//! - [`init_logging`] — one-time `tracing` setup with `RUST_LOG` support
//! - [`TraversalMetrics`] — counters collected by the resolver

use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// When `RUST_LOG` is unset the level comes from `verbosity`: `0` → warn,
/// `1` → info, `2` → debug, anything higher → trace. Logs go to stderr so
/// stdout carries only the result line. Subsequent calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "orgchart=warn",
        1 => "orgchart=info",
        2 => "orgchart=debug",
        _ => "orgchart=trace",
    }
}

/// Counters accumulated by a [`HierarchyResolver`](crate::hierarchy::HierarchyResolver).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraversalMetrics {
    /// Rows returned by the store.
    pub nodes_visited: u64,
    /// Store calls issued (one per hop upward, one per level downward).
    pub store_queries: u64,
    /// Longest chain walked in either direction.
    pub deepest: usize,
    /// Wall time spent in completed traversals.
    pub elapsed_us: u64,
}

impl TraversalMetrics {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "nodes_visited": self.nodes_visited,
            "store_queries": self.store_queries,
            "deepest": self.deepest,
            "elapsed_us": self.elapsed_us,
        })
    }
}
