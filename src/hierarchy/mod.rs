//! Hierarchy layer — the read-only node store and the traversals built on it.

pub mod cancel;
pub mod resolver;
pub mod source;
pub mod store;

pub use cancel::CancelToken;
pub use resolver::{HierarchyResolver, Roster, TraversalLimits};
pub use source::NodeSource;
pub use store::{HierarchyStore, RetryPolicy};
