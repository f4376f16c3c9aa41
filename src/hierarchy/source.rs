//! The read contract the resolver needs from storage.

use crate::error::Result;
use crate::types::Node;

/// Point lookup by id and set lookup by parent id.
///
/// Implementations are read-only and do not validate forest invariants.
pub trait NodeSource {
    /// Fetch a single node, failing with
    /// [`OrgChartError::NodeNotFound`](crate::error::OrgChartError::NodeNotFound)
    /// when no row has that id.
    fn get_by_id(&self, id: i64) -> Result<Node>;

    /// All nodes whose `parent_id` equals `parent_id`, ordered by id.
    /// An empty vector means "no children", never an error.
    fn get_children(&self, parent_id: i64) -> Result<Vec<Node>>;

    /// Children of every id in `parent_ids`, fetched in as few round trips
    /// as the backend allows. Order across parents is unspecified.
    fn get_children_of_many(&self, parent_ids: &[i64]) -> Result<Vec<Node>> {
        let mut out = Vec::new();
        for &parent_id in parent_ids {
            out.extend(self.get_children(parent_id)?);
        }
        Ok(out)
    }
}

impl<S: NodeSource + ?Sized> NodeSource for &S {
    fn get_by_id(&self, id: i64) -> Result<Node> {
        (**self).get_by_id(id)
    }

    fn get_children(&self, parent_id: i64) -> Result<Vec<Node>> {
        (**self).get_children(parent_id)
    }

    fn get_children_of_many(&self, parent_ids: &[i64]) -> Result<Vec<Node>> {
        (**self).get_children_of_many(parent_ids)
    }
}
