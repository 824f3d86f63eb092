use thiserror::Error;

/// A structural invariant found broken by [`BstMap::sanity_check`].
///
/// Keys are reported with their `Debug` representation.
///
/// [`BstMap::sanity_check`]: crate::BstMap::sanity_check
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node has a parent link.
    #[error("root {key} has a parent link")]
    RootHasParent { key: String },

    /// A child does not point back at the node holding it.
    #[error("{child} is a child of {parent} but does not link back to it")]
    ParentLink { parent: String, child: String },

    /// A cached height disagrees with the heights of the node's children.
    #[error("{key} caches height {cached} but its subtree has height {actual}")]
    Height { key: String, cached: u32, actual: u32 },

    /// An in-order walk visited keys out of order.
    #[error("in-order walk visits {prev} before {next}")]
    Order { prev: String, next: String },

    /// The element count disagrees with the number of nodes reachable from the root.
    #[error("map reports {reported} entries but {reachable} are reachable from the root")]
    Len { reported: usize, reachable: usize },
}
