use crate::core::node::NodeId;
use thiserror::Error;

/// Recoverable usage errors raised by the ledger graph mutation API.
///
/// These cover caller mistakes on otherwise valid graphs: bad amounts,
/// self-loops, stale node ids, missing arcs. Internal invariant failures
/// (an unbalanced settlement group, an empty combination universe) are
/// bugs, not inputs, and panic instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An arc weight of zero was requested; arc weights are strictly
    /// positive and a weight driven to zero deletes the arc.
    #[error("arc weight must be positive")]
    ZeroWeight,

    /// A node was asked to lend to itself.
    #[error("node {name} cannot lend to itself")]
    SelfLoop { name: String },

    /// The node id does not refer to a live node of this graph.
    #[error("node id {0} does not belong to this graph")]
    UnknownNode(NodeId),

    /// A weight update referenced an arc that does not exist.
    #[error("no arc from {lender} to {borrower}")]
    MissingArc { lender: String, borrower: String },
}
