use crate::core::graph::LedgerGraph;
use crate::core::node::NodeId;
use crate::optimization::merge::{settle_group, sort_by_magnitude, split_by_equity};
use crate::optimization::Simplifier;
use log::debug;

/// Linear-time baseline matcher.
///
/// Treats the whole node set as one balanced group: partition by equity
/// sign, sort both sides ascending by magnitude, and run the minimum-edge
/// bipartite merge once over the full lists. O(n log n) for the sorts, O(n)
/// for the merge, at most `n - 1` arcs in the result.
///
/// Where the network splits into independent zero-sum subgroups the
/// [`GreedyMatcher`] can settle each subgroup locally and do better; both
/// outputs are valid equivalent reductions, they just pick different arcs.
///
/// [`GreedyMatcher`]: crate::optimization::greedy::GreedyMatcher
pub struct LinearMatcher;

impl Simplifier for LinearMatcher {
    fn simplify(&self, graph: &LedgerGraph) -> LedgerGraph {
        let mut result = graph.copy_without_arcs();
        if graph.len() < 2 {
            return result;
        }

        let (mut creditors, mut debtors) = split_by_equity(graph);
        sort_by_magnitude(graph, &mut creditors);
        sort_by_magnitude(graph, &mut debtors);
        if creditors.is_empty() {
            return result;
        }

        let magnitudes = |ids: &[NodeId]| -> Vec<(NodeId, u64)> {
            ids.iter()
                .map(|&id| (id, graph.node(id).equity().unsigned_abs()))
                .collect()
        };
        let arcs = settle_group(&mut result, &magnitudes(&creditors), &magnitudes(&debtors));
        debug!(
            "linear settlement: {} creditors, {} debtors, {} arcs",
            creditors.len(),
            debtors.len(),
            arcs
        );
        result
    }
}
