use crate::core::graph::LedgerGraph;
use crate::core::node::NodeId;
use crate::optimization::combinations::CombinationIndexGenerator;
use crate::optimization::merge::{settle_group, sort_by_magnitude, split_by_equity};
use crate::optimization::Simplifier;
use log::debug;

/// Greedy combinatorial matcher.
///
/// Partitions nodes by equity sign, sorts both sides ascending by
/// magnitude, and searches creditor subsets (sizes ascending) against
/// debtor subsets for zero-sum groups. Each balanced group found is settled
/// independently with the minimum-edge bipartite merge and its members drop
/// out of the search, so the result favors many small local settlements
/// over long cross-group arcs.
///
/// The zero-sum property of the whole graph guarantees the search settles
/// every node with nonzero equity: the exhaustive subset enumeration cannot
/// terminate with an unmatched remainder.
///
/// Worst-case runtime is exponential in the number of distinct-sign nodes;
/// no artificial bound is imposed. Use [`LinearMatcher`] when the candidate
/// count makes that unacceptable.
///
/// [`LinearMatcher`]: crate::optimization::linear::LinearMatcher
pub struct GreedyMatcher;

impl Simplifier for GreedyMatcher {
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

        let magnitude = |id: NodeId| graph.node(id).equity().unsigned_abs();
        let subset_sum = |ids: &[NodeId], indices: &[usize]| -> u64 {
            indices.iter().map(|&i| magnitude(ids[i])).sum()
        };

        let mut outer = CombinationIndexGenerator::new(creditors.len());
        'outer: while let Some(indices) = outer.advance() {
            let creditor_indices: Vec<usize> = indices.to_vec();
            let credit = subset_sum(&creditors, &creditor_indices);

            // A fresh inner enumeration per creditor subset: the debtor
            // list may have shrunk since the last one.
            let mut inner = CombinationIndexGenerator::new(debtors.len());
            while let Some(indices) = inner.advance() {
                let debtor_indices: Vec<usize> = indices.to_vec();
                let debit = subset_sum(&debtors, &debtor_indices);

                if debit > credit {
                    if inner.has_no_gaps() {
                        // The gapless prefix is the smallest sum of its
                        // size; every remaining debtor subset overshoots.
                        continue 'outer;
                    }
                    continue;
                }
                if debit < credit {
                    continue;
                }

                let group_creditors: Vec<(NodeId, u64)> = creditor_indices
                    .iter()
                    .map(|&i| (creditors[i], magnitude(creditors[i])))
                    .collect();
                let group_debtors: Vec<(NodeId, u64)> = debtor_indices
                    .iter()
                    .map(|&i| (debtors[i], magnitude(debtors[i])))
                    .collect();
                let arcs = settle_group(&mut result, &group_creditors, &group_debtors);
                debug!(
                    "settled group: {} creditors, {} debtors, {} arcs, sum {}",
                    group_creditors.len(),
                    group_debtors.len(),
                    arcs,
                    credit
                );

                remove_indices(&mut creditors, &creditor_indices);
                remove_indices(&mut debtors, &debtor_indices);
                outer.remove();
                continue 'outer;
            }
        }

        assert!(
            creditors.is_empty() && debtors.is_empty(),
            "greedy search exhausted with unsettled nodes"
        );
        result
    }
}

/// Deletes list entries at the given ascending index positions.
fn remove_indices(ids: &mut Vec<NodeId>, indices: &[usize]) {
    for &i in indices.iter().rev() {
        ids.remove(i);
    }
}
