//! Sign partition and the minimum-edge bipartite merge.
//!
//! Every matcher ends the same way: a balanced group of creditors and
//! debtors is settled with the two-pointer merge below, which produces the
//! fewest arcs a greedy all-to-all settlement can — at most
//! `|creditors| + |debtors| - 1` for the group.

use crate::core::graph::LedgerGraph;
use crate::core::node::NodeId;

/// Splits a graph's nodes by equity sign, in insertion order.
///
/// Zero-equity nodes are dropped: they are already settled and need no
/// arcs in the result.
pub fn split_by_equity(graph: &LedgerGraph) -> (Vec<NodeId>, Vec<NodeId>) {
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();
    for (id, node) in graph.nodes() {
        if node.equity() > 0 {
            creditors.push(id);
        } else if node.equity() < 0 {
            debtors.push(id);
        }
    }
    (creditors, debtors)
}

/// Sorts node ids ascending by absolute equity.
///
/// The sort is stable, so equal magnitudes keep their insertion order and
/// the downstream search stays reproducible.
pub fn sort_by_magnitude(graph: &LedgerGraph, ids: &mut [NodeId]) {
    ids.sort_by_key(|&id| graph.node(id).equity().unsigned_abs());
}

/// Settles one balanced group onto `result` and returns the number of arcs
/// created.
///
/// `creditors` and `debtors` carry each node's magnitude (absolute equity).
/// The two-pointer merge compares the head creditor's remainder with the
/// head debtor's, connects them with the smaller of the two, and advances
/// whichever side was fully consumed — the larger side keeps its remainder
/// in place for the next comparison.
///
/// # Panics
///
/// Panics if any magnitude is zero or the two sides do not sum to the same
/// total. Both indicate a bug in the caller's group selection, not bad
/// input.
pub fn settle_group(
    result: &mut LedgerGraph,
    creditors: &[(NodeId, u64)],
    debtors: &[(NodeId, u64)],
) -> usize {
    let credit: u64 = creditors.iter().map(|&(_, m)| m).sum();
    let debit: u64 = debtors.iter().map(|&(_, m)| m).sum();
    assert!(
        creditors.iter().chain(debtors).all(|&(_, m)| m > 0),
        "settlement group holds a zero magnitude"
    );
    assert!(
        credit == debit,
        "settlement group is unbalanced: credit {} vs debit {}",
        credit,
        debit
    );

    let mut remaining_credit: Vec<u64> = creditors.iter().map(|&(_, m)| m).collect();
    let mut remaining_debit: Vec<u64> = debtors.iter().map(|&(_, m)| m).collect();
    let mut pi = 0;
    let mut ni = 0;
    let mut arcs = 0;

    while pi < creditors.len() {
        let lender = creditors[pi].0;
        let borrower = debtors[ni].0;
        let amount = remaining_credit[pi].min(remaining_debit[ni]);
        result
            .connect(lender, borrower, amount)
            .expect("settlement arcs connect distinct live nodes");
        arcs += 1;

        remaining_credit[pi] -= amount;
        remaining_debit[ni] -= amount;
        if remaining_credit[pi] == 0 {
            pi += 1;
        }
        if remaining_debit[ni] == 0 {
            ni += 1;
        }
    }
    arcs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(names: &[&str]) -> (LedgerGraph, Vec<NodeId>) {
        let mut g = LedgerGraph::new();
        let ids = names.iter().map(|&n| g.add(n)).collect();
        (g, ids)
    }

    #[test]
    fn test_split_drops_zero_equity_nodes() {
        let mut g = LedgerGraph::new();
        let a = g.add("a");
        let b = g.add("b");
        let c = g.add("c");
        g.connect(a, b, 5).unwrap();
        g.connect(b, c, 5).unwrap();
        // a: +5, b: 0, c: -5
        let (creditors, debtors) = split_by_equity(&g);
        assert_eq!(creditors, vec![a]);
        assert_eq!(debtors, vec![c]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut g = LedgerGraph::new();
        let a = g.add("a");
        let b = g.add("b");
        let c = g.add("c");
        let sink = g.add("sink");
        g.connect(a, sink, 3).unwrap();
        g.connect(b, sink, 1).unwrap();
        g.connect(c, sink, 3).unwrap();

        let mut ids = vec![a, b, c];
        sort_by_magnitude(&g, &mut ids);
        assert_eq!(ids, vec![b, a, c]);
    }

    #[test]
    fn test_merge_one_to_many() {
        let (mut g, ids) = blank(&["a", "x", "y", "z"]);
        let arcs = settle_group(
            &mut g,
            &[(ids[0], 6)],
            &[(ids[1], 1), (ids[2], 2), (ids[3], 3)],
        );
        assert_eq!(arcs, 3);
        assert_eq!(g.weight(ids[0], ids[1]), Some(1));
        assert_eq!(g.weight(ids[0], ids[2]), Some(2));
        assert_eq!(g.weight(ids[0], ids[3]), Some(3));
        assert_eq!(g.node(ids[0]).equity(), 6);
        assert!(g.is_consistent());
    }

    #[test]
    fn test_merge_interleaves_sides() {
        let (mut g, ids) = blank(&["p", "q", "d", "e"]);
        let arcs = settle_group(&mut g, &[(ids[0], 5), (ids[1], 3)], &[(ids[2], 6), (ids[3], 2)]);
        // p->d 5, q->d 1, q->e 2
        assert_eq!(arcs, 3);
        assert_eq!(g.weight(ids[0], ids[2]), Some(5));
        assert_eq!(g.weight(ids[1], ids[2]), Some(1));
        assert_eq!(g.weight(ids[1], ids[3]), Some(2));
    }

    #[test]
    fn test_merge_equal_heads_advance_both() {
        let (mut g, ids) = blank(&["p", "q", "d", "e"]);
        let arcs = settle_group(&mut g, &[(ids[0], 4), (ids[1], 2)], &[(ids[2], 4), (ids[3], 2)]);
        assert_eq!(arcs, 2);
        assert_eq!(g.weight(ids[0], ids[2]), Some(4));
        assert_eq!(g.weight(ids[1], ids[3]), Some(2));
    }

    #[test]
    fn test_merge_arc_bound() {
        let (mut g, ids) = blank(&["p", "q", "r", "d", "e"]);
        let arcs = settle_group(
            &mut g,
            &[(ids[0], 2), (ids[1], 2), (ids[2], 2)],
            &[(ids[3], 3), (ids[4], 3)],
        );
        assert!(arcs <= 3 + 2 - 1);
        assert_eq!(g.total_flow(), 6);
    }

    #[test]
    #[should_panic(expected = "unbalanced")]
    fn test_merge_rejects_unbalanced_group() {
        let (mut g, ids) = blank(&["p", "d"]);
        settle_group(&mut g, &[(ids[0], 5)], &[(ids[1], 4)]);
    }

    #[test]
    #[should_panic(expected = "zero magnitude")]
    fn test_merge_rejects_zero_magnitude() {
        let (mut g, ids) = blank(&["p", "q", "d"]);
        settle_group(&mut g, &[(ids[0], 5), (ids[1], 0)], &[(ids[2], 5)]);
    }
}
