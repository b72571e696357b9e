use crate::core::graph::LedgerGraph;
use crate::core::node::NodeId;
use crate::graph::cycle::find_cycle;
use crate::optimization::Simplifier;
use log::debug;

/// Cycle purge + chain bypass simplifier.
///
/// Works directly on a deep copy of the input in two phases:
///
/// 1. **Purge** — while the graph has a directed cycle, subtract the
///    cycle's bottleneck (minimum arc weight) from every arc in it,
///    deleting arcs that reach zero. Around a full cycle each member loses
///    the same amount of outgoing and incoming flow, so no equity moves.
/// 2. **Bypass** — once acyclic, collapse 2-hop chains: for a path
///    `a -> b -> c`, shift `w = min(weight(a,b), weight(b,c))` off both
///    arcs and onto the direct arc `a -> c`. The intermediary's
///    pass-through flow disappears; total flow drops by `w` every step, so
///    the phase terminates, and a bypass can never re-create a cycle in an
///    acyclic graph.
///
/// The output is an acyclic, chain-free graph equivalent to the input with
/// no more edges and no more flow.
pub struct CycleCanceller;

impl Simplifier for CycleCanceller {
    fn simplify(&self, graph: &LedgerGraph) -> LedgerGraph {
        let mut result = graph.clone();
        if result.len() < 2 {
            return result;
        }
        Self::purge_cycles(&mut result);
        Self::bypass_chains(&mut result);
        result
    }
}

impl CycleCanceller {
    /// Runs the purge phase to a fixed point: afterwards the graph is
    /// acyclic. A no-op on an already-acyclic graph.
    pub fn purge_cycles(graph: &mut LedgerGraph) {
        let mut purged = 0usize;
        while let Some(cycle) = find_cycle(graph) {
            purge(graph, &cycle);
            purged += 1;
        }
        debug!("purged {} cycles, {} edges remain", purged, graph.edge_amount());
    }

    /// Runs the bypass phase to a fixed point: afterwards no node both owes
    /// and is owed along a 2-hop chain.
    ///
    /// Expects an acyclic graph; on a cyclic one the 2-hop endpoint can
    /// coincide with the chain's head, which the arc primitive rejects as a
    /// self-loop.
    pub fn bypass_chains(graph: &mut LedgerGraph) {
        let mut bypassed = 0usize;
        while let Some((a, b, c)) = find_chain(graph) {
            bypass(graph, a, b, c);
            bypassed += 1;
        }
        debug!(
            "bypassed {} chains, {} edges and {} flow remain",
            bypassed,
            graph.edge_amount(),
            graph.total_flow()
        );
    }
}

/// Subtracts the cycle's bottleneck from every arc along it; at least one
/// arc (the bottleneck's) reaches zero and is deleted.
fn purge(graph: &mut LedgerGraph, cycle: &[NodeId]) {
    let arc = |i: usize| (cycle[i], cycle[(i + 1) % cycle.len()]);

    let mut bottleneck = u64::MAX;
    for i in 0..cycle.len() {
        let (lender, borrower) = arc(i);
        let weight = graph
            .weight(lender, borrower)
            .expect("cycle arcs exist in the graph that produced them");
        bottleneck = bottleneck.min(weight);
    }

    for i in 0..cycle.len() {
        let (lender, borrower) = arc(i);
        let weight = graph.weight(lender, borrower).unwrap();
        if weight == bottleneck {
            graph.remove_arc(lender, borrower).unwrap();
        } else {
            graph.set_weight(lender, borrower, weight - bottleneck).unwrap();
        }
    }
}

/// Finds any 2-hop directed path in node iteration order.
fn find_chain(graph: &LedgerGraph) -> Option<(NodeId, NodeId, NodeId)> {
    for a in graph.node_ids() {
        for &(b, _) in graph.node(a).borrowers() {
            if let Some(&(c, _)) = graph.node(b).borrowers().first() {
                return Some((a, b, c));
            }
        }
    }
    None
}

/// Reroutes the chain's common flow past the intermediary.
fn bypass(graph: &mut LedgerGraph, a: NodeId, b: NodeId, c: NodeId) {
    let ab = graph.weight(a, b).expect("chain arc a -> b exists");
    let bc = graph.weight(b, c).expect("chain arc b -> c exists");
    let shifted = ab.min(bc);

    if ab == shifted {
        graph.remove_arc(a, b).unwrap();
    } else {
        graph.set_weight(a, b, ab - shifted).unwrap();
    }
    if bc == shifted {
        graph.remove_arc(b, c).unwrap();
    } else {
        graph.set_weight(b, c, bc - shifted).unwrap();
    }
    graph
        .connect(a, c, shifted)
        .expect("bypass endpoints are distinct in an acyclic graph");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(arcs: &[(&str, &str, u64)]) -> LedgerGraph {
        let mut g = LedgerGraph::new();
        for &(from, to, amount) in arcs {
            let lender = g.add(from);
            let borrower = g.add(to);
            g.connect(lender, borrower, amount).unwrap();
        }
        g
    }

    #[test]
    fn test_three_node_cycle() {
        let g = graph_of(&[("a", "b", 3), ("b", "c", 2), ("c", "a", 1)]);
        let result = CycleCanceller.simplify(&g);

        assert_eq!(result.len(), 3);
        assert_eq!(result.edge_amount(), 2);
        assert_eq!(result.total_flow(), 2);
        assert!(g.is_equivalent_to(&result));
        assert!(result.is_consistent());

        // Purging the cycle leaves a->b=2, b->c=1; bypassing the remaining
        // chain routes the common unit directly: a->b=1, a->c=1.
        let a = result.get("a").unwrap();
        let b = result.get("b").unwrap();
        let c = result.get("c").unwrap();
        assert_eq!(result.weight(a, b), Some(1));
        assert_eq!(result.weight(a, c), Some(1));
        assert_eq!(result.node(a).equity(), 2);
        assert_eq!(result.node(b).equity(), -1);
        assert_eq!(result.node(c).equity(), -1);
    }

    #[test]
    fn test_balanced_four_cycle_cancels_completely() {
        let g = graph_of(&[
            ("n1", "n2", 10),
            ("n2", "n3", 10),
            ("n3", "n4", 10),
            ("n4", "n1", 10),
        ]);
        let result = CycleCanceller.simplify(&g);
        assert_eq!(result.edge_amount(), 0);
        assert_eq!(result.total_flow(), 0);
        assert!(g.is_equivalent_to(&result));
        assert!(result.is_consistent());
    }

    #[test]
    fn test_purge_is_a_noop_on_acyclic_graph() {
        let mut g = graph_of(&[("a", "b", 5), ("b", "c", 3), ("a", "c", 2)]);
        let before_edges = g.edge_amount();
        let before_flow = g.total_flow();
        CycleCanceller::purge_cycles(&mut g);
        assert_eq!(g.edge_amount(), before_edges);
        assert_eq!(g.total_flow(), before_flow);
    }

    #[test]
    fn test_bypass_collapses_long_chain() {
        let mut g = graph_of(&[("a", "b", 4), ("b", "c", 4), ("c", "d", 4)]);
        CycleCanceller::bypass_chains(&mut g);
        let a = g.get("a").unwrap();
        let d = g.get("d").unwrap();
        assert_eq!(g.weight(a, d), Some(4));
        assert_eq!(g.edge_amount(), 1);
        assert_eq!(g.total_flow(), 4);
        assert!(g.is_consistent());
    }

    #[test]
    fn test_bypass_chain_beyond_first_node() {
        // The first node in iteration order has no outgoing arcs; the
        // chain hangs off a later node and must still be found.
        let mut g = LedgerGraph::new();
        g.add("z");
        let a = g.add("a");
        let b = g.add("b");
        let c = g.add("c");
        g.connect(a, b, 2).unwrap();
        g.connect(b, c, 3).unwrap();
        CycleCanceller::bypass_chains(&mut g);
        assert_eq!(g.weight(a, c), Some(2));
        assert_eq!(g.weight(b, c), Some(1));
        assert_eq!(g.weight(a, b), None);
    }

    #[test]
    fn test_bypass_accumulates_onto_existing_direct_arc() {
        let mut g = graph_of(&[("a", "b", 2), ("b", "c", 2), ("a", "c", 1)]);
        CycleCanceller::bypass_chains(&mut g);
        let a = g.get("a").unwrap();
        let c = g.get("c").unwrap();
        assert_eq!(g.weight(a, c), Some(3));
        assert_eq!(g.edge_amount(), 1);
        assert!(g.is_consistent());
    }

    #[test]
    fn test_asymmetric_two_cycle_nets_to_single_arc() {
        let g = graph_of(&[("a", "b", 100), ("b", "a", 60)]);
        let result = CycleCanceller.simplify(&g);
        let a = result.get("a").unwrap();
        let b = result.get("b").unwrap();
        assert_eq!(result.weight(a, b), Some(40));
        assert_eq!(result.edge_amount(), 1);
        assert!(g.is_equivalent_to(&result));
    }

    #[test]
    fn test_input_graph_is_untouched() {
        let g = graph_of(&[("a", "b", 3), ("b", "c", 2), ("c", "a", 1)]);
        let _ = CycleCanceller.simplify(&g);
        assert_eq!(g.edge_amount(), 3);
        assert_eq!(g.total_flow(), 6);
    }

    #[test]
    fn test_single_node_graph() {
        let mut g = LedgerGraph::new();
        g.add("solo");
        let result = CycleCanceller.simplify(&g);
        assert_eq!(result.len(), 1);
        assert_eq!(result.edge_amount(), 0);
    }
}
