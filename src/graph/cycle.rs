use crate::core::graph::LedgerGraph;
use crate::core::node::NodeId;
use std::collections::{HashMap, HashSet};

/// Finds one directed cycle in the graph, or `None` if the graph is acyclic.
///
/// Roots are tried in node insertion order; a root whose subtree was fully
/// explored by an earlier root is skipped, since any cycle reachable from it
/// would already have been found.
///
/// The returned nodes are in source-to-sink order: consecutive elements are
/// connected by arcs, and the last element has an arc back to the first.
///
/// # Algorithm
///
/// Iterative depth-first traversal with an explicit frame stack and a parent
/// map. Each step expands a single child of the top frame, so the stack is
/// always exactly the current path; an arc into a node on that path is a
/// genuine back edge, and the cycle is reconstructed by walking parent links
/// from the arc's tail back to its head. Arcs into nodes explored earlier
/// (cross and forward edges) are ignored — they close no cycle.
pub fn find_cycle(graph: &LedgerGraph) -> Option<Vec<NodeId>> {
    let mut explored: HashSet<NodeId> = HashSet::new();

    for root in graph.node_ids() {
        if explored.contains(&root) {
            continue;
        }
        if let Some(cycle) = find_cycle_from(graph, root, &mut explored) {
            return Some(cycle);
        }
    }
    None
}

fn find_cycle_from(
    graph: &LedgerGraph,
    root: NodeId,
    explored: &mut HashSet<NodeId>,
) -> Option<Vec<NodeId>> {
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    let mut on_path: HashSet<NodeId> = HashSet::new();
    // Each frame holds a node and the index of its next unexpanded borrower.
    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
    on_path.insert(root);

    while let Some(frame) = stack.last_mut() {
        let node = frame.0;
        let child_index = frame.1;
        frame.1 += 1;

        let next = match graph.node(node).borrowers().get(child_index) {
            Some(&(next, _)) => next,
            None => {
                stack.pop();
                on_path.remove(&node);
                explored.insert(node);
                continue;
            }
        };

        if on_path.contains(&next) {
            return Some(traceback(next, node, &parent));
        }
        if !explored.contains(&next) {
            parent.insert(next, node);
            on_path.insert(next);
            stack.push((next, 0));
        }
    }
    None
}

/// Walks parent links from `tail` back to `head` and reverses, producing the
/// cycle closed by the back arc `tail -> head`.
fn traceback(head: NodeId, tail: NodeId, parent: &HashMap<NodeId, NodeId>) -> Vec<NodeId> {
    let mut cycle = vec![tail];
    let mut current = tail;
    while current != head {
        current = parent[&current];
        cycle.push(current);
    }
    cycle.reverse();
    cycle
}
