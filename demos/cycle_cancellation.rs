//! Cycle cancellation walk-through.
//!
//! Demonstrates the two phases of the cycle canceller on a small circular
//! debt: purging the cycle's bottleneck, then bypassing the leftover
//! 2-hop chain.

use debt_netting::core::graph::LedgerGraph;
use debt_netting::optimization::cycle_cancel::CycleCanceller;
use debt_netting::optimization::{SimplificationReport, Simplifier};

fn print_loans(graph: &LedgerGraph) {
    for loan in graph.to_loans() {
        println!("  {}", loan);
    }
}

fn main() {
    println!("=== debt-netting: cycle cancellation ===\n");

    let mut graph = LedgerGraph::new();
    let a = graph.add("alice");
    let b = graph.add("bob");
    let c = graph.add("carol");
    graph.connect(a, b, 3).unwrap();
    graph.connect(b, c, 2).unwrap();
    graph.connect(c, a, 1).unwrap();

    println!("Input loans:");
    print_loans(&graph);
    println!(
        "\nNet positions: alice {:+}, bob {:+}, carol {:+}\n",
        graph.node(a).equity(),
        graph.node(b).equity(),
        graph.node(c).equity()
    );

    // Phase by phase on a working copy.
    let mut working = graph.clone();
    CycleCanceller::purge_cycles(&mut working);
    println!("After cycle purge (bottleneck 1 subtracted around the loop):");
    print_loans(&working);

    CycleCanceller::bypass_chains(&mut working);
    println!("\nAfter chain bypass (bob's pass-through unit rerouted):");
    print_loans(&working);

    // The one-call version.
    let result = CycleCanceller.simplify(&graph);
    println!("\n{}", SimplificationReport::compare(&graph, &result));
}
