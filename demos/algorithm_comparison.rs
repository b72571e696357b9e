//! Side-by-side strategy comparison on a random network.
//!
//! Generates a seeded random debt network and runs every strategy against
//! it, reporting edges, flow, and wall-clock time. The network stays small
//! enough for the greedy matcher's exponential search to finish promptly.

use debt_netting::optimization::cycle_cancel::CycleCanceller;
use debt_netting::optimization::greedy::GreedyMatcher;
use debt_netting::optimization::linear::LinearMatcher;
use debt_netting::optimization::Simplifier;
use debt_netting::simulation::random_graph::{generate_random_graph_with, NetworkConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

fn main() {
    println!("=== debt-netting: strategy comparison ===\n");

    let config = NetworkConfig {
        node_count: 12,
        arc_probability: 0.4,
        max_amount: 500,
    };
    let graph = generate_random_graph_with(&config, &mut StdRng::seed_from_u64(42));

    println!(
        "Input: {} nodes, {} edges, {} total flow\n",
        graph.len(),
        graph.edge_amount(),
        graph.total_flow()
    );

    let strategies: Vec<(&str, Box<dyn Simplifier>)> = vec![
        ("linear", Box::new(LinearMatcher)),
        ("greedy", Box::new(GreedyMatcher)),
        ("cycle-cancel", Box::new(CycleCanceller)),
    ];

    println!(
        "{:<14} {:>8} {:>12} {:>12} {:>12}",
        "strategy", "edges", "total flow", "equivalent", "time"
    );
    for (name, strategy) in strategies {
        let start = Instant::now();
        let result = strategy.simplify(&graph);
        let elapsed = start.elapsed();
        println!(
            "{:<14} {:>8} {:>12} {:>12} {:>9.2?}",
            name,
            result.edge_amount(),
            result.total_flow(),
            graph.is_equivalent_to(&result),
            elapsed
        );
    }
}
