//! Random debt network generation.
//!
//! Produces ledger graphs with a controlled density and weight range, for
//! exercising the simplifiers on inputs larger than hand-written fixtures.

use crate::core::graph::LedgerGraph;
use rand::Rng;

/// Configuration for generating a random debt network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of nodes in the network.
    pub node_count: usize,
    /// Probability that any ordered node pair carries a loan.
    pub arc_probability: f64,
    /// Loan weights are drawn uniformly from `1..=max_amount`.
    pub max_amount: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            node_count: 10,
            arc_probability: 0.3,
            max_amount: 1_000,
        }
    }
}

/// Generates a random debt network using the thread-local RNG.
pub fn generate_random_graph(config: &NetworkConfig) -> LedgerGraph {
    generate_random_graph_with(config, &mut rand::thread_rng())
}

/// Generates a random debt network from a caller-supplied RNG, so
/// benchmarks and demos can fix a seed and reproduce a network exactly.
pub fn generate_random_graph_with(config: &NetworkConfig, rng: &mut impl Rng) -> LedgerGraph {
    let mut graph = LedgerGraph::new();
    let ids: Vec<_> = (0..config.node_count)
        .map(|i| graph.add(format!("node-{:03}", i)))
        .collect();

    for &lender in &ids {
        for &borrower in &ids {
            if lender == borrower {
                continue;
            }
            if rng.gen_bool(config.arc_probability) {
                let amount = rng.gen_range(1..=config.max_amount);
                graph
                    .connect(lender, borrower, amount)
                    .expect("generated arcs connect distinct nodes");
            }
        }
    }
    graph
}
