//! The simplification strategies and their shared machinery.

pub mod combinations;
pub mod cycle_cancel;
pub mod greedy;
pub mod linear;
pub mod merge;

use crate::core::graph::LedgerGraph;
use serde::{Deserialize, Serialize};

/// The common contract of every simplification strategy.
///
/// `simplify` takes its own working copy of the input and returns a new
/// graph; the caller's graph is never mutated. The result is equivalent to
/// the input — same node names, same per-node equities — with an edge count
/// and total flow no greater than the input's.
pub trait Simplifier {
    /// Computes an equivalent graph, possibly with fewer arcs and less flow.
    fn simplify(&self, graph: &LedgerGraph) -> LedgerGraph;
}

/// Before/after comparison of a simplification run.
///
/// # Examples
///
/// ```
/// use debt_netting::prelude::*;
///
/// let mut graph = LedgerGraph::new();
/// let a = graph.add("a");
/// let b = graph.add("b");
/// graph.connect(a, b, 100).unwrap();
/// graph.connect(b, a, 60).unwrap();
///
/// let result = CycleCanceller.simplify(&graph);
/// let report = SimplificationReport::compare(&graph, &result);
/// assert!(report.equivalent);
/// assert_eq!(report.edges_after, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplificationReport {
    pub edges_before: usize,
    pub edges_after: usize,
    pub flow_before: u64,
    pub flow_after: u64,
    /// Whether the output preserves every node's equity.
    pub equivalent: bool,
}

impl SimplificationReport {
    /// Compares an input graph with a simplification result.
    pub fn compare(input: &LedgerGraph, output: &LedgerGraph) -> Self {
        Self {
            edges_before: input.edge_amount(),
            edges_after: output.edge_amount(),
            flow_before: input.total_flow(),
            flow_after: output.total_flow(),
            equivalent: input.is_equivalent_to(output),
        }
    }

    /// Edges removed, as a percentage of the input edge count.
    pub fn edge_reduction_percent(&self) -> f64 {
        if self.edges_before == 0 {
            return 0.0;
        }
        let removed = (self.edges_before - self.edges_after) as f64;
        removed * 100.0 / self.edges_before as f64
    }

    /// Flow removed, as a percentage of the input total flow.
    pub fn flow_reduction_percent(&self) -> f64 {
        if self.flow_before == 0 {
            return 0.0;
        }
        let removed = (self.flow_before - self.flow_after) as f64;
        removed * 100.0 / self.flow_before as f64
    }
}

impl std::fmt::Display for SimplificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Simplification Report ===")?;
        writeln!(
            f,
            "Edges:      {} -> {} ({:.1}% removed)",
            self.edges_before,
            self.edges_after,
            self.edge_reduction_percent()
        )?;
        writeln!(
            f,
            "Total flow: {} -> {} ({:.1}% removed)",
            self.flow_before,
            self.flow_after,
            self.flow_reduction_percent()
        )?;
        writeln!(f, "Equivalent: {}", self.equivalent)?;
        Ok(())
    }
}
