//! # debt-netting
//!
//! Debt graph simplification engine.
//!
//! Given a directed graph of bilateral debts — an arc `(A -> B, w)` means
//! "A lent B the amount `w`" — this engine computes an equivalent graph in
//! which every party's net position (equity) is unchanged, using fewer arcs
//! and no more total flow than the input.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: nodes, the ledger graph, loan records
//! - **graph** — Directed-cycle search over the ledger graph
//! - **optimization** — The simplification strategies and their shared
//!   combinatorial machinery
//! - **simulation** — Random debt network generation for testing and
//!   benchmarking

pub mod core;
pub mod graph;
pub mod optimization;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::error::LedgerError;
    pub use crate::core::graph::LedgerGraph;
    pub use crate::core::loan::LoanRecord;
    pub use crate::core::node::NodeId;
    pub use crate::optimization::cycle_cancel::CycleCanceller;
    pub use crate::optimization::greedy::GreedyMatcher;
    pub use crate::optimization::linear::LinearMatcher;
    pub use crate::optimization::{SimplificationReport, Simplifier};
}
