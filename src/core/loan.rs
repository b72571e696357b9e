use serde::{Deserialize, Serialize};
use std::fmt;

/// A single loan: `from` lent `to` the given positive `amount`.
///
/// This triple is the only wire format the engine accepts — loan files, the
/// CLI and test fixtures all reduce to lists of these. Amounts are integral
/// units of whatever the network settles in.
///
/// # Examples
///
/// ```
/// use debt_netting::prelude::*;
///
/// let loan = LoanRecord::new("alice", "bob", 250);
/// let graph = LedgerGraph::from_loans(&[loan]).unwrap();
/// assert_eq!(graph.equity_of("alice"), Some(250));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// The lender.
    pub from: String,
    /// The borrower.
    pub to: String,
    /// The amount lent. Must be positive.
    pub amount: u64,
}

impl LoanRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: u64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

impl fmt::Display for LoanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}
