use crate::core::error::LedgerError;
use crate::core::loan::LoanRecord;
use crate::core::node::{LedgerNode, NodeId};
use std::collections::HashMap;
use std::fmt;

/// A directed graph of bilateral debts.
///
/// Nodes live in a graph-owned arena and are addressed by [`NodeId`]. Each
/// arc `(lender -> borrower, w)` means the lender is owed `w` by the
/// borrower; arc weights are strictly positive, and a weight driven to zero
/// deletes the arc. The graph caches its edge count and total flow (sum of
/// all arc weights) and maintains both — along with every node's equity —
/// incrementally on each mutation.
///
/// Node enumeration and per-node arc enumeration follow insertion order, so
/// a given construction sequence always produces the same traversals and the
/// same simplification results.
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
///
/// assert_eq!(graph.node(a).equity(), 100);
/// assert_eq!(graph.node(b).equity(), -100);
/// assert_eq!(graph.total_flow(), 100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LedgerGraph {
    names: HashMap<String, NodeId>,
    slots: Vec<Option<LedgerNode>>,
    order: Vec<NodeId>,
    edge_amount: usize,
    total_flow: u64,
}

impl LedgerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with the given name, or returns the existing node's id.
    ///
    /// Re-adding a name is a no-op, not an error.
    pub fn add(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        if let Some(&id) = self.names.get(&name) {
            return id;
        }
        let id = NodeId(self.slots.len() as u32);
        self.names.insert(name.clone(), id);
        self.slots.push(Some(LedgerNode::new(name)));
        self.order.push(id);
        id
    }

    /// Looks a node up by name.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Returns whether a node with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Borrows the node behind an id.
    ///
    /// # Panics
    ///
    /// Panics if the id is stale or foreign; passing an id that did not come
    /// from this graph is a caller bug.
    pub fn node(&self, id: NodeId) -> &LedgerNode {
        self.try_node(id)
            .unwrap_or_else(|| panic!("node id {} does not belong to this graph", id))
    }

    fn try_node(&self, id: NodeId) -> Option<&LedgerNode> {
        self.slots.get(id.index()).and_then(|slot| slot.as_ref())
    }

    fn require(&self, id: NodeId) -> Result<(), LedgerError> {
        match self.try_node(id) {
            Some(_) => Ok(()),
            None => Err(LedgerError::UnknownNode(id)),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut LedgerNode {
        self.slots[id.index()]
            .as_mut()
            .expect("live node behind a validated id")
    }

    /// The net position of the named node, if present.
    pub fn equity_of(&self, name: &str) -> Option<i64> {
        self.get(name).map(|id| self.node(id).equity())
    }

    /// The number of nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The number of arcs, from the incrementally maintained cache.
    pub fn edge_amount(&self) -> usize {
        self.edge_amount
    }

    /// The sum of all arc weights, from the incrementally maintained cache.
    pub fn total_flow(&self) -> u64 {
        self.total_flow
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// Nodes with their ids, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &LedgerNode)> + '_ {
        self.order.iter().map(move |&id| (id, self.node(id)))
    }

    /// The weight of the arc `lender -> borrower`, if it exists.
    pub fn weight(&self, lender: NodeId, borrower: NodeId) -> Option<u64> {
        self.try_node(lender).and_then(|n| n.weight_to(borrower))
    }

    /// Records that `lender` lent `amount` to `borrower`.
    ///
    /// Lending is cumulative: if the arc already exists, `amount` is added
    /// onto it; otherwise a new arc is created. The lender's equity rises by
    /// `amount`, the borrower's falls by `amount`, and the total flow rises
    /// by `amount`.
    ///
    /// # Errors
    ///
    /// Rejects a zero amount, a self-loop, and ids that do not belong to
    /// this graph.
    pub fn connect(
        &mut self,
        lender: NodeId,
        borrower: NodeId,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroWeight);
        }
        self.require(lender)?;
        self.require(borrower)?;
        if lender == borrower {
            return Err(LedgerError::SelfLoop {
                name: self.node(lender).name().to_string(),
            });
        }

        let created = self.node_mut(lender).credit_out(borrower, amount);
        self.node_mut(borrower).credit_in(lender, amount);
        self.node_mut(lender).adjust_equity(amount as i64);
        self.node_mut(borrower).adjust_equity(-(amount as i64));

        if created {
            self.edge_amount += 1;
        }
        self.total_flow += amount;
        Ok(())
    }

    /// Replaces the weight of an existing arc `lender -> borrower`.
    ///
    /// Equities and total flow move by the delta between the new and old
    /// weight. A new weight of zero deletes the arc — a zero-weight arc is
    /// never observable.
    ///
    /// # Errors
    ///
    /// Rejects ids that do not belong to this graph, and returns
    /// [`LedgerError::MissingArc`] if the arc does not exist.
    pub fn set_weight(
        &mut self,
        lender: NodeId,
        borrower: NodeId,
        new_weight: u64,
    ) -> Result<(), LedgerError> {
        self.require(lender)?;
        self.require(borrower)?;
        let old = match self.node(lender).weight_to(borrower) {
            Some(w) => w,
            None => {
                return Err(LedgerError::MissingArc {
                    lender: self.node(lender).name().to_string(),
                    borrower: self.node(borrower).name().to_string(),
                })
            }
        };

        if new_weight == 0 {
            self.remove_arc(lender, borrower)?;
            return Ok(());
        }

        self.node_mut(lender).set_out(borrower, new_weight);
        self.node_mut(borrower).set_in(lender, new_weight);

        let delta = new_weight as i64 - old as i64;
        self.node_mut(lender).adjust_equity(delta);
        self.node_mut(borrower).adjust_equity(-delta);
        self.total_flow = (self.total_flow as i64 + delta) as u64;
        Ok(())
    }

    /// Deletes the arc `lender -> borrower` if present, reversing the
    /// equity and cache contributions it carried.
    ///
    /// Returns whether an arc was removed; a missing arc is a no-op.
    pub fn remove_arc(&mut self, lender: NodeId, borrower: NodeId) -> Result<bool, LedgerError> {
        self.require(lender)?;
        self.require(borrower)?;

        let weight = match self.node_mut(lender).remove_out(borrower) {
            Some(w) => w,
            None => return Ok(false),
        };
        self.node_mut(borrower).remove_in(lender);
        self.node_mut(lender).adjust_equity(-(weight as i64));
        self.node_mut(borrower).adjust_equity(weight as i64);
        self.edge_amount -= 1;
        self.total_flow -= weight;
        Ok(true)
    }

    /// Removes a node, severing all its arcs in both directions.
    ///
    /// Counterparty equities and the graph caches are updated arc by arc
    /// before the node is forgotten.
    pub fn remove(&mut self, id: NodeId) -> Result<(), LedgerError> {
        self.require(id)?;

        // Snapshot, then sever: the adjacency cannot be walked while the
        // arcs are being deleted.
        let borrowers: Vec<NodeId> = self.node(id).borrowers().iter().map(|&(b, _)| b).collect();
        let lenders: Vec<NodeId> = self.node(id).lenders().iter().map(|&(l, _)| l).collect();
        for borrower in borrowers {
            self.remove_arc(id, borrower)?;
        }
        for lender in lenders {
            self.remove_arc(lender, id)?;
        }

        let name = self.node(id).name().to_string();
        self.names.remove(&name);
        self.order.retain(|&n| n != id);
        self.slots[id.index()] = None;
        Ok(())
    }

    /// A copy with the same nodes under the same ids but no arcs and all
    /// equities zero.
    ///
    /// Strategies that rebuild the arc set from scratch settle onto a copy
    /// like this, reading equities from the input graph through the shared
    /// ids.
    pub fn copy_without_arcs(&self) -> Self {
        let slots = self
            .slots
            .iter()
            .map(|slot| {
                slot.as_ref()
                    .map(|node| LedgerNode::new(node.name().to_string()))
            })
            .collect();
        Self {
            names: self.names.clone(),
            slots,
            order: self.order.clone(),
            edge_amount: 0,
            total_flow: 0,
        }
    }

    /// Builds a graph from loan records, creating nodes on first mention.
    pub fn from_loans(loans: &[LoanRecord]) -> Result<Self, LedgerError> {
        let mut graph = Self::new();
        for loan in loans {
            let lender = graph.add(loan.from.as_str());
            let borrower = graph.add(loan.to.as_str());
            graph.connect(lender, borrower, loan.amount)?;
        }
        Ok(graph)
    }

    /// Flattens the graph into loan records, one per arc, in iteration order.
    pub fn to_loans(&self) -> Vec<LoanRecord> {
        let mut loans = Vec::with_capacity(self.edge_amount);
        for (_, node) in self.nodes() {
            for &(borrower, amount) in node.borrowers() {
                loans.push(LoanRecord {
                    from: node.name().to_string(),
                    to: self.node(borrower).name().to_string(),
                    amount,
                });
            }
        }
        loans
    }

    /// True iff both graphs have the same node-name set and every name
    /// carries exactly the same equity. Arc structure may differ — this is
    /// the equivalence a simplification must preserve.
    pub fn is_equivalent_to(&self, other: &LedgerGraph) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.nodes().all(|(_, node)| {
            other
                .equity_of(node.name())
                .is_some_and(|equity| equity == node.equity())
        })
    }

    /// Validates every incrementally maintained quantity against a
    /// from-scratch recomputation: per-node equities, mirror symmetry of the
    /// adjacency lists, strict arc positivity, the edge and flow caches, and
    /// the zero sum of all equities.
    pub fn is_consistent(&self) -> bool {
        let mut edges = 0usize;
        let mut flow = 0u64;
        let mut equity_sum = 0i64;

        for (id, node) in self.nodes() {
            let mut out_sum = 0i64;
            let mut in_sum = 0i64;
            for &(borrower, weight) in node.borrowers() {
                if weight == 0 {
                    return false;
                }
                match self.try_node(borrower) {
                    Some(counterparty) => {
                        if counterparty
                            .lenders()
                            .iter()
                            .find(|(l, _)| *l == id)
                            .map(|(_, w)| *w)
                            != Some(weight)
                        {
                            return false;
                        }
                    }
                    None => return false,
                }
                out_sum += weight as i64;
                edges += 1;
                flow += weight;
            }
            for &(lender, weight) in node.lenders() {
                if self.weight(lender, id) != Some(weight) {
                    return false;
                }
                in_sum += weight as i64;
            }
            if node.equity() != out_sum - in_sum {
                return false;
            }
            equity_sum += node.equity();
        }

        edges == self.edge_amount && flow == self.total_flow && equity_sum == 0
    }
}

impl fmt::Display for LedgerGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} nodes, {} edges, {} flow]",
            self.len(),
            self.edge_amount,
            self.total_flow
        )
    }
}
