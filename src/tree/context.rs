//! Per-tree counters and registries
//!
//! One [`TreeContext`] belongs to one tableau. It tracks the live node count,
//! the number of open branches, every term introduced so far, and the
//! worklist of nodes that still need developing.

use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::trace;

use super::node::{NodeId, TreeNode};
use crate::formula::Term;

/// Default prefix for synthesized term names
pub const DEFAULT_TERM_PREFIX: &str = "t";

#[derive(Debug, Clone)]
pub struct TreeContext {
    pub(crate) num_nodes: usize,
    pub(crate) num_open: usize,
    pub(crate) terms: IndexSet<Term>,
    pub(crate) worklist: Vec<NodeId>,
    /// Identifiers occurring anywhere in a node formula, bound or free
    names: HashSet<Term>,
    term_prefix: String,
}

impl TreeContext {
    pub fn new(term_prefix: impl Into<String>) -> Self {
        TreeContext {
            num_nodes: 0,
            num_open: 1,
            terms: IndexSet::new(),
            worklist: Vec::new(),
            names: HashSet::new(),
            term_prefix: term_prefix.into(),
        }
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.num_nodes
    }

    pub fn open_branches(&self) -> usize {
        self.num_open
    }

    /// Terms introduced so far, in order of introduction
    pub fn terms(&self) -> &IndexSet<Term> {
        &self.terms
    }

    /// Nodes not yet fully developed, in discovery order
    pub fn worklist(&self) -> &[NodeId] {
        &self.worklist
    }

    pub fn term_prefix(&self) -> &str {
        &self.term_prefix
    }

    /// Count a freshly created node and queue it if it needs developing
    pub(crate) fn register(&mut self, node: &TreeNode) {
        self.num_nodes += 1;
        self.names.extend(node.formula.identifiers());
        if !node.ticked {
            self.worklist.push(node.id);
        }
    }

    pub(crate) fn dequeue(&mut self, id: NodeId) {
        if let Some(pos) = self.worklist.iter().position(|&n| n == id) {
            self.worklist.remove(pos);
        }
    }

    /// Move a node to the back of the worklist
    pub(crate) fn defer(&mut self, id: NodeId) {
        if let Some(pos) = self.worklist.iter().position(|&n| n == id) {
            self.worklist.remove(pos);
            self.worklist.push(id);
        }
    }

    pub(crate) fn register_term(&mut self, term: Term) -> bool {
        self.terms.insert(term)
    }

    /// Choose the term used to instantiate a quantified node
    ///
    /// An explicit term is always honoured. Otherwise reusable nodes take the
    /// oldest tree term they have not been instantiated with yet, and
    /// everything else gets a term that is new to the whole tree.
    pub(crate) fn find_term(&mut self, node: &mut TreeNode, explicit: Option<Term>) -> Term {
        if let Some(term) = explicit {
            self.terms.insert(term.clone());
            node.used_terms.insert(term.clone());
            trace!(node = node.id, term = %term, "using supplied term");
            return term;
        }

        if node.node_type.is_reusable() {
            let unused = self.terms.iter().find(|t| !node.used_terms.contains(*t)).cloned();
            if let Some(term) = unused {
                node.used_terms.insert(term.clone());
                trace!(node = node.id, term = %term, "reusing tree term");
                return term;
            }
        }

        let term = self.fresh_term();
        node.used_terms.insert(term.clone());
        trace!(node = node.id, term = %term, "synthesized fresh term");
        term
    }

    /// Synthesize and register a term that no node formula mentions yet
    fn fresh_term(&mut self) -> Term {
        let mut index = 0;
        loop {
            let term = Term::indexed(&self.term_prefix, index);
            if !self.terms.contains(&term) && !self.names.contains(&term) {
                self.terms.insert(term.clone());
                return term;
            }
            index += 1;
        }
    }
}

impl Default for TreeContext {
    fn default() -> Self {
        Self::new(DEFAULT_TERM_PREFIX)
    }
}
