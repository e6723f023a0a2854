//! Decomposition rules
//!
//! Each rule turns one signed formula into the signed formulas to append
//! below every open leaf of the node being developed:
//! - Alpha rules (NNegation, Conjunction, NDisjunction, NImplication) stack
//!   their results on the same branch
//! - Beta rules (NConjunction, Disjunction, Implication and both
//!   biconditionals) split every leaf into two branches
//! - Gamma rules (Universal, NExistential) instantiate with a term and stay
//!   on the worklist
//! - Delta rules (NUniversal, Existential) instantiate with a fresh term

use std::rc::Rc;

use tracing::debug;

use super::node::{NodeId, NodeType, TreeNode};
use super::Tableau;
use crate::formula::{Formula, Term};

/// A formula together with the truth value to assert it under
pub type Signed = (Rc<Formula>, bool);

/// The nodes a rule adds below one leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    /// A single chain on the existing branch
    Linear(Vec<Signed>),
    /// Two new branches, each a chain
    Branching(Vec<Signed>, Vec<Signed>),
}

impl Expansion {
    /// Number of new branches created per leaf
    pub fn branch_delta(&self) -> usize {
        match self {
            Expansion::Linear(_) => 0,
            Expansion::Branching(_, _) => 1,
        }
    }
}

fn signed(formula: &Rc<Formula>, value: bool) -> Signed {
    (Rc::clone(formula), value)
}

fn instance(var: &Term, body: &Rc<Formula>, term: Option<&Term>, value: bool) -> Option<Signed> {
    let term = term?;
    Some((Rc::new(body.substitute(var, term)), value))
}

/// Look up the rule for a node
///
/// `term` is the instantiation term for quantified nodes and is ignored
/// otherwise. Returns `None` for literals, which have no rule, and for a
/// quantified node when no term is given.
pub fn expansion(node: &TreeNode, term: Option<&Term>) -> Option<Expansion> {
    use Expansion::{Branching, Linear};

    let expansion = match (node.formula.as_ref(), node.node_type) {
        (Formula::Not(a), NodeType::NNegation) => Linear(vec![signed(a, true)]),
        (Formula::And(a, b), NodeType::Conjunction) => {
            Linear(vec![signed(a, true), signed(b, true)])
        }
        (Formula::And(a, b), NodeType::NConjunction) => {
            Branching(vec![signed(a, false)], vec![signed(b, false)])
        }
        (Formula::Or(a, b), NodeType::Disjunction) => {
            Branching(vec![signed(a, true)], vec![signed(b, true)])
        }
        (Formula::Or(a, b), NodeType::NDisjunction) => {
            Linear(vec![signed(a, false), signed(b, false)])
        }
        (Formula::Implies(a, b), NodeType::Implication) => {
            Branching(vec![signed(a, false)], vec![signed(b, true)])
        }
        (Formula::Implies(a, b), NodeType::NImplication) => {
            Linear(vec![signed(a, true), signed(b, false)])
        }
        (Formula::Iff(a, b), NodeType::Biimplication) => Branching(
            vec![signed(a, true), signed(b, true)],
            vec![signed(a, false), signed(b, false)],
        ),
        (Formula::Iff(a, b), NodeType::NBiimplication) => Branching(
            vec![signed(a, true), signed(b, false)],
            vec![signed(a, false), signed(b, true)],
        ),
        (Formula::Forall(x, body), NodeType::Universal) => {
            Linear(vec![instance(x, body, term, true)?])
        }
        (Formula::Forall(x, body), NodeType::NUniversal) => {
            Linear(vec![instance(x, body, term, false)?])
        }
        (Formula::Exists(x, body), NodeType::Existential) => {
            Linear(vec![instance(x, body, term, true)?])
        }
        (Formula::Exists(x, body), NodeType::NExistential) => {
            Linear(vec![instance(x, body, term, false)?])
        }
        _ => return None,
    };
    Some(expansion)
}

impl Tableau {
    /// Apply the node's rule below each of `leaves`
    ///
    /// Returns `false` without touching the tree if the node has no rule.
    pub(crate) fn apply_rule(&mut self, id: NodeId, leaves: &[NodeId], term: Option<Term>) -> bool {
        let term = if self.nodes[id].node_type.is_quantified() {
            Some(self.context.find_term(&mut self.nodes[id], term))
        } else {
            None
        };
        let Some(expansion) = expansion(&self.nodes[id], term.as_ref()) else {
            return false;
        };

        debug!(
            node = id,
            node_type = ?self.nodes[id].node_type,
            leaves = leaves.len(),
            term = ?term,
            "applying rule"
        );

        for &leaf in leaves {
            match &expansion {
                Expansion::Linear(chain) => {
                    self.append_chain(leaf, chain, id);
                }
                Expansion::Branching(left, right) => {
                    self.append_chain(leaf, left, id);
                    self.append_chain(leaf, right, id);
                }
            }
        }

        if !self.nodes[id].node_type.is_reusable() {
            self.tick(id, expansion.branch_delta() * leaves.len());
        }
        true
    }

    /// Append `chain` as a single path hanging from `leaf`
    fn append_chain(&mut self, leaf: NodeId, chain: &[Signed], developed_from: NodeId) {
        let mut parent = leaf;
        for (formula, value) in chain {
            let child = self.create_node(Rc::clone(formula), *value);
            self.append(parent, child, Some(developed_from));
            parent = child;
        }
    }

    /// Mark a node as fully developed and account for the branches it opened
    fn tick(&mut self, id: NodeId, new_branches: usize) {
        self.nodes[id].ticked = true;
        self.context.dequeue(id);
        self.context.num_open += new_branches;
    }
}
