//! Tree nodes: signed formulas at a position in the tableau

use std::rc::Rc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::formula::{Formula, Term};

/// Index of a node in its tableau's arena
pub type NodeId = usize;

/// Classification of a signed formula, one per rule
///
/// The `N` variants are the formulas asserted false. There is no positive
/// negation: a true negation is folded at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Atomic,
    NAtomic,
    NNegation,
    Conjunction,
    NConjunction,
    Disjunction,
    NDisjunction,
    Implication,
    NImplication,
    Biimplication,
    NBiimplication,
    Universal,
    NUniversal,
    Existential,
    NExistential,
}

impl NodeType {
    /// Derive the type of a signed formula
    ///
    /// A true negation is typed as its body asserted false, the same fold
    /// [`TreeNode::new`] applies to the stored formula.
    pub fn of(formula: &Formula, truth_value: bool) -> Self {
        match (formula, truth_value) {
            (Formula::Atom(_), true) => NodeType::Atomic,
            (Formula::Atom(_), false) => NodeType::NAtomic,
            (Formula::Not(inner), true) => NodeType::of(inner, false),
            (Formula::Not(_), false) => NodeType::NNegation,
            (Formula::And(_, _), true) => NodeType::Conjunction,
            (Formula::And(_, _), false) => NodeType::NConjunction,
            (Formula::Or(_, _), true) => NodeType::Disjunction,
            (Formula::Or(_, _), false) => NodeType::NDisjunction,
            (Formula::Implies(_, _), true) => NodeType::Implication,
            (Formula::Implies(_, _), false) => NodeType::NImplication,
            (Formula::Iff(_, _), true) => NodeType::Biimplication,
            (Formula::Iff(_, _), false) => NodeType::NBiimplication,
            (Formula::Forall(_, _), true) => NodeType::Universal,
            (Formula::Forall(_, _), false) => NodeType::NUniversal,
            (Formula::Exists(_, _), true) => NodeType::Existential,
            (Formula::Exists(_, _), false) => NodeType::NExistential,
        }
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, NodeType::Atomic | NodeType::NAtomic)
    }

    /// Gamma-type nodes, which may be instantiated again with new terms
    pub fn is_reusable(&self) -> bool {
        matches!(self, NodeType::Universal | NodeType::NExistential)
    }

    pub fn is_quantified(&self) -> bool {
        matches!(
            self,
            NodeType::Universal | NodeType::NUniversal | NodeType::Existential | NodeType::NExistential
        )
    }

    /// Whether the rule for this type splits every branch in two
    pub fn is_branching(&self) -> bool {
        matches!(
            self,
            NodeType::NConjunction
                | NodeType::Disjunction
                | NodeType::Implication
                | NodeType::Biimplication
                | NodeType::NBiimplication
        )
    }
}

/// A signed formula occupying a position in the tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) formula: Rc<Formula>,
    pub(crate) truth_value: bool,
    pub(crate) node_type: NodeType,
    pub(crate) ticked: bool,
    pub(crate) closed: bool,
    pub(crate) branch_closed: bool,
    pub(crate) contradictory: bool,
    /// Already compared against all its ancestors by the closure checker
    pub(crate) compared: bool,
    pub(crate) removed: bool,
    pub(crate) developed_from: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) used_terms: IndexSet<Term>,
}

impl TreeNode {
    /// Create a detached node
    ///
    /// A node asserting `¬φ` true is rewritten to assert `φ` false. Atomic
    /// nodes start ticked.
    pub(crate) fn new(id: NodeId, formula: Rc<Formula>, truth_value: bool) -> Self {
        let (formula, truth_value) = match (formula.as_ref(), truth_value) {
            (Formula::Not(inner), true) => (Rc::clone(inner), false),
            _ => (formula, truth_value),
        };
        let node_type = NodeType::of(&formula, truth_value);

        TreeNode {
            id,
            formula,
            truth_value,
            node_type,
            ticked: node_type.is_atomic(),
            closed: false,
            branch_closed: false,
            contradictory: false,
            compared: false,
            removed: false,
            developed_from: None,
            parent: None,
            children: Vec::new(),
            used_terms: IndexSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn formula(&self) -> &Rc<Formula> {
        &self.formula
    }

    pub fn truth_value(&self) -> bool {
        self.truth_value
    }

    /// The asserted formula, negated when the node asserts it false
    pub fn signed_formula(&self) -> Formula {
        if self.truth_value {
            self.formula.as_ref().clone()
        } else {
            self.formula.negate()
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn is_ticked(&self) -> bool {
        self.ticked
    }

    /// True on the node that witnesses the closure of its branch
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_branch_closed(&self) -> bool {
        self.branch_closed
    }

    pub fn is_contradictory(&self) -> bool {
        self.contradictory
    }

    pub fn developed_from(&self) -> Option<NodeId> {
        self.developed_from
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Terms this node has been instantiated with, in order of use
    pub fn used_terms(&self) -> &IndexSet<Term> {
        &self.used_terms
    }

    /// Whether two nodes assert the same formula under opposite signs
    pub fn contradicts(&self, other: &TreeNode) -> bool {
        self.truth_value != other.truth_value && self.formula == other.formula
    }
}
