//! The truth tree
//!
//! A [`Tableau`] is an arena of [`TreeNode`]s addressed by [`NodeId`]. Nodes
//! refer to their parent, children and the node they were developed from by
//! index. Removed nodes stay in the arena as tombstones so that ids handed
//! out earlier keep pointing at the same slot; any operation given a removed
//! id fails with [`ErrorCode::RemovedNode`](crate::error::ErrorCode).
//!
//! # Example
//!
//! ```
//! use truthtree::formula::Formula;
//! use truthtree::tree::Tableau;
//!
//! // A & B true
//! let mut tree = Tableau::new(Formula::and(Formula::prop("A"), Formula::prop("B")), true);
//! let root = tree.root();
//! assert!(tree.develop(root, None).unwrap());
//! assert_eq!(tree.node_count(), 3);
//! assert_eq!(tree.open_branches(), 1);
//! ```

mod closure;
pub mod context;
pub mod node;
mod removal;
pub mod rules;
pub mod snapshot;

use std::rc::Rc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TreeError};
use crate::formula::{Formula, Term};

pub use context::{TreeContext, DEFAULT_TERM_PREFIX};
pub use node::{NodeId, NodeType, TreeNode};
pub use rules::{expansion, Expansion};
pub use snapshot::TreeSnapshot;

/// Per-tree settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Prefix for synthesized term names
    pub term_prefix: String,
    /// Register the free identifiers of every premise as tree terms
    pub seed_constants: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            term_prefix: DEFAULT_TERM_PREFIX.to_string(),
            seed_constants: true,
        }
    }
}

/// A truth tree under construction
#[derive(Debug, Clone)]
pub struct Tableau {
    pub(crate) nodes: Vec<TreeNode>,
    pub(crate) context: TreeContext,
    root: NodeId,
    options: TreeOptions,
}

impl Tableau {
    /// Start a tree whose root asserts `formula` with the given truth value
    pub fn new(formula: Formula, truth_value: bool) -> Self {
        Self::with_options(formula, truth_value, TreeOptions::default())
    }

    pub fn with_options(formula: Formula, truth_value: bool, options: TreeOptions) -> Self {
        let mut tree = Tableau {
            nodes: Vec::new(),
            context: TreeContext::new(options.term_prefix.clone()),
            root: 0,
            options,
        };
        tree.seed_terms(&formula);
        tree.root = tree.create_node(Rc::new(formula), truth_value);
        debug!(root = tree.root, node_type = ?tree.nodes[tree.root].node_type, "tree created");
        tree
    }

    /// Add a premise below the only leaf of an unbranched tree
    ///
    /// Does not run the closure checker; call [`Tableau::check_closed`] on
    /// the root once every premise is in.
    pub fn assume(&mut self, formula: Formula, truth_value: bool) -> Result<NodeId> {
        let leaves = self.leaves_below(self.root, false);
        let leaf = match leaves.as_slice() {
            [leaf] => *leaf,
            _ => return Err(TreeError::premise_after_branching(leaves.len())),
        };
        if self.nodes[leaf].branch_closed {
            return Err(TreeError::closed_branch(leaf));
        }

        self.seed_terms(&formula);
        let id = self.create_node(Rc::new(formula), truth_value);
        self.append(leaf, id, None);
        debug!(node = id, parent = leaf, node_type = ?self.nodes[id].node_type, "premise added");
        Ok(id)
    }

    /// Apply the rule for `id` below every open leaf it dominates
    ///
    /// `term` overrides the term chosen for quantified nodes and is ignored
    /// for everything else. Returns `Ok(false)` when there is nothing to do:
    /// the node is already ticked or all of its branches are closed.
    pub fn develop(&mut self, id: NodeId, term: Option<Term>) -> Result<bool> {
        if self.live(id)?.ticked {
            return Ok(false);
        }
        let leaves = self.leaves_below(id, true);
        if leaves.is_empty() {
            debug!(node = id, "no open leaves to develop");
            return Ok(false);
        }
        if !self.apply_rule(id, &leaves, term) {
            return Ok(false);
        }
        self.close_branches(id);
        Ok(true)
    }

    /// Look up a live node
    pub fn node(&self, id: NodeId) -> Result<&TreeNode> {
        self.live(id)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Live nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| !n.removed)
    }

    pub fn node_count(&self) -> usize {
        self.context.node_count()
    }

    pub fn open_branches(&self) -> usize {
        self.context.open_branches()
    }

    pub fn worklist(&self) -> &[NodeId] {
        self.context.worklist()
    }

    pub fn terms(&self) -> &IndexSet<Term> {
        self.context.terms()
    }

    pub fn context(&self) -> &TreeContext {
        &self.context
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Nothing left to develop, or every branch closed
    pub fn is_finished(&self) -> bool {
        self.context.worklist.is_empty() || self.context.num_open == 0
    }

    /// Whether a reusable node has been instantiated with every tree term
    pub fn is_saturated(&self, id: NodeId) -> Result<bool> {
        let node = self.live(id)?;
        Ok(!node.used_terms.is_empty()
            && self.context.terms.iter().all(|t| node.used_terms.contains(t)))
    }

    /// Move a node to the back of the worklist
    pub fn defer(&mut self, id: NodeId) -> Result<()> {
        self.live(id)?;
        self.context.defer(id);
        Ok(())
    }

    pub(crate) fn live(&self, id: NodeId) -> Result<&TreeNode> {
        match self.nodes.get(id) {
            Some(node) if node.removed => Err(TreeError::removed_node(id)),
            Some(node) => Ok(node),
            None => Err(TreeError::unknown_node(id, self.nodes.len())),
        }
    }

    pub(crate) fn create_node(&mut self, formula: Rc<Formula>, truth_value: bool) -> NodeId {
        let id = self.nodes.len();
        let node = TreeNode::new(id, formula, truth_value);
        self.context.register(&node);
        self.nodes.push(node);
        id
    }

    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId, developed_from: Option<NodeId>) {
        self.nodes[child].parent = Some(parent);
        self.nodes[child].developed_from = developed_from;
        self.nodes[parent].children.push(child);
    }

    fn seed_terms(&mut self, formula: &Formula) {
        if !self.options.seed_constants {
            return;
        }
        for term in formula.free_terms() {
            if self.context.register_term(term.clone()) {
                debug!(term = %term, "seeded term");
            }
        }
    }
}
