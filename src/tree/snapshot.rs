//! Read-only, serializable view of a tree for renderers

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::node::{NodeId, NodeType};
use super::Tableau;
use crate::formula::{Formula, Term};

/// A node and, recursively, everything below it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub id: NodeId,
    pub formula: Rc<Formula>,
    pub truth_value: bool,
    pub node_type: NodeType,
    pub ticked: bool,
    pub closed: bool,
    pub branch_closed: bool,
    pub contradictory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developed_from: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub used_terms: Vec<Term>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    /// Number of nodes in this subtree
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeSnapshot::size).sum::<usize>()
    }

    /// Leaves of this subtree whose branch is still open
    pub fn open_leaves(&self) -> usize {
        if self.branch_closed {
            0
        } else if self.children.is_empty() {
            1
        } else {
            self.children.iter().map(TreeSnapshot::open_leaves).sum()
        }
    }
}

impl Tableau {
    pub fn snapshot(&self) -> TreeSnapshot {
        self.snapshot_from(self.root())
    }

    fn snapshot_from(&self, id: NodeId) -> TreeSnapshot {
        let node = &self.nodes[id];
        TreeSnapshot {
            id,
            formula: Rc::clone(&node.formula),
            truth_value: node.truth_value,
            node_type: node.node_type,
            ticked: node.ticked,
            closed: node.closed,
            branch_closed: node.branch_closed,
            contradictory: node.contradictory,
            developed_from: node.developed_from,
            used_terms: node.used_terms.iter().cloned().collect(),
            children: node.children.iter().map(|&c| self.snapshot_from(c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_shape() {
        let a = Formula::prop("A");
        let mut tree = Tableau::new(a.clone(), true);
        let disj = tree
            .assume(Formula::or(Formula::not(a), Formula::prop("B")), true)
            .unwrap();
        tree.develop(disj, None).unwrap();

        let snapshot = tree.snapshot();
        assert_eq!(snapshot.size(), tree.node_count());
        assert_eq!(snapshot.open_leaves(), tree.open_branches());
        assert_eq!(snapshot.children.len(), 1);
        let branches = &snapshot.children[0].children;
        assert_eq!(branches.len(), 2);
        assert!(branches[0].closed);
        assert_eq!(branches[0].developed_from, Some(disj));
        assert!(!branches[1].branch_closed);
    }

    #[test]
    fn test_snapshot_json() {
        let mut tree = Tableau::new(Formula::forall("x", Formula::atom("P", &["x"])), true);
        let root = tree.root();
        tree.develop(root, None).unwrap();

        let json = serde_json::to_value(tree.snapshot()).unwrap();
        assert_eq!(json["node_type"], "Universal");
        assert_eq!(json["used_terms"][0], "t0");
        assert!(json.get("developed_from").is_none());
        assert_eq!(json["children"][0]["developed_from"], 0);

        let back: TreeSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree.snapshot());
    }
}
