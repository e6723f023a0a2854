//! Undoing a development step
//!
//! Removing a node deletes everything causally derived from it: the nodes
//! its rule appended, the branches its rule opened, and recursively whatever
//! was developed from those. The node itself is spliced out of the tree.

use tracing::debug;

use super::node::NodeId;
use super::Tableau;
use crate::error::Result;

impl Tableau {
    /// Remove a node and every node that depends on it
    ///
    /// Returns `Ok(false)` for the root, which cannot be removed. The closure
    /// state of the remaining tree is re-derived afterwards.
    pub fn remove(&mut self, id: NodeId) -> Result<bool> {
        self.live(id)?;
        if id == self.root() {
            return Ok(false);
        }

        let before = self.context.num_nodes;
        self.remove_node(id);
        self.refresh();
        debug!(
            node = id,
            removed = before - self.context.num_nodes,
            open = self.context.num_open,
            "removal finished"
        );
        Ok(true)
    }

    fn remove_node(&mut self, id: NodeId) {
        if self.nodes[id].removed {
            return;
        }

        let mut dependents = Vec::new();
        let mut doomed = Vec::new();
        if !self.nodes[id].node_type.is_atomic() {
            for leaf in self.leaves_below(id, false) {
                let mut current = leaf;
                while current != id {
                    let node = &self.nodes[current];
                    if node.developed_from == Some(id) && !dependents.contains(&current) {
                        dependents.push(current);
                        if let Some(parent) = node.parent {
                            let siblings = &self.nodes[parent].children;
                            if siblings.len() == 2 && !doomed.contains(&siblings[1]) {
                                doomed.push(siblings[1]);
                            }
                        }
                    }
                    match node.parent {
                        Some(parent) => current = parent,
                        None => break,
                    }
                }
            }
        }

        debug!(
            node = id,
            dependents = dependents.len(),
            doomed = doomed.len(),
            "removing node"
        );

        for branch in doomed {
            self.delete_branch(branch);
        }
        for dependent in dependents {
            self.remove_node(dependent);
        }
        self.splice(id);
    }

    /// Detach a subtree and tombstone every node in it
    fn delete_branch(&mut self, head: NodeId) {
        if self.nodes[head].removed {
            return;
        }
        if let Some(parent) = self.nodes[head].parent {
            self.nodes[parent].children.retain(|&c| c != head);
        }

        let mut stack = vec![head];
        while let Some(current) = stack.pop() {
            stack.extend(self.nodes[current].children.iter().copied());
            self.tombstone(current);
        }
    }

    /// Replace a node by its children in its parent's child list
    fn splice(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id].parent else {
            return;
        };
        let children = std::mem::take(&mut self.nodes[id].children);
        for &child in &children {
            self.nodes[child].parent = Some(parent);
        }
        let siblings = &mut self.nodes[parent].children;
        match siblings.iter().position(|&c| c == id) {
            Some(pos) => {
                siblings.splice(pos..=pos, children);
            }
            None => siblings.extend(children),
        }
        self.tombstone(id);
    }

    fn tombstone(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        node.removed = true;
        node.branch_closed = true;
        node.parent = None;
        node.children.clear();
        self.context.dequeue(id);
        self.context.num_nodes -= 1;
    }

    /// Re-derive closure marks, the open-branch count and the worklist
    fn refresh(&mut self) {
        for node in self.nodes.iter_mut().filter(|n| !n.removed) {
            node.closed = false;
            node.branch_closed = false;
            node.contradictory = false;
            node.compared = false;
        }
        self.context.num_open = self.leaves_below(self.root(), false).len();

        let nodes = &self.nodes;
        let eligible = |id: NodeId| !nodes[id].removed && !nodes[id].ticked;
        let mut worklist: Vec<NodeId> = self
            .context
            .worklist
            .iter()
            .copied()
            .filter(|&id| eligible(id))
            .collect();
        for id in 0..nodes.len() {
            if eligible(id) && !worklist.contains(&id) {
                worklist.push(id);
            }
        }
        self.context.worklist = worklist;

        let root = self.root();
        self.close_branches(root);
    }
}
