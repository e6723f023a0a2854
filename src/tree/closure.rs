//! Branch closure detection

use tracing::{debug, trace};

use super::node::NodeId;
use super::Tableau;
use crate::error::Result;

impl Tableau {
    /// Leaves below `id` (or `id` itself) whose branch is still open
    pub fn open_leaves(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.live(id)?;
        Ok(self.leaves_below(id, true))
    }

    /// Every leaf below `id`, open or closed
    pub fn all_leaves(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.live(id)?;
        Ok(self.leaves_below(id, false))
    }

    /// Leaves below a live node, left to right
    pub(crate) fn leaves_below(&self, id: NodeId, open_only: bool) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            if open_only && node.branch_closed {
                continue;
            }
            if node.children.is_empty() {
                leaves.push(current);
            } else {
                // reversed so leaves come out left to right
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }

    /// Close every open branch below `id` that contains a contradictory pair
    ///
    /// Walks up from each open leaf, comparing each node not yet compared
    /// against all of its ancestors. Returns the number of branches closed.
    pub fn check_closed(&mut self, id: NodeId) -> Result<usize> {
        self.live(id)?;
        Ok(self.close_branches(id))
    }

    pub(crate) fn close_branches(&mut self, id: NodeId) -> usize {
        let mut closed = 0;
        for leaf in self.leaves_below(id, true) {
            let mut current = Some(leaf);
            while let Some(n1) = current {
                if !self.nodes[n1].compared {
                    if let Some(n2) = self.find_contradiction(n1) {
                        self.nodes[n1].contradictory = true;
                        self.nodes[n2].contradictory = true;
                        self.mark_closed(leaf);
                        closed += 1;
                        break;
                    }
                    self.nodes[n1].compared = true;
                }
                current = self.nodes[n1].parent;
            }
        }
        closed
    }

    /// First ancestor of `id` asserting its formula under the opposite sign
    fn find_contradiction(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id];
        let mut ancestor = node.parent;
        while let Some(n2) = ancestor {
            trace!(node = id, ancestor = n2, "comparing");
            if node.contradicts(&self.nodes[n2]) {
                return Some(n2);
            }
            ancestor = self.nodes[n2].parent;
        }
        None
    }

    /// Close the branch ending at `leaf`
    ///
    /// Climbs from the leaf marking nodes branch-closed until reaching a
    /// level that still has an open sibling.
    fn mark_closed(&mut self, leaf: NodeId) {
        self.nodes[leaf].closed = true;
        self.context.num_open = self.context.num_open.saturating_sub(1);
        debug!(leaf, open = self.context.num_open, "branch closed");

        let mut current = leaf;
        loop {
            self.nodes[current].branch_closed = true;
            if !self.nodes[current].ticked {
                self.context.dequeue(current);
            }
            let Some(parent) = self.nodes[current].parent else {
                break;
            };
            let siblings_closed = self.nodes[parent]
                .children
                .iter()
                .all(|&c| self.nodes[c].branch_closed);
            if !siblings_closed {
                break;
            }
            current = parent;
        }
    }
}
