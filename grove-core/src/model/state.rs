// Collapse state machine.
//
//   Leaf       -- never changes
//   Expanded  <-> Collapsed   (toggle)
//
// Collapsing only flips the `collapsed` flag; children are never moved or
// recreated, so render identities survive any number of toggles.

use super::{NodeId, NodeState, TreeModel};

impl TreeModel {
    /// Flip Expanded <-> Collapsed. No-op on a leaf. Returns the new state.
    pub fn toggle(&mut self, nid: NodeId) -> NodeState {
        let node = self.node_mut(nid);
        if !node.children.is_empty() {
            node.collapsed = !node.collapsed;
        }
        node.state()
    }

    pub fn expand(&mut self, nid: NodeId) {
        let node = self.node_mut(nid);
        if !node.children.is_empty() {
            node.collapsed = false;
        }
    }

    pub fn collapse(&mut self, nid: NodeId) {
        let node = self.node_mut(nid);
        if !node.children.is_empty() {
            node.collapsed = true;
        }
    }

    /// Collapse every expanded node below and including `nid`, children
    /// before parents. Subtrees that are already collapsed are left as they
    /// are, so their inner state is restored when they are reopened.
    pub fn collapse_all(&mut self, nid: NodeId) {
        for n in self.expanded_post_order(nid) {
            self.collapse(n);
        }
    }

    /// Expand `nid` and every descendant, parents before children, reaching
    /// into subtrees that were hidden.
    pub fn expand_all(&mut self, nid: NodeId) {
        let mut stack = vec![nid];
        while let Some(n) = stack.pop() {
            self.expand(n);
            stack.extend(self.node(n).children.iter().rev().copied());
        }
    }

    /// Expand every collapsed ancestor of `nid` so it becomes visible.
    /// `nid` itself keeps its state.
    pub fn expand_path_to(&mut self, nid: NodeId) {
        let path: Vec<NodeId> = self.ancestors(nid).collect();
        for a in path.into_iter().rev() {
            self.expand(a);
        }
    }

    /// Post-order over nodes reached through expanded parents only.
    fn expanded_post_order(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(start, false)];
        while let Some((n, visited)) = stack.pop() {
            if visited {
                out.push(n);
                continue;
            }
            stack.push((n, true));
            for &c in self.node(n).visible_children().iter().rev() {
                stack.push((c, false));
            }
        }
        out
    }
}
