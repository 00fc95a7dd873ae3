//! Tree model: the loaded hierarchy as an index arena.
//!
//! Ownership flows root-to-leaf through `children`; `parent` is a plain
//! index used for lookups (ancestry, expand-to-reveal).

mod build;
mod state;
mod types;

pub use build::{LoadError, build_tree, load_tree};
pub use types::*;

#[derive(Debug, Clone)]
pub struct TreeModel {
    root: NodeId,
    nodes: Vec<TreeNode>,
}

impl TreeModel {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, nid: NodeId) -> bool {
        nid.0 < self.nodes.len()
    }

    pub fn get(&self, nid: NodeId) -> Option<&TreeNode> {
        self.nodes.get(nid.0)
    }

    /// Panics on an id that did not come from this model.
    pub fn node(&self, nid: NodeId) -> &TreeNode {
        &self.nodes[nid.0]
    }

    pub fn node_mut(&mut self, nid: NodeId) -> &mut TreeNode {
        &mut self.nodes[nid.0]
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn state(&self, nid: NodeId) -> NodeState {
        self.node(nid).state()
    }

    /// True when every ancestor is expanded.
    pub fn is_visible(&self, nid: NodeId) -> bool {
        self.ancestors(nid).all(|a| !self.node(a).collapsed)
    }

    /// Parent chain, nearest first, excluding `nid` itself.
    pub fn ancestors(&self, nid: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(nid).parent, |&p| self.node(p).parent)
    }

    /// Names from the root down to `nid`, inclusive.
    pub fn ancestry(&self, nid: NodeId) -> Vec<String> {
        let mut path: Vec<String> = self
            .ancestors(nid)
            .map(|a| self.node(a).name.clone())
            .collect();
        path.reverse();
        path.push(self.node(nid).name.clone());
        path
    }

    /// Structural descendants of `nid`, hidden ones included.
    pub fn descendant_count(&self, nid: NodeId) -> usize {
        let mut count = 0;
        let mut stack: Vec<NodeId> = self.node(nid).children.clone();
        while let Some(n) = stack.pop() {
            count += 1;
            stack.extend(self.node(n).children.iter().copied());
        }
        count
    }

    /// Every node in pre-order, regardless of collapse state.
    pub fn flatten(&self) -> Vec<NodeId> {
        self.pre_order(self.root, |n| n.children.as_slice())
    }

    /// Visible nodes in pre-order, starting at the root.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        self.pre_order(self.root, |n| n.visible_children())
    }

    /// Visible nodes without visible children. Never less than 1, so an empty
    /// or fully collapsed tree still gets one row of height.
    pub fn visible_leaf_count(&self) -> usize {
        self.visible_nodes()
            .into_iter()
            .filter(|&n| self.node(n).visible_children().is_empty())
            .count()
            .max(1)
    }

    fn pre_order<'a, F>(&'a self, start: NodeId, children: F) -> Vec<NodeId>
    where
        F: Fn(&'a TreeNode) -> &'a [NodeId],
    {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(children(self.node(n)).iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeModel {
        load_tree(
            r#"{"name":"A","children":[
                {"name":"B"},
                {"name":"C","children":[{"name":"D"},{"name":"E"}]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ancestry_is_root_first() {
        let tree = sample();
        assert_eq!(tree.ancestry(NodeId(3)), vec!["A", "C", "D"]);
        assert_eq!(tree.ancestry(tree.root()), vec!["A"]);
    }

    #[test]
    fn test_descendant_count_ignores_collapse() {
        let mut tree = sample();
        assert_eq!(tree.descendant_count(tree.root()), 4);
        tree.toggle(NodeId(2));
        assert_eq!(tree.descendant_count(tree.root()), 4);
        assert_eq!(tree.descendant_count(NodeId(2)), 2);
        assert_eq!(tree.descendant_count(NodeId(1)), 0);
    }

    #[test]
    fn test_visible_nodes_skip_collapsed_subtrees() {
        let mut tree = sample();
        assert_eq!(tree.visible_nodes().len(), 5);
        assert_eq!(tree.visible_leaf_count(), 3);

        tree.toggle(NodeId(2));
        assert_eq!(tree.visible_nodes(), vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(tree.visible_leaf_count(), 2);
        assert!(!tree.is_visible(NodeId(3)));
        assert!(tree.is_visible(NodeId(2)));
    }

    #[test]
    fn test_flatten_includes_hidden_nodes() {
        let mut tree = sample();
        tree.toggle(NodeId(2));
        assert_eq!(tree.flatten(), (0..5).map(NodeId).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_node_leaf_count() {
        let tree = load_tree(r#"{"name":"only"}"#).unwrap();
        assert_eq!(tree.visible_leaf_count(), 1);
        assert_eq!(tree.state(tree.root()), NodeState::Leaf);
    }
}
