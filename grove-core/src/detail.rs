//! Selection and the detail panel.
//!
//! The panel is recomputed from the model every time it is asked for; nothing
//! here is cached, so counts always reflect the current tree.

use serde::Serialize;

use crate::model::{NodeId, TreeModel};

pub const EMPTY_PROMPT: &str = "Click on a node to see its details";

/// At most one selected node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<NodeId>,
}

impl Selection {
    pub fn get(&self) -> Option<NodeId> {
        self.current
    }

    /// Replace the selection. Returns true when it changed.
    pub fn set(&mut self, nid: Option<NodeId>) -> bool {
        let changed = self.current != nid;
        self.current = nid;
        changed
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_selected(&self, nid: NodeId) -> bool {
        self.current == Some(nid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetail {
    pub id: NodeId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub depth: usize,
    /// Direct children, hidden or not.
    pub child_count: usize,
    /// Whole subtree below the node, hidden or not.
    pub descendant_count: usize,
    pub collapsed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    /// Root-first names down to this node. Absent for the root itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ancestry: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailPanel {
    Empty { message: String },
    Node(NodeDetail),
    Error { message: String },
}

impl DetailPanel {
    pub fn empty() -> Self {
        DetailPanel::Empty { message: EMPTY_PROMPT.to_string() }
    }
}

pub fn node_detail(model: &TreeModel, nid: NodeId) -> NodeDetail {
    let node = model.node(nid);
    let ancestry = model.ancestry(nid);
    NodeDetail {
        id: nid,
        name: node.name.clone(),
        header: node.header.clone(),
        description: node.description.clone(),
        depth: node.depth,
        child_count: node.children.len(),
        descendant_count: model.descendant_count(nid),
        collapsed: node.collapsed,
        properties: node.properties.clone(),
        methods: node.methods.clone(),
        ancestry: (ancestry.len() > 1).then_some(ancestry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::load_tree;

    fn tree() -> TreeModel {
        load_tree(
            r#"{"name":"Object","description":"base","children":[
                {"name":"Shape","header":"shape.h","methods":["area()"],"children":[
                    {"name":"Circle","properties":["radius"]},
                    {"name":"Square"}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_root_detail_has_no_ancestry() {
        let t = tree();
        let d = node_detail(&t, t.root());
        assert_eq!(d.name, "Object");
        assert_eq!(d.description.as_deref(), Some("base"));
        assert_eq!(d.child_count, 1);
        assert_eq!(d.descendant_count, 3);
        assert!(d.ancestry.is_none());
    }

    #[test]
    fn test_inner_node_detail() {
        let t = tree();
        let d = node_detail(&t, NodeId(1));
        assert_eq!(d.header.as_deref(), Some("shape.h"));
        assert_eq!(d.methods, vec!["area()".to_string()]);
        assert_eq!(d.depth, 1);
        assert_eq!(d.ancestry, Some(vec!["Object".to_string(), "Shape".to_string()]));
    }

    #[test]
    fn test_counts_survive_collapse() {
        let mut t = tree();
        t.toggle(NodeId(1));
        let d = node_detail(&t, NodeId(1));
        assert!(d.collapsed);
        assert_eq!(d.child_count, 2);
        assert_eq!(d.descendant_count, 2);
    }

    #[test]
    fn test_selection_replace_and_clear() {
        let mut s = Selection::default();
        assert!(s.set(Some(NodeId(2))));
        assert!(!s.set(Some(NodeId(2))));
        assert!(s.is_selected(NodeId(2)));
        assert!(s.set(Some(NodeId(1))));
        assert!(!s.is_selected(NodeId(2)));
        s.clear();
        assert_eq!(s.get(), None);
    }

    #[test]
    fn test_panel_json_shape() {
        let t = tree();
        let json = serde_json::to_value(DetailPanel::Node(node_detail(&t, NodeId(2)))).unwrap();
        assert_eq!(json["state"], "node");
        assert_eq!(json["name"], "Circle");
        assert_eq!(json["properties"][0], "radius");
        assert!(json.get("methods").is_none());

        let empty = serde_json::to_value(DetailPanel::empty()).unwrap();
        assert_eq!(empty["state"], "empty");
        assert_eq!(empty["message"], EMPTY_PROMPT);
    }
}
