//
// Build step: NodeData (input document) -> TreeModel (index arena)
//
// What this does:
// - Parses the JSON document
// - Flattens the nested NodeData into an indexed vector with parent pointers
// - Assigns depth and pre-order NodeIds
// - Starts every node expanded, with no render identity yet
//
// Parsing has no depth limit, and building replaces recursion with an
// explicit stack, so very deep documents load like any other.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{NodeData, NodeId, TreeModel, TreeNode};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid tree document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tree document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Parse a JSON document and build the model from it.
pub fn load_tree(input: &str) -> Result<TreeModel, LoadError> {
    if !input.trim_start().starts_with('{') {
        let value: Value = serde_json::from_str(input)?;
        return Err(LoadError::NotAnObject(value_kind(&value)));
    }
    Ok(build_tree(parse_document(input)?))
}

// Each tree level is two JSON nesting levels (object + `children` array), so
// serde_json's default limit of 128 would cap trees at 63 levels. The limit is
// lifted and serde_stacker grows the stack on demand instead.
fn parse_document(input: &str) -> Result<NodeData, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let data = NodeData::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(data)
}

/// Build the arena from an already parsed document.
pub fn build_tree(data: NodeData) -> TreeModel {
    let mut ctx = BuildCtx::new();
    let root = ctx.build(data);
    ctx.finish(root)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

struct BuildCtx {
    nodes: Vec<TreeNode>,
}

impl BuildCtx {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn finish(self, root: NodeId) -> TreeModel {
        TreeModel { root, nodes: self.nodes }
    }

    fn new_node(&mut self, data: &mut NodeData, parent: Option<NodeId>, depth: usize) -> NodeId {
        let nid = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            nid,
            name: std::mem::take(&mut data.name),
            header: data.header.take(),
            description: data.description.take(),
            properties: std::mem::take(&mut data.properties),
            methods: std::mem::take(&mut data.methods),
            parent,
            depth,
            children: Vec::new(),
            collapsed: false,
            render_id: None,
            x0: 0.0,
            y0: 0.0,
            x: 0.0,
            y: 0.0,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(nid);
        }
        nid
    }

    fn build(&mut self, root: NodeData) -> NodeId {
        // Stack holds (data, parent, depth). Children are pushed in reverse so
        // they pop in document order, which keeps NodeIds in pre-order.
        let mut stack: Vec<(NodeData, Option<NodeId>, usize)> = vec![(root, None, 0)];
        let mut root_id = NodeId(0);

        while let Some((mut data, parent, depth)) = stack.pop() {
            let nid = self.new_node(&mut data, parent, depth);
            if parent.is_none() {
                root_id = nid;
            }
            for child in std::mem::take(&mut data.children).into_iter().rev() {
                stack.push((child, Some(nid), depth + 1));
            }
        }

        root_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeState;

    #[test]
    fn test_load_nested_document() {
        let input = r#"{
            "name": "A",
            "header": "a.h",
            "properties": ["int x"],
            "children": [
                {"name": "B"},
                {"name": "C", "children": [{"name": "D", "methods": ["run()"]}]}
            ]
        }"#;
        let tree = load_tree(input).unwrap();

        assert_eq!(tree.len(), 4);
        let names: Vec<&str> = tree.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);

        let root = tree.node(tree.root());
        assert_eq!(root.header.as_deref(), Some("a.h"));
        assert_eq!(root.properties, vec!["int x".to_string()]);
        assert_eq!(root.children, vec![NodeId(1), NodeId(2)]);

        let d = tree.node(NodeId(3));
        assert_eq!(d.depth, 2);
        assert_eq!(d.parent, Some(NodeId(2)));
        assert_eq!(d.methods, vec!["run()".to_string()]);
    }

    #[test]
    fn test_everything_starts_expanded() {
        let tree = load_tree(r#"{"name":"A","children":[{"name":"B","children":[{"name":"C"}]}]}"#).unwrap();
        assert_eq!(tree.state(NodeId(0)), NodeState::Expanded);
        assert_eq!(tree.state(NodeId(1)), NodeState::Expanded);
        assert_eq!(tree.state(NodeId(2)), NodeState::Leaf);
        assert!(tree.nodes().iter().all(|n| n.render_id.is_none()));
    }

    #[test]
    fn test_missing_and_null_fields_degrade() {
        let tree = load_tree(r#"{"children": null, "properties": null, "description": null}"#).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.name, "");
        assert!(root.children.is_empty());
        assert!(root.properties.is_empty());
        assert!(root.description.is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let tree = load_tree(r#"{"name":"A","kind":"class","children":[{"name":"B","extra":1}]}"#).unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_rejects_non_object_document() {
        let err = load_tree("[1, 2]").unwrap_err();
        assert!(matches!(err, LoadError::NotAnObject("an array")));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = load_tree("{\"name\": ").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
        assert!(err.to_string().starts_with("invalid tree document"));
    }

    #[test]
    fn test_rejects_wrong_field_type() {
        let err = load_tree(r#"{"name": "A", "children": "nope"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    fn chain_document(levels: usize) -> String {
        let mut json = String::from(r#"{"name":"leaf"}"#);
        for i in 0..levels {
            json = format!(r#"{{"name":"n{i}","children":[{json}]}}"#);
        }
        json
    }

    #[test]
    fn test_deep_document_loads() {
        for levels in [63, 64, 100, 2000] {
            let tree = load_tree(&chain_document(levels)).unwrap();
            assert_eq!(tree.len(), levels + 1);
            assert_eq!(tree.node(NodeId(levels)).depth, levels);
            assert_eq!(tree.node(NodeId(levels)).name, "leaf");
        }
    }

    #[test]
    fn test_rejects_trailing_content() {
        let err = load_tree(r#"{"name":"A"} {"name":"B"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_deep_chain_builds_without_recursion() {
        let mut data = NodeData { name: "leaf".into(), ..Default::default() };
        for i in 0..5000 {
            data = NodeData { name: format!("n{i}"), children: vec![data], ..Default::default() };
        }
        let tree = build_tree(data);
        assert_eq!(tree.len(), 5001);
        assert_eq!(tree.node(NodeId(5000)).depth, 5000);
    }
}
