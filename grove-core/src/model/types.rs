use serde::{Deserialize, Serialize};

/// One entry of the input document, as it appears in the data file.
///
/// Every field except `name` is optional, and `null` is treated the same as
/// a missing field. A missing `name` degrades to an empty label.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<NodeData>,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Arena index of a node. Assigned in pre-order when the model is built.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Identity used to key the scene diff. Assigned lazily, the first time a
/// node takes part in a render pass, and never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RenderId(pub u64);

/// Collapse state of a single node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// No children at all.
    Leaf,
    /// Children are visible and take part in layout.
    Expanded,
    /// Children exist but are hidden.
    Collapsed,
}

/// Runtime node: the document entry plus identity, structure and layout state.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub nid: NodeId,
    pub name: String,
    pub header: Option<String>,
    pub description: Option<String>,
    pub properties: Vec<String>,
    pub methods: Vec<String>,

    pub parent: Option<NodeId>,
    pub depth: usize,
    /// Structural children in document order, visible or not.
    pub children: Vec<NodeId>,
    /// Hidden-children flag. Never set on a leaf.
    pub collapsed: bool,

    pub render_id: Option<RenderId>,
    /// Position at the end of the previous render (breadth, depth).
    pub x0: f64,
    pub y0: f64,
    /// Position computed by the latest layout (breadth, depth).
    pub x: f64,
    pub y: f64,
}

impl TreeNode {
    pub fn state(&self) -> NodeState {
        if self.children.is_empty() {
            NodeState::Leaf
        } else if self.collapsed {
            NodeState::Collapsed
        } else {
            NodeState::Expanded
        }
    }

    /// Children that take part in layout (empty when collapsed).
    pub fn visible_children(&self) -> &[NodeId] {
        if self.collapsed { &[] } else { &self.children }
    }

    /// Children hidden behind a collapse (empty when expanded).
    pub fn hidden_children(&self) -> &[NodeId] {
        if self.collapsed { &self.children } else { &[] }
    }
}
