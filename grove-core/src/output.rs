//! Output types for the host page.
//!
//! These structs are serialized to JSON and handed across the wasm boundary;
//! the host draws a frame exactly as described, without any tree logic.

use serde::Serialize;

use crate::detail::DetailPanel;
use crate::layout::{PointF, RectF, SizeF};
use crate::model::{NodeId, NodeState, RenderId};
use crate::scene::Phase;
use crate::search::SearchHit;
use crate::viewport::ZoomTransform;

/// A node pill at its sampled position.
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    /// Render identity; stable for the node's lifetime, use it as the DOM key.
    pub key: RenderId,
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    /// Canvas position of the pill's left-middle point, screen axes.
    pub pos: PointF,
    pub width: f64,
    pub opacity: f64,
    pub phase: Phase,
    pub state: NodeState,
    pub selected: bool,
    /// "+N" badge for a collapsed node with N hidden children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

/// A parent-child curve.
#[derive(Debug, Clone, Serialize)]
pub struct LinkOutput {
    /// Render identity of the child end.
    pub key: RenderId,
    pub child: NodeId,
    pub parent: NodeId,
    /// Depth of the child, for per-level styling.
    pub depth: usize,
    pub phase: Phase,
    /// SVG path data.
    pub d: String,
}

/// Error information for the detail panel and load results.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// Everything needed to draw one animation frame.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkOutput>,
    pub transform: ZoomTransform,
    /// Canvas extent: tree width by the laid-out breadth.
    pub canvas: SizeF,
    /// Box around every laid-out node pill, canvas coordinates.
    pub content: RectF,
    pub animating: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadOutput {
    pub node_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<NodeId>,
    pub panel: DetailPanel,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub results: Vec<SearchHit>,
}

pub fn badge(hidden_children: usize) -> Option<String> {
    (hidden_children > 0).then(|| format!("+{hidden_children}"))
}
