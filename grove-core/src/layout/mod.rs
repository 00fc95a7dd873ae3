// Tree layout for the visible part of a TreeModel.
//
// Goals:
// - Deterministic: same tree + same collapse state -> same positions
// - Only visible nodes take part; a collapsed subtree is one node wide
// - Siblings keep document order, parents sit centered over their children
// - Subtrees never overlap; cousins get a little more room than siblings
//
// Axes:
// - x is the breadth axis (sibling order), spread over the canvas breadth
// - y is the depth axis, a fixed spacing per tree level
// On screen depth runs horizontally, so a node is drawn at (y, x).
//
// Submodules:
// - tidy: the Reingold-Tilford/Walker breadth assignment
//
// Output:
// - (x, y) written into every visible TreeNode; (x0, y0) left alone
// - LayoutResult with the visible order, canvas breadth and content bounds

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{NodeId, TreeModel};

mod tidy;

pub use tidy::tidy_breadth;

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeF {
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: PointF, t: f64) -> PointF {
        PointF {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectF {
    pub fn right(&self) -> f64 { self.x + self.w }
    pub fn bottom(&self) -> f64 { self.y + self.h }

    pub fn union(&self, other: &RectF) -> RectF {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        RectF { x: x0, y: y0, w: x1 - x0, h: y1 - y0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance between tree levels on the depth axis.
    pub depth_spacing: f64,
    /// Minimum breadth per visible leaf; dense trees grow the canvas instead
    /// of squeezing rows together.
    pub row_height: f64,
    /// Breadth units between neighbours that share a parent.
    pub sibling_separation: f64,
    /// Breadth units between neighbours with different parents.
    pub cousin_separation: f64,
    /// Label metrics used for node widths and link attachment points.
    pub char_width: f64,
    pub label_padding: f64,
    /// Height of the node pill, centered on the breadth coordinate.
    pub node_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            depth_spacing: 220.0,
            row_height: 36.0,
            sibling_separation: 1.0,
            cousin_separation: 1.2,
            char_width: 8.0,
            label_padding: 24.0,
            node_height: 28.0,
        }
    }
}

impl LayoutConfig {
    /// Rendered width of a node, from its label length.
    pub fn node_width(&self, name: &str) -> f64 {
        name.chars().count() as f64 * self.char_width + self.label_padding
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    /// Visible nodes in pre-order.
    pub visible: Vec<NodeId>,
    /// Extent of the breadth axis the positions were spread over.
    pub breadth: f64,
    /// Screen-space box around every visible node pill.
    pub bounds: RectF,
}

/// Breadth of the canvas: one row per visible leaf, but never less than the
/// viewport itself.
pub fn canvas_breadth(model: &TreeModel, cfg: &LayoutConfig, viewport_height: f64) -> f64 {
    (model.visible_leaf_count() as f64 * cfg.row_height).max(viewport_height)
}

/// Lay out the visible tree and write the new (x, y) into each visible node.
pub fn layout_tree(model: &mut TreeModel, cfg: &LayoutConfig, viewport: SizeF) -> LayoutResult {
    let breadth = canvas_breadth(model, cfg, viewport.h);
    let placed = tidy_breadth(model, cfg, breadth);

    let mut visible = Vec::with_capacity(placed.len());
    let mut bounds: Option<RectF> = None;

    for (nid, x) in placed {
        let node = model.node_mut(nid);
        node.x = x;
        node.y = node.depth as f64 * cfg.depth_spacing;

        let pill = RectF {
            x: node.y,
            y: node.x - cfg.node_height / 2.0,
            w: cfg.node_width(&node.name),
            h: cfg.node_height,
        };
        bounds = Some(match bounds {
            Some(b) => b.union(&pill),
            None => pill,
        });
        visible.push(nid);
    }

    debug!(visible = visible.len(), breadth, "tree layout");

    LayoutResult {
        visible,
        breadth,
        bounds: bounds.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeData, build_tree, load_tree};
    use proptest::prelude::*;

    const VIEW: SizeF = SizeF { w: 800.0, h: 300.0 };

    fn scenario() -> TreeModel {
        load_tree(r#"{"name":"A","children":[{"name":"B"},{"name":"C","children":[{"name":"D"}]}]}"#).unwrap()
    }

    #[test]
    fn test_depth_axis_uses_fixed_spacing() {
        let mut tree = scenario();
        let cfg = LayoutConfig::default();
        layout_tree(&mut tree, &cfg, VIEW);
        assert_eq!(tree.node(NodeId(0)).y, 0.0);
        assert_eq!(tree.node(NodeId(1)).y, 220.0);
        assert_eq!(tree.node(NodeId(3)).y, 440.0);
    }

    #[test]
    fn test_scenario_positions() {
        let mut tree = scenario();
        let result = layout_tree(&mut tree, &LayoutConfig::default(), VIEW);

        // Two visible leaves -> 72 < 300, so the viewport height wins.
        assert_eq!(result.breadth, 300.0);
        assert_eq!(result.visible.len(), 4);

        // B and C are siblings one unit apart, A is centered over them and D
        // sits straight under C. Unit spacing is 300 / 2 = 150.
        let x = |i: usize| tree.node(NodeId(i)).x;
        assert!((x(1) - 75.0).abs() < 1e-9);
        assert!((x(2) - 225.0).abs() < 1e-9);
        assert!((x(0) - 150.0).abs() < 1e-9);
        assert!((x(3) - x(2)).abs() < 1e-9);
    }

    #[test]
    fn test_single_node_is_centered() {
        let mut tree = load_tree(r#"{"name":"solo"}"#).unwrap();
        let result = layout_tree(&mut tree, &LayoutConfig::default(), VIEW);
        assert_eq!(tree.node(NodeId(0)).x, 150.0);
        assert_eq!(result.bounds.w, LayoutConfig::default().node_width("solo"));
    }

    #[test]
    fn test_collapsed_subtree_is_one_node_wide() {
        let mut tree = load_tree(
            r#"{"name":"R","children":[
                {"name":"A","children":[{"name":"a1"},{"name":"a2"},{"name":"a3"}]},
                {"name":"B"}
            ]}"#,
        )
        .unwrap();
        tree.toggle(NodeId(1));
        let result = layout_tree(&mut tree, &LayoutConfig::default(), VIEW);
        assert_eq!(result.visible, vec![NodeId(0), NodeId(1), NodeId(5)]);
        // Same shape as a root with two leaves.
        assert!((tree.node(NodeId(1)).x - 75.0).abs() < 1e-9);
        assert!((tree.node(NodeId(5)).x - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_cousins_get_wider_gap_than_siblings() {
        let mut tree = load_tree(
            r#"{"name":"R","children":[
                {"name":"A","children":[{"name":"a1"},{"name":"a2"}]},
                {"name":"B","children":[{"name":"b1"},{"name":"b2"}]}
            ]}"#,
        )
        .unwrap();
        layout_tree(&mut tree, &LayoutConfig::default(), VIEW);
        let x = |i: usize| tree.node(NodeId(i)).x;
        let sibling_gap = x(3) - x(2);
        let cousin_gap = x(5) - x(3);
        assert!((cousin_gap / sibling_gap - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_dense_tree_grows_canvas() {
        let children: Vec<String> = (0..20).map(|i| format!(r#"{{"name":"n{i}"}}"#)).collect();
        let json = format!(r#"{{"name":"root","children":[{}]}}"#, children.join(","));
        let mut tree = load_tree(&json).unwrap();
        let result = layout_tree(&mut tree, &LayoutConfig::default(), VIEW);
        assert_eq!(result.breadth, 20.0 * 36.0);
        let gap = tree.node(NodeId(2)).x - tree.node(NodeId(1)).x;
        assert!(gap >= 36.0 - 1e-9);
    }

    #[test]
    fn test_hidden_nodes_keep_their_old_position() {
        let mut tree = scenario();
        let cfg = LayoutConfig::default();
        layout_tree(&mut tree, &cfg, VIEW);
        let d_before = (tree.node(NodeId(3)).x, tree.node(NodeId(3)).y);
        tree.toggle(NodeId(2));
        let result = layout_tree(&mut tree, &cfg, VIEW);
        assert!(!result.visible.contains(&NodeId(3)));
        assert_eq!((tree.node(NodeId(3)).x, tree.node(NodeId(3)).y), d_before);
    }

    fn arb_tree() -> impl Strategy<Value = NodeData> {
        let leaf = "[a-z]{1,4}".prop_map(|name| NodeData { name, ..Default::default() });
        leaf.prop_recursive(5, 60, 5, |inner| {
            ("[a-z]{1,4}", prop::collection::vec(inner, 0..5)).prop_map(|(name, children)| NodeData {
                name,
                children,
                ..Default::default()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_layout_is_tidy(data in arb_tree(), picks in prop::collection::vec(any::<prop::sample::Index>(), 0..6)) {
            let mut tree = build_tree(data);
            for pick in picks {
                tree.toggle(NodeId(pick.index(tree.len())));
            }
            let cfg = LayoutConfig::default();
            let result = layout_tree(&mut tree, &cfg, VIEW);

            let mut by_depth: std::collections::BTreeMap<usize, Vec<NodeId>> = Default::default();
            for &nid in &result.visible {
                by_depth.entry(tree.node(nid).depth).or_default().push(nid);
            }
            for row in by_depth.values() {
                // Pre-order keeps left-to-right order within a level.
                for pair in row.windows(2) {
                    prop_assert!(tree.node(pair[1]).x > tree.node(pair[0]).x);
                }
            }

            for &nid in &result.visible {
                let node = tree.node(nid);
                prop_assert!(node.x >= 0.0 && node.x <= result.breadth + 1e-6);
                let kids = node.visible_children();
                if let (Some(first), Some(last)) = (kids.first(), kids.last()) {
                    let mid = (tree.node(*first).x + tree.node(*last).x) / 2.0;
                    prop_assert!((node.x - mid).abs() < 1e-6);
                }
            }
        }
    }
}
