//! The interactive session: one loaded tree plus everything the user has done
//! to it.
//!
//! Every mutation follows the same shape: change the model (or selection),
//! lay out the visible tree, then sync the scene from the node the user acted
//! on. The host drives time through [`Session::tick`] and reads back frames.

use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::detail::{DetailPanel, Selection, node_detail};
use crate::layout::{LayoutConfig, LayoutResult, PointF, SizeF, layout_tree};
use crate::model::{LoadError, NodeId, NodeState, TreeModel, load_tree};
use crate::output::{FrameOutput, LinkOutput, NodeOutput, badge};
use crate::scene::{SceneSync, SyncReport, TickReport, screen_pos};
use crate::search::{SearchHit, search};
use crate::viewport::{ViewConfig, Viewport};

/// Host-supplied overrides; any subset may be given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub layout: LayoutConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Clone)]
pub struct Session {
    layout_cfg: LayoutConfig,
    viewport: Viewport,
    scene: SceneSync,
    tree: Option<TreeModel>,
    layout: Option<LayoutResult>,
    selection: Selection,
    /// Node to center on once the running scene batch has finished.
    pending_focus: Option<NodeId>,
    load_error: Option<String>,
}

impl Session {
    pub fn new(cfg: SessionConfig, window: SizeF) -> Self {
        let scene = SceneSync::new(cfg.view.transition_ms);
        Self {
            layout_cfg: cfg.layout,
            viewport: Viewport::new(cfg.view, window),
            scene,
            tree: None,
            layout: None,
            selection: Selection::default(),
            pending_focus: None,
            load_error: None,
        }
    }

    pub fn tree(&self) -> Option<&TreeModel> {
        self.tree.as_ref()
    }

    pub fn scene(&self) -> &SceneSync {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selection.get()
    }

    /// Replace whatever was loaded with the tree in `input`.
    ///
    /// On success the whole tree is drawn growing out of the root, the root
    /// is selected and the view is framed. On failure the session is left
    /// empty with the error shown in the detail panel.
    pub fn load(&mut self, input: &str) -> Result<usize, LoadError> {
        self.scene = SceneSync::new(self.viewport.config().transition_ms);
        self.tree = None;
        self.layout = None;
        self.selection.clear();
        self.pending_focus = None;
        self.load_error = None;

        let mut tree = match load_tree(input) {
            Ok(tree) => tree,
            Err(e) => {
                error!(error = %e, "failed to load tree");
                self.load_error = Some(format!("Error loading data: {e}"));
                return Err(e);
            }
        };

        let root = tree.root();
        let start = tree.node_mut(root);
        start.x0 = self.viewport.tree_size().h / 2.0;
        start.y0 = 0.0;

        let count = tree.len();
        self.tree = Some(tree);
        self.render(root);
        self.selection.set(Some(root));
        self.viewport.fit();

        debug!(nodes = count, "tree loaded");
        Ok(count)
    }

    /// Lay out the visible tree and sync the scene, animating from `source`.
    fn render(&mut self, source: NodeId) -> SyncReport {
        let Some(tree) = self.tree.as_mut() else {
            return SyncReport::default();
        };
        let layout = layout_tree(tree, &self.layout_cfg, self.viewport.tree_size());
        let report = self.scene.sync(tree, &layout, source, &self.layout_cfg);
        self.layout = Some(layout);
        report
    }

    fn root(&self) -> Option<NodeId> {
        self.tree.as_ref().map(TreeModel::root)
    }

    /// True when `nid` names a node of the loaded tree; logs and returns
    /// false otherwise.
    fn known(&self, nid: NodeId, op: &'static str) -> bool {
        let ok = self.tree.as_ref().is_some_and(|t| t.contains(nid));
        if !ok {
            warn!(node = nid.0, op, "ignoring unknown node id");
        }
        ok
    }

    pub fn resize(&mut self, window: SizeF) {
        self.viewport.resize(window);
        if let Some(root) = self.root() {
            self.render(root);
        }
    }

    pub fn select(&mut self, nid: NodeId) {
        if self.known(nid, "select") {
            self.selection.set(Some(nid));
        }
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    /// Plain click selects; a click with the toggle modifier (Ctrl/Cmd)
    /// collapses or expands instead.
    pub fn click(&mut self, nid: NodeId, toggle_modifier: bool) {
        if toggle_modifier {
            self.toggle(nid);
        } else {
            self.select(nid);
        }
    }

    /// Flip the node's collapse state and animate from it. A structural
    /// change drops any centering still waiting on an earlier reveal.
    pub fn toggle(&mut self, nid: NodeId) -> Option<NodeState> {
        if !self.known(nid, "toggle") {
            return None;
        }
        let state = self.tree.as_mut()?.toggle(nid);
        self.pending_focus = None;
        self.render(nid);
        Some(state)
    }

    /// Collapse everything, but keep the root's own children on screen.
    pub fn collapse_all(&mut self) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        let root = tree.root();
        tree.collapse_all(root);
        tree.expand(root);
        self.pending_focus = None;
        self.render(root);
    }

    pub fn expand_all(&mut self) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        let root = tree.root();
        tree.expand_all(root);
        self.pending_focus = None;
        self.render(root);
    }

    pub fn fit_view(&mut self) {
        self.viewport.fit();
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom(&mut self, factor: f64, pointer: PointF) {
        self.viewport.zoom_at(factor, pointer);
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.tree.as_ref().map(|t| search(t, query)).unwrap_or_default()
    }

    /// Reveal a search hit: open its ancestors, select it, and center the
    /// camera on it once the reveal transition has played out.
    pub fn navigate_to(&mut self, nid: NodeId) {
        if !self.known(nid, "navigate") {
            return;
        }
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        tree.expand_path_to(nid);
        let root = tree.root();
        self.selection.set(Some(nid));
        self.render(root);

        if self.scene.is_animating() {
            self.pending_focus = Some(nid);
        } else {
            self.focus(nid);
        }
    }

    fn focus(&mut self, nid: NodeId) {
        if let Some(tree) = self.tree.as_ref() {
            let at = screen_pos(tree.node(nid));
            self.viewport.center_on(at);
        }
    }

    /// Advance scene and camera by `dt` milliseconds.
    pub fn tick(&mut self, dt: f64) -> TickReport {
        let report = self.scene.tick(dt);
        self.viewport.tick(dt);
        if report.finished {
            if let Some(nid) = self.pending_focus.take() {
                self.focus(nid);
            }
        }
        report
    }

    pub fn is_animating(&self) -> bool {
        self.scene.is_animating() || self.viewport.is_animating()
    }

    pub fn detail(&self) -> DetailPanel {
        if let Some(message) = &self.load_error {
            return DetailPanel::Error { message: message.clone() };
        }
        match (&self.tree, self.selection.get()) {
            (Some(tree), Some(nid)) if tree.contains(nid) => DetailPanel::Node(node_detail(tree, nid)),
            _ => DetailPanel::empty(),
        }
    }

    /// Sample the scene at the current clock.
    pub fn frame(&self) -> FrameOutput {
        let (Some(tree), Some(layout)) = (&self.tree, &self.layout) else {
            return FrameOutput {
                transform: self.viewport.transform(),
                ..FrameOutput::default()
            };
        };
        let now = self.scene.clock();

        let nodes = self
            .scene
            .nodes()
            .map(|(key, track)| {
                let node = tree.node(track.nid);
                NodeOutput {
                    key,
                    id: track.nid,
                    name: node.name.clone(),
                    depth: node.depth,
                    pos: track.motion.sample(now),
                    width: self.layout_cfg.node_width(&node.name),
                    opacity: track.opacity.sample(now),
                    phase: track.phase,
                    state: node.state(),
                    selected: self.selection.is_selected(track.nid),
                    badge: badge(node.hidden_children().len()),
                }
            })
            .collect();

        let links = self
            .scene
            .links()
            .map(|(key, track)| LinkOutput {
                key,
                child: track.child,
                parent: track.parent,
                depth: tree.node(track.child).depth,
                phase: track.phase,
                d: track.path.sample(now).to_svg(),
            })
            .collect();

        FrameOutput {
            nodes,
            links,
            transform: self.viewport.transform(),
            canvas: SizeF { w: self.viewport.tree_size().w, h: layout.breadth },
            content: layout.bounds,
            animating: self.is_animating(),
        }
    }
}
