//! Scene synchronization.
//!
//! Keeps the rendered node/link set consistent with the visible tree. Each
//! render pass diffs the new visible set against what is on screen, keyed by
//! [`RenderId`], and starts a transition for every element:
//!
//! - entering elements grow out of the source node's previous position
//! - updating elements move from wherever they are now to their new place
//! - exiting elements shrink into the source node's new position and are
//!   dropped once their transition ends
//!
//! Time only moves when [`SceneSync::tick`] is called, and `tick` reports when
//! the running batch of transitions has finished.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::layout::{LayoutConfig, LayoutResult, PointF};
use crate::model::{NodeId, RenderId, TreeModel, TreeNode};

mod path;
mod tween;

pub use path::{CubicPath, diagonal, folded};
pub use tween::{Lerp, Tween, cubic_in_out};

/// Default transition length in milliseconds.
pub const TRANSITION_MS: f64 = 500.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Enter,
    Update,
    Exit,
}

#[derive(Debug, Clone)]
pub struct NodeTrack {
    pub nid: NodeId,
    pub phase: Phase,
    pub motion: Tween<PointF>,
    pub opacity: Tween<f64>,
}

#[derive(Debug, Clone)]
pub struct LinkTrack {
    pub child: NodeId,
    pub parent: NodeId,
    pub phase: Phase,
    pub path: Tween<CubicPath>,
}

/// Partitions computed by one sync, by render identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub entered: Vec<RenderId>,
    pub updated: Vec<RenderId>,
    pub exited: Vec<RenderId>,
    pub links_entered: Vec<RenderId>,
    pub links_updated: Vec<RenderId>,
    pub links_exited: Vec<RenderId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Elements whose exit transition ended during this tick.
    pub removed: Vec<RenderId>,
    /// The batch started by the last sync has fully played out.
    pub finished: bool,
}

/// Screen position of a node's current layout: depth runs horizontally.
pub fn screen_pos(node: &TreeNode) -> PointF {
    PointF::new(node.y, node.x)
}

/// Screen position the node had at the end of the previous render.
pub fn previous_screen_pos(node: &TreeNode) -> PointF {
    PointF::new(node.y0, node.x0)
}

#[derive(Debug, Clone)]
pub struct SceneSync {
    duration: f64,
    clock: f64,
    last_id: u64,
    nodes: BTreeMap<RenderId, NodeTrack>,
    links: BTreeMap<RenderId, LinkTrack>,
    batch_end: Option<f64>,
}

impl Default for SceneSync {
    fn default() -> Self {
        Self::new(TRANSITION_MS)
    }
}

impl SceneSync {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            clock: 0.0,
            last_id: 0,
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
            batch_end: None,
        }
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// True while the last batch of transitions is still playing.
    pub fn is_animating(&self) -> bool {
        self.batch_end.is_some()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (RenderId, &NodeTrack)> {
        self.nodes.iter().map(|(&rid, t)| (rid, t))
    }

    pub fn links(&self) -> impl Iterator<Item = (RenderId, &LinkTrack)> {
        self.links.iter().map(|(&rid, t)| (rid, t))
    }

    pub fn node_track(&self, rid: RenderId) -> Option<&NodeTrack> {
        self.nodes.get(&rid)
    }

    pub fn link_track(&self, rid: RenderId) -> Option<&LinkTrack> {
        self.links.get(&rid)
    }

    /// Give `node` its render identity if it does not have one yet.
    fn identify(&mut self, node: &mut TreeNode) -> RenderId {
        *node.render_id.get_or_insert_with(|| {
            self.last_id += 1;
            RenderId(self.last_id)
        })
    }

    /// Diff the freshly laid out tree against the scene and start transitions.
    ///
    /// `layout` must come from `layout_tree` on the same model, run after the
    /// collapse change and before this call. On return every visible node's
    /// `(x0, y0)` equals its `(x, y)`.
    pub fn sync(
        &mut self,
        model: &mut TreeModel,
        layout: &LayoutResult,
        source: NodeId,
        cfg: &LayoutConfig,
    ) -> SyncReport {
        let now = self.clock;
        let dur = self.duration;
        let mut report = SyncReport::default();

        let (src_prev, src_new, src_width) = {
            let src = model.node(source);
            (previous_screen_pos(src), screen_pos(src), cfg.node_width(&src.name))
        };

        let mut live: HashSet<RenderId> = HashSet::with_capacity(layout.visible.len());

        for &nid in &layout.visible {
            let rid = self.identify(model.node_mut(nid));
            live.insert(rid);

            let node = model.node(nid);
            let target = screen_pos(node);

            match self.nodes.get_mut(&rid) {
                Some(track) => {
                    let from = track.motion.sample(now);
                    let alpha = track.opacity.sample(now);
                    track.phase = Phase::Update;
                    track.motion = Tween::new(from, target, now, dur);
                    track.opacity = Tween::new(alpha, 1.0, now, dur);
                    report.updated.push(rid);
                }
                None => {
                    self.nodes.insert(rid, NodeTrack {
                        nid,
                        phase: Phase::Enter,
                        motion: Tween::new(src_prev, target, now, dur),
                        opacity: Tween::still(1.0),
                    });
                    report.entered.push(rid);
                }
            }

            let Some(parent_id) = node.parent else {
                continue;
            };
            let parent = model.node(parent_id);
            let target_path = diagonal(target, screen_pos(parent), cfg.node_width(&parent.name));

            match self.links.get_mut(&rid) {
                Some(track) => {
                    let from = track.path.sample(now);
                    track.phase = Phase::Update;
                    track.path = Tween::new(from, target_path, now, dur);
                    report.links_updated.push(rid);
                }
                None => {
                    self.links.insert(rid, LinkTrack {
                        child: nid,
                        parent: parent_id,
                        phase: Phase::Enter,
                        path: Tween::new(folded(src_prev, src_width), target_path, now, dur),
                    });
                    report.links_entered.push(rid);
                }
            }
        }

        for (&rid, track) in self.nodes.iter_mut().filter(|(rid, _)| !live.contains(*rid)) {
            let from = track.motion.sample(now);
            let alpha = track.opacity.sample(now);
            track.phase = Phase::Exit;
            track.motion = Tween::new(from, src_new, now, dur);
            track.opacity = Tween::new(alpha, 0.0, now, dur);
            report.exited.push(rid);
        }

        for (&rid, track) in self.links.iter_mut().filter(|(rid, _)| !live.contains(*rid)) {
            let from = track.path.sample(now);
            track.phase = Phase::Exit;
            track.path = Tween::new(from, folded(src_new, src_width), now, dur);
            report.links_exited.push(rid);
        }

        for &nid in &layout.visible {
            let node = model.node_mut(nid);
            node.x0 = node.x;
            node.y0 = node.y;
        }

        self.batch_end = Some(now + dur);

        debug!(
            entered = report.entered.len(),
            updated = report.updated.len(),
            exited = report.exited.len(),
            "scene sync"
        );

        report
    }

    /// Advance the scene clock by `dt` milliseconds.
    pub fn tick(&mut self, dt: f64) -> TickReport {
        self.clock += dt.max(0.0);
        let now = self.clock;
        let mut report = TickReport::default();

        self.nodes.retain(|&rid, t| {
            let done = t.phase == Phase::Exit && t.motion.is_finished(now);
            if done {
                report.removed.push(rid);
            }
            !done
        });
        self.links
            .retain(|_, t| !(t.phase == Phase::Exit && t.path.is_finished(now)));

        if let Some(end) = self.batch_end {
            if now >= end {
                self.batch_end = None;
                report.finished = true;
            }
        }

        report
    }

    /// Jump every transition to its end.
    #[cfg(test)]
    pub fn finish(&mut self) -> TickReport {
        match self.batch_end {
            Some(end) => self.tick(end - self.clock),
            None => TickReport::default(),
        }
    }
}
