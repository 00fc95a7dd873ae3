// Tidy tree breadth assignment.
//
// Reingold-Tilford with Walker's apportioning, in the linear-time form of
// Buchheim, Juenger and Leipert:
// 1. first walk (post-order): preliminary x per node, relative to the
//    left sibling; subtrees pushed apart along their facing contours
// 2. second walk (pre-order): accumulate modifiers into final x
// 3. normalize so the extremes sit half a separation inside the canvas
//
// Works on a private arena of walkers, one per visible node, plus a
// virtual parent above the root so the root can be treated like any child.

use crate::model::{NodeId, TreeModel};
use super::LayoutConfig;

/// Index of the virtual parent in the walker arena.
const VIRTUAL: usize = 0;
/// Index of the real root in the walker arena.
const ROOT: usize = 1;

#[derive(Debug, Clone)]
struct Walker {
    nid: NodeId,
    parent: usize,
    children: Vec<usize>,
    /// Position among siblings.
    number: usize,
    /// Default ancestor used while apportioning this node's children.
    default_ancestor: Option<usize>,
    ancestor: usize,
    thread: Option<usize>,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    x: f64,
}

impl Walker {
    fn new(nid: NodeId, parent: usize, number: usize, index: usize) -> Self {
        Self {
            nid,
            parent,
            children: Vec::new(),
            number,
            default_ancestor: None,
            ancestor: index,
            thread: None,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            x: 0.0,
        }
    }
}

struct Tidy<'a> {
    cfg: &'a LayoutConfig,
    w: Vec<Walker>,
}

/// Breadth coordinate for every visible node, spread over `[0, breadth]`,
/// in pre-order.
pub fn tidy_breadth(model: &TreeModel, cfg: &LayoutConfig, breadth: f64) -> Vec<(NodeId, f64)> {
    let mut tidy = Tidy::new(model, cfg);
    tidy.run();
    tidy.normalized(breadth)
}

/// Unscaled positions in separation units, in pre-order.
#[cfg(test)]
fn tidy_units(model: &TreeModel, cfg: &LayoutConfig) -> Vec<(NodeId, f64)> {
    let mut tidy = Tidy::new(model, cfg);
    tidy.run();
    tidy.pre_order().into_iter().map(|v| (tidy.w[v].nid, tidy.w[v].x)).collect()
}

impl<'a> Tidy<'a> {
    fn new(model: &TreeModel, cfg: &'a LayoutConfig) -> Self {
        let root = model.root();
        let mut w = vec![Walker::new(root, VIRTUAL, 0, VIRTUAL), Walker::new(root, VIRTUAL, 0, ROOT)];
        w[VIRTUAL].children.push(ROOT);

        let mut stack = vec![ROOT];
        while let Some(v) = stack.pop() {
            let kids = model.node(w[v].nid).visible_children();
            for (number, &nid) in kids.iter().enumerate() {
                let index = w.len();
                w.push(Walker::new(nid, v, number, index));
                w[v].children.push(index);
                stack.push(index);
            }
        }

        Self { cfg, w }
    }

    fn run(&mut self) {
        for v in self.post_order() {
            self.first_walk(v);
        }
        self.w[VIRTUAL].modifier = -self.w[ROOT].prelim;
        for v in self.pre_order() {
            self.second_walk(v);
        }
    }

    fn pre_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.w.len() - 1);
        let mut stack = vec![ROOT];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.w[v].children.iter().rev().copied());
        }
        out
    }

    fn post_order(&self) -> Vec<usize> {
        let mut out = self.pre_order_mirrored();
        out.reverse();
        out
    }

    // Root, then children right-to-left. Reversed, this is a post-order.
    fn pre_order_mirrored(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.w.len() - 1);
        let mut stack = vec![ROOT];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.w[v].children.iter().copied());
        }
        out
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.w[a].parent == self.w[b].parent {
            self.cfg.sibling_separation
        } else {
            self.cfg.cousin_separation
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.w[v].children.first().copied().or(self.w[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.w[v].children.last().copied().or(self.w[v].thread)
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let n = self.w[v].number;
        if n == 0 {
            None
        } else {
            Some(self.w[self.w[v].parent].children[n - 1])
        }
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.w[v].parent;
        let left = self.left_sibling(v);

        let first = self.w[v].children.first().copied();
        let last = self.w[v].children.last().copied();

        if let (Some(first), Some(last)) = (first, last) {
            self.execute_shifts(v);
            let midpoint = (self.w[first].prelim + self.w[last].prelim) / 2.0;
            match left {
                Some(l) => {
                    self.w[v].prelim = self.w[l].prelim + self.separation(v, l);
                    self.w[v].modifier = self.w[v].prelim - midpoint;
                }
                None => self.w[v].prelim = midpoint,
            }
        } else if let Some(l) = left {
            self.w[v].prelim = self.w[l].prelim + self.separation(v, l);
        }

        let eldest = self.w[parent].children[0];
        let ancestor = self.w[parent].default_ancestor.unwrap_or(eldest);
        let ancestor = self.apportion(v, left, ancestor);
        self.w[parent].default_ancestor = Some(ancestor);
    }

    fn second_walk(&mut self, v: usize) {
        let parent_mod = self.w[self.w[v].parent].modifier;
        let node = &mut self.w[v];
        node.x = node.prelim + parent_mod;
        node.modifier += parent_mod;
    }

    // Walk the right contour of the forest left of `v` against the left
    // contour of `v`, pushing `v` right wherever they come too close.
    fn apportion(&mut self, v: usize, left: Option<usize>, mut ancestor: usize) -> usize {
        let Some(left) = left else {
            return ancestor;
        };

        // i = inside, o = outside, p = plus (v side), m = minus (left side)
        let mut vip = v;
        let mut vop = v;
        let mut vim = left;
        let mut vom = self.w[self.w[v].parent].children[0];
        let mut sip = self.w[vip].modifier;
        let mut sop = self.w[vop].modifier;
        let mut sim = self.w[vim].modifier;
        let mut som = self.w[vom].modifier;

        loop {
            let (Some(nim), Some(nip)) = (self.next_right(vim), self.next_left(vip)) else {
                break;
            };
            let (Some(nom), Some(nop)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vim = nim;
            vip = nip;
            vom = nom;
            vop = nop;
            self.w[vop].ancestor = v;

            let shift = self.w[vim].prelim + sim - self.w[vip].prelim - sip + self.separation(vim, vip);
            if shift > 0.0 {
                let a = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(a, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.w[vim].modifier;
            sip += self.w[vip].modifier;
            som += self.w[vom].modifier;
            sop += self.w[vop].modifier;
        }

        // Read both contours before threading either side.
        let next_im = self.next_right(vim);
        let next_ip = self.next_left(vip);
        if let Some(nim) = next_im {
            if self.next_right(vop).is_none() {
                self.w[vop].thread = Some(nim);
                self.w[vop].modifier += sim - sop;
            }
        }
        if let Some(nip) = next_ip {
            if self.next_left(vom).is_none() {
                self.w[vom].thread = Some(nip);
                self.w[vom].modifier += sip - som;
                ancestor = v;
            }
        }

        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.w[vim].ancestor;
        if self.w[a].parent == self.w[v].parent { a } else { ancestor }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.w[wp].number as f64 - self.w[wm].number as f64;
        let change = shift / subtrees;
        self.w[wp].change -= change;
        self.w[wp].shift += shift;
        self.w[wm].change += change;
        self.w[wp].prelim += shift;
        self.w[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for k in (0..self.w[v].children.len()).rev() {
            let c = self.w[v].children[k];
            let child = &mut self.w[c];
            child.prelim += shift;
            child.modifier += shift;
            change += child.change;
            shift += child.shift + change;
        }
    }

    fn normalized(&self, breadth: f64) -> Vec<(NodeId, f64)> {
        let order = self.pre_order();

        let mut left = ROOT;
        let mut right = ROOT;
        for &v in &order {
            if self.w[v].x < self.w[left].x {
                left = v;
            }
            if self.w[v].x > self.w[right].x {
                right = v;
            }
        }

        let s = if left == right { 1.0 } else { self.separation(left, right) / 2.0 };
        let tx = s - self.w[left].x;
        let kx = breadth / (self.w[right].x + s + tx);

        order
            .into_iter()
            .map(|v| (self.w[v].nid, (self.w[v].x + tx) * kx))
            .collect()
    }
}
