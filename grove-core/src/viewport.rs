//! Viewport controller: the pan/zoom transform applied to the tree canvas.
//!
//! The transform maps canvas coordinates to screen pixels inside the tree
//! area: `screen = canvas * k + (x, y)`. Programmatic moves (fit, center-on)
//! animate over the camera duration; direct manipulation (pan, zoom) applies
//! immediately and cancels any running camera move.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::{PointF, SizeF};
use crate::scene::{Lerp, Tween};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self { top: 20.0, right: 20.0, bottom: 20.0, left: 40.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Width reserved for the detail panel beside the tree.
    pub panel_width: f64,
    pub margin: Margin,
    pub min_tree_size: SizeF,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Scene transition length, milliseconds.
    pub transition_ms: f64,
    /// Fit / center-on animation length, milliseconds.
    pub camera_ms: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            panel_width: 380.0,
            margin: Margin::default(),
            min_tree_size: SizeF { w: 400.0, h: 300.0 },
            min_zoom: 0.2,
            max_zoom: 3.0,
            transition_ms: 500.0,
            camera_ms: 500.0,
        }
    }
}

impl ViewConfig {
    /// Drawable tree area for a window size.
    pub fn tree_size(&self, window: SizeF) -> SizeF {
        let m = &self.margin;
        SizeF {
            w: (window.w - self.panel_width - m.left - m.right).max(self.min_tree_size.w),
            h: (window.h - m.top - m.bottom).max(self.min_tree_size.h),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ZoomTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl ZoomTransform {
    pub fn translate(x: f64, y: f64) -> Self {
        Self { x, y, k: 1.0 }
    }

    pub fn invert(&self, screen: PointF) -> PointF {
        PointF::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::translate(0.0, 0.0)
    }
}

impl Lerp for ZoomTransform {
    fn lerp(self, to: Self, t: f64) -> Self {
        ZoomTransform {
            x: self.x.lerp(to.x, t),
            y: self.y.lerp(to.y, t),
            k: self.k.lerp(to.k, t),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    cfg: ViewConfig,
    window: SizeF,
    clock: f64,
    resting: ZoomTransform,
    camera: Option<Tween<ZoomTransform>>,
}

impl Viewport {
    pub fn new(cfg: ViewConfig, window: SizeF) -> Self {
        Self {
            cfg,
            window,
            clock: 0.0,
            resting: ZoomTransform::default(),
            camera: None,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.cfg
    }

    pub fn tree_size(&self) -> SizeF {
        self.cfg.tree_size(self.window)
    }

    pub fn resize(&mut self, window: SizeF) {
        self.window = window;
        debug!(w = window.w, h = window.h, "viewport resize");
    }

    /// Transform as displayed right now.
    pub fn transform(&self) -> ZoomTransform {
        match &self.camera {
            Some(tw) => tw.sample(self.clock),
            None => self.resting,
        }
    }

    /// Transform the camera is heading to (equal to `transform` at rest).
    pub fn target(&self) -> ZoomTransform {
        self.camera.as_ref().map_or(self.resting, |tw| tw.target())
    }

    pub fn is_animating(&self) -> bool {
        self.camera.is_some()
    }

    /// Stop any camera move where it is.
    fn settle(&mut self) {
        self.resting = self.transform();
        self.camera = None;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.settle();
        self.resting.x += dx;
        self.resting.y += dy;
    }

    /// Scale by `factor` around `pointer` (screen pixels), which stays put.
    pub fn zoom_at(&mut self, factor: f64, pointer: PointF) {
        self.settle();
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let anchor = self.resting.invert(pointer);
        let k = (self.resting.k * factor).clamp(self.cfg.min_zoom, self.cfg.max_zoom);
        self.resting = ZoomTransform {
            x: pointer.x - anchor.x * k,
            y: pointer.y - anchor.y * k,
            k,
        };
    }

    /// Animate to `to`, starting from wherever the camera is now.
    pub fn animate_to(&mut self, to: ZoomTransform) {
        let from = self.transform();
        self.resting = to;
        self.camera = Some(Tween::new(from, to, self.clock, self.cfg.camera_ms));
    }

    /// Default framing: the canvas origin at the margin corner, unscaled.
    pub fn fit(&mut self) {
        let m = self.cfg.margin;
        self.animate_to(ZoomTransform::translate(m.left, m.top));
    }

    /// Transform that puts canvas point `at` a third of the way across the
    /// tree area and halfway down.
    pub fn centering(&self, at: PointF) -> ZoomTransform {
        let size = self.tree_size();
        let m = self.cfg.margin;
        ZoomTransform::translate(
            -at.x + size.w / 3.0 + m.left,
            -at.y + size.h / 2.0 + m.top,
        )
    }

    /// Animate so that canvas point `at` (screen axes) is centered.
    pub fn center_on(&mut self, at: PointF) {
        let to = self.centering(at);
        self.animate_to(to);
    }

    /// Advance the camera clock. Returns true when a camera move ended.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.clock += dt.max(0.0);
        match &self.camera {
            Some(tw) if tw.is_finished(self.clock) => {
                self.camera = None;
                true
            }
            _ => false,
        }
    }
}
