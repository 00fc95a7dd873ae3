//! Core of the Grove tree viewer: a collapsible hierarchy, tidy-tree layout,
//! an animated scene diff keyed by stable node identity, search, and the
//! pan/zoom viewport. The host page only draws what [`Session::frame`]
//! describes and forwards user input.

pub mod detail;
pub mod layout;
pub mod model;
pub mod output;
pub mod scene;
pub mod search;
pub mod session;
pub mod viewport;
mod wasm;

pub use detail::{DetailPanel, NodeDetail, Selection};
pub use layout::{LayoutConfig, LayoutResult, PointF, RectF, SizeF, layout_tree};
pub use model::{LoadError, NodeData, NodeId, NodeState, RenderId, TreeModel, TreeNode, load_tree};
pub use output::{FrameOutput, LinkOutput, NodeOutput};
pub use scene::{Phase, SceneSync, SyncReport, TickReport};
pub use search::{SearchHit, search};
pub use session::{Session, SessionConfig};
pub use viewport::{ViewConfig, Viewport, ZoomTransform};
pub use wasm::TreeView;
