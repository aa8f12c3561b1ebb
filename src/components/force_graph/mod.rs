mod component;
mod raf;
mod render;
pub mod scale;
mod state;
mod types;

pub use component::GraphView;
pub use raf::FrameLoop;
pub use state::GraphViewState;
pub use types::{GraphEdge, GraphNode, GraphSnapshot, SnapshotError};
