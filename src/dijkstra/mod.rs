//! Step-by-step single-source shortest paths.
//!
//! The [`Graph`] holds nodes and edge records together with their visual
//! state, the [`Stepper`] advances Dijkstra's algorithm over it one small unit
//! of work at a time, and [`GraphRenderer`] is the sink callers push the
//! current picture into between steps.

mod element;
mod error;
mod generate;
mod graph;
mod stepper;
mod view;

pub use element::{EdgeState, NodeState};
pub use error::{GraphError, GraphResult};
pub use generate::ScatterSpec;
pub use graph::{Edge, EdgeRef, Graph, GridSpec, Neighborhood, Node};
pub use stepper::{PendingEdge, Phase, StepMode, Stepper};
pub use view::{EdgeView, GraphRenderer, NodeView, RenderOptions};
