mod component;
mod render;
mod state;
mod types;

pub use component::DijkstraCanvas;
pub use types::{CanvasStatus, Command, RunStatus};
