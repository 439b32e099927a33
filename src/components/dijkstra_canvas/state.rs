use log::{info, warn};

use crate::config::VisualizerConfig;
use crate::dijkstra::{Graph, GraphResult, Stepper};

use super::types::{CanvasStatus, RunStatus};

/// Screen pixels the pointer may travel between press and release and still
/// count as a click.
pub const CLICK_SLOP: f64 = 4.0;
const FIT_MARGIN: f64 = 40.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct VisualizerState {
	pub stepper: Stepper,
	pub options: VisualizerConfig,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub run: RunStatus,
}

impl VisualizerState {
	pub fn new(graph: Graph, options: VisualizerConfig, width: f64, height: f64) -> Self {
		let mut state = Self {
			stepper: Stepper::with_mode(graph, options.step_mode),
			options,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			pan: PanState::default(),
			width,
			height,
			run: RunStatus::Created,
		};
		state.fit();
		state
	}

	/// Swaps in a freshly built graph; any running search is dropped.
	pub fn replace_graph(&mut self, graph: Graph) {
		info!(
			"Showing graph with {} nodes and {} edges",
			graph.len(),
			graph.edge_count()
		);
		self.stepper = Stepper::with_mode(graph, self.options.step_mode);
		self.run = RunStatus::Created;
		self.fit();
	}

	pub fn set_options(&mut self, options: VisualizerConfig) {
		self.options = options;
		self.stepper.set_mode(options.step_mode);
	}

	/// Centres the graph and zooms so all of it is visible.
	pub fn fit(&mut self) {
		let nodes = self.stepper.graph().nodes();
		if nodes.is_empty() {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		}
		let (mut min_x, mut min_y, mut max_x, mut max_y) =
			(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
		for node in nodes {
			min_x = min_x.min(node.x());
			min_y = min_y.min(node.y());
			max_x = max_x.max(node.x());
			max_y = max_y.max(node.y());
		}
		let (w, h) = (
			max_x - min_x + 2.0 * FIT_MARGIN,
			max_y - min_y + 2.0 * FIT_MARGIN,
		);
		let k = (self.width / w).min(self.height / h).clamp(0.1, 10.0);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn start(&mut self, source: usize) -> GraphResult<()> {
		self.stepper.start_stepping(source)?;
		self.run = if self.stepper.is_finished() {
			RunStatus::Finished
		} else {
			RunStatus::Stepping
		};
		Ok(())
	}

	/// One step by hand. Ignored before a search has been started.
	pub fn step(&mut self) {
		match self.run {
			RunStatus::Stepping | RunStatus::Running => {
				if !self.stepper.step_once() {
					self.run = RunStatus::Finished;
				}
			}
			RunStatus::Created => warn!("Start a search before stepping"),
			RunStatus::Finished => {}
		}
	}

	pub fn set_running(&mut self, running: bool) {
		self.run = match (self.run, running) {
			(RunStatus::Stepping, true) => RunStatus::Running,
			(RunStatus::Running, false) => RunStatus::Stepping,
			(run, _) => run,
		};
	}

	/// Called once per animation frame.
	pub fn tick(&mut self) {
		if self.run != RunStatus::Running {
			return;
		}
		for _ in 0..self.options.steps_per_frame.max(1) {
			if !self.stepper.step_once() {
				self.run = RunStatus::Finished;
				break;
			}
		}
	}

	pub fn status(&self) -> CanvasStatus {
		CanvasStatus {
			run: self.run,
			node_count: self.stepper.graph().len(),
			message: None,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dijkstra::{GraphError, GridSpec, Neighborhood};

	fn state(graph: Graph) -> VisualizerState {
		VisualizerState::new(graph, VisualizerConfig::default(), 800.0, 600.0)
	}

	fn square() -> Graph {
		Graph::grid(GridSpec {
			rows: 2,
			cols: 2,
			spacing_x: 100.0,
			spacing_y: 100.0,
			neighborhood: Neighborhood::Four,
		})
		.unwrap()
	}

	#[test]
	fn test_step_before_start_is_ignored() {
		let mut s = state(square());
		s.step();
		s.set_running(true);
		s.tick();
		assert_eq!(s.run, RunStatus::Created);
		assert_eq!(s.stepper.source(), None);
	}

	#[test]
	fn test_empty_graph_finishes_on_start() {
		let mut s = state(Graph::new(false, true));
		s.start(3).unwrap();
		assert_eq!(s.run, RunStatus::Finished);
		assert_eq!(s.status().node_count, 0);
	}

	#[test]
	fn test_invalid_start_keeps_status() {
		let mut s = state(square());
		let err = s.start(9).unwrap_err();
		assert_eq!(err, GraphError::invalid_start(9, 4));
		assert_eq!(s.run, RunStatus::Created);
	}

	#[test]
	fn test_manual_steps_reach_finished() {
		let mut s = state(square());
		s.start(0).unwrap();
		assert_eq!(s.run, RunStatus::Stepping);

		for _ in 0..100 {
			if s.run == RunStatus::Finished {
				break;
			}
			s.step();
		}
		assert_eq!(s.run, RunStatus::Finished);
		assert!(s.stepper.is_finished());
	}

	#[test]
	fn test_running_ticks_to_finished() {
		let mut s = state(square());
		s.start(0).unwrap();
		s.set_running(true);
		assert_eq!(s.run, RunStatus::Running);
		s.set_running(false);
		assert_eq!(s.run, RunStatus::Stepping);

		s.set_running(true);
		for _ in 0..100 {
			s.tick();
		}
		assert_eq!(s.run, RunStatus::Finished);
		s.set_running(true);
		assert_eq!(s.run, RunStatus::Finished);
	}

	#[test]
	fn test_replace_graph_resets_status() {
		let mut s = state(square());
		s.start(0).unwrap();
		s.replace_graph(Graph::from_edges(3, true, true, &[(0, 1, 1.0)]).unwrap());
		assert_eq!(s.run, RunStatus::Created);
		assert_eq!(s.status().node_count, 3);
	}

	#[test]
	fn test_fit_centres_the_graph() {
		let s = state(square());
		let t = &s.transform;
		// Node centres span 50..150 on both axes.
		assert!((100.0 * t.k + t.x - 400.0).abs() < 1e-9);
		assert!((100.0 * t.k + t.y - 300.0).abs() < 1e-9);
	}
}
