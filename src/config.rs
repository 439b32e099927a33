//! Graph and visualizer settings, with the defaults the controls start from.

use crate::dijkstra::{Graph, GraphResult, GridSpec, Neighborhood, ScatterSpec, StepMode};

/// How nodes are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
	/// Regular lattice with labelled nodes
	#[default]
	Aligned,
	/// Jittered lattice with missing nodes, linked by proximity
	Scattered,
}

/// Everything needed to build a graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphConfig {
	/// Layout to generate
	pub layout: Layout,
	/// Horizontal interval between lattice points
	pub spacing_x: f64,
	/// Vertical interval between lattice points
	pub spacing_y: f64,
	/// Lattice points per row
	pub count_x: usize,
	/// Lattice points per column
	pub count_y: usize,
	/// Grid adjacency, aligned layout only
	pub neighborhood: Neighborhood,
	/// Randomness for the scattered layout
	pub seed: u64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			layout: Layout::Aligned,
			spacing_x: 100.0,
			spacing_y: 100.0,
			count_x: 4,
			count_y: 4,
			neighborhood: Neighborhood::Eight,
			seed: 0,
		}
	}
}

impl GraphConfig {
	/// Builds the graph this configuration describes.
	pub fn build(&self) -> GraphResult<Graph> {
		match self.layout {
			Layout::Aligned => Graph::grid(GridSpec {
				rows: self.count_y,
				cols: self.count_x,
				spacing_x: self.spacing_x,
				spacing_y: self.spacing_y,
				neighborhood: self.neighborhood,
			}),
			Layout::Scattered => Graph::scattered(ScatterSpec {
				rows: self.count_y,
				cols: self.count_x,
				spacing_x: self.spacing_x,
				spacing_y: self.spacing_y,
				seed: self.seed,
			}),
		}
	}

	/// Size of the area the laid out graph occupies.
	pub fn extent(&self) -> (f64, f64) {
		(
			self.spacing_x * self.count_x as f64,
			self.spacing_y * self.count_y as f64,
		)
	}
}

/// Drawing and pacing options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualizerConfig {
	/// Node circle radius in graph units
	pub node_radius: f64,
	/// Draw labels and distances next to nodes
	pub render_labels: bool,
	/// Hide edges that are neither being checked nor part of the tree
	pub tree_only: bool,
	/// Whether edges show a separate checking frame
	pub step_mode: StepMode,
	/// Steps taken per animation frame while running
	pub steps_per_frame: u32,
}

impl Default for VisualizerConfig {
	fn default() -> Self {
		Self::for_layout(Layout::default())
	}
}

impl VisualizerConfig {
	/// Large labelled nodes for the lattice, small bare dots for the dense
	/// scattered layout.
	pub fn for_layout(layout: Layout) -> Self {
		let (node_radius, render_labels) = match layout {
			Layout::Aligned => (12.0, true),
			Layout::Scattered => (4.0, false),
		};
		Self {
			node_radius,
			render_labels,
			tree_only: false,
			step_mode: StepMode::Fine,
			steps_per_frame: 1,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_builds_four_by_four_grid() {
		let graph = GraphConfig::default().build().unwrap();
		assert_eq!(graph.len(), 16);
		assert_eq!(graph.node(5).unwrap().edges().len(), 8);
	}

	#[test]
	fn test_zero_count_is_rejected() {
		let config = GraphConfig {
			count_x: 0,
			..GraphConfig::default()
		};
		assert!(config.build().is_err());
	}

	#[test]
	fn test_scattered_layout_uses_seed() {
		let config = GraphConfig {
			layout: Layout::Scattered,
			count_x: 8,
			count_y: 8,
			seed: 99,
			..GraphConfig::default()
		};
		assert_eq!(config.build().unwrap(), config.build().unwrap());
		assert_eq!(config.extent(), (800.0, 800.0));
	}

	#[test]
	fn test_visualizer_defaults_follow_layout() {
		let aligned = VisualizerConfig::for_layout(Layout::Aligned);
		assert!(aligned.render_labels);
		assert_eq!(aligned.node_radius, 12.0);

		let scattered = VisualizerConfig::for_layout(Layout::Scattered);
		assert!(!scattered.render_labels);
		assert_eq!(scattered.steps_per_frame, 1);
	}
}
