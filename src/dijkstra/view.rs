//! Read-only views handed to renderers.

use super::element::{EdgeState, NodeState};
use super::graph::Graph;

/// What a renderer needs to draw a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeView<'a> {
	/// Node index
	pub index: usize,
	/// Horizontal position
	pub x: f64,
	/// Vertical position
	pub y: f64,
	/// Search state
	pub state: NodeState,
	/// Display label, if any
	pub label: Option<&'a str>,
	/// `f64::INFINITY` when unreached
	pub distance: f64,
}

/// What a renderer needs to draw an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeView {
	/// Node holding the record
	pub source: usize,
	/// Node the edge points at
	pub target: usize,
	/// Position of `source`
	pub from: (f64, f64),
	/// Position of `target`
	pub to: (f64, f64),
	/// Edge weight
	pub weight: f64,
	/// Search state
	pub state: EdgeState,
	/// Draw with an arrow head
	pub directed: bool,
}

/// Sink for graph drawing. Implementations never touch engine state.
pub trait GraphRenderer {
	/// Wipes the previous frame.
	fn clear(&mut self);
	/// Called once per node, after all edges.
	fn render_node(&mut self, node: &NodeView<'_>);
	/// Called once per drawn edge, before any node.
	fn render_edge(&mut self, edge: &EdgeView);
}

/// Filters applied by [`Graph::render`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
	/// Only draw edges that are being checked or belong to the shortest-path tree
	pub tree_only: bool,
}

impl Graph {
	/// Pushes the whole graph into `renderer`.
	///
	/// Edges are drawn before nodes so node outlines stay on top. Undirected
	/// edges are drawn once, from the endpoint with the higher index.
	pub fn render<R: GraphRenderer>(&self, renderer: &mut R, options: RenderOptions) {
		renderer.clear();
		let directed = self.is_directed();
		for node in self.nodes() {
			for edge in node.edges() {
				if !directed && edge.target() >= node.index() {
					continue;
				}
				if options.tree_only && !edge.state().is_tree_like() {
					continue;
				}
				let Some(target) = self.node(edge.target()) else {
					continue;
				};
				renderer.render_edge(&EdgeView {
					source: node.index(),
					target: edge.target(),
					from: (node.x(), node.y()),
					to: (target.x(), target.y()),
					weight: edge.weight(),
					state: edge.state(),
					directed,
				});
			}
		}
		for node in self.nodes() {
			renderer.render_node(&NodeView {
				index: node.index(),
				x: node.x(),
				y: node.y(),
				state: node.state(),
				label: node.label(),
				distance: node.distance(),
			});
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dijkstra::graph::{GridSpec, Neighborhood};

	#[derive(Default)]
	struct Recorder {
		cleared: usize,
		nodes: Vec<usize>,
		edges: Vec<(usize, usize)>,
	}

	impl GraphRenderer for Recorder {
		fn clear(&mut self) {
			self.cleared += 1;
		}

		fn render_node(&mut self, node: &NodeView<'_>) {
			self.nodes.push(node.index);
		}

		fn render_edge(&mut self, edge: &EdgeView) {
			self.edges.push((edge.source, edge.target));
		}
	}

	#[test]
	fn test_undirected_edges_drawn_once() {
		let graph = Graph::grid(GridSpec {
			rows: 2,
			cols: 2,
			spacing_x: 10.0,
			spacing_y: 10.0,
			neighborhood: Neighborhood::Four,
		})
		.unwrap();

		let mut rec = Recorder::default();
		graph.render(&mut rec, RenderOptions::default());
		assert_eq!(rec.cleared, 1);
		assert_eq!(rec.nodes, vec![0, 1, 2, 3]);
		assert_eq!(rec.edges, vec![(1, 0), (2, 0), (3, 1), (3, 2)]);
	}

	#[test]
	fn test_directed_edges_drawn_per_record() {
		let graph = Graph::from_edges(2, true, true, &[(0, 1, 1.0), (1, 0, 1.0)]).unwrap();
		let mut rec = Recorder::default();
		graph.render(&mut rec, RenderOptions::default());
		assert_eq!(rec.edges, vec![(0, 1), (1, 0)]);
	}

	#[test]
	fn test_tree_only_hides_unchecked_edges() {
		let graph = Graph::from_edges(3, false, true, &[(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
		let mut rec = Recorder::default();
		graph.render(&mut rec, RenderOptions { tree_only: true });
		assert!(rec.edges.is_empty());
		assert_eq!(rec.nodes.len(), 3);
	}
}
