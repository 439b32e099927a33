//! Randomized layouts.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::error::{GraphError, GraphResult};
use super::graph::Graph;

/// Chance that a lattice point gets a node.
const KEEP_PROBABILITY: f64 = 0.8;
/// Pairs closer than this multiple of the mean spacing are connected.
const LINK_FACTOR: f64 = 1.5;

/// Parameters of [`Graph::scattered`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterSpec {
	/// Lattice rows
	pub rows: usize,
	/// Lattice columns
	pub cols: usize,
	/// Horizontal lattice spacing
	pub spacing_x: f64,
	/// Vertical lattice spacing
	pub spacing_y: f64,
	/// Seed for the layout; the same seed always yields the same graph
	pub seed: u64,
}

impl Graph {
	/// Builds a dense, almost aligned, undirected graph.
	///
	/// Each lattice point receives a node with probability 0.8, pushed off the
	/// point by up to `sqrt(spacing / 2)` on each axis. Every pair of nodes
	/// closer than 1.5 times the mean spacing is linked, weighted by their
	/// Euclidean distance. Labels are the node indices.
	pub fn scattered(spec: ScatterSpec) -> GraphResult<Self> {
		let ScatterSpec {
			rows,
			cols,
			spacing_x,
			spacing_y,
			seed,
		} = spec;
		if !(spacing_x.is_finite() && spacing_x > 0.0 && spacing_y.is_finite() && spacing_y > 0.0)
		{
			return Err(GraphError::construction(format!(
				"scatter spacing must be positive, got {spacing_x}x{spacing_y}"
			)));
		}

		let mut rng = ChaCha8Rng::seed_from_u64(seed);
		let mut graph = Graph::new(false, true);
		for row in 0..rows {
			for col in 0..cols {
				if !rng.gen_bool(KEEP_PROBABILITY) {
					continue;
				}
				let (origin_x, origin_y) = (
					spacing_x / 2.0 + col as f64 * spacing_x,
					spacing_y / 2.0 + row as f64 * spacing_y,
				);
				let x = origin_x + jitter(&mut rng, spacing_x);
				let y = origin_y + jitter(&mut rng, spacing_y);
				let index = graph.len();
				graph.add_node(x, y, Some(index.to_string()));
			}
		}
		if graph.is_empty() {
			return Err(GraphError::construction(format!(
				"scattered {rows}x{cols} layout produced no nodes"
			)));
		}

		let reach = LINK_FACTOR * (spacing_x + spacing_y) / 2.0;
		let positions: Vec<(f64, f64)> = graph.nodes().iter().map(|n| (n.x(), n.y())).collect();
		for (i, &(x1, y1)) in positions.iter().enumerate() {
			for (j, &(x2, y2)) in positions.iter().enumerate().skip(i + 1) {
				let dist = (x2 - x1).hypot(y2 - y1);
				if dist < reach {
					graph.add_edge(i, j, dist)?;
				}
			}
		}
		Ok(graph)
	}
}

fn jitter(rng: &mut ChaCha8Rng, spacing: f64) -> f64 {
	let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
	sign * (rng.gen_range(0.0..1.0) * spacing / 2.0).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn spec(seed: u64) -> ScatterSpec {
		ScatterSpec {
			rows: 6,
			cols: 6,
			spacing_x: 100.0,
			spacing_y: 100.0,
			seed,
		}
	}

	#[test]
	fn test_same_seed_same_graph() {
		let a = Graph::scattered(spec(7)).unwrap();
		let b = Graph::scattered(spec(7)).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn test_different_seeds_differ() {
		let a = Graph::scattered(spec(1)).unwrap();
		let b = Graph::scattered(spec(2)).unwrap();
		assert_ne!(a, b);
	}

	#[test]
	fn test_scattered_is_undirected_and_linked_by_distance() {
		let graph = Graph::scattered(spec(42)).unwrap();
		assert!(!graph.is_directed());
		assert!(graph.len() <= 36);

		for node in graph.nodes() {
			assert_eq!(node.label(), Some(node.index().to_string().as_str()));
			for edge in node.edges() {
				let other = graph.node(edge.target()).unwrap();
				let dist = (other.x() - node.x()).hypot(other.y() - node.y());
				assert!((edge.weight() - dist).abs() < 1e-9);
				assert!(edge.weight() < 150.0);
				assert!(edge.twin().is_some());
			}
		}
	}

	#[test]
	fn test_nodes_stay_near_their_lattice_point() {
		let graph = Graph::scattered(spec(3)).unwrap();
		let max_offset = (100.0f64 / 2.0).sqrt();
		for node in graph.nodes() {
			let cell_x = ((node.x() - 50.0) / 100.0).round();
			let cell_y = ((node.y() - 50.0) / 100.0).round();
			assert!((node.x() - (50.0 + cell_x * 100.0)).abs() <= max_offset);
			assert!((node.y() - (50.0 + cell_y * 100.0)).abs() <= max_offset);
		}
	}

	#[test]
	fn test_empty_layout_is_rejected() {
		let empty = ScatterSpec {
			rows: 0,
			..spec(0)
		};
		assert!(matches!(
			Graph::scattered(empty),
			Err(GraphError::InvalidGraphConstruction { .. })
		));
	}
}
