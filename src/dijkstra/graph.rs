//! Graph store: nodes, edge records and their adjacency.
//!
//! Every edge record lives on its source node and is addressed by
//! `(node index, edge index)`. Undirected graphs store each edge twice, once
//! per endpoint, and link the two records through [`Edge::twin`]. Keeping the
//! twins in the same state is the job of [`Graph::set_edge_state`], which the
//! stepping engine calls for every edge write.

use serde::{Deserialize, Serialize};

use super::element::{EdgeState, NodeState};
use super::error::{GraphError, GraphResult};

/// Address of an edge record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRef {
	/// Index of the node holding the record
	pub node: usize,
	/// Position of the record in that node's edge list
	pub edge: usize,
}

impl EdgeRef {
	/// Creates an edge address
	pub fn new(node: usize, edge: usize) -> Self {
		Self { node, edge }
	}
}

/// Outgoing edge record held on its source node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	target: usize,
	weight: f64,
	state: EdgeState,
	twin: Option<EdgeRef>,
}

impl Edge {
	/// Index of the node this edge points at.
	pub fn target(&self) -> usize {
		self.target
	}

	/// Non-negative weight (1 in unweighted graphs).
	pub fn weight(&self) -> f64 {
		self.weight
	}

	/// Current state.
	pub fn state(&self) -> EdgeState {
		self.state
	}

	/// The mirrored record on the target node, for undirected graphs.
	pub fn twin(&self) -> Option<EdgeRef> {
		self.twin
	}
}

/// A graph node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	index: usize,
	x: f64,
	y: f64,
	label: Option<String>,
	state: NodeState,
	#[serde(with = "distance")]
	distance: f64,
	edges: Vec<Edge>,
}

impl Node {
	fn new(index: usize, x: f64, y: f64, label: Option<String>) -> Self {
		Self {
			index,
			x,
			y,
			label,
			state: NodeState::Unvisited,
			distance: f64::INFINITY,
			edges: Vec::new(),
		}
	}

	/// Stable index assigned at creation.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Horizontal position, only meaningful to renderers.
	pub fn x(&self) -> f64 {
		self.x
	}

	/// Vertical position, only meaningful to renderers.
	pub fn y(&self) -> f64 {
		self.y
	}

	/// Optional display label.
	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	/// Current state.
	pub fn state(&self) -> NodeState {
		self.state
	}

	/// Tentative distance from the source, `f64::INFINITY` when unreached.
	pub fn distance(&self) -> f64 {
		self.distance
	}

	/// Outgoing edge records in insertion order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	fn reset(&mut self) {
		self.state = NodeState::Unvisited;
		self.distance = f64::INFINITY;
		for edge in &mut self.edges {
			edge.state = EdgeState::Unchecked;
		}
	}
}

/// Adjacency used when building a lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
	/// Horizontal and vertical neighbours only
	Four,
	/// Diagonal neighbours as well
	#[default]
	Eight,
}

/// Parameters of [`Graph::grid`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
	/// Number of node rows
	pub rows: usize,
	/// Number of node columns
	pub cols: usize,
	/// Horizontal distance between neighbouring nodes
	pub spacing_x: f64,
	/// Vertical distance between neighbouring nodes
	pub spacing_y: f64,
	/// Which neighbours are connected
	pub neighborhood: Neighborhood,
}

/// Fixed-size collection of nodes with per-element search state.
///
/// Deserializing goes through the same checks as [`Graph::add_edge`], so a
/// snapshot with dangling targets, bad weights or broken twin links is
/// refused rather than loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRecord")]
pub struct Graph {
	nodes: Vec<Node>,
	directed: bool,
	weighted: bool,
}

/// Unchecked shape of a serialized [`Graph`].
#[derive(Deserialize)]
struct GraphRecord {
	nodes: Vec<Node>,
	directed: bool,
	weighted: bool,
}

impl TryFrom<GraphRecord> for Graph {
	type Error = GraphError;

	fn try_from(record: GraphRecord) -> GraphResult<Self> {
		let graph = Self {
			nodes: record.nodes,
			directed: record.directed,
			weighted: record.weighted,
		};
		graph.check()?;
		Ok(graph)
	}
}

impl Graph {
	/// Creates an empty graph.
	///
	/// Both flags are fixed for the lifetime of the graph. In an unweighted
	/// graph every edge gets weight 1 regardless of what is passed to
	/// [`Graph::add_edge`].
	pub fn new(directed: bool, weighted: bool) -> Self {
		Self {
			nodes: Vec::new(),
			directed,
			weighted,
		}
	}

	/// Appends a node and returns its index.
	pub fn add_node(&mut self, x: f64, y: f64, label: Option<String>) -> usize {
		let index = self.nodes.len();
		self.nodes.push(Node::new(index, x, y, label));
		index
	}

	/// Adds an edge from `from` to `to`.
	///
	/// Undirected graphs get a second record on `to` pointing back at `from`,
	/// and the two records are linked as twins.
	pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> GraphResult<()> {
		if !self.valid_index(from) || !self.valid_index(to) {
			return Err(GraphError::construction(format!(
				"edge {from} -> {to} references a node outside 0..{}",
				self.nodes.len()
			)));
		}
		let weight = if self.weighted { weight } else { 1.0 };
		if !weight.is_finite() || weight < 0.0 {
			return Err(GraphError::construction(format!(
				"edge {from} -> {to} has invalid weight {weight}"
			)));
		}

		let forward = EdgeRef::new(from, self.nodes[from].edges.len());
		self.nodes[from].edges.push(Edge {
			target: to,
			weight,
			state: EdgeState::Unchecked,
			twin: None,
		});

		if !self.directed {
			let backward = EdgeRef::new(to, self.nodes[to].edges.len());
			self.nodes[to].edges.push(Edge {
				target: from,
				weight,
				state: EdgeState::Unchecked,
				twin: Some(forward),
			});
			self.nodes[from].edges[forward.edge].twin = Some(backward);
		}
		Ok(())
	}

	/// Builds an undirected, weighted rectangular lattice.
	///
	/// Node `row * cols + col` sits at the centre of its cell and is labelled
	/// with its index. Each node's edges are stored in the order upper-left,
	/// up, upper-right, left, right, lower-left, down, lower-right (skipping
	/// diagonals for [`Neighborhood::Four`]).
	pub fn grid(spec: GridSpec) -> GraphResult<Self> {
		let GridSpec {
			rows,
			cols,
			spacing_x,
			spacing_y,
			neighborhood,
		} = spec;
		if rows == 0 || cols == 0 {
			return Err(GraphError::construction(format!(
				"grid needs at least one row and column, got {rows}x{cols}"
			)));
		}
		if !(spacing_x.is_finite() && spacing_x > 0.0 && spacing_y.is_finite() && spacing_y > 0.0)
		{
			return Err(GraphError::construction(format!(
				"grid spacing must be positive, got {spacing_x}x{spacing_y}"
			)));
		}

		let mut graph = Graph::new(false, true);
		for row in 0..rows {
			for col in 0..cols {
				let index = row * cols + col;
				let (x, y) = (
					spacing_x / 2.0 + col as f64 * spacing_x,
					spacing_y / 2.0 + row as f64 * spacing_y,
				);
				graph.add_node(x, y, Some(index.to_string()));
			}
		}

		// Only forward links are added here; the backward records land on each
		// node before its own forward ones, which yields the documented order.
		let diagonal = spacing_x.hypot(spacing_y);
		let diagonals = neighborhood == Neighborhood::Eight;
		for row in 0..rows {
			for col in 0..cols {
				let index = row * cols + col;
				if col + 1 < cols {
					graph.add_edge(index, index + 1, spacing_x)?;
				}
				if row + 1 < rows {
					let below = index + cols;
					if diagonals && col > 0 {
						graph.add_edge(index, below - 1, diagonal)?;
					}
					graph.add_edge(index, below, spacing_y)?;
					if diagonals && col + 1 < cols {
						graph.add_edge(index, below + 1, diagonal)?;
					}
				}
			}
		}
		Ok(graph)
	}

	/// Builds a graph from an explicit edge list, placing the nodes on a circle.
	pub fn from_edges(
		node_count: usize,
		directed: bool,
		weighted: bool,
		edges: &[(usize, usize, f64)],
	) -> GraphResult<Self> {
		const CENTER: f64 = 200.0;
		const RADIUS: f64 = 150.0;

		let mut graph = Graph::new(directed, weighted);
		for i in 0..node_count {
			let angle = i as f64 * std::f64::consts::TAU / node_count as f64;
			graph.add_node(
				CENTER + RADIUS * angle.cos(),
				CENTER + RADIUS * angle.sin(),
				Some(i.to_string()),
			);
		}
		for &(from, to, weight) in edges {
			graph.add_edge(from, to, weight)?;
		}
		Ok(graph)
	}

	/// Puts every node and edge back into its initial state.
	pub fn reset(&mut self) {
		for node in &mut self.nodes {
			node.reset();
		}
	}

	/// Whether `index` names a node of this graph.
	pub fn valid_index(&self, index: usize) -> bool {
		index < self.nodes.len()
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True when the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Whether edges are one-way.
	pub fn is_directed(&self) -> bool {
		self.directed
	}

	/// Whether weights are meaningful.
	pub fn is_weighted(&self) -> bool {
		self.weighted
	}

	/// Node at `index`.
	pub fn node(&self, index: usize) -> Option<&Node> {
		self.nodes.get(index)
	}

	/// All nodes in index order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edge record at `at`.
	pub fn edge(&self, at: EdgeRef) -> Option<&Edge> {
		self.nodes.get(at.node)?.edges.get(at.edge)
	}

	/// Re-validates every record, for graphs that did not come from
	/// [`Graph::add_edge`].
	fn check(&self) -> GraphResult<()> {
		for (position, node) in self.nodes.iter().enumerate() {
			if node.index != position {
				return Err(GraphError::construction(format!(
					"node at position {position} claims index {}",
					node.index
				)));
			}
			for (slot, edge) in node.edges.iter().enumerate() {
				let at = EdgeRef::new(position, slot);
				if !self.valid_index(edge.target) {
					return Err(GraphError::construction(format!(
						"edge {position} -> {} references a node outside 0..{}",
						edge.target,
						self.nodes.len()
					)));
				}
				let unit = self.weighted || edge.weight == 1.0;
				if !edge.weight.is_finite() || edge.weight < 0.0 || !unit {
					return Err(GraphError::construction(format!(
						"edge {position} -> {} has invalid weight {}",
						edge.target, edge.weight
					)));
				}
				let linked = match (self.directed, edge.twin) {
					(true, twin) => twin.is_none(),
					(false, None) => false,
					(false, Some(twin)) => {
						twin.node == edge.target
							&& self.edge(twin).is_some_and(|mirror| {
								mirror.target == position
									&& mirror.twin == Some(at)
									&& mirror.weight == edge.weight
									&& mirror.state == edge.state
							})
					}
				};
				if !linked {
					return Err(GraphError::construction(format!(
						"edge {position} -> {} has an inconsistent twin link",
						edge.target
					)));
				}
			}
		}
		Ok(())
	}

	/// Number of logical edges (twin pairs count once).
	pub fn edge_count(&self) -> usize {
		let records: usize = self.nodes.iter().map(|n| n.edges.len()).sum();
		if self.directed { records } else { records / 2 }
	}

	pub(crate) fn set_node_state(&mut self, index: usize, state: NodeState) {
		let node = &mut self.nodes[index];
		debug_assert!(
			node.state.can_transition_to(state),
			"illegal node transition {:?} -> {:?} on {}",
			node.state,
			state,
			index
		);
		node.state = state;
	}

	pub(crate) fn set_distance(&mut self, index: usize, distance: f64) {
		let node = &mut self.nodes[index];
		debug_assert!(distance <= node.distance && !node.state.is_settled());
		node.distance = distance;
	}

	/// Writes `state` to the record at `at` and to its twin, if any.
	pub(crate) fn set_edge_state(&mut self, at: EdgeRef, state: EdgeState) {
		let edge = &mut self.nodes[at.node].edges[at.edge];
		debug_assert!(
			edge.state.can_transition_to(state),
			"illegal edge transition {:?} -> {:?} on {:?}",
			edge.state,
			state,
			at
		);
		edge.state = state;
		if let Some(twin) = edge.twin {
			self.nodes[twin.node].edges[twin.edge].state = state;
		}
	}
}

/// Serializes `f64::INFINITY` as `null` so snapshots survive JSON.
mod distance {
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
		if value.is_finite() {
			serializer.serialize_some(value)
		} else {
			serializer.serialize_none()
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
		Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn grid(rows: usize, cols: usize, neighborhood: Neighborhood) -> Graph {
		Graph::grid(GridSpec {
			rows,
			cols,
			spacing_x: 100.0,
			spacing_y: 100.0,
			neighborhood,
		})
		.unwrap()
	}

	fn targets(graph: &Graph, index: usize) -> Vec<usize> {
		graph.node(index).unwrap().edges().iter().map(Edge::target).collect()
	}

	#[test]
	fn test_empty_graph() {
		let graph = Graph::new(true, true);
		assert!(graph.is_empty());
		assert_eq!(graph.len(), 0);
		assert!(!graph.valid_index(0));
	}

	#[test]
	fn test_valid_index() {
		let graph = grid(2, 3, Neighborhood::Four);
		assert!(graph.valid_index(0));
		assert!(graph.valid_index(5));
		assert!(!graph.valid_index(6));
	}

	#[test]
	fn test_grid_positions_and_labels() {
		let graph = Graph::grid(GridSpec {
			rows: 2,
			cols: 3,
			spacing_x: 50.0,
			spacing_y: 80.0,
			neighborhood: Neighborhood::Four,
		})
		.unwrap();

		let node = graph.node(4).unwrap();
		assert_eq!((node.x(), node.y()), (75.0, 120.0));
		assert_eq!(node.label(), Some("4"));
		assert!(!graph.is_directed());
		assert!(graph.is_weighted());
	}

	#[test]
	fn test_grid_edge_order_matches_lattice_scan() {
		// 3x3, centre node 4 sees every neighbour.
		let graph = grid(3, 3, Neighborhood::Eight);
		assert_eq!(targets(&graph, 4), vec![0, 1, 2, 3, 5, 6, 7, 8]);
		assert_eq!(targets(&graph, 0), vec![1, 3, 4]);
		assert_eq!(targets(&graph, 8), vec![4, 5, 7]);

		let four = grid(3, 3, Neighborhood::Four);
		assert_eq!(targets(&four, 4), vec![1, 3, 5, 7]);
	}

	#[test]
	fn test_grid_weights() {
		let graph = Graph::grid(GridSpec {
			rows: 2,
			cols: 2,
			spacing_x: 30.0,
			spacing_y: 40.0,
			neighborhood: Neighborhood::Eight,
		})
		.unwrap();

		let weights: Vec<f64> = graph.node(0).unwrap().edges().iter().map(Edge::weight).collect();
		assert_eq!(weights, vec![30.0, 40.0, 50.0]);
		assert_eq!(graph.edge_count(), 6);
	}

	#[test]
	fn test_grid_rejects_bad_dimensions() {
		let spec = GridSpec {
			rows: 0,
			cols: 4,
			spacing_x: 100.0,
			spacing_y: 100.0,
			neighborhood: Neighborhood::Eight,
		};
		assert!(matches!(
			Graph::grid(spec),
			Err(GraphError::InvalidGraphConstruction { .. })
		));

		let spec = GridSpec {
			rows: 2,
			cols: 2,
			spacing_x: -1.0,
			..spec
		};
		assert!(matches!(
			Graph::grid(spec),
			Err(GraphError::InvalidGraphConstruction { .. })
		));
	}

	#[test]
	fn test_undirected_edges_are_twinned() {
		let graph = grid(3, 3, Neighborhood::Eight);
		for node in graph.nodes() {
			for (i, edge) in node.edges().iter().enumerate() {
				let twin = edge.twin().expect("undirected edge without twin");
				let back = graph.edge(twin).unwrap();
				assert_eq!(twin.node, edge.target());
				assert_eq!(back.target(), node.index());
				assert_eq!(back.twin(), Some(EdgeRef::new(node.index(), i)));
			}
		}
	}

	#[test]
	fn test_directed_edges_have_no_twin() {
		let graph = Graph::from_edges(3, true, true, &[(0, 1, 2.0), (1, 2, 3.0)]).unwrap();
		assert_eq!(graph.edge_count(), 2);
		assert!(graph.node(1).unwrap().edges()[0].twin().is_none());
		assert!(graph.node(2).unwrap().edges().is_empty());
	}

	#[test]
	fn test_self_loop_twins_itself_consistently() {
		let mut graph = Graph::new(false, true);
		graph.add_node(0.0, 0.0, None);
		graph.add_edge(0, 0, 1.0).unwrap();

		let edges = graph.node(0).unwrap().edges();
		assert_eq!(edges[0].twin(), Some(EdgeRef::new(0, 1)));
		assert_eq!(edges[1].twin(), Some(EdgeRef::new(0, 0)));
	}

	fn load(json: &str) -> Result<Graph, serde_json::Error> {
		serde_json::from_str(json)
	}

	#[test]
	fn test_saved_graph_loads_back() {
		let graph = grid(2, 3, Neighborhood::Eight);
		let json = serde_json::to_string(&graph).unwrap();
		assert_eq!(load(&json).unwrap(), graph);
	}

	#[test]
	fn test_saved_graph_with_dangling_target_is_refused() {
		let graph = Graph::from_edges(2, true, true, &[(0, 1, 1.0)]).unwrap();
		let json = serde_json::to_string(&graph).unwrap();
		let tampered = json.replace("\"target\":1", "\"target\":7");
		assert_ne!(tampered, json);

		let err = load(&tampered).unwrap_err();
		assert!(err.to_string().contains("outside 0..2"), "{err}");
	}

	#[test]
	fn test_saved_graph_with_negative_weight_is_refused() {
		let graph = Graph::from_edges(2, true, true, &[(0, 1, 1.0)]).unwrap();
		let json = serde_json::to_string(&graph).unwrap();
		let tampered = json.replace("\"weight\":1.0", "\"weight\":-5.0");
		assert_ne!(tampered, json);

		let err = load(&tampered).unwrap_err();
		assert!(err.to_string().contains("invalid weight"), "{err}");
	}

	#[test]
	fn test_saved_graph_with_broken_twin_is_refused() {
		let graph = Graph::from_edges(2, false, true, &[(0, 1, 1.0)]).unwrap();
		let json = serde_json::to_string(&graph).unwrap();
		let tampered = json.replace(
			"\"twin\":{\"node\":1,\"edge\":0}",
			"\"twin\":{\"node\":1,\"edge\":5}",
		);
		assert_ne!(tampered, json);

		let err = load(&tampered).unwrap_err();
		assert!(err.to_string().contains("twin"), "{err}");
	}

	#[test]
	fn test_add_edge_rejects_out_of_range_target() {
		let result = Graph::from_edges(2, false, true, &[(0, 2, 1.0)]);
		assert!(matches!(
			result,
			Err(GraphError::InvalidGraphConstruction { .. })
		));
	}

	#[test]
	fn test_add_edge_rejects_negative_weight() {
		let mut graph = Graph::new(true, true);
		graph.add_node(0.0, 0.0, None);
		graph.add_node(1.0, 0.0, None);
		assert!(graph.add_edge(0, 1, -3.0).is_err());
		assert!(graph.add_edge(0, 1, f64::NAN).is_err());
		assert!(graph.node(0).unwrap().edges().is_empty());
	}

	#[test]
	fn test_unweighted_graph_uses_unit_weights() {
		let graph = Graph::from_edges(2, false, false, &[(0, 1, 42.0)]).unwrap();
		assert_eq!(graph.node(0).unwrap().edges()[0].weight(), 1.0);
		assert_eq!(graph.node(1).unwrap().edges()[0].weight(), 1.0);
	}

	#[test]
	fn test_set_edge_state_syncs_twin() {
		let mut graph = grid(1, 2, Neighborhood::Four);
		let at = EdgeRef::new(0, 0);
		graph.set_edge_state(at, EdgeState::Checking);
		graph.set_edge_state(at, EdgeState::TreeEdge);

		let twin = graph.edge(at).unwrap().twin().unwrap();
		assert_eq!(graph.edge(twin).unwrap().state(), EdgeState::TreeEdge);
	}

	#[test]
	fn test_reset_is_idempotent() {
		let mut graph = grid(2, 2, Neighborhood::Four);
		graph.set_node_state(0, NodeState::Frontier);
		graph.set_distance(0, 0.0);
		graph.set_edge_state(EdgeRef::new(0, 0), EdgeState::Checking);

		graph.reset();
		let once = graph.clone();
		graph.reset();
		assert_eq!(graph, once);

		let node = graph.node(0).unwrap();
		assert_eq!(node.state(), NodeState::Unvisited);
		assert!(node.distance().is_infinite());
		assert!(graph
			.nodes()
			.iter()
			.flat_map(Node::edges)
			.all(|e| e.state() == EdgeState::Unchecked));
	}
}
