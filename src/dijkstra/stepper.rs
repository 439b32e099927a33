//! Resumable Dijkstra search, advanced one observable unit of work per call.
//!
//! A [`Stepper`] owns its [`Graph`] for as long as it runs so nothing else
//! can mutate node or edge records mid-search. The caller drives it:
//!
//! ```text
//! start_stepping(source) -> step_once() -> render -> step_once() -> ... -> false
//! ```
//!
//! Each call either relaxes a single edge or settles the frontier node and
//! picks the next one. In [`StepMode::Fine`] an edge first shows up as
//! `Checking` and only receives its terminal state (`TreeEdge` or `Rejected`)
//! at the start of the following call, so a renderer sampling between calls
//! sees both. [`StepMode::Coarse`] skips the intermediate frame.

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::element::{EdgeState, NodeState};
use super::error::{GraphError, GraphResult};
use super::graph::{EdgeRef, Graph};

/// Edge visualization cadence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepMode {
	/// `Checking` on one call, terminal state on the next.
	#[default]
	Fine,
	/// Terminal state written in the call that checks the edge.
	Coarse,
}

/// Terminal state an edge receives at the start of the next call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdge {
	/// Edge currently shown as `Checking`
	pub edge: EdgeRef,
	/// State it settles into
	pub commit: EdgeState,
}

/// Where the search currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
	/// No run has been started since construction or the last reset.
	#[default]
	Idle,
	/// `settled` just ran out of edges; the next frontier is being chosen.
	SelectingNode {
		/// Node settled by the previous call
		settled: usize,
	},
	/// Edges of `node` are being relaxed, `cursor` is the last edge checked.
	RelaxingEdges {
		/// Frontier node
		node: usize,
		/// Index into the frontier's edge list
		cursor: usize,
		/// Commit owed from the previous call in fine mode
		pending: Option<PendingEdge>,
	},
	/// Every node reachable from the source is settled.
	Done,
}

/// Dijkstra state machine over an owned graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StepperRecord")]
pub struct Stepper {
	graph: Graph,
	phase: Phase,
	source: Option<usize>,
	parents: Vec<Option<EdgeRef>>,
	mode: StepMode,
}

/// Unchecked shape of a serialized [`Stepper`].
#[derive(Deserialize)]
struct StepperRecord {
	graph: Graph,
	phase: Phase,
	source: Option<usize>,
	parents: Vec<Option<EdgeRef>>,
	mode: StepMode,
}

impl TryFrom<StepperRecord> for Stepper {
	type Error = GraphError;

	fn try_from(record: StepperRecord) -> GraphResult<Self> {
		let StepperRecord {
			graph,
			phase,
			source,
			parents,
			mode,
		} = record;
		let broken = |what: String| Err(GraphError::construction(what));

		if parents.len() != graph.len() {
			return broken(format!(
				"{} parent links for {} nodes",
				parents.len(),
				graph.len()
			));
		}
		for (index, parent) in parents.iter().enumerate() {
			if let Some(link) = *parent {
				if graph.edge(link).is_none_or(|edge| edge.target() != index) {
					return broken(format!("parent link of node {index} does not lead to it"));
				}
			}
		}
		if source.is_some_and(|s| !graph.valid_index(s)) {
			return broken(format!("source {source:?} is outside 0..{}", graph.len()));
		}
		let phase_fits = match phase {
			Phase::Idle | Phase::Done => true,
			Phase::SelectingNode { settled } => graph.valid_index(settled),
			Phase::RelaxingEdges {
				node,
				cursor,
				pending,
			} => {
				graph
					.node(node)
					.is_some_and(|n| cursor <= n.edges().len())
					&& pending.is_none_or(|p| graph.edge(p.edge).is_some())
			}
		};
		if !phase_fits {
			return broken(format!("phase {phase:?} points outside the graph"));
		}

		Ok(Self {
			graph,
			phase,
			source,
			parents,
			mode,
		})
	}
}

impl Stepper {
	/// Takes ownership of `graph`. No run is started.
	pub fn new(graph: Graph) -> Self {
		Self::with_mode(graph, StepMode::default())
	}

	/// Like [`Stepper::new`] with an explicit step mode.
	pub fn with_mode(graph: Graph, mode: StepMode) -> Self {
		let parents = vec![None; graph.len()];
		Self {
			graph,
			phase: Phase::Idle,
			source: None,
			parents,
			mode,
		}
	}

	/// The graph with its current element states.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Gives the graph back.
	pub fn into_graph(self) -> Graph {
		self.graph
	}

	/// Current edge visualization cadence.
	pub fn mode(&self) -> StepMode {
		self.mode
	}

	/// Takes effect from the next edge checked.
	pub fn set_mode(&mut self, mode: StepMode) {
		self.mode = mode;
	}

	/// Current phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Source of the current run.
	pub fn source(&self) -> Option<usize> {
		self.source
	}

	/// Node whose edges are being relaxed.
	pub fn frontier(&self) -> Option<usize> {
		match self.phase {
			Phase::RelaxingEdges { node, .. } => Some(node),
			_ => None,
		}
	}

	/// Last edge checked from the frontier node.
	pub fn cursor(&self) -> Option<EdgeRef> {
		match self.phase {
			Phase::RelaxingEdges { node, cursor, .. } => Some(EdgeRef::new(node, cursor)),
			_ => None,
		}
	}

	/// True once the run is done.
	pub fn is_finished(&self) -> bool {
		self.phase == Phase::Done
	}

	/// Tree edge currently leading into `index`.
	pub fn parent(&self, index: usize) -> Option<EdgeRef> {
		self.parents.get(index).copied().flatten()
	}

	/// Node indices from the source to `target` along the current parent links.
	///
	/// `None` if `target` has not been reached. Once the run is done this is a
	/// shortest path.
	pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
		let source = self.source?;
		if !self.graph.node(target)?.distance().is_finite() {
			return None;
		}
		let mut path = vec![target];
		let mut current = target;
		while current != source {
			let link = self.parent(current)?;
			current = link.node;
			path.push(current);
			if path.len() > self.graph.len() {
				return None;
			}
		}
		path.reverse();
		Some(path)
	}

	/// Whether `index` names a node of the owned graph.
	pub fn valid_index(&self, index: usize) -> bool {
		self.graph.valid_index(index)
	}

	/// Clears every element state and the run state.
	pub fn reset(&mut self) {
		self.graph.reset();
		self.parents.fill(None);
		self.source = None;
		self.phase = Phase::Idle;
	}

	/// Starts a new run from `source`, discarding any previous one.
	///
	/// An invalid index leaves everything untouched. An empty graph has
	/// nothing to search: it finishes immediately and returns `Ok` without
	/// looking at `source` at all.
	pub fn start_stepping(&mut self, source: usize) -> GraphResult<()> {
		if self.graph.is_empty() {
			self.reset();
			self.phase = Phase::Done;
			info!("Empty graph, nothing to search");
			return Ok(());
		}
		if !self.valid_index(source) {
			return Err(GraphError::invalid_start(source, self.graph.len()));
		}

		self.reset();
		self.source = Some(source);
		self.graph.set_node_state(source, NodeState::Frontier);
		self.graph.set_distance(source, 0.0);
		self.phase = Phase::RelaxingEdges {
			node: source,
			cursor: 0,
			pending: None,
		};
		info!(
			"Stepping from node {} over {} nodes ({:?})",
			source,
			self.graph.len(),
			self.mode
		);
		Ok(())
	}

	/// Performs one unit of work. Returns `false` once the search is finished
	/// (and on every later call), `true` while work remains.
	pub fn step_once(&mut self) -> bool {
		loop {
			match self.phase {
				Phase::Idle | Phase::Done => return false,
				Phase::RelaxingEdges {
					node,
					cursor,
					pending,
				} => {
					if let Some(pending) = pending {
						self.graph.set_edge_state(pending.edge, pending.commit);
					}
					match self.next_unchecked(node, cursor) {
						Some(edge) => {
							let pending = self.relax(EdgeRef::new(node, edge));
							self.phase = Phase::RelaxingEdges {
								node,
								cursor: edge,
								pending,
							};
							return true;
						}
						None => {
							self.graph.set_node_state(node, NodeState::Settled);
							debug!("Settled node {} at {}", node, self.distance(node));
							self.phase = Phase::SelectingNode { settled: node };
						}
					}
				}
				Phase::SelectingNode { .. } => match self.cheapest_unsettled() {
					Some(next) => {
						self.graph.set_node_state(next, NodeState::Frontier);
						debug!("Frontier moves to node {} at {}", next, self.distance(next));
						self.phase = Phase::RelaxingEdges {
							node: next,
							cursor: 0,
							pending: None,
						};
						return true;
					}
					None => {
						self.phase = Phase::Done;
						info!("Search from {:?} finished", self.source);
						return false;
					}
				},
			}
		}
	}

	/// Steps until the search is finished; returns the number of calls made.
	pub fn run_to_end(&mut self) -> usize {
		let mut calls = 1;
		while self.step_once() {
			calls += 1;
		}
		calls
	}

	fn distance(&self, index: usize) -> f64 {
		self.graph.nodes()[index].distance()
	}

	fn next_unchecked(&self, node: usize, from: usize) -> Option<usize> {
		self.graph.nodes()[node]
			.edges()
			.iter()
			.enumerate()
			.skip(from)
			.find(|(_, e)| e.state() == EdgeState::Unchecked)
			.map(|(i, _)| i)
	}

	/// Marks `at` as checking and relaxes it; returns the deferred commit in
	/// fine mode.
	fn relax(&mut self, at: EdgeRef) -> Option<PendingEdge> {
		self.graph.set_edge_state(at, EdgeState::Checking);

		let edge = &self.graph.nodes()[at.node].edges()[at.edge];
		let (target, weight) = (edge.target(), edge.weight());
		let candidate = self.distance(at.node) + weight;

		let commit = if candidate < self.distance(target) {
			trace!("Edge {:?} improves node {} to {}", at, target, candidate);
			self.graph.set_distance(target, candidate);
			self.graph.set_node_state(target, NodeState::Reached);
			if let Some(previous) = self.parents[target].replace(at) {
				self.graph.set_edge_state(previous, EdgeState::Rejected);
			}
			EdgeState::TreeEdge
		} else {
			trace!("Edge {:?} does not improve node {}", at, target);
			EdgeState::Rejected
		};

		match self.mode {
			StepMode::Fine => Some(PendingEdge { edge: at, commit }),
			StepMode::Coarse => {
				self.graph.set_edge_state(at, commit);
				None
			}
		}
	}

	/// Lowest-index node among the unsettled ones with the smallest finite
	/// distance.
	fn cheapest_unsettled(&self) -> Option<usize> {
		let mut best: Option<(usize, f64)> = None;
		for node in self.graph.nodes() {
			let distance = node.distance();
			if node.state().is_settled() || !distance.is_finite() {
				continue;
			}
			if best.is_none_or(|(_, d)| distance < d) {
				best = Some((node.index(), distance));
			}
		}
		best.map(|(index, _)| index)
	}
}
