//! Visual/algorithmic states of nodes and edges.

use serde::{Deserialize, Serialize};

/// State of a node during a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeState {
	/// Not reached yet.
	#[default]
	Unvisited,
	/// Has a finite tentative distance but is not settled.
	Reached,
	/// Its outgoing edges are being relaxed.
	Frontier,
	/// Distance is final.
	Settled,
}

impl NodeState {
	/// Whether the engine may move a node from `self` to `next`.
	///
	/// Going back to `Unvisited` is only possible through a reset, which
	/// bypasses this check.
	pub fn can_transition_to(self, next: NodeState) -> bool {
		use NodeState::*;
		matches!(
			(self, next),
			(Unvisited, Reached)
				| (Unvisited, Frontier)
				| (Reached, Reached)
				| (Reached, Frontier)
				| (Frontier, Settled)
		)
	}

	/// True for `Settled`.
	pub fn is_settled(self) -> bool {
		self == NodeState::Settled
	}
}

/// State of a single edge record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeState {
	/// Not looked at yet.
	#[default]
	Unchecked,
	/// Being relaxed from its source.
	Checking,
	/// Checked without improving anything, or superseded as a parent link.
	Rejected,
	/// Current best-known parent link of its target.
	TreeEdge,
}

impl EdgeState {
	/// Whether the engine may move an edge from `self` to `next`.
	///
	/// Writing the current state again is allowed so twin records can be
	/// synchronized unconditionally.
	pub fn can_transition_to(self, next: EdgeState) -> bool {
		use EdgeState::*;
		self == next
			|| matches!(
				(self, next),
				(Unchecked, Checking)
					| (Checking, Rejected)
					| (Checking, TreeEdge)
					| (TreeEdge, Rejected)
			)
	}

	/// Edges drawn in "tree only" mode.
	pub fn is_tree_like(self) -> bool {
		matches!(self, EdgeState::Checking | EdgeState::TreeEdge)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_node_transitions() {
		assert!(NodeState::Unvisited.can_transition_to(NodeState::Reached));
		assert!(NodeState::Unvisited.can_transition_to(NodeState::Frontier));
		assert!(NodeState::Reached.can_transition_to(NodeState::Reached));
		assert!(NodeState::Frontier.can_transition_to(NodeState::Settled));

		assert!(!NodeState::Settled.can_transition_to(NodeState::Reached));
		assert!(!NodeState::Settled.can_transition_to(NodeState::Frontier));
		assert!(!NodeState::Unvisited.can_transition_to(NodeState::Settled));
		assert!(!NodeState::Frontier.can_transition_to(NodeState::Reached));
	}

	#[test]
	fn test_edge_transitions() {
		assert!(EdgeState::Unchecked.can_transition_to(EdgeState::Checking));
		assert!(EdgeState::Checking.can_transition_to(EdgeState::TreeEdge));
		assert!(EdgeState::Checking.can_transition_to(EdgeState::Rejected));
		assert!(EdgeState::TreeEdge.can_transition_to(EdgeState::Rejected));
		assert!(EdgeState::Rejected.can_transition_to(EdgeState::Rejected));

		assert!(!EdgeState::Unchecked.can_transition_to(EdgeState::TreeEdge));
		assert!(!EdgeState::Rejected.can_transition_to(EdgeState::TreeEdge));
		assert!(!EdgeState::TreeEdge.can_transition_to(EdgeState::Checking));
	}

	#[test]
	fn test_defaults_are_initial_states() {
		assert_eq!(NodeState::default(), NodeState::Unvisited);
		assert_eq!(EdgeState::default(), EdgeState::Unchecked);
	}
}
