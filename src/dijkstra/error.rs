//! Error types for graph construction and stepping.

use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors surfaced by the graph store and the stepping engine.
///
/// Both variants are input-validation failures: they are reported before any
/// state is touched, so a failed call leaves the graph exactly as it was.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
	/// The requested source node does not exist
	#[error("Invalid start index {index}: graph has {len} nodes")]
	InvalidStart {
		/// The rejected index
		index: usize,
		/// Number of nodes in the graph
		len: usize,
	},

	/// A graph could not be built from the given parameters
	#[error("Invalid graph construction: {reason}")]
	InvalidGraphConstruction {
		/// Why construction was aborted
		reason: String,
	},
}

impl GraphError {
	/// Creates an invalid start error
	pub fn invalid_start(index: usize, len: usize) -> Self {
		Self::InvalidStart { index, len }
	}

	/// Creates an invalid construction error
	pub fn construction(reason: impl Into<String>) -> Self {
		Self::InvalidGraphConstruction {
			reason: reason.into(),
		}
	}
}
