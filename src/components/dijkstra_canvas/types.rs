/// Requests the controls send to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
	/// Begin a new search from the given node
	Start(usize),
	/// Advance the search by one step
	Step,
	/// Step once per animation frame until finished or stopped
	Run,
	/// Pause a running search
	Stop,
}

/// Lifecycle of the search shown on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunStatus {
	/// A graph is shown, no search started
	#[default]
	Created,
	/// Search started, advanced by hand
	Stepping,
	/// Search advancing on every frame
	Running,
	/// Nothing left to do
	Finished,
}

/// What the canvas reports back to the controls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanvasStatus {
	pub run: RunStatus,
	pub node_count: usize,
	/// Last rejected request, shown to the user
	pub message: Option<String>,
}
