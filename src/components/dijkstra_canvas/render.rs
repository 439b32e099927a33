use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::dijkstra::{EdgeState, EdgeView, GraphRenderer, NodeState, NodeView, RenderOptions};

use super::state::VisualizerState;

const BACKGROUND: &str = "#1a1a2e";
const ARROW_SIZE: f64 = 10.0;

pub fn render(state: &VisualizerState, ctx: &CanvasRenderingContext2d) {
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let mut canvas = CanvasRenderer {
		ctx,
		width: state.width,
		height: state.height,
		k: state.transform.k,
		node_radius: state.options.node_radius,
		render_labels: state.options.render_labels,
	};
	state.stepper.graph().render(
		&mut canvas,
		RenderOptions {
			tree_only: state.options.tree_only,
		},
	);
	ctx.restore();
}

fn node_color(state: NodeState) -> &'static str {
	match state {
		NodeState::Unvisited => "rgba(100, 180, 255, 0.6)",
		NodeState::Reached => "#ff7f0e",
		NodeState::Frontier => "#55cf65",
		NodeState::Settled => "#2ca02c",
	}
}

/// Stroke colour and width (before zoom compensation) per edge state.
fn edge_style(state: EdgeState) -> (&'static str, f64) {
	match state {
		EdgeState::Unchecked => ("rgba(100, 180, 255, 0.35)", 1.0),
		EdgeState::Checking => ("#55cf65", 2.5),
		EdgeState::Rejected => ("rgba(255, 255, 255, 0.08)", 1.0),
		EdgeState::TreeEdge => ("#ffd166", 2.0),
	}
}

fn format_distance(distance: f64) -> String {
	if distance.is_infinite() {
		"∞".into()
	} else if distance.fract() == 0.0 {
		format!("{distance:.0}")
	} else {
		format!("{distance:.1}")
	}
}

/// Draws into a context that already carries the view transform.
struct CanvasRenderer<'a> {
	ctx: &'a CanvasRenderingContext2d,
	width: f64,
	height: f64,
	k: f64,
	node_radius: f64,
	render_labels: bool,
}

impl GraphRenderer for CanvasRenderer<'_> {
	fn clear(&mut self) {
		self.ctx.save();
		let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
		self.ctx.set_fill_style_str(BACKGROUND);
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
		self.ctx.restore();
	}

	fn render_node(&mut self, node: &NodeView<'_>) {
		let ctx = self.ctx;
		let (x, y, r) = (node.x, node.y, self.node_radius);

		ctx.begin_path();
		let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(BACKGROUND);
		ctx.fill();
		ctx.set_line_width(2.0 / self.k.max(0.5));
		ctx.set_stroke_style_str(node_color(node.state));
		ctx.stroke();

		if !self.render_labels {
			return;
		}
		ctx.set_text_align("center");
		if let Some(label) = node.label {
			ctx.set_fill_style_str("white");
			ctx.set_font(&format!("{}px sans-serif", r * 0.9));
			let _ = ctx.fill_text(label, x, y);
		}
		ctx.set_fill_style_str("#e15759");
		ctx.set_font(&format!("{}px sans-serif", r * 0.7));
		let _ = ctx.fill_text(&format_distance(node.distance), x, y + r * 0.7);
	}

	fn render_edge(&mut self, edge: &EdgeView) {
		let ctx = self.ctx;
		let ((x1, y1), (x2, y2)) = (edge.from, edge.to);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 2.0 * self.node_radius {
			return;
		}

		// Start and end on the node outlines, not the centres.
		let (ux, uy) = (dx / dist, dy / dist);
		let (sx, sy) = (x1 + ux * self.node_radius, y1 + uy * self.node_radius);
		let (ex, ey) = (x2 - ux * self.node_radius, y2 - uy * self.node_radius);

		let (color, width) = edge_style(edge.state);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width / self.k.max(0.5));
		ctx.begin_path();
		ctx.move_to(sx, sy);

		let (label_x, label_y) = if edge.directed {
			// Curve to the side so both directions of a pair stay visible.
			let (cx, cy) = (
				(sx + ex) / 2.0 - (ey - sy) / 4.0,
				(sy + ey) / 2.0 + (ex - sx) / 4.0,
			);
			ctx.quadratic_curve_to(cx, cy, ex, ey);
			let angle = (ey - cy).atan2(ex - cx);
			for side in [-PI / 6.0, PI / 6.0] {
				ctx.move_to(ex, ey);
				ctx.line_to(
					ex - ARROW_SIZE * (angle + side).cos(),
					ey - ARROW_SIZE * (angle + side).sin(),
				);
			}
			(cx, cy)
		} else {
			ctx.line_to(ex, ey);
			((sx + ex) / 2.0, (sy + ey) / 2.0)
		};
		ctx.stroke();

		if self.render_labels {
			ctx.set_fill_style_str(color);
			ctx.set_text_align("center");
			ctx.set_font(&format!("{}px sans-serif", self.node_radius * 0.75));
			let _ = ctx.fill_text(&format_distance(edge.weight), label_x, label_y);
		}
	}
}
