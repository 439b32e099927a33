use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::config::{GraphConfig, VisualizerConfig};
use crate::dijkstra::Graph;

use super::render;
use super::state::{CLICK_SLOP, VisualizerState};
use super::types::{CanvasStatus, Command};

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn DijkstraCanvas(
	#[prop(into)] graph: Signal<GraphConfig>,
	#[prop(into)] options: Signal<VisualizerConfig>,
	#[prop(into)] command: Signal<Option<Command>>,
	status: WriteSignal<CanvasStatus>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<VisualizerState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("No window, canvas stays empty");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("Canvas has no 2d context");
				return;
			}
		};

		let config = graph.get_untracked();
		let built = match config.build() {
			Ok(built) => built,
			Err(err) => {
				warn!("{}", err);
				Graph::new(false, true)
			}
		};
		let visualizer = VisualizerState::new(built, options.get_untracked(), w, h);
		status.set(visualizer.status());
		*state_init.borrow_mut() = Some(visualizer);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				let before = s.run;
				s.tick();
				if s.run != before {
					status.set(s.status());
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_graph = state.clone();
	Effect::new(move |_| {
		let config = graph.get();
		let mut guard = state_graph.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		match config.build() {
			Ok(built) => {
				s.replace_graph(built);
				status.set(s.status());
			}
			Err(err) => {
				warn!("{}", err);
				status.set(CanvasStatus {
					message: Some(err.to_string()),
					..s.status()
				});
			}
		}
	});

	let state_opts = state.clone();
	Effect::new(move |_| {
		let opts = options.get();
		if let Some(ref mut s) = *state_opts.borrow_mut() {
			s.set_options(opts);
		}
	});

	let state_cmd = state.clone();
	Effect::new(move |_| {
		let Some(cmd) = command.get() else {
			return;
		};
		let mut guard = state_cmd.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		let mut message = None;
		match cmd {
			Command::Start(source) => match s.start(source) {
				Ok(()) => info!("Started search from node {}", source),
				Err(err) => {
					warn!("{}", err);
					message = Some(err.to_string());
				}
			},
			Command::Step => s.step(),
			Command::Run => s.set_running(true),
			Command::Stop => s.set_running(false),
		}
		status.set(CanvasStatus {
			message,
			..s.status()
		});
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pan.active = true;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	// A press released in place is a click, and a click steps the search.
	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			let moved = (x - s.pan.start_x).hypot(y - s.pan.start_y);
			if s.pan.active && moved < CLICK_SLOP {
				s.step();
				status.set(s.status());
			}
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pan.active = false;
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="dijkstra-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: pointer;"
		/>
	}
}
