use std::fmt::Display;
use std::str::FromStr;

use leptos::prelude::*;
use log::warn;

use crate::components::dijkstra_canvas::{CanvasStatus, Command, DijkstraCanvas, RunStatus};
use crate::config::{GraphConfig, Layout, VisualizerConfig};
use crate::dijkstra::{Neighborhood, StepMode};

/// Labelled numeric input bound to `value`; unparsable input is ignored.
fn number_field<T>(label: &'static str, value: RwSignal<T>, min: &'static str) -> impl IntoView
where
	T: FromStr + Display + Clone + Send + Sync + 'static,
{
	view! {
		<label class="graph-field">
			{label}
			<input
				class="graph-numeric"
				type="number"
				min=min
				prop:value=move || value.get().to_string()
				on:change={move |ev| match event_target_value(&ev).parse::<T>() {
					Ok(v) => value.set(v),
					Err(_) => warn!("Ignoring invalid value for {}", label),
				}}
			/>
		</label>
	}
}

/// Seed for the scattered layout; a fresh one per "Create graph".
fn fresh_seed() -> u64 {
	(js_sys::Math::random() * u32::MAX as f64) as u64
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let defaults = GraphConfig::default();
	let layout = RwSignal::new(defaults.layout);
	let spacing_x = RwSignal::new(defaults.spacing_x);
	let spacing_y = RwSignal::new(defaults.spacing_y);
	let count_x = RwSignal::new(defaults.count_x);
	let count_y = RwSignal::new(defaults.count_y);
	let diagonals = RwSignal::new(defaults.neighborhood == Neighborhood::Eight);
	let start_index = RwSignal::new(0usize);
	let tree_only = RwSignal::new(false);
	let coarse = RwSignal::new(false);

	let graph_config = RwSignal::new(defaults);
	let command = RwSignal::new(None::<Command>);
	let status = RwSignal::new(CanvasStatus::default());

	let options = Signal::derive(move || VisualizerConfig {
		tree_only: tree_only.get(),
		step_mode: if coarse.get() {
			StepMode::Coarse
		} else {
			StepMode::Fine
		},
		..VisualizerConfig::for_layout(graph_config.get().layout)
	});

	let create = move |_| {
		graph_config.set(GraphConfig {
			layout: layout.get_untracked(),
			spacing_x: spacing_x.get_untracked(),
			spacing_y: spacing_y.get_untracked(),
			count_x: count_x.get_untracked(),
			count_y: count_y.get_untracked(),
			neighborhood: if diagonals.get_untracked() {
				Neighborhood::Eight
			} else {
				Neighborhood::Four
			},
			seed: fresh_seed(),
		});
	};

	let run = move || status.get().run;
	let can_start = move || run() != RunStatus::Running && status.get().node_count > 0;
	let can_step = move || run() == RunStatus::Stepping;
	let can_stop = move || run() == RunStatus::Running;

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<DijkstraCanvas
					graph=graph_config
					options=options
					command=command
					status=status.write_only()
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Dijkstra, Step by Step"</h1>
					<p class="subtitle">
						"Click the canvas to step. Scroll to zoom. Drag to pan."
					</p>

					<form class="graph-form" on:submit=|ev| ev.prevent_default()>
						<label class="graph-smalldiv">
							<input
								type="radio"
								name="graph-type"
								prop:checked=move || layout.get() == Layout::Aligned
								on:change=move |_| layout.set(Layout::Aligned)
							/>
							"Aligned graph layout"
						</label>
						<label class="graph-smalldiv">
							<input
								type="radio"
								name="graph-type"
								prop:checked=move || layout.get() == Layout::Scattered
								on:change=move |_| layout.set(Layout::Scattered)
							/>
							"Dense, almost aligned, random graph layout"
						</label>
						<label class="graph-smalldiv">
							<input
								type="checkbox"
								prop:checked=move || diagonals.get()
								on:change=move |ev| diagonals.set(event_target_checked(&ev))
							/>
							"Diagonal edges"
						</label>
						{number_field("Horizontal intervals ", spacing_x, "5")}
						{number_field("Vertical intervals ", spacing_y, "5")}
						{number_field("Horizontal count ", count_x, "1")}
						{number_field("Vertical count ", count_y, "1")}
						<button type="button" class="graph-button" on:click=create>
							"Create graph"
						</button>
					</form>

					<form class="graph-form" on:submit=|ev| ev.prevent_default()>
						{number_field("Starting index ", start_index, "0")}
						<button
							type="button"
							class="graph-button"
							disabled=move || !can_start()
							on:click=move |_| command.set(Some(Command::Start(start_index.get_untracked())))
						>
							"Start"
						</button>
						<button
							type="button"
							class="graph-button"
							disabled=move || !can_step()
							on:click=move |_| command.set(Some(Command::Step))
						>
							"Step"
						</button>
						<button
							type="button"
							class="graph-button"
							disabled=move || !can_step()
							on:click=move |_| command.set(Some(Command::Run))
						>
							"Run"
						</button>
						<button
							type="button"
							class="graph-button"
							disabled=move || !can_stop()
							on:click=move |_| command.set(Some(Command::Stop))
						>
							"Stop"
						</button>
						<label class="graph-smalldiv">
							<input
								type="checkbox"
								prop:checked=move || tree_only.get()
								on:change=move |ev| tree_only.set(event_target_checked(&ev))
							/>
							"Shortest-path tree only"
						</label>
						<label class="graph-smalldiv">
							<input
								type="checkbox"
								prop:checked=move || coarse.get()
								on:change=move |ev| coarse.set(event_target_checked(&ev))
							/>
							"Skip the checking frame"
						</label>
					</form>

					<p class="graph-status">
						{move || {
							let s = status.get();
							let phase = match s.run {
								RunStatus::Created => "ready",
								RunStatus::Stepping => "stepping",
								RunStatus::Running => "running",
								RunStatus::Finished => "finished",
							};
							format!("{} nodes, {}", s.node_count, phase)
						}}
					</p>
					{move || {
						status
							.get()
							.message
							.map(|m| view! { <p class="graph-error">{m}</p> })
					}}
				</div>
			</div>
		</ErrorBoundary>
	}
}
