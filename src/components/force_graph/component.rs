use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::raf::FrameLoop;
use super::render;
use super::state::GraphViewState;
use super::types::GraphSnapshot;
use crate::risk::RiskTier;

/// Interactive relationship graph.
///
/// Three distinct surfaces: a loading placeholder while data is in flight,
/// an explicit empty state for a zero-node snapshot, and the live canvas.
/// A snapshot violating the graph contract (dangling edge, duplicate id)
/// renders an error card instead of a partial graph.
#[component]
pub fn GraphView(
	#[prop(into)] snapshot: Signal<Option<GraphSnapshot>>,
	#[prop(into, default = Signal::derive(|| false))] loading: Signal<bool>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let body = move || {
		if loading.get() {
			return view! {
				<div class="graph-placeholder">
					<div class="loading-spinner"></div>
				</div>
			}
			.into_any();
		}
		match snapshot.get() {
			None => view! {
				<div class="graph-placeholder">
					<p>"No graph data loaded yet."</p>
				</div>
			}
			.into_any(),
			Some(snap) if snap.nodes.is_empty() => view! {
				<div class="graph-empty">
					<p>
						"No graph data available yet. Analyze some messages to build the relationship graph."
					</p>
				</div>
			}
			.into_any(),
			Some(snap) => match snap.validate() {
				Ok(()) => {
					let count = (snap.nodes.len(), snap.edges.len());
					view! {
						<GraphCanvas snapshot=snap width=width height=height />
						<div class="graph-info">
							<p>
								{format!(
									"Drag nodes to explore • Scroll to zoom • {} entities • {} connections",
									count.0, count.1,
								)}
							</p>
						</div>
					}
					.into_any()
				}
				Err(err) => {
					warn!("rejected graph snapshot: {err}");
					view! {
						<div class="graph-error">
							<p>"Graph data is inconsistent and cannot be displayed."</p>
							<p class="graph-error-detail">{err.to_string()}</p>
						</div>
					}
					.into_any()
				}
			},
		}
	};

	view! {
		<div class="chart-card">
			<div class="graph-header">
				<h3 class="chart-title">"Relationship Graph"</h3>
				<Legend />
			</div>
			{body}
		</div>
	}
}

#[component]
fn Legend() -> impl IntoView {
	let tiers = [
		(RiskTier::Low, "Low Risk (0-30)"),
		(RiskTier::Medium, "Medium Risk (31-70)"),
		(RiskTier::High, "High Risk (71-100)"),
	];
	view! {
		<div class="graph-legend">
			{tiers
				.into_iter()
				.map(|(tier, text)| {
					view! {
						<div class="legend-item">
							<span
								class="legend-dot"
								style=format!("background: {}", tier.color())
							></span>
							<span>{text}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}

/// The live canvas for one validated snapshot. Remounted whenever the
/// snapshot changes, so the simulation is always rebuilt from scratch; the
/// frame loop is dropped on cleanup, which halts tick scheduling.
#[component]
fn GraphCanvas(
	snapshot: GraphSnapshot,
	width: Option<f64>,
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphViewState>>> = Rc::new(RefCell::new(None));
	let frame_loop: Rc<RefCell<Option<FrameLoop>>> = Rc::new(RefCell::new(None));

	let (state_init, loop_init) = (state.clone(), frame_loop.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let (w, h) = (
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or(400.0),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Ok(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.ok_or(())
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().map_err(|_| ()))
		else {
			warn!("canvas 2d context unavailable");
			return;
		};

		match GraphViewState::new(&snapshot, w, h) {
			Ok(new_state) => *state_init.borrow_mut() = Some(new_state),
			// Unreachable: the snapshot was validated before mounting.
			Err(err) => {
				warn!("graph state rejected: {err}");
				return;
			}
		}

		let state_tick = state_init.clone();
		*loop_init.borrow_mut() = Some(FrameLoop::start(move || {
			if let Some(ref mut s) = *state_tick.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
		}));
	});

	let loop_cleanup = send_wrapper::SendWrapper::new(frame_loop.clone());
	on_cleanup(move || {
		// Dropping the handle cancels any pending animation frame.
		loop_cleanup.borrow_mut().take();
	});

	let pointer = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else { return };
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.start_drag(idx, x, y);
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else { return };
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_drag();
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_drag();
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(&ev) else { return };
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
