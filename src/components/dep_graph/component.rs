use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::config::GraphViewConfig;
use super::filter::Filter;
use super::layout::{LayoutEpoch, LayoutMode};
use super::render;
use super::state::{DepGraphState, TickOutcome};
use super::store::Point;
use super::surface::Viewport;
use super::types::GraphDocument;

type SharedState = Rc<RefCell<Option<DepGraphState>>>;

/// Canvas plus the state it draws.
#[derive(Clone)]
struct Surface {
	state: SharedState,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl Surface {
	fn draw(&self) {
		let state = self.state.borrow();
		let Some(s) = state.as_ref() else {
			return;
		};
		let frame = s.frame();
		let (w, h) = (
			frame.surface.width.ceil() as u32,
			frame.surface.height.ceil() as u32,
		);
		if self.canvas.width() != w {
			self.canvas.set_width(w);
		}
		if self.canvas.height() != h {
			self.canvas.set_height(h);
		}
		render::render(&frame, s.config().node_radius, &self.ctx);
	}

	/// Draws, then keeps stepping the layout of `epoch` on animation frames
	/// unless a loop for it is already running.
	fn run(&self, epoch: LayoutEpoch) {
		let claimed = self
			.state
			.borrow_mut()
			.as_mut()
			.is_some_and(|s| s.claim_frame_loop(epoch));
		self.draw();
		if claimed {
			self.schedule(epoch);
		}
	}

	fn schedule(&self, epoch: LayoutEpoch) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let surface = self.clone();
		let frame = Closure::once_into_js(move || {
			let outcome = surface.state.borrow_mut().as_mut().map(|s| s.tick(epoch));
			match outcome {
				Some(TickOutcome::Advanced) => {
					surface.draw();
					surface.schedule(epoch);
				}
				Some(TickOutcome::Settled) => surface.draw(),
				Some(TickOutcome::Stale) | None => {}
			}
		});
		let _ = window.request_animation_frame(frame.unchecked_ref());
	}
}

fn pointer(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn window_viewport(window: &Window) -> Viewport {
	let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
	Viewport::new(
		size(window.inner_width()).unwrap_or(800.0),
		size(window.inner_height()).unwrap_or(600.0),
	)
}

/// Interactive dependency graph. Re-runs filter, layout and highlighting
/// whenever the document, layout mode, filter or query changes.
#[component]
pub fn DepGraphCanvas(
	/// The graph to draw.
	#[prop(into)]
	data: Signal<GraphDocument>,
	/// Layered layout instead of force-directed.
	#[prop(into)]
	hierarchical: Signal<bool>,
	/// Category filter.
	#[prop(into)]
	filter: Signal<Filter>,
	/// Search text; empty shows every node at full opacity.
	#[prop(into)]
	query: Signal<String>,
	/// Tunables; defaults when omitted.
	#[prop(optional)]
	config: Option<GraphViewConfig>,
	/// Size to the window instead of the container.
	#[prop(default = false)]
	fullscreen: bool,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let slot: Rc<RefCell<Option<Surface>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (error, set_error) = signal(None::<String>);

	let measure = move || -> Viewport {
		let Some(window) = web_sys::window() else {
			return Viewport::new(800.0, 600.0);
		};
		if fullscreen {
			return window_viewport(&window);
		}
		match container_ref.get_untracked() {
			Some(div) if div.client_width() > 0 && div.client_height() > 0 => {
				Viewport::new(div.client_width() as f64, div.client_height() as f64)
			}
			_ => Viewport::new(800.0, 600.0),
		}
	};

	let (state_init, slot_init, resize_init) = (state.clone(), slot.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let doc = data.get();
		let mode = LayoutMode::from_hierarchical(hierarchical.get());
		let selected = filter.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if slot_init.borrow().is_none() {
			let ctx = canvas
				.get_context("2d")
				.ok()
				.flatten()
				.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
			let Some(ctx) = ctx else {
				log::error!("canvas 2d context unavailable");
				set_error.set(Some("Canvas rendering is not supported".into()));
				return;
			};
			*slot_init.borrow_mut() = Some(Surface {
				state: state_init.clone(),
				canvas: canvas.clone(),
				ctx,
			});
		}
		let Some(surface) = slot_init.borrow().clone() else {
			return;
		};

		let viewport = measure();
		let result = {
			let mut guard = state_init.borrow_mut();
			let s = guard
				.get_or_insert_with(|| DepGraphState::new(&doc, config.clone(), viewport));
			s.select(mode, selected);
			s.set_viewport(viewport);
			s.render_graph(&doc, mode == LayoutMode::Hierarchical)
		};
		match result {
			Ok(epoch) => {
				set_error.set(None);
				surface.run(epoch);
			}
			Err(err) => set_error.set(Some(err.to_string())),
		}

		if resize_init.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		let delay = config.resize_debounce_ms as i32;
		let surface_resize = surface.clone();
		*resize_init.borrow_mut() = Some(Closure::new(move || {
			let Some(ticket) = surface_resize
				.state
				.borrow_mut()
				.as_mut()
				.map(|s| s.schedule_resize())
			else {
				return;
			};
			let surface = surface_resize.clone();
			let expire = Closure::once_into_js(move || {
				let viewport = measure();
				let result = surface
					.state
					.borrow_mut()
					.as_mut()
					.map(|s| s.resize(ticket, viewport));
				match result {
					Some(Ok(Some(epoch))) => {
						set_error.set(None);
						surface.run(epoch);
					}
					Some(Err(err)) => set_error.set(Some(err.to_string())),
					Some(Ok(None)) | None => {}
				}
			});
			if let Some(window) = web_sys::window() {
				let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
					expire.unchecked_ref(),
					delay,
				);
			}
		}));
		if let Some(ref cb) = *resize_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	let slot_query = slot.clone();
	Effect::new(move |_| {
		let query = query.get();
		let Some(surface) = slot_query.borrow().clone() else {
			return;
		};
		if let Some(s) = surface.state.borrow_mut().as_mut() {
			s.set_query(&query);
		}
		surface.draw();
	});

	let slot_md = slot.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(surface) = slot_md.borrow().clone() else {
			return;
		};
		let at = pointer(&surface.canvas, &ev);
		let epoch = {
			let mut guard = surface.state.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let Some(key) = s.node_at(at) else {
				return;
			};
			s.begin_drag(key, at);
			s.epoch()
		};
		surface.run(epoch);
	};

	let slot_mm = slot.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(surface) = slot_mm.borrow().clone() else {
			return;
		};
		let at = pointer(&surface.canvas, &ev);
		let changed = {
			let mut guard = surface.state.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if s.dragging().is_some() {
				s.drag_to(at);
				true
			} else {
				let hovered = s.node_at(at);
				s.set_hover(hovered)
			}
		};
		if changed {
			surface.draw();
		}
	};

	let slot_mu = slot.clone();
	let on_mouseup = move |_: MouseEvent| {
		let Some(surface) = slot_mu.borrow().clone() else {
			return;
		};
		if let Some(s) = surface.state.borrow_mut().as_mut() {
			s.end_drag();
		}
		surface.draw();
	};

	let slot_ml = slot.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let Some(surface) = slot_ml.borrow().clone() else {
			return;
		};
		if let Some(s) = surface.state.borrow_mut().as_mut() {
			s.end_drag();
			s.set_hover(None);
		}
		surface.draw();
	};

	view! {
		<div
			node_ref=container_ref
			class="dep-graph-container"
			style="width: 100%; height: 100%; overflow: auto;"
		>
			{move || {
				error.get().map(|message| view! { <p class="graph-error">"Error: " {message}</p> })
			}}
			<canvas
				node_ref=canvas_ref
				class="dep-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style="display: block; cursor: grab;"
			/>
		</div>
	}
}
