//! Cancellable animation-frame scheduling.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Owns a `requestAnimationFrame` loop. The loop runs until the handle is
/// cancelled or dropped; the owner holds the handle and drops it on
/// teardown, so no tick can fire after the component is gone.
pub struct FrameLoop {
	alive: Rc<Cell<bool>>,
	pending: Rc<Cell<Option<i32>>>,
	_callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
	/// Start calling `tick` once per rendered frame.
	pub fn start(mut tick: impl FnMut() + 'static) -> Self {
		let alive = Rc::new(Cell::new(true));
		let pending = Rc::new(Cell::new(None));
		let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

		let (alive_cb, pending_cb, callback_inner) =
			(alive.clone(), pending.clone(), callback.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			if !alive_cb.get() {
				return;
			}
			tick();
			if let Some(ref cb) = *callback_inner.borrow() {
				pending_cb.set(schedule(cb));
			}
		}));

		if let Some(ref cb) = *callback.borrow() {
			pending.set(schedule(cb));
		}

		Self {
			alive,
			pending,
			_callback: callback,
		}
	}

	/// Halt further tick scheduling. Idempotent.
	pub fn cancel(&self) {
		self.alive.set(false);
		if let (Some(window), Some(handle)) = (web_sys::window(), self.pending.take()) {
			let _ = window.cancel_animation_frame(handle);
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.cancel();
	}
}

fn schedule(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}
