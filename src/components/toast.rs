//! Transient notifications.
//!
//! One toast at a time; every recoverable failure surfaces exactly one.
//! A newer toast replaces the current one immediately.

use std::time::Duration;

use leptos::prelude::*;

const TOAST_MILLIS: u64 = 4000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
	Success,
	Error,
}

#[derive(Clone, Debug, PartialEq)]
struct Toast {
	seq: u64,
	message: String,
	kind: ToastKind,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
	current: RwSignal<Option<Toast>>,
	seq: StoredValue<u64>,
}

impl ToastContext {
	pub fn provide() -> Self {
		let ctx = Self {
			current: RwSignal::new(None),
			seq: StoredValue::new(0),
		};
		provide_context(ctx);
		ctx
	}

	pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
		let seq = self.seq.with_value(|s| s + 1);
		self.seq.set_value(seq);
		self.current.set(Some(Toast {
			seq,
			message: message.into(),
			kind,
		}));

		// Auto-dismiss, unless a newer toast has replaced this one.
		let current = self.current;
		set_timeout(
			move || {
				current.update(|t| {
					if t.as_ref().is_some_and(|t| t.seq == seq) {
						*t = None;
					}
				});
			},
			Duration::from_millis(TOAST_MILLIS),
		);
	}

	pub fn success(&self, message: impl Into<String>) {
		self.show(message, ToastKind::Success);
	}

	pub fn error(&self, message: impl Into<String>) {
		self.show(message, ToastKind::Error);
	}
}

pub fn use_toast() -> ToastContext {
	expect_context::<ToastContext>()
}

/// Renders the active toast, if any. Mounted once at the app root.
#[component]
pub fn Toaster() -> impl IntoView {
	let ctx = use_toast();
	view! {
		{move || {
			ctx.current
				.get()
				.map(|toast| {
					let class = match toast.kind {
						ToastKind::Success => "toast toast-success",
						ToastKind::Error => "toast toast-error",
					};
					view! { <div class=class>{toast.message}</div> }
				})
		}}
	}
}
