use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::{RegisterRequest, use_api};
use crate::components::toast::use_toast;

#[component]
pub fn Register() -> impl IntoView {
	let api = use_api();
	let toast = use_toast();
	let navigate = use_navigate();

	let username = RwSignal::new(String::new());
	let email = RwSignal::new(String::new());
	let password = RwSignal::new(String::new());
	let confirm = RwSignal::new(String::new());
	let error = RwSignal::new(None::<String>);
	let loading = RwSignal::new(false);

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		error.set(None);

		let req = RegisterRequest {
			username: username.get(),
			email: email.get(),
			password: password.get(),
		};
		let fail = |msg: &str| {
			error.set(Some(msg.to_string()));
			toast.error(msg);
		};
		if req.username.is_empty() || req.email.is_empty() || req.password.is_empty() {
			fail("All fields are required");
			return;
		}
		if req.password.len() < 8 {
			fail("Password must be at least 8 characters");
			return;
		}
		if req.password != confirm.get() {
			fail("Passwords do not match");
			return;
		}

		loading.set(true);
		let navigate = navigate.clone();
		spawn_local(async move {
			match api.client().register(&req).await {
				Ok(resp) => {
					loading.set(false);
					let msg = if resp.message.is_empty() {
						"Account created, please sign in".to_string()
					} else {
						resp.message
					};
					toast.success(msg);
					navigate("/login", Default::default());
				}
				Err(err) => {
					loading.set(false);
					error.set(Some(err.to_string()));
					toast.error(err.to_string());
				}
			}
		});
	};

	let field = move |label: &'static str,
	                  kind: &'static str,
	                  value: RwSignal<String>,
	                  placeholder: &'static str| {
		view! {
			<label class="form-label">{label}</label>
			<input
				type=kind
				class="form-input"
				placeholder=placeholder
				prop:value=value
				prop:disabled=loading
				on:input=move |ev| value.set(event_target_value(&ev))
			/>
		}
	};

	view! {
		<div class="login-page">
			<div class="login-card">
				<h1 class="login-title">"Create Account"</h1>
				<form on:submit=on_submit class="login-form">
					{move || {
						error.get().map(|msg| view! { <div class="error-message">{msg}</div> })
					}}
					{field("Username", "text", username, "Choose a username")}
					{field("Email", "email", email, "you@example.com")}
					{field("Password", "password", password, "At least 8 characters")}
					{field("Confirm Password", "password", confirm, "Repeat your password")}
					<button type="submit" class="login-button" prop:disabled=loading>
						{move || if loading.get() { "Creating..." } else { "Register" }}
					</button>
				</form>
				<p class="login-footer">
					"Already registered? " <A href="/login">"Sign in"</A>
				</p>
			</div>
		</div>
	}
}
