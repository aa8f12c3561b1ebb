use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::components::toast::use_toast;
use crate::session::use_session;

/// Credential form. A single login may be in flight at a time; the submit
/// control is disabled while one is, which is what enforces that contract.
#[component]
pub fn Login() -> impl IntoView {
	let session = use_session();
	let toast = use_toast();
	let navigate = use_navigate();

	let username = RwSignal::new(String::new());
	let password = RwSignal::new(String::new());
	let error = RwSignal::new(None::<String>);
	let loading = RwSignal::new(false);

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		error.set(None);

		let (user, pass) = (username.get(), password.get());
		if user.is_empty() || pass.is_empty() {
			let msg = "Please enter username and password";
			error.set(Some(msg.to_string()));
			toast.error(msg);
			return;
		}

		loading.set(true);
		let navigate = navigate.clone();
		spawn_local(async move {
			match session.login(&user, &pass).await {
				Ok(user) => {
					loading.set(false);
					toast.success(format!("Welcome back, {}!", user.username));
					navigate("/", Default::default());
				}
				Err(err) => {
					loading.set(false);
					error.set(Some(err.0.clone()));
					toast.error(err.0);
				}
			}
		});
	};

	view! {
		<div class="login-page">
			<div class="login-card">
				<h1 class="login-title">"FraudGuard Console"</h1>
				<p class="login-subtitle">"Sign in to your account"</p>

				<form on:submit=on_submit class="login-form">
					{move || {
						error.get().map(|msg| view! { <div class="error-message">{msg}</div> })
					}}
					<label class="form-label">"Username"</label>
					<input
						type="text"
						class="form-input"
						placeholder="Enter your username"
						autocomplete="username"
						prop:value=username
						prop:disabled=loading
						on:input=move |ev| username.set(event_target_value(&ev))
					/>
					<label class="form-label">"Password"</label>
					<input
						type="password"
						class="form-input"
						placeholder="Enter your password"
						autocomplete="current-password"
						prop:value=password
						prop:disabled=loading
						on:input=move |ev| password.set(event_target_value(&ev))
					/>
					<button type="submit" class="login-button" prop:disabled=loading>
						{move || if loading.get() { "Signing In..." } else { "Sign In" }}
					</button>
				</form>

				<p class="login-footer">
					"Don't have an account? " <A href="/register">"Register here"</A>
				</p>
			</div>
		</div>
	}
}
