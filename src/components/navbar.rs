//! Top navigation shared by authenticated pages.

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::session::use_session;

#[component]
pub fn Navbar() -> impl IntoView {
	let session = use_session();
	let navigate = use_navigate();

	let on_logout = move |_| {
		session.logout();
		navigate("/login", Default::default());
	};

	view! {
		<nav class="navbar">
			<span class="navbar-brand">"FraudGuard Console"</span>
			<div class="navbar-links">
				<A href="/">"Dashboard"</A>
				<A href="/analyze">"Analyze"</A>
				<A href="/blacklist">"Blacklist"</A>
				{move || {
					// Reading the user signal keeps the link reactive to
					// login and logout.
					(session.user().get().is_some() && session.has_role("admin"))
						.then(|| view! { <A href="/admin">"Admin"</A> })
				}}
			</div>
			<div class="navbar-user">
				{move || {
					session
						.user()
						.get()
						.map(|user| format!("{} ({})", user.username, user.role))
				}}
				<button class="logout-button" on:click=on_logout>
					"Logout"
				</button>
			</div>
		</nav>
	}
}
