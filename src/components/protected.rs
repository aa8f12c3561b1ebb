//! Route guards.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::session::use_session;

/// Gate a route on authentication, optionally on the admin role.
///
/// Unauthenticated visitors are redirected to the login page; an
/// authenticated non-admin hitting an admin route gets an access-denied
/// card rather than a redirect loop.
#[component]
pub fn RequireAuth(
	children: ChildrenFn,
	#[prop(default = false)] admin: bool,
) -> impl IntoView {
	let session = use_session();

	view! {
		{move || {
			if session.user().get().is_none() {
				return view! { <Redirect path="/login" /> }.into_any();
			}
			if admin && !session.has_role("admin") {
				return view! {
					<div class="access-denied">
						<h1>"Access Denied"</h1>
						<p>"You don't have permission to access this page."</p>
						<a href="/">"Go to Dashboard"</a>
					</div>
				}
				.into_any();
			}
			children().into_any()
		}}
	}
}
