//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod components;
mod pages;
mod risk;
mod session;

use crate::api::{ApiClient, ApiContext};
use crate::components::protected::RequireAuth;
use crate::components::toast::{ToastContext, Toaster};
use crate::pages::admin::Admin;
use crate::pages::analyze::Analyze;
use crate::pages::blacklist::Blacklist;
use crate::pages::dashboard::Dashboard;
use crate::pages::login::Login;
use crate::pages::not_found::NotFound;
use crate::pages::register::Register;
use crate::session::SessionContext;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// App router. The API client and session manager are constructed here,
/// once, and injected as context — their lifecycle belongs to the entry
/// point, not to any page.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	ToastContext::provide();

	let api = ApiContext::provide(ApiClient::from_env());
	SessionContext::provide(api);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="FraudGuard Console" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Toaster />
		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/login") view=Login />
				<Route path=path!("/register") view=Register />
				<Route
					path=path!("/")
					view=|| view! { <RequireAuth><Dashboard /></RequireAuth> }
				/>
				<Route
					path=path!("/analyze")
					view=|| view! { <RequireAuth><Analyze /></RequireAuth> }
				/>
				<Route
					path=path!("/blacklist")
					view=|| view! { <RequireAuth><Blacklist /></RequireAuth> }
				/>
				<Route
					path=path!("/admin")
					view=|| view! { <RequireAuth admin=true><Admin /></RequireAuth> }
				/>
			</Routes>
		</Router>
	}
}
