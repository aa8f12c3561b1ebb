//! Session manager: token lifecycle, restoration, audit trail, and the
//! reactive handle the UI tree consumes.

mod audit;
mod manager;
mod store;
pub mod token;

use std::rc::Rc;

use chrono::Utc;
use leptos::prelude::*;
use thiserror::Error;

pub use audit::{AUDIT_CAP, AuditAction, AuditEntry, AuditTrail};
pub use manager::{SessionManager, User};
pub use store::{BrowserStore, SessionStore, StoreKey};

use crate::api::ApiContext;

/// User-facing login failure.
#[derive(Clone, Debug, Error)]
#[error("{0}")]
pub struct LoginError(pub String);

/// Reactive capability handle over the [`SessionManager`].
///
/// Constructed once by the application entry point and provided as context;
/// pages read session state through it and never touch the manager
/// directly. The `user` signal mirrors the manager so the tree re-renders
/// on login and logout.
#[derive(Clone, Copy)]
pub struct SessionContext {
	manager: StoredValue<SessionManager, LocalStorage>,
	api: ApiContext,
	user: RwSignal<Option<User>>,
}

impl SessionContext {
	/// Build the session subsystem, restore any persisted session, and
	/// install the handle as Leptos context.
	pub fn provide(api: ApiContext) -> Self {
		let mut manager = SessionManager::new(Rc::new(BrowserStore));
		manager.restore(Utc::now().timestamp() as f64);
		if let Some(token) = manager.token() {
			api.client().set_token(Some(token));
		}
		let user = RwSignal::new(manager.user().cloned());

		let ctx = Self {
			manager: StoredValue::new_local(manager),
			api,
			user,
		};
		provide_context(ctx);
		ctx
	}

	/// Attempt a login against the backend. Never panics outward; any
	/// backend or transport failure maps to a [`LoginError`] message and
	/// leaves session state untouched. Callers are responsible for not
	/// issuing a second login while one is in flight.
	pub async fn login(&self, username: &str, password: &str) -> Result<User, LoginError> {
		let client = self.api.client();
		match client.login(username, password).await {
			Ok(resp) => {
				let user = self
					.manager
					.try_update_value(|m| m.apply_login(&resp))
					.ok_or_else(|| LoginError("Session unavailable".into()))?;
				client.set_token(Some(&resp.access_token));
				self.user.set(Some(user.clone()));
				Ok(user)
			}
			Err(err) => Err(LoginError(err.login_message())),
		}
	}

	/// Idempotent logout.
	pub fn logout(&self) {
		self.manager.update_value(|m| m.logout());
		self.api.client().set_token(None);
		self.user.set(None);
	}

	/// Reactive view of the authenticated user.
	pub fn user(&self) -> ReadSignal<Option<User>> {
		self.user.read_only()
	}

	pub fn has_role(&self, required: &str) -> bool {
		self.manager.with_value(|m| m.has_role(required))
	}

	pub fn audit_logs(&self) -> Vec<AuditEntry> {
		self.manager.with_value(|m| m.audit_logs())
	}

	pub fn add_audit_log(&self, action: AuditAction, details: &str) {
		self.manager.update_value(|m| m.add_audit_log(action, details));
	}
}

/// Fetch the session handle from context. Panics if called outside the app
/// tree, which is a programming error.
pub fn use_session() -> SessionContext {
	expect_context::<SessionContext>()
}
