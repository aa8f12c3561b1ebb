//! Session lifecycle state machine.
//!
//! Owns the token, the user record, and the audit trail. Constructed once at
//! the application entry point and injected into the UI tree — consumers get
//! a read capability, never direct mutation.
//!
//! States: Initializing → {Unauthenticated, Authenticated} → Unauthenticated.
//! [`SessionManager::restore`] performs the Initializing transition; login
//! and logout move between the other two.

use std::rc::Rc;

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::audit::{AuditAction, AuditEntry, AuditTrail};
use super::store::{SessionStore, StoreKey};
use super::token;
use crate::api::LoginResponse;

/// The authenticated principal, as persisted alongside the token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
	pub username: String,
	pub role: String,
	#[serde(rename = "loginTime")]
	pub login_time: String,
}

pub struct SessionManager {
	store: Rc<dyn SessionStore>,
	token: Option<String>,
	user: Option<User>,
	audit: AuditTrail,
}

impl SessionManager {
	pub fn new(store: Rc<dyn SessionStore>) -> Self {
		Self {
			store,
			token: None,
			user: None,
			audit: AuditTrail::new(),
		}
	}

	/// Initializing transition: restore a persisted session if one exists
	/// and its token is still live at `now_secs`.
	///
	/// An expired token discards the stored token, user and audit trail. A
	/// malformed token or user record reads as absent — the session degrades
	/// to Unauthenticated rather than surfacing a parse error.
	pub fn restore(&mut self, now_secs: f64) {
		let stored_token = self.store.get(StoreKey::Token);
		let stored_user = self
			.store
			.get(StoreKey::User)
			.and_then(|json| serde_json::from_str::<User>(&json).ok());

		match (stored_token, stored_user) {
			(Some(tok), Some(user)) if !token::is_expired(&tok, now_secs) => {
				info!("session restored for {}", user.username);
				self.audit = self
					.store
					.get(StoreKey::AuditLog)
					.map(|json| AuditTrail::from_json(&json))
					.unwrap_or_default();
				self.token = Some(tok);
				self.user = Some(user);
			}
			(Some(_), _) => {
				warn!("stored session expired or unreadable, discarding");
				self.clear_persisted();
				self.token = None;
				self.user = None;
			}
			(None, _) => {
				self.token = None;
				self.user = None;
			}
		}
	}

	/// Unauthenticated → Authenticated, applied after the backend confirmed
	/// the credentials. Persists first, then mutates in-memory state, so a
	/// failed login (which never reaches here) cannot leave partial writes.
	pub fn apply_login(&mut self, resp: &LoginResponse) -> User {
		let user = User {
			username: resp.username.clone(),
			role: resp.role.clone(),
			login_time: Utc::now().to_rfc3339(),
		};

		self.store.set(StoreKey::Token, &resp.access_token);
		if let Ok(json) = serde_json::to_string(&user) {
			self.store.set(StoreKey::User, &json);
		}
		self.token = Some(resp.access_token.clone());
		self.user = Some(user.clone());
		self.record(
			AuditAction::Login,
			Some(user.username.clone()),
			Some(user.role.clone()),
			String::new(),
		);
		info!("login: {} ({})", user.username, user.role);
		user
	}

	/// Authenticated → Unauthenticated. Idempotent; calling while already
	/// unauthenticated is a no-op. The logout record is written before the
	/// trail is dropped with the rest of the session.
	pub fn logout(&mut self) {
		if let Some(user) = self.user.take() {
			self.record(
				AuditAction::Logout,
				Some(user.username.clone()),
				Some(user.role),
				String::new(),
			);
			info!("logout: {}", user.username);
		}
		self.token = None;
		self.audit.clear();
		self.clear_persisted();
	}

	pub fn is_authenticated(&self) -> bool {
		self.token.is_some()
	}

	pub fn user(&self) -> Option<&User> {
		self.user.as_ref()
	}

	pub fn token(&self) -> Option<&str> {
		self.token.as_deref()
	}

	/// Role check for route guards. Only "admin" is a distinct gate.
	// TODO: any non-admin role name currently passes for every authenticated
	// user; if a third role ever ships this needs a real comparison. Kept
	// as-is pending a product decision.
	pub fn has_role(&self, required: &str) -> bool {
		match &self.user {
			None => false,
			Some(user) if required == "admin" => user.role == "admin",
			Some(_) => true,
		}
	}

	/// Snapshot of the audit trail, newest first. Not live-bound.
	pub fn audit_logs(&self) -> Vec<AuditEntry> {
		self.audit.entries()
	}

	/// Record an action attributed to the current user. No-op when
	/// unauthenticated — there is no actor to attribute it to.
	pub fn add_audit_log(&mut self, action: AuditAction, details: &str) {
		let Some(user) = self.user.clone() else {
			return;
		};
		self.record(
			action,
			Some(user.username),
			Some(user.role),
			details.to_string(),
		);
	}

	fn record(
		&mut self,
		action: AuditAction,
		username: Option<String>,
		role: Option<String>,
		details: String,
	) {
		let now = Utc::now();
		self.audit.record(
			now.timestamp_millis(),
			now.to_rfc3339(),
			action,
			username,
			role,
			details,
		);
		self.store.set(StoreKey::AuditLog, &self.audit.to_json());
	}

	fn clear_persisted(&self) {
		self.store.remove(StoreKey::Token);
		self.store.remove(StoreKey::User);
		self.store.remove(StoreKey::AuditLog);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::collections::HashMap;

	use base64::Engine as _;
	use base64::engine::general_purpose::URL_SAFE_NO_PAD;

	use super::*;

	#[derive(Default)]
	struct MemoryStore {
		slots: RefCell<HashMap<&'static str, String>>,
	}

	fn slot_name(key: StoreKey) -> &'static str {
		match key {
			StoreKey::Token => "token",
			StoreKey::User => "user",
			StoreKey::AuditLog => "auditLogs",
		}
	}

	impl SessionStore for MemoryStore {
		fn get(&self, key: StoreKey) -> Option<String> {
			self.slots.borrow().get(slot_name(key)).cloned()
		}
		fn set(&self, key: StoreKey, value: &str) {
			self.slots.borrow_mut().insert(slot_name(key), value.into());
		}
		fn remove(&self, key: StoreKey) {
			self.slots.borrow_mut().remove(slot_name(key));
		}
	}

	fn token_with_exp(exp: i64) -> String {
		let payload =
			URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"role":"user"}}"#));
		format!("h.{payload}.s")
	}

	fn seeded(exp: i64) -> (Rc<MemoryStore>, SessionManager) {
		let store = Rc::new(MemoryStore::default());
		store.set(StoreKey::Token, &token_with_exp(exp));
		store.set(
			StoreKey::User,
			r#"{"username":"alice","role":"user","loginTime":"2026-01-01T00:00:00Z"}"#,
		);
		store.set(StoreKey::AuditLog, "[]");
		let manager = SessionManager::new(store.clone());
		(store, manager)
	}

	#[test]
	fn restore_with_live_token_reproduces_user() {
		let (_, mut manager) = seeded(2000);
		manager.restore(1000.0);
		assert!(manager.is_authenticated());
		let user = manager.user().unwrap();
		assert_eq!(user.username, "alice");
		assert_eq!(user.role, "user");
		assert_eq!(user.login_time, "2026-01-01T00:00:00Z");
	}

	#[test]
	fn restore_with_expired_token_clears_everything() {
		let (store, mut manager) = seeded(1000);
		manager.restore(2000.0);
		assert!(!manager.is_authenticated());
		assert!(manager.user().is_none());
		assert!(store.get(StoreKey::Token).is_none());
		assert!(store.get(StoreKey::User).is_none());
		assert!(store.get(StoreKey::AuditLog).is_none());
	}

	#[test]
	fn restore_with_no_stored_token_is_unauthenticated() {
		let store = Rc::new(MemoryStore::default());
		let mut manager = SessionManager::new(store);
		manager.restore(1000.0);
		assert!(!manager.is_authenticated());
	}

	#[test]
	fn restore_with_corrupt_user_degrades_to_unauthenticated() {
		let (store, mut manager) = seeded(2000);
		store.set(StoreKey::User, "{not json");
		manager.restore(1000.0);
		assert!(!manager.is_authenticated());
	}

	#[test]
	fn apply_login_persists_and_records_audit() {
		let store = Rc::new(MemoryStore::default());
		let mut manager = SessionManager::new(store.clone());
		let user = manager.apply_login(&LoginResponse {
			access_token: token_with_exp(99_999_999_999),
			role: "admin".into(),
			username: "bob".into(),
		});
		assert_eq!(user.username, "bob");
		assert!(manager.is_authenticated());
		assert!(store.get(StoreKey::Token).is_some());
		assert!(store.get(StoreKey::User).is_some());

		let logs = manager.audit_logs();
		assert_eq!(logs.len(), 1);
		assert_eq!(logs[0].action, AuditAction::Login);
		assert_eq!(logs[0].username.as_deref(), Some("bob"));
	}

	#[test]
	fn logout_is_idempotent_and_clears_state() {
		let store = Rc::new(MemoryStore::default());
		let mut manager = SessionManager::new(store.clone());
		manager.apply_login(&LoginResponse {
			access_token: token_with_exp(99_999_999_999),
			role: "user".into(),
			username: "alice".into(),
		});

		manager.logout();
		assert!(!manager.is_authenticated());
		assert!(manager.audit_logs().is_empty());
		assert!(store.get(StoreKey::Token).is_none());
		assert!(store.get(StoreKey::User).is_none());

		// Second call must not error or change the outcome.
		manager.logout();
		assert!(!manager.is_authenticated());
	}

	#[test]
	fn has_role_admin_gate_and_documented_quirk() {
		let store = Rc::new(MemoryStore::default());
		let mut manager = SessionManager::new(store);
		assert!(!manager.has_role("admin"));
		assert!(!manager.has_role("user"));

		manager.apply_login(&LoginResponse {
			access_token: token_with_exp(99_999_999_999),
			role: "user".into(),
			username: "alice".into(),
		});
		assert!(!manager.has_role("admin"));
		assert!(manager.has_role("user"));
		// Quirk: any role name other than "admin" passes for any
		// authenticated user.
		assert!(manager.has_role("moderator"));
	}

	#[test]
	fn add_audit_log_is_noop_when_unauthenticated() {
		let store = Rc::new(MemoryStore::default());
		let mut manager = SessionManager::new(store);
		manager.add_audit_log(AuditAction::Analyze, "should not record");
		assert!(manager.audit_logs().is_empty());
	}

	#[test]
	fn audit_trail_evicts_past_cap() {
		let store = Rc::new(MemoryStore::default());
		let mut manager = SessionManager::new(store);
		manager.apply_login(&LoginResponse {
			access_token: token_with_exp(99_999_999_999),
			role: "user".into(),
			username: "alice".into(),
		});
		for i in 0..51 {
			manager.add_audit_log(AuditAction::Analyze, &format!("run {i}"));
		}
		let logs = manager.audit_logs();
		assert_eq!(logs.len(), 50);
		assert_eq!(logs[0].details, "run 50");
		assert!(logs.iter().all(|e| e.details != "run 0"));
	}
}
