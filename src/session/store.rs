//! Persisted session slots.
//!
//! The session manager is the only writer; every write replaces a whole
//! value, so no coordination is needed. The token and user record go to
//! durable per-origin storage, the audit trail to tab-lifetime storage.

use web_sys::Storage;

/// The three persisted slots the session manager owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKey {
	Token,
	User,
	AuditLog,
}

impl StoreKey {
	fn name(self) -> &'static str {
		match self {
			StoreKey::Token => "token",
			StoreKey::User => "user",
			StoreKey::AuditLog => "auditLogs",
		}
	}
}

/// Whole-value key/value persistence for session state. Implementations
/// must degrade to "absent" on any underlying failure rather than erroring.
pub trait SessionStore {
	fn get(&self, key: StoreKey) -> Option<String>;
	fn set(&self, key: StoreKey, value: &str);
	fn remove(&self, key: StoreKey);
}

/// Browser-backed store: localStorage for durable slots, sessionStorage for
/// the tab-scoped audit trail. Storage being unavailable (private mode,
/// disabled) reads as empty and swallows writes.
#[derive(Default)]
pub struct BrowserStore;

impl BrowserStore {
	fn backing(key: StoreKey) -> Option<Storage> {
		let window = web_sys::window()?;
		match key {
			StoreKey::Token | StoreKey::User => window.local_storage().ok()?,
			StoreKey::AuditLog => window.session_storage().ok()?,
		}
	}
}

impl SessionStore for BrowserStore {
	fn get(&self, key: StoreKey) -> Option<String> {
		Self::backing(key)?.get_item(key.name()).ok()?
	}

	fn set(&self, key: StoreKey, value: &str) {
		if let Some(storage) = Self::backing(key) {
			let _ = storage.set_item(key.name(), value);
		}
	}

	fn remove(&self, key: StoreKey) {
		if let Some(storage) = Self::backing(key) {
			let _ = storage.remove_item(key.name());
		}
	}
}
