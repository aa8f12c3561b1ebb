//! Session audit trail.
//!
//! A bounded, newest-first ring of session-relevant actions. The trail lives
//! for the browser tab only; it is evidence for the operator looking at the
//! admin panel, not a durable audit system.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum retained entries. Inserting past this evicts the oldest.
pub const AUDIT_CAP: usize = 50;

/// Closed set of auditable actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
	Login,
	Logout,
	Analyze,
	AnalyzeFailed,
	BlacklistAdd,
	BlacklistRemove,
	Export,
}

impl AuditAction {
	pub fn as_str(self) -> &'static str {
		match self {
			AuditAction::Login => "LOGIN",
			AuditAction::Logout => "LOGOUT",
			AuditAction::Analyze => "ANALYZE",
			AuditAction::AnalyzeFailed => "ANALYZE_FAILED",
			AuditAction::BlacklistAdd => "BLACKLIST_ADD",
			AuditAction::BlacklistRemove => "BLACKLIST_REMOVE",
			AuditAction::Export => "EXPORT",
		}
	}
}

/// One recorded action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
	/// Monotonic, time-derived id.
	pub id: i64,
	/// ISO-8601 timestamp.
	pub timestamp: String,
	pub action: AuditAction,
	pub username: Option<String>,
	pub role: Option<String>,
	#[serde(default)]
	pub details: String,
}

/// Bounded ring of entries, newest first.
#[derive(Clone, Debug, Default)]
pub struct AuditTrail {
	entries: VecDeque<AuditEntry>,
	last_id: i64,
}

impl AuditTrail {
	pub fn new() -> Self {
		Self::default()
	}

	/// Rebuild a trail from its persisted JSON form. Malformed data is
	/// treated as an empty trail, never an error.
	pub fn from_json(json: &str) -> Self {
		let entries: VecDeque<AuditEntry> =
			serde_json::from_str(json).unwrap_or_default();
		let last_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
		let mut trail = Self { entries, last_id };
		trail.entries.truncate(AUDIT_CAP);
		trail
	}

	pub fn to_json(&self) -> String {
		serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".into())
	}

	/// Append at the head, evicting the oldest entry past [`AUDIT_CAP`].
	/// The id is derived from the timestamp but forced monotonic so that
	/// rapid successive entries stay distinct and ordered.
	pub fn record(
		&mut self,
		now_millis: i64,
		timestamp: String,
		action: AuditAction,
		username: Option<String>,
		role: Option<String>,
		details: String,
	) -> &AuditEntry {
		self.last_id = now_millis.max(self.last_id + 1);
		self.entries.push_front(AuditEntry {
			id: self.last_id,
			timestamp,
			action,
			username,
			role,
			details,
		});
		self.entries.truncate(AUDIT_CAP);
		&self.entries[0]
	}

	/// Snapshot of the current entries, newest first.
	pub fn entries(&self) -> Vec<AuditEntry> {
		self.entries.iter().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record_n(trail: &mut AuditTrail, n: usize) {
		for i in 0..n {
			trail.record(
				1000 + i as i64,
				format!("2026-08-25T00:00:{i:02}Z"),
				AuditAction::Analyze,
				Some("alice".into()),
				Some("user".into()),
				format!("entry {i}"),
			);
		}
	}

	#[test]
	fn newest_first_ordering() {
		let mut trail = AuditTrail::new();
		record_n(&mut trail, 3);
		let entries = trail.entries();
		assert_eq!(entries[0].details, "entry 2");
		assert_eq!(entries[2].details, "entry 0");
	}

	#[test]
	fn capped_at_fifty_with_oldest_evicted() {
		let mut trail = AuditTrail::new();
		record_n(&mut trail, 51);
		assert_eq!(trail.len(), AUDIT_CAP);
		let entries = trail.entries();
		assert_eq!(entries[0].details, "entry 50");
		assert!(entries.iter().all(|e| e.details != "entry 0"));
	}

	#[test]
	fn ids_stay_monotonic_under_clock_collisions() {
		let mut trail = AuditTrail::new();
		for _ in 0..3 {
			trail.record(
				500,
				"2026-08-25T00:00:00Z".into(),
				AuditAction::Login,
				None,
				None,
				String::new(),
			);
		}
		let ids: Vec<i64> = trail.entries().iter().map(|e| e.id).collect();
		assert_eq!(ids, vec![502, 501, 500]);
	}

	#[test]
	fn action_names_serialize_screaming_snake() {
		let json = serde_json::to_string(&AuditAction::AnalyzeFailed).unwrap();
		assert_eq!(json, "\"ANALYZE_FAILED\"");
		let json = serde_json::to_string(&AuditAction::BlacklistAdd).unwrap();
		assert_eq!(json, "\"BLACKLIST_ADD\"");
		assert_eq!(AuditAction::AnalyzeFailed.as_str(), "ANALYZE_FAILED");
	}

	#[test]
	fn json_roundtrip_preserves_order() {
		let mut trail = AuditTrail::new();
		record_n(&mut trail, 5);
		let restored = AuditTrail::from_json(&trail.to_json());
		assert_eq!(restored.entries(), trail.entries());
	}

	#[test]
	fn malformed_json_degrades_to_empty() {
		assert!(AuditTrail::from_json("not json").is_empty());
		assert!(AuditTrail::from_json("{\"nope\":1}").is_empty());
	}
}
