//! Risk tiers and their display colors.

use std::fmt;

use thiserror::Error;

/// Closed set of risk tiers used for display. Backend labels outside this
/// set are an error, never silently mapped to a default color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskTier {
	Low,
	Medium,
	High,
	Critical,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown risk level `{0}`")]
pub struct UnknownRiskLevel(pub String);

impl RiskTier {
	/// Visual tiering of a 0–100 score: ≤30 low, ≤70 medium, above high.
	/// Critical is only ever assigned by the backend's own label, not by
	/// score tiering.
	pub fn from_score(score: f64) -> Self {
		if score <= 30.0 {
			RiskTier::Low
		} else if score <= 70.0 {
			RiskTier::Medium
		} else {
			RiskTier::High
		}
	}

	/// Parse a backend risk-level label, case-insensitively.
	pub fn from_label(label: &str) -> Result<Self, UnknownRiskLevel> {
		match label.to_ascii_lowercase().as_str() {
			"low" => Ok(RiskTier::Low),
			"medium" => Ok(RiskTier::Medium),
			"high" => Ok(RiskTier::High),
			"critical" => Ok(RiskTier::Critical),
			_ => Err(UnknownRiskLevel(label.to_string())),
		}
	}

	/// Exhaustive tier → display color mapping.
	pub fn color(self) -> &'static str {
		match self {
			RiskTier::Low => "#10b981",
			RiskTier::Medium => "#f59e0b",
			RiskTier::High => "#ef4444",
			RiskTier::Critical => "#dc2626",
		}
	}
}

impl fmt::Display for RiskTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			RiskTier::Low => "Low",
			RiskTier::Medium => "Medium",
			RiskTier::High => "High",
			RiskTier::Critical => "Critical",
		};
		f.write_str(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn score_tiering_boundaries() {
		assert_eq!(RiskTier::from_score(0.0), RiskTier::Low);
		assert_eq!(RiskTier::from_score(30.0), RiskTier::Low);
		assert_eq!(RiskTier::from_score(30.1), RiskTier::Medium);
		assert_eq!(RiskTier::from_score(70.0), RiskTier::Medium);
		assert_eq!(RiskTier::from_score(70.1), RiskTier::High);
		assert_eq!(RiskTier::from_score(100.0), RiskTier::High);
	}

	#[test]
	fn labels_parse_case_insensitively() {
		assert_eq!(RiskTier::from_label("Low").unwrap(), RiskTier::Low);
		assert_eq!(RiskTier::from_label("CRITICAL").unwrap(), RiskTier::Critical);
		assert_eq!(RiskTier::from_label("medium").unwrap(), RiskTier::Medium);
	}

	#[test]
	fn unknown_labels_are_rejected() {
		let err = RiskTier::from_label("severe").unwrap_err();
		assert_eq!(err, UnknownRiskLevel("severe".into()));
	}

	#[test]
	fn every_tier_has_a_distinct_color() {
		let tiers = [
			RiskTier::Low,
			RiskTier::Medium,
			RiskTier::High,
			RiskTier::Critical,
		];
		for (i, a) in tiers.iter().enumerate() {
			for b in &tiers[i + 1..] {
				assert_ne!(a.color(), b.color());
			}
		}
	}
}
