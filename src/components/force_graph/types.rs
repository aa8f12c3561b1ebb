use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

/// One entity in the relationship graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub label: String,
	/// 0–100, as scored by the backend.
	pub risk_score: f64,
	#[serde(default)]
	pub incident_count: u32,
}

/// Weighted relationship between two entities.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	pub weight: f64,
}

/// Immutable input to the renderer for one layout pass. Simulation state
/// (positions, velocities, drag pins) is derived per pass and never part of
/// this contract.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphSnapshot {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SnapshotError {
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
	#[error("edge references unknown node `{0}`")]
	DanglingEdge(String),
	#[error("edge {src} -> {target} has non-positive weight {weight}")]
	NonPositiveWeight {
		// Not named `source`: thiserror reserves that name for the error's
		// cause, and this is the edge's source node id.
		src: String,
		target: String,
		weight: f64,
	},
}

impl GraphSnapshot {
	/// Contract check, run before any layout work. A snapshot with a
	/// dangling edge or duplicate id is rejected whole rather than rendered
	/// partially.
	pub fn validate(&self) -> Result<(), SnapshotError> {
		let mut ids = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !ids.insert(node.id.as_str()) {
				return Err(SnapshotError::DuplicateNode(node.id.clone()));
			}
		}
		for edge in &self.edges {
			for endpoint in [&edge.source, &edge.target] {
				if !ids.contains(endpoint.as_str()) {
					return Err(SnapshotError::DanglingEdge(endpoint.clone()));
				}
			}
			if edge.weight <= 0.0 {
				return Err(SnapshotError::NonPositiveWeight {
					src: edge.source.clone(),
					target: edge.target.clone(),
					weight: edge.weight,
				});
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			risk_score: 10.0,
			incident_count: 1,
		}
	}

	fn edge(source: &str, target: &str, weight: f64) -> GraphEdge {
		GraphEdge {
			source: source.into(),
			target: target.into(),
			weight,
		}
	}

	#[test]
	fn valid_snapshot_passes() {
		let snapshot = GraphSnapshot {
			nodes: vec![node("a"), node("b")],
			edges: vec![edge("a", "b", 0.5)],
		};
		assert_eq!(snapshot.validate(), Ok(()));
	}

	#[test]
	fn empty_snapshot_is_valid() {
		assert_eq!(GraphSnapshot::default().validate(), Ok(()));
	}

	#[test]
	fn dangling_edge_is_rejected() {
		let snapshot = GraphSnapshot {
			nodes: vec![node("a")],
			edges: vec![edge("a", "ghost", 1.0)],
		};
		assert_eq!(
			snapshot.validate(),
			Err(SnapshotError::DanglingEdge("ghost".into()))
		);
	}

	#[test]
	fn duplicate_node_id_is_rejected() {
		let snapshot = GraphSnapshot {
			nodes: vec![node("a"), node("a")],
			edges: vec![],
		};
		assert_eq!(
			snapshot.validate(),
			Err(SnapshotError::DuplicateNode("a".into()))
		);
	}

	#[test]
	fn non_positive_weight_is_rejected() {
		let snapshot = GraphSnapshot {
			nodes: vec![node("a"), node("b")],
			edges: vec![edge("a", "b", 0.0)],
		};
		assert!(matches!(
			snapshot.validate(),
			Err(SnapshotError::NonPositiveWeight { .. })
		));
	}

	#[test]
	fn deserializes_backend_shape() {
		let json = r#"{
			"nodes": [{"id": "+15551234", "label": "+15551234", "risk_score": 85, "incident_count": 5}],
			"edges": []
		}"#;
		let snapshot: GraphSnapshot = serde_json::from_str(json).unwrap();
		assert_eq!(snapshot.nodes.len(), 1);
		assert_eq!(snapshot.nodes[0].risk_score, 85.0);
		assert_eq!(snapshot.validate(), Ok(()));
	}
}
