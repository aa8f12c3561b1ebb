use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::scale;
use super::types::{GraphSnapshot, SnapshotError};
use crate::risk::RiskTier;

/// Per-node display attributes, fixed at snapshot load.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub label: String,
	pub risk_score: f64,
	pub incident_count: u32,
	pub radius: f64,
	pub color: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Tooltip payload for the hovered node, world coordinates.
#[derive(Clone, Debug)]
pub struct HoverInfo {
	pub label: String,
	pub risk_score: f64,
	pub incident_count: u32,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
}

/// Working state for one snapshot: the physics graph plus interaction
/// bookkeeping. Fully rebuilt whenever a new snapshot arrives; stable
/// layouts across refreshes are deliberately not preserved.
pub struct GraphViewState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	node_indices: Vec<DefaultNodeIdx>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx, f64)>,
}

impl GraphViewState {
	/// Build the simulation from a snapshot. The snapshot contract is
	/// enforced up front: a dangling edge or duplicate id rejects the whole
	/// snapshot instead of laying out a partial graph.
	pub fn new(snapshot: &GraphSnapshot, width: f64, height: f64) -> Result<Self, SnapshotError> {
		snapshot.validate()?;

		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut node_indices = Vec::with_capacity(snapshot.nodes.len());
		let mut edges = Vec::with_capacity(snapshot.edges.len());

		// Seed on a circle around the viewport center so the first ticks
		// pull the layout apart instead of exploding from one point.
		for (i, node) in snapshot.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / snapshot.nodes.len().max(1) as f64;
			let (x, y) = (
				(width / 2.0 + scale::LINK_DISTANCE * angle.cos()) as f32,
				(height / 2.0 + scale::LINK_DISTANCE * angle.sin()) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					label: node.label.clone(),
					risk_score: node.risk_score,
					incident_count: node.incident_count,
					radius: scale::node_radius(node.incident_count),
					color: RiskTier::from_score(node.risk_score).color(),
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
			node_indices.push(idx);
		}

		for edge in &snapshot.edges {
			// Endpoints are guaranteed present by validate() above.
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt, scale::edge_width(edge.weight)));
			}
		}

		Ok(Self {
			graph,
			node_indices,
			edges,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			width,
			height,
		})
	}

	/// Rendered edges with their stroke widths.
	pub fn edges(&self) -> &[(DefaultNodeIdx, DefaultNodeIdx, f64)] {
		&self.edges
	}

	/// One simulation step: spring/charge integration from the physics
	/// engine, then explicit centering and minimum-separation passes.
	pub fn tick(&mut self, dt: f32) {
		// Extra heat while a node is pinned to the pointer, so its
		// neighbourhood follows fluidly rather than lagging.
		let dt = if self.drag.active { dt * 2.0 } else { dt };
		self.graph.update(dt);
		self.apply_centering();
		self.apply_collision();
	}

	/// Translate the whole layout so its centroid sits on the viewport
	/// center. A dragged node is pinned and exempt.
	fn apply_centering(&mut self) {
		if self.node_indices.is_empty() {
			return;
		}
		let positions = self.positions();
		let n = positions.len() as f64;
		let (cx, cy) = positions
			.values()
			.fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x, ay + y));
		let (dx, dy) = (
			(self.width / 2.0 - cx / n) as f32,
			(self.height / 2.0 - cy / n) as f32,
		);

		let pinned = self.pinned_node();
		self.graph.visit_nodes_mut(|node| {
			if Some(node.index()) == pinned {
				return;
			}
			node.data.x += dx;
			node.data.y += dy;
		});
	}

	/// Push apart any pair closer than [`scale::COLLISION_RADIUS`],
	/// independent of visual radius. One relaxation pass per tick.
	fn apply_collision(&mut self) {
		let positions = self.positions();
		let mut shift: HashMap<DefaultNodeIdx, (f32, f32)> = HashMap::new();

		for (i, &a) in self.node_indices.iter().enumerate() {
			for &b in &self.node_indices[i + 1..] {
				let (ax, ay) = positions[&a];
				let (bx, by) = positions[&b];
				let (dx, dy) = (bx - ax, by - ay);
				let dist = (dx * dx + dy * dy).sqrt();
				if dist >= scale::COLLISION_RADIUS {
					continue;
				}
				// Coincident nodes get a deterministic nudge apart.
				let (ux, uy) = if dist > 1e-6 {
					(dx / dist, dy / dist)
				} else {
					(1.0, 0.0)
				};
				let push = (scale::COLLISION_RADIUS - dist) / 2.0;
				let entry_a = shift.entry(a).or_default();
				entry_a.0 -= (ux * push) as f32;
				entry_a.1 -= (uy * push) as f32;
				let entry_b = shift.entry(b).or_default();
				entry_b.0 += (ux * push) as f32;
				entry_b.1 += (uy * push) as f32;
			}
		}

		if shift.is_empty() {
			return;
		}
		let pinned = self.pinned_node();
		self.graph.visit_nodes_mut(|node| {
			if Some(node.index()) == pinned {
				return;
			}
			if let Some(&(dx, dy)) = shift.get(&node.index()) {
				node.data.x += dx;
				node.data.y += dy;
			}
		});
	}

	fn pinned_node(&self) -> Option<DefaultNodeIdx> {
		self.drag.active.then_some(self.drag.node_idx).flatten()
	}

	/// Current world positions by node index.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::with_capacity(self.node_indices.len());
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Hit-test against each node's own visual radius, world space.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + 2.0 {
				found = Some(node.index());
			}
		});
		found
	}

	/// Pin a node to the pointer. While pinned it tracks the pointer
	/// exactly and the simulation moves around it.
	pub fn start_drag(&mut self, idx: DefaultNodeIdx, sx: f64, sy: f64) {
		self.drag.active = true;
		self.drag.node_idx = Some(idx);
		self.drag.start_x = sx;
		self.drag.start_y = sy;
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = true;
			}
		});
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				self.drag.node_start_x = node.x();
				self.drag.node_start_y = node.y();
			}
		});
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.pinned_node() else {
			return;
		};
		let (dx, dy) = (
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		let (nx, ny) = (
			self.drag.node_start_x + dx as f32,
			self.drag.node_start_y + dy as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = nx;
				node.data.y = ny;
			}
		});
	}

	/// Release the pin: the node rejoins free simulation and the layout
	/// cools back to rest.
	pub fn end_drag(&mut self) {
		if let Some(idx) = self.drag.node_idx.take() {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.is_anchor = false;
				}
			});
		}
		self.drag.active = false;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hover = node;
	}

	/// Tooltip payload for the hovered node, if any.
	pub fn hover_info(&self) -> Option<HoverInfo> {
		let idx = self.hover?;
		let mut info = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				info = Some(HoverInfo {
					label: node.data.user_data.label.clone(),
					risk_score: node.data.user_data.risk_score,
					incident_count: node.data.user_data.incident_count,
					x: node.x() as f64,
					y: node.y() as f64,
					radius: node.data.user_data.radius,
				});
			}
		});
		info
	}

	/// Zoom about a screen-space anchor point, clamped to the allowed range.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = scale::clamp_zoom(self.transform.k * factor);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphEdge, GraphNode};

	fn node(id: &str, risk: f64, incidents: u32) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			risk_score: risk,
			incident_count: incidents,
		}
	}

	fn snapshot(nodes: Vec<GraphNode>, edges: Vec<(&str, &str, f64)>) -> GraphSnapshot {
		GraphSnapshot {
			nodes,
			edges: edges
				.into_iter()
				.map(|(s, t, w)| GraphEdge {
					source: s.into(),
					target: t.into(),
					weight: w,
				})
				.collect(),
		}
	}

	#[test]
	fn rejects_invalid_snapshot() {
		let bad = snapshot(vec![node("a", 10.0, 1)], vec![("a", "ghost", 1.0)]);
		assert!(GraphViewState::new(&bad, 800.0, 600.0).is_err());
	}

	#[test]
	fn high_risk_node_gets_high_tier_color_and_scaled_radius() {
		let snap = snapshot(vec![node("x", 85.0, 5)], vec![]);
		let state = GraphViewState::new(&snap, 800.0, 600.0).unwrap();
		let mut seen = None;
		state.graph.visit_nodes(|n| {
			seen = Some((n.data.user_data.color, n.data.user_data.radius));
		});
		let (color, radius) = seen.unwrap();
		assert_eq!(color, RiskTier::from_score(85.0).color());
		assert_eq!(radius, 15.0);
	}

	#[test]
	fn edge_endpoints_track_node_positions_after_ticks() {
		let snap = snapshot(
			vec![node("a", 10.0, 1), node("b", 50.0, 2), node("c", 90.0, 3)],
			vec![("a", "b", 0.5), ("b", "c", 1.0)],
		);
		let mut state = GraphViewState::new(&snap, 800.0, 600.0).unwrap();
		for _ in 0..30 {
			state.tick(0.016);
		}
		let positions = state.positions();
		state.graph.visit_edges(|n1, n2, _| {
			let p1 = positions[&n1.index()];
			let p2 = positions[&n2.index()];
			assert_eq!(p1, (n1.x() as f64, n1.y() as f64));
			assert_eq!(p2, (n2.x() as f64, n2.y() as f64));
		});
	}

	#[test]
	fn layout_stays_centered_on_viewport() {
		let snap = snapshot(
			vec![node("a", 10.0, 1), node("b", 50.0, 2)],
			vec![("a", "b", 1.0)],
		);
		let mut state = GraphViewState::new(&snap, 800.0, 600.0).unwrap();
		for _ in 0..20 {
			state.tick(0.016);
		}
		let positions = state.positions();
		let n = positions.len() as f64;
		let (cx, cy) = positions
			.values()
			.fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x / n, ay + y / n));
		assert!((cx - 400.0).abs() < 1.0, "centroid x was {cx}");
		assert!((cy - 300.0).abs() < 1.0, "centroid y was {cy}");
	}

	#[test]
	fn nodes_end_up_at_least_collision_radius_apart() {
		let nodes: Vec<GraphNode> = (0..20)
			.map(|i| node(&format!("n{i}"), 20.0, 1))
			.collect();
		let snap = snapshot(nodes, vec![]);
		let mut state = GraphViewState::new(&snap, 800.0, 600.0).unwrap();
		for _ in 0..200 {
			state.tick(0.016);
		}
		let positions: Vec<(f64, f64)> = state.positions().into_values().collect();
		for (i, &(ax, ay)) in positions.iter().enumerate() {
			for &(bx, by) in &positions[i + 1..] {
				let dist = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
				assert!(
					dist >= scale::COLLISION_RADIUS * 0.9,
					"pair only {dist} apart"
				);
			}
		}
	}

	#[test]
	fn drag_pins_node_and_release_unpins() {
		let snap = snapshot(
			vec![node("a", 10.0, 1), node("b", 50.0, 2)],
			vec![("a", "b", 1.0)],
		);
		let mut state = GraphViewState::new(&snap, 800.0, 600.0).unwrap();
		let idx = state.node_indices[0];

		state.start_drag(idx, 100.0, 100.0);
		state.drag_to(150.0, 120.0);
		let pinned_pos = state.positions()[&idx];
		for _ in 0..10 {
			state.tick(0.016);
		}
		// Pinned: the dragged node ignores the simulation.
		assert_eq!(state.positions()[&idx], pinned_pos);

		state.end_drag();
		for _ in 0..10 {
			state.tick(0.016);
		}
		// Released: it rejoins free simulation and moves again.
		assert_ne!(state.positions()[&idx], pinned_pos);
	}

	#[test]
	fn zoom_is_clamped_and_anchored() {
		let snap = snapshot(vec![node("a", 10.0, 1)], vec![]);
		let mut state = GraphViewState::new(&snap, 800.0, 600.0).unwrap();
		for _ in 0..20 {
			state.zoom_at(400.0, 300.0, 1.5);
		}
		assert_eq!(state.transform.k, scale::MAX_ZOOM);
		for _ in 0..40 {
			state.zoom_at(400.0, 300.0, 0.5);
		}
		assert_eq!(state.transform.k, scale::MIN_ZOOM);
	}

	#[test]
	fn hover_info_exposes_label_risk_and_incidents() {
		let snap = snapshot(vec![node("+1555", 85.0, 5)], vec![]);
		let mut state = GraphViewState::new(&snap, 800.0, 600.0).unwrap();
		assert!(state.hover_info().is_none());

		let idx = state.node_indices[0];
		state.set_hover(Some(idx));
		let info = state.hover_info().unwrap();
		assert_eq!(info.label, "+1555");
		assert_eq!(info.risk_score, 85.0);
		assert_eq!(info.incident_count, 5);
	}
}
