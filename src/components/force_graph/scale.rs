//! Pure visual scales for the graph view.

/// Zoom bounds for the whole-layout transform.
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;

/// Target separation for connected node pairs, world units.
pub const LINK_DISTANCE: f64 = 100.0;

/// Minimum center-to-center separation enforced between any two nodes,
/// regardless of their visual radius.
pub const COLLISION_RADIUS: f64 = 30.0;

/// Node radius scales with incident count, clamped so rare entities stay
/// visible and hot ones don't swallow the canvas.
pub fn node_radius(incident_count: u32) -> f64 {
	(f64::from(incident_count) * 3.0).clamp(8.0, 20.0)
}

/// Edge stroke width scales with relationship weight, floored at 1px.
pub fn edge_width(weight: f64) -> f64 {
	(weight * 3.0).max(1.0)
}

pub fn clamp_zoom(k: f64) -> f64 {
	k.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn radius_scales_and_clamps() {
		assert_eq!(node_radius(0), 8.0);
		assert_eq!(node_radius(1), 8.0);
		assert_eq!(node_radius(3), 9.0);
		// Five incidents: 5 * 3 clamped into [8, 20] = 15.
		assert_eq!(node_radius(5), 15.0);
		assert_eq!(node_radius(7), 20.0);
		assert_eq!(node_radius(1000), 20.0);
	}

	#[test]
	fn edge_width_floors_at_one() {
		assert_eq!(edge_width(0.1), 1.0);
		assert_eq!(edge_width(1.0), 3.0);
		assert_eq!(edge_width(0.5), 1.5);
	}

	#[test]
	fn zoom_is_clamped_to_bounds() {
		assert_eq!(clamp_zoom(0.01), MIN_ZOOM);
		assert_eq!(clamp_zoom(1.0), 1.0);
		assert_eq!(clamp_zoom(50.0), MAX_ZOOM);
	}
}
