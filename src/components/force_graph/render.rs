use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::GraphViewState;

const BACKGROUND: &str = "#0f1428";
const EDGE_COLOR: &str = "rgba(74, 85, 104, 0.6)";
const LABEL_COLOR: &str = "#e0e0e0";
const TOOLTIP_BG: &str = "rgba(15, 20, 40, 0.92)";

/// One draw pass: clear, apply the pan/zoom transform, edges under nodes,
/// labels, then the hover tooltip in screen space.
pub fn render(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn draw_edges(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let positions = state.positions();
	ctx.set_stroke_style_str(EDGE_COLOR);
	for &(src, tgt, width) in state.edges() {
		// Endpoints always resolve: edges were validated against the node
		// set when the snapshot was accepted.
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&src), positions.get(&tgt))
		else {
			continue;
		};
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let hovered = state.hover;

	state.graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;

		ctx.begin_path();
		let _ = ctx.arc(x, y, info.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(info.color);
		ctx.fill();
		ctx.set_stroke_style_str("#ffffff");
		ctx.set_line_width(2.0);
		ctx.stroke();

		if hovered == Some(node.index()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, info.radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		if !info.label.is_empty() {
			ctx.set_fill_style_str(LABEL_COLOR);
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			ctx.set_text_align("center");
			let _ = ctx.fill_text(&info.label, x, y - info.radius - 6.0);
		}
	});
}

fn draw_tooltip(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let Some(info) = state.hover_info() else {
		return;
	};
	// Anchor the box next to the node, in screen space so it never zooms.
	let sx = info.x * state.transform.k + state.transform.x;
	let sy = info.y * state.transform.k + state.transform.y;
	let lines = [
		info.label.clone(),
		format!("Risk: {:.0}", info.risk_score),
		format!("Incidents: {}", info.incident_count),
	];

	let (pad, line_height, width) = (8.0, 14.0, 150.0);
	let height = pad * 2.0 + line_height * lines.len() as f64;
	let bx = sx + info.radius * state.transform.k + 10.0;
	let by = sy - height / 2.0;

	ctx.set_fill_style_str(TOOLTIP_BG);
	ctx.fill_rect(bx, by, width, height);
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.2)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(bx, by, width, height);

	ctx.set_fill_style_str("#ffffff");
	ctx.set_font("12px sans-serif");
	ctx.set_text_align("left");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, bx + pad, by + pad + line_height * (i as f64 + 0.8));
	}
}
