use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NodeInfo};
use crate::graph::style::{self, LinkEmphasis, NodeRole};
use crate::graph::{LinkKind, Selection};

const BACKGROUND: &str = "#0f0f0f";
const LANE_SPACING: f64 = 3.0;

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

/// Every link sharing a spring gets its own lane, spread across the pair so
/// antiparallel arrows sit side by side.
fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap, arrow_len) = (8.0 / k, 4.0 / k, 6.0 / k.max(0.5));
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	state.graph.visit_edges(|n1, n2, _| {
		let links = state.edge_links(n1.index(), n2.index());
		let (ax, ay, bx, by) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (bx - ax, by - ay);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		// lanes are measured against the spring, not the link direction
		let (nx, ny) = (-dy / dist, dx / dist);

		for (lane, info) in links.iter().enumerate() {
			let (from, to) = if info.from == n1.index() { (n1, n2) } else { (n2, n1) };
			let shift = lane_offset(lane, links.len());
			let (x1, y1) = (from.x() as f64 + nx * shift, from.y() as f64 + ny * shift);
			let (x2, y2) = (to.x() as f64 + nx * shift, to.y() as f64 + ny * shift);
			let (ux, uy) = ((x2 - x1) / dist, (y2 - y1) / dist);

			let link = style::link_style(info.kind, &info.source, &info.target, &state.selection);
			let (r1, r2) = (from.data.user_data.radius, to.data.user_data.radius);
			let arrow_size = if link.arrow { arrow_len } else { 0.0 };

			ctx.set_stroke_style_str(link.color);
			ctx.set_line_width(link.width / k);
			// marching dashes show call direction along the selected chain
			if link.emphasis == LinkEmphasis::Highlighted && info.kind == LinkKind::Call {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash),
					&JsValue::from_f64(gap),
				));
				ctx.set_line_dash_offset(dash_offset);
			} else {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}

			ctx.begin_path();
			ctx.move_to(x1 + ux * r1, y1 + uy * r1);
			ctx.line_to(x2 - ux * (r2 + arrow_size), y2 - uy * (r2 + arrow_size));
			ctx.stroke();

			if !link.arrow {
				continue;
			}
			let _ = ctx.set_line_dash(&js_sys::Array::new());
			ctx.set_fill_style_str(link.color);
			let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
			let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// World-space distance of a lane from the spring's centre line.
fn lane_offset(lane: usize, lanes: usize) -> f64 {
	if lanes < 2 {
		return 0.0;
	}
	(lane as f64 - (lanes - 1) as f64 / 2.0) * LANE_SPACING
}

/// Unselected nodes first so the selection is painted on top.
fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	for on_top in [false, true] {
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if state.selection.contains(&info.id) != on_top {
				return;
			}
			draw_node(
				ctx,
				info,
				(node.x() as f64, node.y() as f64),
				k,
				&state.selection,
				state.label_zoom_threshold,
			);
		});
	}
}

/// Paint one node. Reads the selection, never changes it.
pub fn draw_node(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	(x, y): (f64, f64),
	zoom: f64,
	selection: &Selection,
	label_zoom_threshold: f64,
) {
	let role = style::node_role(&info.id, selection);
	let radius = match role {
		NodeRole::Selected => info.radius * 1.35,
		NodeRole::Predecessor => info.radius * 1.15,
		NodeRole::Plain => info.radius,
	};

	if role == NodeRole::Selected {
		let glow_radius = radius * 2.6;
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
			let _ = gradient.add_color_stop(0.0, "rgba(255, 59, 107, 0.45)");
			let _ = gradient.add_color_stop(0.6, "rgba(255, 59, 107, 0.12)");
			let _ = gradient.add_color_stop(1.0, "rgba(255, 59, 107, 0)");
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(style::node_color(info.kind, &info.id, selection));
	ctx.fill();

	if role == NodeRole::Selected {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 2.0 / zoom, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
		ctx.set_line_width(1.5 / zoom);
		ctx.stroke();
	}

	if style::shows_label(info.kind, &info.id, selection, zoom, label_zoom_threshold) {
		let alpha = if selection.is_active() && role == NodeRole::Plain {
			0.45
		} else {
			0.9
		};
		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {alpha})"));
		ctx.set_font(&format!("{}px sans-serif", 10.0 / zoom.max(0.5)));
		let _ = ctx.fill_text(&info.name, x + radius + 3.0 / zoom, y + 3.0 / zoom);
	}
}
