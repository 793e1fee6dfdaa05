use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::highlight::{EdgeState, VisualState};
use super::layout::EdgeGeometry;
use super::state::{DrawnNode, Frame};
use super::store::Point;
use super::types::Category;

const BACKGROUND: &str = "#1a1a2e";

fn category_color(category: Category) -> &'static str {
	match category {
		Category::Main => "#d62728",
		Category::Direct => "#1f77b4",
		Category::Indirect => "#7f7f7f",
	}
}

pub fn render(frame: &Frame, node_radius: f64, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, frame.surface.width, frame.surface.height);
	ctx.save();
	let _ = ctx.translate(frame.surface.translate.x, frame.surface.translate.y);
	for edge in &frame.edges {
		draw_edge(&edge.geometry, edge.state, node_radius, ctx);
	}
	for node in &frame.nodes {
		draw_node(node, node_radius, ctx);
	}
	ctx.restore();
}

fn draw_edge(
	geometry: &EdgeGeometry,
	state: EdgeState,
	radius: f64,
	ctx: &CanvasRenderingContext2d,
) {
	let alpha = state.opacity();
	let width = if state == EdgeState::Opaque { 2.0 } else { 1.5 };
	let arrow_size = 8.0;

	// Arrow direction follows the tangent at the target end.
	let (from, tail, to) = match *geometry {
		EdgeGeometry::Line { from, to } => (from, from, to),
		EdgeGeometry::Curve { from, c2, to, .. } => (from, if c2 == to { from } else { c2 }, to),
	};
	let (dx, dy) = (to.x - tail.x, to.y - tail.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);

	ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", alpha));
	ctx.set_line_width(width);
	ctx.begin_path();
	match *geometry {
		EdgeGeometry::Line { .. } => {
			ctx.move_to(from.x + ux * radius, from.y + uy * radius);
			ctx.line_to(
				to.x - ux * (radius + arrow_size),
				to.y - uy * (radius + arrow_size),
			);
		}
		EdgeGeometry::Curve { c1, c2, .. } => {
			ctx.move_to(from.x, from.y);
			ctx.bezier_curve_to(
				c1.x,
				c1.y,
				c2.x,
				c2.y,
				to.x - ux * (radius + arrow_size),
				to.y - uy * (radius + arrow_size),
			);
		}
	}
	ctx.stroke();

	ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", alpha));
	let tip = Point::new(to.x - ux * radius, to.y - uy * radius);
	let (back_x, back_y) = (tip.x - ux * arrow_size, tip.y - uy * arrow_size);
	let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_node(node: &DrawnNode, radius: f64, ctx: &CanvasRenderingContext2d) {
	let Point { x, y } = node.at;
	let radius = match node.state {
		VisualState::Emphasized => radius * 1.35,
		VisualState::Connected => radius * 1.15,
		VisualState::Neutral | VisualState::Dimmed => radius,
	};

	if node.state == VisualState::Emphasized {
		let glow = radius * 2.2;
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow) {
			let _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.35)");
			let _ = gradient.add_color_stop(0.6, "rgba(200, 220, 255, 0.1)");
			let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	ctx.set_global_alpha(node.state.opacity());
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(category_color(node.category));
	ctx.fill();

	if node.hovered {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 2.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
		ctx.set_line_width(1.5);
		ctx.stroke();
	}

	ctx.set_global_alpha(node.label_state.opacity());
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
	ctx.set_font("10px sans-serif");
	let _ = ctx.fill_text(&node.label, x + radius + 3.0, y + 3.0);
	ctx.set_global_alpha(1.0);
}
