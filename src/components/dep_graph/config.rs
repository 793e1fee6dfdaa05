use serde::Deserialize;

/// Tunables for layout, drawing and input handling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphViewConfig {
	/// Where the graph document is fetched from.
	pub endpoint: String,
	/// Repulsion between every pair of nodes (negative repels).
	pub charge: f64,
	/// Rest length of a link.
	pub link_distance: f64,
	/// Link pull, scaled down for links touching well-connected nodes.
	pub link_strength: f64,
	/// Repulsion used in hierarchical mode.
	pub hierarchical_charge: f64,
	/// Constant link pull used in hierarchical mode.
	pub hierarchical_link_strength: f64,
	/// Minimum node separation in hierarchical mode.
	pub collide_radius: f64,
	/// Per-step alpha cooling rate in force mode.
	pub alpha_decay: f64,
	/// Per-step alpha cooling rate in hierarchical mode.
	pub hierarchical_alpha_decay: f64,
	/// The simulation stops once alpha falls below this.
	pub alpha_min: f64,
	/// Alpha the simulation is held at while a node is dragged.
	pub drag_alpha_target: f64,
	/// Left margin of the first hierarchy layer.
	pub layer_margin: f64,
	/// Space kept around the content bounding box.
	pub padding: f64,
	/// Drawn node radius.
	pub node_radius: f64,
	/// Pointer distance within which a node is hit.
	pub hit_radius: f64,
	/// Quiet period after the last resize event before re-laying out.
	pub resize_debounce_ms: u32,
}

impl Default for GraphViewConfig {
	fn default() -> Self {
		Self {
			endpoint: "/api/graph".into(),
			charge: -300.0,
			link_distance: 100.0,
			link_strength: 1.0,
			hierarchical_charge: -50.0,
			hierarchical_link_strength: 0.1,
			collide_radius: 30.0,
			alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
			hierarchical_alpha_decay: 0.05,
			alpha_min: 0.001,
			drag_alpha_target: 0.3,
			layer_margin: 100.0,
			padding: 50.0,
			node_radius: 6.0,
			hit_radius: 12.0,
			resize_debounce_ms: 150,
		}
	}
}

impl GraphViewConfig {
	/// Missing fields take their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}
