//! The two layout strategies and the edge shapes they draw.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::config::GraphViewConfig;
use super::error::GraphError;
use super::filter::DisplayedGraph;
use super::layering::{LayerMap, assign_layers};
use super::simulation::{Body, Forces, LinkStrength, Simulation};
use super::store::{LayoutState, NodeKey, NodeStore, Point};
use super::surface::Viewport;

/// How nodes are positioned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
	/// Free bodies under charge, link and centering forces.
	#[default]
	Force,
	/// Nodes pinned in columns by dependency depth.
	Hierarchical,
}

impl LayoutMode {
	/// Maps the layout toggle onto a mode.
	pub fn from_hierarchical(hierarchical: bool) -> Self {
		if hierarchical {
			Self::Hierarchical
		} else {
			Self::Force
		}
	}
}

/// Identifies one layout instance. A new one is issued on every rebuild so
/// ticks scheduled for a torn-down layout can be recognised and dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutEpoch(pub u64);

impl LayoutEpoch {
	pub fn next(self) -> Self {
		Self(self.0 + 1)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeGeometry {
	Line { from: Point, to: Point },
	/// Cubic curve; both control points sit at the horizontal midpoint.
	Curve {
		from: Point,
		c1: Point,
		c2: Point,
		to: Point,
	},
}

impl EdgeGeometry {
	pub fn between(mode: LayoutMode, from: Point, to: Point) -> Self {
		match mode {
			LayoutMode::Force => Self::Line { from, to },
			LayoutMode::Hierarchical => {
				let mid_x = (from.x + to.x) / 2.0;
				Self::Curve {
					from,
					c1: Point::new(mid_x, from.y),
					c2: Point::new(mid_x, to.y),
					to,
				}
			}
		}
	}
}

/// Layer-ordered placement: layers spread left to right, nodes of a layer
/// spread evenly top to bottom.
pub fn layered_positions(
	layers: &LayerMap,
	nodes: &[NodeKey],
	viewport: Viewport,
	margin: f64,
) -> HashMap<NodeKey, Point> {
	let columns = (layers.max_layer() + 1) as f64;
	let mut positions = HashMap::with_capacity(nodes.len());
	for (layer, group) in layers.groups(nodes).iter().enumerate() {
		let x = margin + layer as f64 / columns * viewport.width;
		let rows = (group.len() + 1) as f64;
		for (index, &key) in group.iter().enumerate() {
			let y = (index + 1) as f64 * viewport.height / rows;
			positions.insert(key, Point::new(x, y));
		}
	}
	positions
}

pub struct LayoutStrategy {
	mode: LayoutMode,
	epoch: LayoutEpoch,
	simulation: Simulation,
	layers: Option<LayerMap>,
	/// Pin each node returns to when released (hierarchical only).
	home: HashMap<NodeKey, Point>,
	dragging: Option<NodeKey>,
	drag_alpha_target: f64,
}

impl LayoutStrategy {
	/// Builds a fresh layout, discarding whatever position state the store
	/// carried.
	pub fn build(
		mode: LayoutMode,
		epoch: LayoutEpoch,
		store: &mut NodeStore,
		graph: &DisplayedGraph,
		viewport: Viewport,
		config: &GraphViewConfig,
	) -> Result<Self, GraphError> {
		viewport.validate()?;
		store.reset_layout();
		let center = viewport.center();

		let (layers, home, forces) = match mode {
			LayoutMode::Force => {
				let count = graph.nodes.len().max(1) as f64;
				for (i, &key) in graph.nodes.iter().enumerate() {
					let angle = i as f64 * 2.0 * PI / count;
					let node = store.get_mut(key);
					node.position = Some(Point::new(
						center.x + 100.0 * angle.cos(),
						center.y + 100.0 * angle.sin(),
					));
				}
				let forces = Forces {
					charge: config.charge,
					link_distance: config.link_distance,
					link_strength: LinkStrength::Degree(config.link_strength),
					collide_radius: None,
					center: Some(center),
					alpha_decay: config.alpha_decay,
					alpha_min: config.alpha_min,
				};
				(None, HashMap::new(), forces)
			}
			LayoutMode::Hierarchical => {
				let layers = assign_layers(&graph.nodes, &graph.links);
				let home = layered_positions(&layers, &graph.nodes, viewport, config.layer_margin);
				for (&key, &at) in &home {
					let node = store.get_mut(key);
					node.position = Some(at);
					node.layout = LayoutState::Pinned(at);
				}
				let forces = Forces {
					charge: config.hierarchical_charge,
					link_distance: config.link_distance,
					link_strength: LinkStrength::Constant(config.hierarchical_link_strength),
					collide_radius: Some(config.collide_radius),
					center: None,
					alpha_decay: config.hierarchical_alpha_decay,
					alpha_min: config.alpha_min,
				};
				(Some(layers), home, forces)
			}
		};

		let bodies: Vec<Body> = graph
			.nodes
			.iter()
			.map(|&key| {
				let node = store.get(key);
				Body {
					key,
					position: node.position.unwrap_or(center),
					pinned: matches!(node.layout, LayoutState::Pinned(_)),
				}
			})
			.collect();

		log::info!(
			"layout {:?} #{}: {} nodes, {} links",
			mode,
			epoch.0,
			bodies.len(),
			graph.links.len()
		);

		Ok(Self {
			mode,
			epoch,
			simulation: Simulation::new(&bodies, &graph.links, forces),
			layers,
			home,
			dragging: None,
			drag_alpha_target: config.drag_alpha_target,
		})
	}

	pub fn mode(&self) -> LayoutMode {
		self.mode
	}

	pub fn epoch(&self) -> LayoutEpoch {
		self.epoch
	}

	pub fn layers(&self) -> Option<&LayerMap> {
		self.layers.as_ref()
	}

	pub fn is_running(&self) -> bool {
		self.simulation.is_running()
	}

	/// One integration step, written through to the store. `false` once the
	/// simulation has settled.
	pub fn step(&mut self, store: &mut NodeStore) -> bool {
		let Some(snapshot) = self.simulation.step() else {
			return false;
		};
		for (key, at) in snapshot {
			let node = store.get_mut(key);
			node.position = Some(match node.layout {
				LayoutState::Pinned(pin) => pin,
				LayoutState::Free => at,
			});
		}
		true
	}

	pub fn dragging(&self) -> Option<NodeKey> {
		self.dragging
	}

	pub fn begin_drag(&mut self, store: &mut NodeStore, key: NodeKey, at: Point) {
		self.dragging = Some(key);
		self.simulation.set_alpha_target(self.drag_alpha_target);
		self.pin(store, key, at);
	}

	pub fn drag_to(&mut self, store: &mut NodeStore, at: Point) {
		if let Some(key) = self.dragging {
			self.pin(store, key, at);
		}
	}

	/// Releases the dragged node back to this layout's own rule: free in the
	/// force layout, its layer slot in the hierarchical one.
	pub fn end_drag(&mut self, store: &mut NodeStore) {
		let Some(key) = self.dragging.take() else {
			return;
		};
		self.simulation.set_alpha_target(0.0);
		match self.home.get(&key) {
			Some(&home) => self.pin(store, key, home),
			None => {
				self.simulation.unpin(key);
				store.get_mut(key).layout = LayoutState::Free;
			}
		}
	}

	pub fn edge_geometry(&self, from: Point, to: Point) -> EdgeGeometry {
		EdgeGeometry::between(self.mode, from, to)
	}

	fn pin(&mut self, store: &mut NodeStore, key: NodeKey, at: Point) {
		self.simulation.pin(key, at);
		let node = store.get_mut(key);
		node.position = Some(at);
		node.layout = LayoutState::Pinned(at);
	}
}
