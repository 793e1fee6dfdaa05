//! Physics driver shared by both layouts.
//!
//! Charge repulsion and velocity integration come from `force_graph`; this
//! wrapper adds the pieces it lacks: an energy (`alpha`) that cools every
//! step, link rest lengths, collision separation, and centering. The host
//! calls [`Simulation::step`] from its timer until it returns `None`.
//!
//! A simulation whose bodies are all pinned has nothing to integrate and
//! counts as settled from the start.

use std::collections::HashMap;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::store::{Link, NodeKey, Point};

const FRAME_DT: f64 = 0.016;
const NODE_MASS: f32 = 10.0;

/// How hard links pull toward their rest length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkStrength {
	/// Scaled by `1 / min(degree(source), degree(target))`.
	Degree(f64),
	Constant(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Forces {
	/// Negative values repel.
	pub charge: f64,
	pub link_distance: f64,
	pub link_strength: LinkStrength,
	pub collide_radius: Option<f64>,
	/// Free nodes are translated so their centroid sits here.
	pub center: Option<Point>,
	pub alpha_decay: f64,
	pub alpha_min: f64,
}

/// Initial state of one simulated node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
	pub key: NodeKey,
	pub position: Point,
	pub pinned: bool,
}

pub type PositionsSnapshot = Vec<(NodeKey, Point)>;

struct Scratch {
	key: NodeKey,
	x: f64,
	y: f64,
	pinned: bool,
}

pub struct Simulation {
	engine: ForceGraph<NodeKey, ()>,
	links: Vec<(usize, usize, f64, f64)>,
	slots: HashMap<NodeKey, usize>,
	forces: Forces,
	alpha: f64,
	alpha_target: f64,
}

impl Simulation {
	pub fn new(bodies: &[Body], links: &[Link], forces: Forces) -> Self {
		let mut engine = ForceGraph::new(SimulationParameters {
			force_charge: (-forces.charge * 0.5) as f32,
			force_spring: 0.0,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut indices = HashMap::new();
		let mut slots = HashMap::new();
		for (slot, body) in bodies.iter().enumerate() {
			let idx = engine.add_node(NodeData {
				x: body.position.x as f32,
				y: body.position.y as f32,
				mass: NODE_MASS,
				is_anchor: body.pinned,
				user_data: body.key,
			});
			indices.insert(body.key, idx);
			slots.insert(body.key, slot);
		}

		let mut degree = vec![0usize; bodies.len()];
		let mut resolved = Vec::new();
		for link in links {
			if let (Some(&s), Some(&t)) = (slots.get(&link.source), slots.get(&link.target)) {
				engine.add_edge(indices[&link.source], indices[&link.target], EdgeData::default());
				degree[s] += 1;
				degree[t] += 1;
				resolved.push((s, t));
			}
		}

		let links = resolved
			.into_iter()
			.map(|(s, t)| {
				let strength = match forces.link_strength {
					LinkStrength::Degree(scale) => scale / degree[s].min(degree[t]) as f64,
					LinkStrength::Constant(strength) => strength,
				};
				let bias = degree[s] as f64 / (degree[s] + degree[t]) as f64;
				(s, t, strength, bias)
			})
			.collect();

		Self {
			engine,
			links,
			slots,
			forces,
			alpha: 1.0,
			alpha_target: 0.0,
		}
	}

	pub fn is_running(&self) -> bool {
		self.alpha >= self.forces.alpha_min && self.has_free_body()
	}

	fn has_free_body(&self) -> bool {
		let mut free = false;
		self.engine.visit_nodes(|node| free |= !node.data.is_anchor);
		free
	}

	/// Keeps the simulation warm (drag) or lets it cool (`0.0`). Restarts a
	/// settled simulation when `target` is above the stopping threshold.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
		if target >= self.forces.alpha_min && self.alpha < target {
			self.alpha = target;
		}
	}

	/// Advances one step. `None` once alpha has decayed below the threshold.
	pub fn step(&mut self) -> Option<PositionsSnapshot> {
		if !self.is_running() {
			return None;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.forces.alpha_decay;
		self.engine.update((FRAME_DT * self.alpha) as f32);

		let mut bodies = self.scratch();
		self.apply_links(&mut bodies);
		if let Some(radius) = self.forces.collide_radius {
			apply_collision(&mut bodies, radius);
		}
		if let Some(center) = self.forces.center {
			apply_center(&mut bodies, center);
		}
		self.write_back(&bodies);

		Some(bodies.iter().map(|b| (b.key, Point::new(b.x, b.y))).collect())
	}

	pub fn pin(&mut self, key: NodeKey, at: Point) {
		self.engine.visit_nodes_mut(|node| {
			if node.data.user_data == key {
				node.data.x = at.x as f32;
				node.data.y = at.y as f32;
				node.data.is_anchor = true;
			}
		});
	}

	pub fn unpin(&mut self, key: NodeKey) {
		self.engine.visit_nodes_mut(|node| {
			if node.data.user_data == key {
				node.data.is_anchor = false;
			}
		});
	}

	#[cfg(test)]
	pub fn positions(&self) -> PositionsSnapshot {
		self.scratch()
			.iter()
			.map(|b| (b.key, Point::new(b.x, b.y)))
			.collect()
	}

	fn scratch(&self) -> Vec<Scratch> {
		let mut bodies: Vec<Option<Scratch>> = (0..self.slots.len()).map(|_| None).collect();
		self.engine.visit_nodes(|node| {
			let key = node.data.user_data;
			if let Some(&slot) = self.slots.get(&key) {
				bodies[slot] = Some(Scratch {
					key,
					x: node.x() as f64,
					y: node.y() as f64,
					pinned: node.data.is_anchor,
				});
			}
		});
		bodies.into_iter().flatten().collect()
	}

	fn write_back(&mut self, bodies: &[Scratch]) {
		let slots = &self.slots;
		self.engine.visit_nodes_mut(|node| {
			if let Some(body) = slots.get(&node.data.user_data).and_then(|&s| bodies.get(s)) {
				if !body.pinned {
					node.data.x = body.x as f32;
					node.data.y = body.y as f32;
				}
			}
		});
	}

	fn apply_links(&self, bodies: &mut [Scratch]) {
		for &(s, t, strength, bias) in &self.links {
			let (dx, dy) = (bodies[t].x - bodies[s].x, bodies[t].y - bodies[s].y);
			let dist = dx.hypot(dy);
			if dist < 1e-9 {
				continue;
			}
			let l = (dist - self.forces.link_distance) / dist * self.alpha * strength;
			let (dx, dy) = (dx * l, dy * l);
			let (target_share, source_share) = match (bodies[s].pinned, bodies[t].pinned) {
				(true, true) => continue,
				(true, false) => (1.0, 0.0),
				(false, true) => (0.0, 1.0),
				(false, false) => (bias, 1.0 - bias),
			};
			bodies[t].x -= dx * target_share;
			bodies[t].y -= dy * target_share;
			bodies[s].x += dx * source_share;
			bodies[s].y += dy * source_share;
		}
	}
}

fn apply_collision(bodies: &mut [Scratch], radius: f64) {
	let min_dist = radius * 2.0;
	for i in 0..bodies.len() {
		for j in (i + 1)..bodies.len() {
			let (mut dx, mut dy) = (bodies[j].x - bodies[i].x, bodies[j].y - bodies[i].y);
			let mut dist = dx.hypot(dy);
			if dist >= min_dist {
				continue;
			}
			if dist < 1e-9 {
				// Coincident: separate along a fixed per-pair direction.
				let angle = (i * 31 + j) as f64;
				(dx, dy, dist) = (angle.cos() * 1e-3, angle.sin() * 1e-3, 1e-3);
			}
			let push = (min_dist - dist) / dist;
			let (px, py) = (dx * push, dy * push);
			let (i_share, j_share) = match (bodies[i].pinned, bodies[j].pinned) {
				(true, true) => continue,
				(true, false) => (0.0, 1.0),
				(false, true) => (1.0, 0.0),
				(false, false) => (0.5, 0.5),
			};
			bodies[i].x -= px * i_share;
			bodies[i].y -= py * i_share;
			bodies[j].x += px * j_share;
			bodies[j].y += py * j_share;
		}
	}
}

fn apply_center(bodies: &mut [Scratch], center: Point) {
	let free: Vec<usize> = (0..bodies.len()).filter(|&i| !bodies[i].pinned).collect();
	if free.is_empty() {
		return;
	}
	let n = free.len() as f64;
	let mean_x = free.iter().map(|&i| bodies[i].x).sum::<f64>() / n;
	let mean_y = free.iter().map(|&i| bodies[i].y).sum::<f64>() / n;
	for i in free {
		bodies[i].x += center.x - mean_x;
		bodies[i].y += center.y - mean_y;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn forces() -> Forces {
		Forces {
			charge: -300.0,
			link_distance: 100.0,
			link_strength: LinkStrength::Degree(1.0),
			collide_radius: None,
			center: Some(Point::new(400.0, 300.0)),
			alpha_decay: 0.05,
			alpha_min: 0.001,
		}
	}

	fn body(i: usize, x: f64, y: f64, pinned: bool) -> Body {
		Body {
			key: NodeKey(i),
			position: Point::new(x, y),
			pinned,
		}
	}

	#[test]
	fn cools_down_and_stops() {
		let mut sim = Simulation::new(
			&[body(0, 390.0, 300.0, false), body(1, 410.0, 300.0, false)],
			&[],
			forces(),
		);
		let mut steps = 0;
		while sim.step().is_some() {
			steps += 1;
			assert!(steps < 1_000, "simulation never settled");
		}
		assert!(!sim.is_running());
		assert!(sim.step().is_none());
	}

	#[test]
	fn all_pinned_is_settled_and_never_moves() {
		let mut sim = Simulation::new(
			&[body(0, 10.0, 10.0, true), body(1, 12.0, 10.0, true)],
			&[Link {
				source: NodeKey(0),
				target: NodeKey(1),
			}],
			Forces {
				collide_radius: Some(30.0),
				..forces()
			},
		);
		assert!(!sim.is_running());
		assert!(sim.step().is_none());
		let positions = sim.positions();
		assert_eq!(positions[0], (NodeKey(0), Point::new(10.0, 10.0)));
		assert_eq!(positions[1], (NodeKey(1), Point::new(12.0, 10.0)));

		sim.unpin(NodeKey(1));
		assert!(sim.is_running());
	}

	#[test]
	fn free_bodies_stay_centred() {
		let mut sim = Simulation::new(
			&[body(0, 0.0, 0.0, false), body(1, 50.0, 0.0, false), body(2, 0.0, 80.0, false)],
			&[],
			forces(),
		);
		let snapshot = sim.step().unwrap();
		let n = snapshot.len() as f64;
		let cx = snapshot.iter().map(|(_, p)| p.x).sum::<f64>() / n;
		let cy = snapshot.iter().map(|(_, p)| p.y).sum::<f64>() / n;
		assert!((cx - 400.0).abs() < 1e-3);
		assert!((cy - 300.0).abs() < 1e-3);
	}

	#[test]
	fn collision_pushes_free_body_off_pinned_one() {
		let mut sim = Simulation::new(
			&[body(0, 100.0, 100.0, true), body(1, 110.0, 100.0, false)],
			&[],
			Forces {
				charge: 0.0,
				collide_radius: Some(30.0),
				center: None,
				..forces()
			},
		);
		let snapshot = sim.step().unwrap();
		assert_eq!(snapshot[0].1, Point::new(100.0, 100.0));
		assert!(snapshot[1].1.distance(snapshot[0].1) >= 60.0 - 1e-6);
	}

	#[test]
	fn drag_target_keeps_it_warm() {
		let mut sim = Simulation::new(&[body(0, 0.0, 0.0, false)], &[], forces());
		while sim.step().is_some() {}
		sim.set_alpha_target(0.3);
		assert!(sim.is_running());
		for _ in 0..500 {
			assert!(sim.step().is_some());
		}
		sim.set_alpha_target(0.0);
		let mut steps = 0;
		while sim.step().is_some() {
			steps += 1;
			assert!(steps < 1_000);
		}
	}

	#[test]
	fn pin_moves_body_and_holds_it() {
		let mut sim = Simulation::new(
			&[body(0, 0.0, 0.0, false), body(1, 30.0, 0.0, false)],
			&[],
			forces(),
		);
		sim.pin(NodeKey(1), Point::new(250.0, 75.0));
		let snapshot = sim.step().unwrap();
		assert_eq!(snapshot[1].1, Point::new(250.0, 75.0));
		sim.unpin(NodeKey(1));
		assert!(sim.step().is_some());
	}
}
