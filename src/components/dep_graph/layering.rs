//! Layer assignment for the hierarchical layout.

use std::collections::{HashMap, VecDeque};

use super::store::{Link, NodeKey};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerMap {
	layers: HashMap<NodeKey, usize>,
}

impl LayerMap {
	pub fn get(&self, key: NodeKey) -> Option<usize> {
		self.layers.get(&key).copied()
	}

	pub fn len(&self) -> usize {
		self.layers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}

	pub fn max_layer(&self) -> usize {
		self.layers.values().copied().max().unwrap_or(0)
	}

	/// Nodes of each layer, in the order they appear in `nodes`.
	pub fn groups(&self, nodes: &[NodeKey]) -> Vec<Vec<NodeKey>> {
		let mut groups = vec![Vec::new(); self.max_layer() + 1];
		for &key in nodes {
			if let Some(layer) = self.get(key) {
				groups[layer].push(key);
			}
		}
		groups
	}
}

/// Longest-path layering by in-degree propagation.
///
/// Roots start at layer 0 and every edge pushes its target at least one
/// layer past its source. Nodes the propagation never reaches (cycles with no
/// root leading in) fall back to layer 0. Links with an endpoint outside
/// `nodes` are ignored.
pub fn assign_layers(nodes: &[NodeKey], links: &[Link]) -> LayerMap {
	let mut in_degree: HashMap<NodeKey, usize> = nodes.iter().map(|&k| (k, 0)).collect();
	let mut outgoing: HashMap<NodeKey, Vec<NodeKey>> = HashMap::new();
	for link in links {
		if !in_degree.contains_key(&link.source) {
			continue;
		}
		let Some(degree) = in_degree.get_mut(&link.target) else {
			continue;
		};
		*degree += 1;
		outgoing.entry(link.source).or_default().push(link.target);
	}

	let mut layers = HashMap::with_capacity(nodes.len());
	let mut queue = VecDeque::new();
	for &key in nodes {
		if in_degree[&key] == 0 {
			layers.insert(key, 0);
			queue.push_back(key);
		}
	}

	while let Some(key) = queue.pop_front() {
		let layer = layers[&key];
		let Some(targets) = outgoing.get(&key) else {
			continue;
		};
		for &target in targets {
			let layer_slot = layers.entry(target).or_insert(layer + 1);
			*layer_slot = (*layer_slot).max(layer + 1);

			if let Some(degree) = in_degree.get_mut(&target) {
				*degree -= 1;
				if *degree == 0 {
					queue.push_back(target);
				}
			}
		}
	}

	for &key in nodes {
		layers.entry(key).or_insert(0);
	}
	LayerMap { layers }
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn link(s: usize, t: usize) -> Link {
		Link {
			source: NodeKey(s),
			target: NodeKey(t),
		}
	}

	fn keys(n: usize) -> Vec<NodeKey> {
		(0..n).map(NodeKey).collect()
	}

	#[test]
	fn chain_gets_increasing_layers() {
		let layers = assign_layers(&keys(3), &[link(0, 1), link(1, 2)]);
		assert_eq!(layers.get(NodeKey(0)), Some(0));
		assert_eq!(layers.get(NodeKey(1)), Some(1));
		assert_eq!(layers.get(NodeKey(2)), Some(2));
		assert_eq!(layers.max_layer(), 2);
	}

	#[test]
	fn diamond_uses_longest_path() {
		// 0 -> 1 -> 2 -> 3 and a shortcut 0 -> 3
		let layers = assign_layers(&keys(4), &[link(0, 3), link(0, 1), link(1, 2), link(2, 3)]);
		assert_eq!(layers.get(NodeKey(3)), Some(3));
	}

	#[test]
	fn two_cycle_collapses_to_root_layer() {
		let layers = assign_layers(&keys(2), &[link(0, 1), link(1, 0)]);
		assert_eq!(layers.get(NodeKey(0)), Some(0));
		assert_eq!(layers.get(NodeKey(1)), Some(0));
	}

	#[test]
	fn cycle_entered_from_root_keeps_propagated_layer() {
		// 0 -> 1 <-> 2
		let layers = assign_layers(&keys(3), &[link(0, 1), link(1, 2), link(2, 1)]);
		assert_eq!(layers.get(NodeKey(0)), Some(0));
		assert_eq!(layers.get(NodeKey(1)), Some(1));
		assert_eq!(layers.get(NodeKey(2)), Some(0));
	}

	#[test]
	fn links_outside_the_node_set_are_ignored() {
		let layers = assign_layers(&[NodeKey(0), NodeKey(1)], &[link(7, 1), link(0, 1)]);
		assert_eq!(layers.get(NodeKey(1)), Some(1));
		assert_eq!(layers.len(), 2);
	}

	#[test]
	fn groups_follow_node_order() {
		let nodes = vec![NodeKey(2), NodeKey(0), NodeKey(1)];
		let layers = assign_layers(&nodes, &[link(0, 1)]);
		assert_eq!(
			layers.groups(&nodes),
			vec![vec![NodeKey(2), NodeKey(0)], vec![NodeKey(1)]]
		);
	}

	#[test]
	fn empty_graph() {
		let layers = assign_layers(&[], &[]);
		assert!(layers.is_empty());
		assert_eq!(layers.max_layer(), 0);
	}

	proptest! {
		#[test]
		fn every_node_gets_a_layer(
			n in 1usize..20,
			edges in prop::collection::vec((0usize..20, 0usize..20), 0..60),
		) {
			let nodes = keys(n);
			let links: Vec<Link> = edges.iter().map(|&(s, t)| link(s % n, t % n)).collect();
			let layers = assign_layers(&nodes, &links);
			prop_assert_eq!(layers.len(), n);
			for key in &nodes {
				prop_assert!(layers.get(*key).is_some());
			}
		}

		#[test]
		fn acyclic_edges_point_forward(
			n in 2usize..20,
			edges in prop::collection::vec((0usize..20, 0usize..20), 0..60),
		) {
			// Orient every edge from lower to higher index: a DAG.
			let links: Vec<Link> = edges
				.iter()
				.map(|&(a, b)| (a % n, b % n))
				.filter(|(a, b)| a != b)
				.map(|(a, b)| link(a.min(b), a.max(b)))
				.collect();
			let layers = assign_layers(&keys(n), &links);
			for l in &links {
				let (s, t) = (layers.get(l.source).unwrap(), layers.get(l.target).unwrap());
				prop_assert!(t >= s + 1, "edge {:?} has layers {} -> {}", l, s, t);
			}
		}
	}
}
