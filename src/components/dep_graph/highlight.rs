//! Hover and search highlighting.
//!
//! Both produce the same three tiers over the displayed graph: emphasized
//! nodes, their one-hop neighbours (connected), and everything else
//! (dimmed). Hover wins while the pointer is over a node; leaving it falls
//! back to the search result, or to neutral when there is no query.

use std::collections::HashSet;

use super::filter::DisplayedGraph;
use super::store::{Link, NodeKey, NodeStore};

/// Per-node (and per-label) visual tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisualState {
	#[default]
	Neutral,
	Emphasized,
	Connected,
	Dimmed,
}

impl VisualState {
	pub fn opacity(self) -> f64 {
		match self {
			Self::Neutral | Self::Emphasized => 1.0,
			Self::Connected => 0.8,
			Self::Dimmed => 0.15,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeState {
	#[default]
	Neutral,
	/// Touches an emphasized node.
	Opaque,
	/// Runs between two connected nodes.
	Faded,
	Dimmed,
}

impl EdgeState {
	pub fn opacity(self) -> f64 {
		match self {
			Self::Neutral => 0.6,
			Self::Opaque => 1.0,
			Self::Faded => 0.3,
			Self::Dimmed => 0.05,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
	active: bool,
	emphasized: HashSet<NodeKey>,
	connected: HashSet<NodeKey>,
}

impl Classification {
	pub fn neutral() -> Self {
		Self::default()
	}

	/// Emphasizes `emphasized` and marks its one-hop neighbourhood connected.
	pub fn around(graph: &DisplayedGraph, emphasized: HashSet<NodeKey>) -> Self {
		let connected = emphasized
			.iter()
			.flat_map(|&key| graph.neighbors(key))
			.filter(|key| !emphasized.contains(key))
			.collect();
		Self {
			active: true,
			emphasized,
			connected,
		}
	}

	pub fn is_active(&self) -> bool {
		self.active
	}

	pub fn emphasized(&self) -> &HashSet<NodeKey> {
		&self.emphasized
	}

	pub fn connected(&self) -> &HashSet<NodeKey> {
		&self.connected
	}

	pub fn dimmed(&self, graph: &DisplayedGraph) -> HashSet<NodeKey> {
		graph
			.nodes
			.iter()
			.copied()
			.filter(|&key| self.node(key) == VisualState::Dimmed)
			.collect()
	}

	pub fn node(&self, key: NodeKey) -> VisualState {
		if !self.active {
			VisualState::Neutral
		} else if self.emphasized.contains(&key) {
			VisualState::Emphasized
		} else if self.connected.contains(&key) {
			VisualState::Connected
		} else {
			VisualState::Dimmed
		}
	}

	pub fn label(&self, key: NodeKey) -> VisualState {
		self.node(key)
	}

	pub fn edge(&self, link: &Link) -> EdgeState {
		if !self.active {
			EdgeState::Neutral
		} else if self.emphasized.contains(&link.source) || self.emphasized.contains(&link.target) {
			EdgeState::Opaque
		} else if self.connected.contains(&link.source) && self.connected.contains(&link.target) {
			EdgeState::Faded
		} else {
			EdgeState::Dimmed
		}
	}
}

/// Case-insensitive substring search over id and path of displayed nodes.
/// A query of only whitespace yields the neutral classification; otherwise
/// the query is matched as typed, surrounding spaces included.
pub fn search(store: &NodeStore, graph: &DisplayedGraph, query: &str) -> Classification {
	if query.trim().is_empty() {
		return Classification::neutral();
	}
	let needle = query.to_lowercase();
	let matches = graph
		.nodes
		.iter()
		.copied()
		.filter(|&key| store.get(key).matches(&needle))
		.collect();
	Classification::around(graph, matches)
}

pub fn hover(graph: &DisplayedGraph, key: NodeKey) -> Classification {
	Classification::around(graph, HashSet::from([key]))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Neutral,
	Hovering,
	Searching,
	HoveringWhileSearching,
}

#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	query: String,
	hover: Option<NodeKey>,
	search: Classification,
	current: Classification,
}

impl InteractionState {
	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn hovered(&self) -> Option<NodeKey> {
		self.hover
	}

	pub fn phase(&self) -> Phase {
		match (self.hover.is_some(), self.search.is_active()) {
			(false, false) => Phase::Neutral,
			(true, false) => Phase::Hovering,
			(false, true) => Phase::Searching,
			(true, true) => Phase::HoveringWhileSearching,
		}
	}

	pub fn classification(&self) -> &Classification {
		&self.current
	}

	pub fn set_query(&mut self, query: &str, store: &NodeStore, graph: &DisplayedGraph) {
		self.query = query.to_string();
		self.search = search(store, graph, &self.query);
		self.recompute(graph);
	}

	/// Returns whether the hovered node changed.
	pub fn set_hover(&mut self, key: Option<NodeKey>, graph: &DisplayedGraph) -> bool {
		let key = key.filter(|&k| graph.contains(k));
		if self.hover == key {
			return false;
		}
		self.hover = key;
		self.recompute(graph);
		true
	}

	pub fn clear_hover(&mut self) {
		self.hover = None;
		self.current = self.search.clone();
	}

	/// Re-derives everything against a new displayed graph, keeping the
	/// query. A hovered node that is no longer displayed is dropped.
	pub fn refresh(&mut self, store: &NodeStore, graph: &DisplayedGraph) {
		self.hover = self.hover.filter(|&k| graph.contains(k));
		self.search = search(store, graph, &self.query);
		self.recompute(graph);
	}

	fn recompute(&mut self, graph: &DisplayedGraph) {
		self.current = match self.hover {
			Some(key) => hover(graph, key),
			None => self.search.clone(),
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::dep_graph::filter::Filter;
	use crate::components::dep_graph::fixtures::{chain, document};
	use crate::components::dep_graph::types::Category;

	fn setup() -> (NodeStore, DisplayedGraph) {
		let store = NodeStore::from_document(&chain());
		let graph = DisplayedGraph::filtered(&store, Filter::All);
		(store, graph)
	}

	fn keys(store: &NodeStore, ids: &[&str]) -> HashSet<NodeKey> {
		ids.iter().map(|id| store.key(id).unwrap()).collect()
	}

	#[test]
	fn search_dep_emphasizes_both_deps_and_connects_main() {
		let (store, graph) = setup();
		let c = search(&store, &graph, "dep");
		assert_eq!(c.emphasized(), &keys(&store, &["dep1", "dep2"]));
		assert_eq!(c.connected(), &keys(&store, &["main"]));
		assert!(c.dimmed(&graph).is_empty());
	}

	#[test]
	fn search_is_case_insensitive() {
		let (store, graph) = setup();
		assert_eq!(search(&store, &graph, "MAIN").emphasized(), &keys(&store, &["main"]));
	}

	#[test]
	fn surrounding_spaces_are_part_of_the_query() {
		let (store, graph) = setup();
		assert!(!search(&store, &graph, "   ").is_active());

		let c = search(&store, &graph, "dep1 ");
		assert!(c.is_active());
		assert!(c.emphasized().is_empty());
		assert_eq!(c.dimmed(&graph).len(), 3);
	}

	#[test]
	fn connected_is_only_one_hop() {
		let (store, graph) = setup();
		let c = search(&store, &graph, "main");
		assert_eq!(c.connected(), &keys(&store, &["dep1"]));
		assert_eq!(c.dimmed(&graph), keys(&store, &["dep2"]));
		let dep2 = store.key("dep2").unwrap();
		assert_eq!(c.node(dep2), VisualState::Dimmed);
		assert_eq!(c.label(dep2), VisualState::Dimmed);
	}

	#[test]
	fn edges_are_classified_by_endpoints() {
		// a -> b -> c -> d, search "b": a and c connected, d dimmed.
		let store = NodeStore::from_document(&document(
			&[
				("a", Category::Main),
				("b", Category::Direct),
				("c", Category::Indirect),
				("d", Category::Indirect),
				("e", Category::Indirect),
			],
			&[("a", "b"), ("b", "c"), ("c", "d"), ("a", "e"), ("e", "c")],
		));
		let graph = DisplayedGraph::filtered(&store, Filter::All);
		let c = search(&store, &graph, "b");
		let link = |s: &str, t: &str| Link {
			source: store.key(s).unwrap(),
			target: store.key(t).unwrap(),
		};
		assert_eq!(c.edge(&link("a", "b")), EdgeState::Opaque);
		assert_eq!(c.edge(&link("b", "c")), EdgeState::Opaque);
		assert_eq!(c.edge(&link("c", "d")), EdgeState::Dimmed);
		assert_eq!(c.edge(&link("a", "e")), EdgeState::Dimmed);
		// Both ends connected, neither emphasized.
		assert_eq!(
			Classification::around(&graph, keys(&store, &["b"])).edge(&Link {
				source: store.key("a").unwrap(),
				target: store.key("c").unwrap(),
			}),
			EdgeState::Faded
		);
	}

	#[test]
	fn repeated_search_is_idempotent() {
		let (store, graph) = setup();
		let mut state = InteractionState::default();
		state.set_query("dep", &store, &graph);
		let first = state.classification().clone();
		state.set_query("dep", &store, &graph);
		assert_eq!(state.classification(), &first);
		state.refresh(&store, &graph);
		assert_eq!(state.classification(), &first);
	}

	#[test]
	fn clearing_query_restores_neutral() {
		let (store, graph) = setup();
		let mut state = InteractionState::default();
		state.set_query("dep1", &store, &graph);
		assert_eq!(state.phase(), Phase::Searching);
		state.set_query("", &store, &graph);
		assert_eq!(state.phase(), Phase::Neutral);
		let c = state.classification();
		for &key in &graph.nodes {
			assert_eq!(c.node(key), VisualState::Neutral);
			assert_eq!(c.label(key).opacity(), 1.0);
		}
		for link in &graph.links {
			assert_eq!(c.edge(link), EdgeState::Neutral);
		}
	}

	#[test]
	fn hover_takes_precedence_then_reverts_to_search() {
		let (store, graph) = setup();
		let (main, dep1, dep2) = (
			store.key("main").unwrap(),
			store.key("dep1").unwrap(),
			store.key("dep2").unwrap(),
		);
		let mut state = InteractionState::default();
		state.set_query("main", &store, &graph);

		assert!(state.set_hover(Some(dep2), &graph));
		assert_eq!(state.phase(), Phase::HoveringWhileSearching);
		let c = state.classification();
		assert_eq!(c.node(dep2), VisualState::Emphasized);
		assert_eq!(c.node(dep1), VisualState::Connected);
		assert_eq!(c.node(main), VisualState::Dimmed);

		assert!(!state.set_hover(Some(dep2), &graph));
		assert!(state.set_hover(None, &graph));
		assert_eq!(state.classification().node(main), VisualState::Emphasized);

		state.set_query("", &store, &graph);
		state.set_hover(Some(main), &graph);
		state.set_hover(None, &graph);
		assert_eq!(state.phase(), Phase::Neutral);
		assert!(!state.classification().is_active());
	}

	#[test]
	fn refresh_drops_hover_on_filtered_out_node() {
		let (store, graph) = setup();
		let dep1 = store.key("dep1").unwrap();
		let mut state = InteractionState::default();
		state.set_hover(Some(dep1), &graph);

		let indirect = DisplayedGraph::filtered(&store, Filter::Indirect);
		state.refresh(&store, &indirect);
		assert_eq!(state.hovered(), None);
		assert_eq!(state.phase(), Phase::Neutral);
	}
}
