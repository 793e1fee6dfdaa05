//! Indexed node store. Every module lives here exactly once; links and
//! layout state refer to nodes by [`NodeKey`].

use std::collections::HashMap;

use super::types::{Category, GraphDocument, ModuleInfo};

/// Index of a node in its [`NodeStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub usize);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Positioning rule for a single node, owned by the active layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LayoutState {
	#[default]
	Free,
	Pinned(Point),
}

#[derive(Clone, Debug)]
pub struct Node {
	pub id: String,
	pub info: ModuleInfo,
	pub position: Option<Point>,
	pub layout: LayoutState,
}

impl Node {
	pub fn category(&self) -> Category {
		self.info.category()
	}

	/// Case-insensitive substring match against id and path.
	/// `needle` must already be lowercase.
	pub fn matches(&self, needle: &str) -> bool {
		self.id.to_lowercase().contains(needle) || self.info.path.to_lowercase().contains(needle)
	}
}

/// A resolved edge. Both endpoints are keys into the same store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Link {
	pub source: NodeKey,
	pub target: NodeKey,
}

impl Link {
	pub fn touches(&self, key: NodeKey) -> bool {
		self.source == key || self.target == key
	}
}

#[derive(Clone, Debug, Default)]
pub struct NodeStore {
	nodes: Vec<Node>,
	by_id: HashMap<String, NodeKey>,
	links: Vec<Link>,
}

impl NodeStore {
	/// Builds the store from a document. Edges naming an unknown node are
	/// excluded.
	pub fn from_document(doc: &GraphDocument) -> Self {
		let mut store = Self::default();
		for (id, info) in &doc.nodes {
			let key = NodeKey(store.nodes.len());
			store.nodes.push(Node {
				id: id.clone(),
				info: info.clone(),
				position: None,
				layout: LayoutState::Free,
			});
			store.by_id.insert(id.clone(), key);
		}

		for [source, target] in &doc.edges {
			match (store.by_id.get(source), store.by_id.get(target)) {
				(Some(&source), Some(&target)) => store.links.push(Link { source, target }),
				_ => log::debug!("dropping edge {source} -> {target}: unknown endpoint"),
			}
		}
		store
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn key(&self, id: &str) -> Option<NodeKey> {
		self.by_id.get(id).copied()
	}

	pub fn get(&self, key: NodeKey) -> &Node {
		&self.nodes[key.0]
	}

	pub fn get_mut(&mut self, key: NodeKey) -> &mut Node {
		&mut self.nodes[key.0]
	}

	pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
		(0..self.nodes.len()).map(NodeKey)
	}

	/// All resolved edges of the document.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn position(&self, key: NodeKey) -> Option<Point> {
		self.nodes[key.0].position
	}

	/// Clears everything a layout strategy has written.
	pub fn reset_layout(&mut self) {
		for node in &mut self.nodes {
			node.position = None;
			node.layout = LayoutState::Free;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::dep_graph::fixtures::document;

	fn doc(ids: &[&str], edges: &[(&str, &str)]) -> GraphDocument {
		let nodes: Vec<(&str, Category)> = ids.iter().map(|&id| (id, Category::Indirect)).collect();
		document(&nodes, edges)
	}

	#[test]
	fn edges_to_unknown_nodes_are_excluded() {
		let store = NodeStore::from_document(&doc(&["a", "b"], &[("a", "b"), ("a", "ghost")]));
		assert_eq!(store.len(), 2);
		assert_eq!(
			store.links(),
			&[Link {
				source: store.key("a").unwrap(),
				target: store.key("b").unwrap(),
			}]
		);
	}

	#[test]
	fn reset_clears_positions_and_pins() {
		let mut store = NodeStore::from_document(&doc(&["a"], &[]));
		let a = store.key("a").unwrap();
		store.get_mut(a).position = Some(Point::new(1.0, 2.0));
		store.get_mut(a).layout = LayoutState::Pinned(Point::new(1.0, 2.0));

		store.reset_layout();

		assert_eq!(store.position(a), None);
		assert_eq!(store.get(a).layout, LayoutState::Free);
	}

	#[test]
	fn match_is_case_insensitive_on_id_and_path() {
		let mut store = NodeStore::from_document(&doc(&["github.com/Foo/Bar@v1"], &[]));
		let key = store.key("github.com/Foo/Bar@v1").unwrap();
		assert!(store.get(key).matches("foo/bar"));
		assert!(store.get(key).matches("@v1"));

		store.get_mut(key).info.path = "Display".into();
		assert!(store.get(key).matches("display"));
		assert!(!store.get(key).matches("zzz"));
	}
}
