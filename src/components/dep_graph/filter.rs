use std::collections::HashSet;

use super::store::{Link, NodeKey, NodeStore};
use super::types::Category;

/// Node category filter applied before layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Filter {
	/// Every module.
	#[default]
	All,
	/// Main module and its direct requirements.
	Direct,
	/// Modules only required transitively.
	Indirect,
}

impl Filter {
	/// Parses the value used by the filter control.
	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"all" => Some(Self::All),
			"direct" => Some(Self::Direct),
			"indirect" => Some(Self::Indirect),
			_ => None,
		}
	}

	/// Inverse of [`Filter::from_name`].
	pub fn name(self) -> &'static str {
		match self {
			Self::All => "all",
			Self::Direct => "direct",
			Self::Indirect => "indirect",
		}
	}

	/// Whether a module of `category` is displayed.
	pub fn keeps(self, category: Category) -> bool {
		match self {
			Self::All => true,
			Self::Direct => matches!(category, Category::Main | Category::Direct),
			Self::Indirect => category == Category::Indirect,
		}
	}
}

/// The subset of the store currently on screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayedGraph {
	pub nodes: Vec<NodeKey>,
	pub links: Vec<Link>,
}

impl DisplayedGraph {
	/// Keeps nodes passing `filter` and only the links whose endpoints both
	/// survive.
	pub fn filtered(store: &NodeStore, filter: Filter) -> Self {
		let nodes: Vec<NodeKey> = store
			.keys()
			.filter(|&key| filter.keeps(store.get(key).category()))
			.collect();
		let kept: HashSet<NodeKey> = nodes.iter().copied().collect();
		let links = store
			.links()
			.iter()
			.filter(|link| kept.contains(&link.source) && kept.contains(&link.target))
			.copied()
			.collect();
		Self { nodes, links }
	}

	pub fn contains(&self, key: NodeKey) -> bool {
		self.nodes.contains(&key)
	}

	/// One-hop neighbours of `key` in either direction.
	pub fn neighbors(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
		self.links.iter().filter_map(move |link| {
			if link.source == key {
				Some(link.target)
			} else if link.target == key {
				Some(link.source)
			} else {
				None
			}
		})
	}
}
