use super::types::{Category, GraphDocument, ModuleInfo};

/// Document with the given `(id, category)` nodes and `(source, target)` edges.
pub fn document(nodes: &[(&str, Category)], edges: &[(&str, &str)]) -> GraphDocument {
	let mut doc = GraphDocument::default();
	for &(id, category) in nodes {
		doc.nodes.insert(
			id.to_string(),
			ModuleInfo {
				path: id.to_string(),
				main: category == Category::Main,
				direct: category == Category::Direct,
				..Default::default()
			},
		);
	}
	doc.edges = edges
		.iter()
		.map(|(s, t)| [s.to_string(), t.to_string()])
		.collect();
	doc
}

/// `main -> dep1 -> dep2`.
pub fn chain() -> GraphDocument {
	document(
		&[
			("main", Category::Main),
			("dep1", Category::Direct),
			("dep2", Category::Indirect),
		],
		&[("main", "dep1"), ("dep1", "dep2")],
	)
}
