//! Builds a [`GraphDocument`] from the output of `go list -m -json all`
//! and `go mod graph`.

use serde::Deserialize;

use super::error::GraphError;
use super::types::{GraphDocument, ModuleInfo};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ListedModule {
	path: String,
	version: String,
	main: bool,
	indirect: bool,
	dir: String,
	go_mod: String,
	replace: Option<Box<ListedModule>>,
}

impl ListedModule {
	fn id(&self) -> String {
		if self.version.is_empty() {
			self.path.clone()
		} else {
			format!("{}@{}", self.path, self.version)
		}
	}

	fn into_info(self) -> ModuleInfo {
		ModuleInfo {
			direct: !self.indirect && !self.main,
			path: self.path,
			version: self.version,
			main: self.main,
			dir: self.dir,
			gomod: self.go_mod,
			replace: self.replace.map(|r| Box::new(r.into_info())),
		}
	}
}

/// Builds a document from raw go tooling output, for hosts that collect the
/// listing themselves and embed or serve the result.
///
/// `modules` is the concatenated JSON object stream, `graph` the
/// whitespace-separated `parent child` lines.
pub fn from_go_listing(modules: &str, graph: &str) -> Result<GraphDocument, GraphError> {
	let mut doc = GraphDocument::default();

	let stream = serde_json::Deserializer::from_str(modules).into_iter::<ListedModule>();
	for record in stream {
		let module = record.map_err(|source| GraphError::Listing {
			line: source.line(),
			source,
		})?;
		doc.nodes.insert(module.id(), module.into_info());
	}

	for line in graph.lines() {
		let mut fields = line.split_whitespace();
		if let (Some(parent), Some(child), None) = (fields.next(), fields.next(), fields.next()) {
			doc.edges.push([parent.to_string(), child.to_string()]);
		}
	}

	log::info!(
		"module listing: {} modules, {} edges",
		doc.nodes.len(),
		doc.edges.len()
	);
	Ok(doc)
}
