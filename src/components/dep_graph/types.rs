//! Graph document as served by the dependency endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::GraphError;

/// One module record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModuleInfo {
	/// Module path, used as the display name.
	pub path: String,
	/// Resolved version, empty for the main module.
	pub version: String,
	/// Required directly by the main module.
	pub direct: bool,
	/// The main module itself.
	pub main: bool,
	/// Module source directory.
	pub dir: String,
	/// Location of the module file.
	pub gomod: String,
	/// Replacement target, when the module is replaced.
	#[serde(rename = "Replace", skip_serializing_if = "Option::is_none")]
	pub replace: Option<Box<ModuleInfo>>,
}

/// Display category of a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
	/// The main module.
	Main,
	/// A direct requirement of the main module.
	Direct,
	/// Everything else.
	Indirect,
}

impl ModuleInfo {
	/// Main takes precedence over direct.
	pub fn category(&self) -> Category {
		if self.main {
			Category::Main
		} else if self.direct {
			Category::Direct
		} else {
			Category::Indirect
		}
	}
}

/// Complete graph document: modules keyed by id, and `[parent, child]` edges.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphDocument {
	/// Modules keyed by their `path@version` id.
	pub nodes: BTreeMap<String, ModuleInfo>,
	/// `[source, target]` id pairs. Pairs naming unknown ids are ignored.
	pub edges: Vec<[String; 2]>,
}

impl GraphDocument {
	/// Parses the document served by the graph endpoint.
	pub fn from_json(text: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Serializes in the form [`GraphDocument::from_json`] reads, for hosts
	/// that embed the document in a `graph-data` script element.
	pub fn to_json(&self) -> Result<String, GraphError> {
		Ok(serde_json::to_string(self)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_document_with_replace_and_missing_fields() {
		let doc = GraphDocument::from_json(
			r#"{
				"nodes": {
					"example.com/app": {"path": "example.com/app", "main": true},
					"example.com/pkg@v1.0.0": {
						"path": "example.com/pkg",
						"version": "v1.0.0",
						"direct": true,
						"dir": "/mod/pkg",
						"gomod": "/mod/pkg/go.mod",
						"Replace": {"path": "example.com/pkg-fork", "version": "v1.0.1"}
					}
				},
				"edges": [["example.com/app", "example.com/pkg@v1.0.0"]]
			}"#,
		)
		.unwrap();

		assert_eq!(doc.nodes.len(), 2);
		assert_eq!(doc.edges.len(), 1);
		let pkg = &doc.nodes["example.com/pkg@v1.0.0"];
		assert_eq!(pkg.category(), Category::Direct);
		assert_eq!(pkg.replace.as_ref().unwrap().path, "example.com/pkg-fork");
		assert_eq!(doc.nodes["example.com/app"].category(), Category::Main);
	}

	#[test]
	fn empty_object_is_an_empty_graph() {
		let doc = GraphDocument::from_json("{}").unwrap();
		assert!(doc.nodes.is_empty());
		assert!(doc.edges.is_empty());
	}

	#[test]
	fn malformed_document_is_a_parse_error() {
		let err = GraphDocument::from_json(r#"{"edges": [["a"]]}"#).unwrap_err();
		assert!(matches!(err, GraphError::Parse(_)));
	}

	#[test]
	fn serialized_document_reads_back() {
		let mut doc = GraphDocument::default();
		doc.nodes.insert(
			"dep@v0.1.0".into(),
			ModuleInfo {
				path: "dep".into(),
				version: "v0.1.0".into(),
				..Default::default()
			},
		);
		let text = doc.to_json().unwrap();
		assert!(!text.contains("Replace"));
		assert_eq!(GraphDocument::from_json(&text).unwrap(), doc);
	}
}
