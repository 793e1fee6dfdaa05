//! Graph data sources: the JSON endpoint, or JSON embedded in the page.

use log::{info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlScriptElement, Response};

use crate::components::dep_graph::{GraphDocument, GraphError};

fn js_error(value: JsValue) -> GraphError {
	GraphError::Fetch(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// GET the graph document from `url`.
pub async fn fetch_graph(url: &str) -> Result<GraphDocument, GraphError> {
	let window = web_sys::window().ok_or_else(|| GraphError::Fetch("no window".into()))?;
	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(js_error)?;
	let response: Response = response.dyn_into().map_err(js_error)?;
	if !response.ok() {
		return Err(GraphError::Fetch(format!(
			"{url} returned HTTP {}",
			response.status()
		)));
	}
	let body = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?;
	let text = body
		.as_string()
		.ok_or_else(|| GraphError::Fetch("response body is not text".into()))?;
	let doc = GraphDocument::from_json(&text)?;
	info!(
		"fetched {}: {} nodes, {} edges",
		url,
		doc.nodes.len(),
		doc.edges.len()
	);
	Ok(doc)
}

/// JSON from a `<script id="...">` element, if present and well-formed.
pub fn load_embedded<T: DeserializeOwned>(id: &str) -> Option<T> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => {
			info!("loaded embedded #{id}");
			Some(value)
		}
		Err(e) => {
			warn!("failed to parse embedded #{id}: {e}");
			None
		}
	}
}
