use thiserror::Error;

/// Failures while loading or laying out a graph.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The document request failed or returned a non-success status.
	#[error("failed to fetch graph: {0}")]
	Fetch(String),
	/// The document is not valid graph JSON.
	#[error("malformed graph document: {0}")]
	Parse(#[from] serde_json::Error),
	/// A module record in a go listing could not be decoded.
	#[error("malformed module record on line {line}: {source}")]
	Listing {
		/// Line of the listing the bad record starts on.
		line: usize,
		/// Decoder error.
		#[source]
		source: serde_json::Error,
	},
	/// The layout area has no usable size.
	#[error("invalid viewport {width}x{height}")]
	InvalidViewport {
		/// Requested width.
		width: f64,
		/// Requested height.
		height: f64,
	},
}
