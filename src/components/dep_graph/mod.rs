//! Interactive dependency graph.
//!
//! Renders a module dependency graph on an HTML canvas with:
//! - Force-directed or layered (hierarchical) positioning
//! - Category filtering (all / direct / indirect modules)
//! - Search and hover highlighting of a node and its direct neighbours
//! - Node dragging and a surface that grows to keep every node visible
//!
//! Everything except [`DepGraphCanvas`] and the canvas drawing is plain Rust
//! and runs without a browser.

mod component;
mod config;
mod debounce;
mod error;
mod filter;
mod highlight;
mod layering;
mod layout;
mod listing;
mod render;
mod simulation;
mod state;
mod store;
mod surface;
mod types;

#[cfg(test)]
mod fixtures;

pub use component::DepGraphCanvas;
pub use config::GraphViewConfig;
pub use error::GraphError;
pub use filter::Filter;
pub use layout::LayoutMode;
pub use listing::from_go_listing;
pub use state::DepGraphState;
pub use types::{Category, GraphDocument, ModuleInfo};
