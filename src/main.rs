//! Browser entry point for the dependency graph viewer.

use dep_graph_canvas::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App)
}
