use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::api::{fetch_graph, load_embedded};
use crate::components::dep_graph::{DepGraphCanvas, Filter, GraphDocument, GraphViewConfig};

/// Dependency graph page: layout toggle, filter, search and the canvas.
#[component]
pub fn Home() -> impl IntoView {
	let config = load_embedded::<GraphViewConfig>("graph-config").unwrap_or_default();
	let (document, set_document) = signal(None::<Result<GraphDocument, String>>);
	let (hierarchical, set_hierarchical) = signal(false);
	let (filter, set_filter) = signal(Filter::All);
	let (query, set_query) = signal(String::new());

	match load_embedded::<GraphDocument>("graph-data") {
		Some(doc) => set_document.set(Some(Ok(doc))),
		None => {
			let endpoint = config.endpoint.clone();
			spawn_local(async move {
				let result = fetch_graph(&endpoint).await.map_err(|e| {
					warn!("{e}");
					e.to_string()
				});
				set_document.set(Some(result));
			});
		}
	}

	let graph = Signal::derive(move || {
		document
			.get()
			.and_then(Result::ok)
			.unwrap_or_default()
	});

	view! {
		<div class="fullscreen-graph">
			<div class="graph-controls">
				<button on:click=move |_| set_hierarchical.update(|h| *h = !*h)>
					{move || {
						if hierarchical.get() { "Force layout" } else { "Hierarchical layout" }
					}}
				</button>
				<select on:change=move |ev| {
					if let Some(f) = Filter::from_name(&event_target_value(&ev)) {
						set_filter.set(f);
					}
				}>
					<option value={Filter::All.name()}>"All modules"</option>
					<option value={Filter::Direct.name()}>"Direct dependencies"</option>
					<option value={Filter::Indirect.name()}>"Indirect dependencies"</option>
				</select>
				<input
					type="search"
					placeholder="Search modules"
					on:input=move |ev| set_query.set(event_target_value(&ev))
				/>
			</div>
			{move || match document.get() {
				None => {
					view! { <p class="graph-status">"Loading dependency graph..."</p> }.into_any()
				}
				Some(Err(message)) => {
					view! { <p class="graph-error">"Error: " {message}</p> }.into_any()
				}
				Some(Ok(_)) => {
					view! {
						<DepGraphCanvas
							data=graph
							hierarchical=hierarchical
							filter=filter
							query=query
							config=config.clone()
							fullscreen=true
						/>
					}
						.into_any()
				}
			}}
		</div>
	}
}
