//! Orchestration state: the single owner of the graph, the active filter and
//! layout, and the interaction overlays. Every input change goes through
//! here and re-derives what depends on it.

use super::config::GraphViewConfig;
use super::debounce::{Debouncer, Ticket};
use super::error::GraphError;
use super::filter::{DisplayedGraph, Filter};
use super::highlight::{EdgeState, InteractionState, VisualState};
use super::layout::{EdgeGeometry, LayoutEpoch, LayoutMode, LayoutStrategy};
use super::store::{NodeKey, NodeStore, Point};
use super::surface::{SurfaceFrame, Viewport};
use super::types::{Category, GraphDocument};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	Advanced,
	/// The simulation has cooled; no further ticks are needed.
	Settled,
	/// The tick was scheduled for a layout that has since been replaced.
	Stale,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawnNode {
	pub key: NodeKey,
	pub at: Point,
	pub label: String,
	pub category: Category,
	pub state: VisualState,
	pub label_state: VisualState,
	pub hovered: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawnEdge {
	pub geometry: EdgeGeometry,
	pub state: EdgeState,
}

/// Everything needed to draw one frame, in content coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	pub surface: SurfaceFrame,
	pub nodes: Vec<DrawnNode>,
	pub edges: Vec<DrawnEdge>,
}

/// Owns the graph and every derived view of it. All inputs go through its
/// methods; each one re-derives what depends on it.
pub struct DepGraphState {
	config: GraphViewConfig,
	store: NodeStore,
	mode: LayoutMode,
	filter: Filter,
	viewport: Viewport,
	displayed: DisplayedGraph,
	layout: Option<LayoutStrategy>,
	epoch: LayoutEpoch,
	interaction: InteractionState,
	surface: SurfaceFrame,
	resize: Debouncer,
	frame_loop: Option<LayoutEpoch>,
	last_error: Option<String>,
}

impl DepGraphState {
	/// Loads `document`. Nothing is laid out until the first render.
	pub fn new(document: &GraphDocument, config: GraphViewConfig, viewport: Viewport) -> Self {
		let mut state = Self {
			config,
			store: NodeStore::default(),
			mode: LayoutMode::default(),
			filter: Filter::default(),
			viewport,
			displayed: DisplayedGraph::default(),
			layout: None,
			epoch: LayoutEpoch::default(),
			interaction: InteractionState::default(),
			surface: SurfaceFrame::empty(viewport),
			resize: Debouncer::default(),
			frame_loop: None,
			last_error: None,
		};
		state.set_document(document);
		state
	}

	/// Replaces the raw graph. Takes effect on the next render.
	pub fn set_document(&mut self, document: &GraphDocument) {
		self.store = NodeStore::from_document(document);
		self.displayed = DisplayedGraph::default();
		self.layout = None;
		self.interaction.clear_hover();
		log::info!(
			"graph loaded: {} modules, {} edges",
			self.store.len(),
			self.store.links().len()
		);
	}

	/// Records layout mode and filter without rendering.
	pub fn select(&mut self, mode: LayoutMode, filter: Filter) {
		self.mode = mode;
		self.filter = filter;
	}

	/// Records the viewport without rendering.
	pub fn set_viewport(&mut self, viewport: Viewport) {
		self.viewport = viewport;
	}

	/// Full re-render from a document; prior rendered state is discarded.
	pub fn render_graph(
		&mut self,
		document: &GraphDocument,
		hierarchical: bool,
	) -> Result<LayoutEpoch, GraphError> {
		self.set_document(document);
		self.mode = LayoutMode::from_hierarchical(hierarchical);
		self.render()
	}

	/// Filter, layout, surface and interaction, from the current inputs.
	/// Failures are logged and kept for display, then returned.
	pub fn render(&mut self) -> Result<LayoutEpoch, GraphError> {
		match self.rebuild() {
			Ok(epoch) => {
				self.last_error = None;
				Ok(epoch)
			}
			Err(err) => {
				log::error!("render failed: {err}");
				self.last_error = Some(err.to_string());
				Err(err)
			}
		}
	}

	fn rebuild(&mut self) -> Result<LayoutEpoch, GraphError> {
		self.epoch = self.epoch.next();
		self.layout = None;
		self.frame_loop = None;
		self.displayed = DisplayedGraph::filtered(&self.store, self.filter);

		let layout = LayoutStrategy::build(
			self.mode,
			self.epoch,
			&mut self.store,
			&self.displayed,
			self.viewport,
			&self.config,
		)?;
		self.layout = Some(layout);
		self.update_surface();
		self.interaction.refresh(&self.store, &self.displayed);
		Ok(self.epoch)
	}

	/// Switches layout mode and re-renders.
	pub fn set_mode(&mut self, mode: LayoutMode) -> Result<LayoutEpoch, GraphError> {
		self.mode = mode;
		self.render()
	}

	/// Switches the category filter and re-renders.
	pub fn set_filter(&mut self, filter: Filter) -> Result<LayoutEpoch, GraphError> {
		self.filter = filter;
		self.render()
	}

	/// Call on every resize event; arm a timer and pass the ticket to
	/// [`Self::resize`] when it expires.
	pub fn schedule_resize(&mut self) -> Ticket {
		self.resize.schedule()
	}

	/// Re-lays out at the new size unless a later resize superseded `ticket`.
	pub fn resize(
		&mut self,
		ticket: Ticket,
		viewport: Viewport,
	) -> Result<Option<LayoutEpoch>, GraphError> {
		if !self.resize.fire(ticket) {
			return Ok(None);
		}
		self.viewport = viewport;
		self.render().map(Some)
	}

	/// Re-runs search over the displayed graph.
	pub fn set_query(&mut self, query: &str) {
		self.interaction
			.set_query(query, &self.store, &self.displayed);
	}

	/// Returns whether the hovered node changed.
	pub fn set_hover(&mut self, key: Option<NodeKey>) -> bool {
		self.interaction.set_hover(key, &self.displayed)
	}

	/// Topmost displayed node within the hit radius of a surface position.
	pub fn node_at(&self, surface: Point) -> Option<NodeKey> {
		let at = self.surface.to_content(surface);
		self.displayed
			.nodes
			.iter()
			.rev()
			.copied()
			.filter_map(|key| Some((key, self.store.position(key)?.distance(at))))
			.filter(|&(_, d)| d < self.config.hit_radius)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(key, _)| key)
	}

	/// Pins `key` under the pointer and keeps the layout warm.
	pub fn begin_drag(&mut self, key: NodeKey, surface: Point) {
		let at = self.surface.to_content(surface);
		if let Some(layout) = self.layout.as_mut() {
			layout.begin_drag(&mut self.store, key, at);
		}
	}

	/// Moves the dragged node to a surface position.
	pub fn drag_to(&mut self, surface: Point) {
		let at = self.surface.to_content(surface);
		if let Some(layout) = self.layout.as_mut() {
			layout.drag_to(&mut self.store, at);
		}
	}

	/// Releases the dragged node, if any.
	pub fn end_drag(&mut self) {
		if let Some(layout) = self.layout.as_mut() {
			layout.end_drag(&mut self.store);
		}
	}

	/// Node currently being dragged.
	pub fn dragging(&self) -> Option<NodeKey> {
		self.layout.as_ref().and_then(LayoutStrategy::dragging)
	}

	/// Advances the layout identified by `epoch` by one step.
	pub fn tick(&mut self, epoch: LayoutEpoch) -> TickOutcome {
		let Some(layout) = self.layout.as_mut().filter(|l| l.epoch() == epoch) else {
			log::debug!("dropping stale tick for layout #{}", epoch.0);
			return TickOutcome::Stale;
		};
		if layout.step(&mut self.store) {
			self.update_surface();
			TickOutcome::Advanced
		} else {
			if self.frame_loop == Some(epoch) {
				self.frame_loop = None;
			}
			TickOutcome::Settled
		}
	}

	/// Marks a frame loop as running for `epoch`. False when one already
	/// runs, when `epoch` is stale, or when the layout has nothing to do.
	pub fn claim_frame_loop(&mut self, epoch: LayoutEpoch) -> bool {
		let runnable = self
			.layout
			.as_ref()
			.is_some_and(|l| l.epoch() == epoch && l.is_running());
		if !runnable || self.frame_loop == Some(epoch) {
			return false;
		}
		self.frame_loop = Some(epoch);
		true
	}

	/// Snapshot of what to draw for the current state.
	pub fn frame(&self) -> Frame {
		let classification = self.interaction.classification();
		let hovered = self.interaction.hovered();
		let nodes = self
			.displayed
			.nodes
			.iter()
			.filter_map(|&key| {
				let node = self.store.get(key);
				Some(DrawnNode {
					key,
					at: node.position?,
					label: node.info.path.clone(),
					category: node.category(),
					state: classification.node(key),
					label_state: classification.label(key),
					hovered: hovered == Some(key),
				})
			})
			.collect();
		let edges = self
			.displayed
			.links
			.iter()
			.filter_map(|link| {
				let layout = self.layout.as_ref()?;
				let from = self.store.position(link.source)?;
				let to = self.store.position(link.target)?;
				Some(DrawnEdge {
					geometry: layout.edge_geometry(from, to),
					state: classification.edge(link),
				})
			})
			.collect();
		Frame {
			surface: self.surface,
			nodes,
			edges,
		}
	}

	fn update_surface(&mut self) {
		let points = self
			.displayed
			.nodes
			.iter()
			.filter_map(|&key| self.store.position(key));
		self.surface = SurfaceFrame::fit(points, self.viewport, self.config.padding);
	}

	/// Active tunables.
	pub fn config(&self) -> &GraphViewConfig {
		&self.config
	}

	/// Every loaded node, displayed or not.
	pub fn store(&self) -> &NodeStore {
		&self.store
	}

	/// Nodes and links passing the current filter.
	pub fn displayed(&self) -> &DisplayedGraph {
		&self.displayed
	}

	/// Layout of the last successful render.
	pub fn layout(&self) -> Option<&LayoutStrategy> {
		self.layout.as_ref()
	}

	/// Hover and search state.
	pub fn interaction(&self) -> &InteractionState {
		&self.interaction
	}

	/// Current surface size and translation.
	pub fn surface(&self) -> SurfaceFrame {
		self.surface
	}

	/// Epoch of the most recent render attempt.
	pub fn epoch(&self) -> LayoutEpoch {
		self.epoch
	}

	/// Selected layout mode.
	pub fn mode(&self) -> LayoutMode {
		self.mode
	}

	/// Selected category filter.
	pub fn filter(&self) -> Filter {
		self.filter
	}

	/// Message of the last failed render, cleared by a successful one.
	pub fn last_error(&self) -> Option<&str> {
		self.last_error.as_deref()
	}
}
