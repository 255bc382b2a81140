//! Canonical accumulated graph plus the pagination state that feeds it.
//!
//! Fetching itself happens elsewhere: the store hands out a [`FetchTicket`]
//! describing the request and later receives the ticket back together with the
//! outcome. Each reset starts a new generation, and a response whose ticket
//! belongs to an older generation is dropped without touching any state.

use std::collections::{HashMap, HashSet};

use log::{debug, error, info, warn};

use super::filter::FilterConfig;
use super::index::GraphIndex;
use super::transform::{PageBatch, transform_page};
use super::types::{GraphData, GraphLink, GraphNode};
use crate::api::{FetchError, PageRequest, PageResponse};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchMode {
	/// Discard everything and rebuild from page 1.
	Reset,
	/// Union the next page into what is loaded.
	Append,
}

/// An issued request. Hand it back to [`GraphDataStore::apply`] with the result.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchTicket {
	generation: u64,
	mode: FetchMode,
	request: PageRequest,
}

impl FetchTicket {
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn mode(&self) -> FetchMode {
		self.mode
	}

	pub fn request(&self) -> &PageRequest {
		&self.request
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
	Committed(FetchMode),
	Failed,
	/// Superseded by a later reset; nothing changed.
	Stale,
}

#[derive(Debug, Default)]
pub struct GraphDataStore {
	nodes: Vec<GraphNode>,
	positions: HashMap<String, usize>,
	links: Vec<GraphLink>,
	/// Links waiting for an endpoint that has not been loaded yet.
	deferred: Vec<GraphLink>,
	index: GraphIndex,
	filters: FilterConfig,
	cursor: Option<String>,
	loading: bool,
	error: Option<FetchError>,
	generation: u64,
	revision: u64,
}

impl GraphDataStore {
	pub fn new(filters: FilterConfig) -> Self {
		Self {
			filters,
			..Self::default()
		}
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.positions.get(id).map(|&i| &self.nodes[i])
	}

	pub fn contains(&self, id: &str) -> bool {
		self.positions.contains_key(id)
	}

	pub fn index(&self) -> &GraphIndex {
		&self.index
	}

	pub fn filters(&self) -> &FilterConfig {
		&self.filters
	}

	pub fn cursor(&self) -> Option<&str> {
		self.cursor.as_deref()
	}

	pub fn has_more(&self) -> bool {
		self.cursor.is_some()
	}

	pub fn is_loading(&self) -> bool {
		self.loading
	}

	pub fn error(&self) -> Option<&FetchError> {
		self.error.as_ref()
	}

	/// Bumped on every committed merge.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	pub fn deferred_link_count(&self) -> usize {
		self.deferred.len()
	}

	pub fn snapshot(&self) -> GraphData {
		GraphData {
			nodes: self.nodes.clone(),
			links: self.links.clone(),
		}
	}

	/// Start over from page 1 with the current filters.
	pub fn refresh(&mut self) -> FetchTicket {
		self.reset_with(self.filters.clone())
	}

	/// Start over with new filters. An equivalent config is ignored. The store
	/// only adopts the filters once their first page commits, so a failed
	/// reset can be retried with the same input.
	pub fn set_filters(&mut self, filters: FilterConfig) -> Option<FetchTicket> {
		if filters == self.filters {
			return None;
		}
		Some(self.reset_with(filters))
	}

	fn reset_with(&mut self, filters: FilterConfig) -> FetchTicket {
		self.generation += 1;
		self.loading = true;
		info!(
			"loading page 1 (generation {}, limit {}, skip_ext [{}], skip_dir [{}])",
			self.generation,
			filters.batch_size(),
			filters.extensions_csv(),
			filters.directories_csv()
		);
		self.ticket(FetchMode::Reset, filters, None)
	}

	/// Request the next page, unless there is none, one is already in flight,
	/// or the last fetch failed.
	pub fn load_more(&mut self) -> Option<FetchTicket> {
		if self.loading || self.error.is_some() {
			return None;
		}
		let cursor = self.cursor.clone()?;
		self.loading = true;
		info!("loading next page (generation {})", self.generation);
		Some(self.ticket(FetchMode::Append, self.filters.clone(), Some(cursor)))
	}

	fn ticket(&self, mode: FetchMode, filters: FilterConfig, cursor: Option<String>) -> FetchTicket {
		FetchTicket {
			generation: self.generation,
			mode,
			request: PageRequest { filters, cursor },
		}
	}

	/// Fold a finished fetch into the store.
	pub fn apply(
		&mut self,
		ticket: FetchTicket,
		result: Result<PageResponse, FetchError>,
	) -> ApplyOutcome {
		if ticket.generation != self.generation {
			warn!(
				"discarding response for generation {} (current {})",
				ticket.generation, self.generation
			);
			return ApplyOutcome::Stale;
		}
		self.loading = false;

		let page = match result {
			Ok(page) => page,
			Err(err) => {
				error!("failed to fetch graph page: {err}");
				self.error = Some(err);
				return ApplyOutcome::Failed;
			}
		};

		let batch = transform_page(page.records());
		match ticket.mode {
			FetchMode::Reset => {
				self.merge_reset(batch);
				self.filters = ticket.request.filters.clone();
				self.error = None;
			}
			FetchMode::Append => self.merge_append(batch),
		}
		self.cursor = page.next_token().map(str::to_string);
		self.index = GraphIndex::build(&self.links);
		self.revision += 1;

		info!(
			"graph now has {} nodes and {} links (more pages: {})",
			self.nodes.len(),
			self.links.len(),
			self.has_more()
		);
		ApplyOutcome::Committed(ticket.mode)
	}

	/// Canonical state becomes exactly the batch: deduplicated by id with the
	/// last occurrence winning, and links restricted to known endpoints.
	fn merge_reset(&mut self, batch: PageBatch) {
		self.nodes.clear();
		self.positions.clear();
		for node in batch.nodes {
			match self.positions.get(node.id()) {
				Some(&i) => self.nodes[i] = node,
				None => self.push_node(node),
			}
		}
		let (kept, deferred) = partition_links(batch.links, &self.positions);
		self.links = kept;
		self.deferred = deferred;
		debug!("reset merge deferred {} links", self.deferred.len());
	}

	/// New ids are added, known ids are left untouched. Links are filtered as a
	/// whole against the combined node set, including ones deferred earlier.
	fn merge_append(&mut self, batch: PageBatch) {
		for node in batch.nodes {
			if !self.positions.contains_key(node.id()) {
				self.push_node(node);
			}
		}
		let waiting = self.deferred.len();
		let mut combined = std::mem::take(&mut self.links);
		combined.extend(batch.links);
		combined.append(&mut self.deferred);

		let (kept, deferred) = partition_links(combined, &self.positions);
		self.links = kept;
		self.deferred = deferred;
		debug!(
			"append merge: {} links were waiting, {} still deferred",
			waiting,
			self.deferred.len()
		);
	}

	fn push_node(&mut self, node: GraphNode) {
		self.positions.insert(node.id().to_string(), self.nodes.len());
		self.nodes.push(node);
	}
}

/// Split into links whose endpoints are both known and links that must wait.
/// Repeats of the same (source, target, kind) are dropped.
fn partition_links(
	links: Vec<GraphLink>,
	known: &HashMap<String, usize>,
) -> (Vec<GraphLink>, Vec<GraphLink>) {
	let mut seen = HashSet::with_capacity(links.len());
	links
		.into_iter()
		.filter(|link| seen.insert(link.clone()))
		.partition(|link| known.contains_key(&link.source) && known.contains_key(&link.target))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::api::NodeRecord;
	use crate::graph::NodeKind;

	fn record(id: &str, path: &str, deps: &[&str]) -> NodeRecord {
		NodeRecord {
			id: id.into(),
			name: id.into(),
			kind: NodeKind::Function,
			file_path: Some(path.into()),
			line_number: None,
			comments: None,
			dependencies: Some(deps.iter().map(|d| d.to_string()).collect()),
		}
	}

	fn page(records: Vec<NodeRecord>, next: Option<&str>) -> PageResponse {
		PageResponse {
			nodes: Some(records),
			next_token: next.map(str::to_string),
		}
	}

	fn ids(store: &GraphDataStore) -> Vec<&str> {
		store.nodes().iter().map(GraphNode::id).collect()
	}

	#[test]
	fn reset_dedups_with_last_write_winning() {
		let mut store = GraphDataStore::default();
		let ticket = store.refresh();
		let mut renamed = record("a", "m.go", &[]);
		renamed.name = "renamed".into();
		store.apply(ticket, Ok(page(vec![record("a", "m.go", &[]), renamed], None)));

		assert_eq!(ids(&store), vec!["file:m.go", "a"]);
		assert_eq!(store.node("a").map(GraphNode::name), Some("renamed"));
	}

	#[test]
	fn reset_drops_links_to_unknown_nodes() {
		let mut store = GraphDataStore::default();
		let ticket = store.refresh();
		store.apply(ticket, Ok(page(vec![record("a", "m.go", &["ghost"])], Some("t"))));

		assert_eq!(store.links(), &[GraphLink::membership("file:m.go", "a")]);
		assert_eq!(store.deferred_link_count(), 1);
		assert!(store.has_more());
	}

	#[test]
	fn append_never_overwrites_existing_ids() {
		let mut store = GraphDataStore::default();
		let ticket = store.refresh();
		store.apply(ticket, Ok(page(vec![record("a", "m.go", &[])], Some("t"))));

		let ticket = store.load_more().unwrap();
		let mut again = record("a", "other.go", &[]);
		again.name = "changed".into();
		store.apply(ticket, Ok(page(vec![again, record("b", "m.go", &[])], None)));

		assert_eq!(ids(&store), vec!["file:m.go", "a", "file:other.go", "b"]);
		assert_eq!(store.node("a").map(GraphNode::name), Some("a"));
		assert!(!store.has_more());
	}

	#[test]
	fn deferred_call_is_reconciled_when_target_arrives() {
		let mut store = GraphDataStore::default();
		let ticket = store.refresh();
		store.apply(ticket, Ok(page(vec![record("a", "m.go", &["b"])], Some("t"))));
		assert!(!store.links().contains(&GraphLink::call("a", "b")));

		let ticket = store.load_more().unwrap();
		store.apply(ticket, Ok(page(vec![record("b", "n.go", &[])], None)));

		assert!(store.links().contains(&GraphLink::call("a", "b")));
		assert_eq!(store.deferred_link_count(), 0);
		assert_eq!(store.index().direct_predecessors("b"), &["file:n.go".to_string(), "a".to_string()]);
	}

	#[test]
	fn load_more_is_refused_while_loading_or_exhausted() {
		let mut store = GraphDataStore::default();
		assert!(store.load_more().is_none(), "nothing loaded yet");

		let ticket = store.refresh();
		assert!(store.load_more().is_none(), "page 1 in flight");
		store.apply(ticket, Ok(page(vec![], Some("t"))));

		let next = store.load_more().unwrap();
		assert_eq!(next.request().cursor.as_deref(), Some("t"));
		assert!(store.load_more().is_none(), "continuation in flight");
		store.apply(next, Ok(page(vec![], None)));
		assert!(store.load_more().is_none(), "no more pages");
	}

	#[test]
	fn failure_keeps_graph_and_sets_sticky_error() {
		let mut store = GraphDataStore::default();
		let ticket = store.refresh();
		store.apply(ticket, Ok(page(vec![record("a", "m.go", &[])], Some("t"))));
		let before = store.snapshot();
		let revision = store.revision();

		let ticket = store.load_more().unwrap();
		let outcome = store.apply(ticket, Err(FetchError::Status(502)));

		assert_eq!(outcome, ApplyOutcome::Failed);
		assert_eq!(store.snapshot(), before);
		assert_eq!(store.revision(), revision);
		assert!(!store.is_loading());
		assert!(store.error().is_some());
		assert!(store.load_more().is_none());

		let ticket = store.refresh();
		store.apply(ticket, Ok(page(vec![], None)));
		assert!(store.error().is_none());
	}

	#[test]
	fn superseded_response_is_discarded() {
		let mut store = GraphDataStore::default();
		let first = store.refresh();
		let second = store.set_filters(FilterConfig::parse(10, "md", "")).unwrap();

		let outcome = store.apply(first, Ok(page(vec![record("old", "o.go", &[])], None)));
		assert_eq!(outcome, ApplyOutcome::Stale);
		assert!(store.nodes().is_empty());
		assert!(store.is_loading());

		store.apply(second, Ok(page(vec![record("new", "n.go", &[])], None)));
		assert_eq!(ids(&store), vec!["file:n.go", "new"]);
		assert!(!store.is_loading());
	}

	#[test]
	fn equivalent_filters_do_not_reset() {
		let mut store = GraphDataStore::new(FilterConfig::parse(100, ".md", "venv"));
		assert!(store.set_filters(FilterConfig::parse(100, "MD", "/venv/")).is_none());
		assert!(!store.is_loading());
	}

	#[test]
	fn failed_filter_change_can_be_retried() {
		let mut store = GraphDataStore::default();
		let ticket = store.refresh();
		store.apply(ticket, Ok(page(vec![record("a", "m.go", &[])], None)));

		let wanted = FilterConfig::parse(20, "md", "");
		let ticket = store.set_filters(wanted.clone()).unwrap();
		store.apply(ticket, Err(FetchError::Status(500)));
		assert_eq!(store.filters(), &FilterConfig::default());

		let retry = store
			.set_filters(wanted.clone())
			.expect("same input retries after a failure");
		assert_eq!(retry.request().filters, wanted);
		store.apply(retry, Ok(page(vec![record("b", "n.go", &[])], None)));
		assert_eq!(store.filters(), &wanted);
		assert!(store.set_filters(wanted).is_none());
	}

	#[test]
	fn repeated_records_yield_each_link_once() {
		let mut store = GraphDataStore::default();
		let ticket = store.refresh();
		let twice = vec![
			record("b", "n.go", &[]),
			record("a", "m.go", &["b"]),
			record("a", "m.go", &["b"]),
		];
		store.apply(ticket, Ok(page(twice, Some("t"))));

		assert_eq!(
			store.links(),
			&[
				GraphLink::membership("file:n.go", "b"),
				GraphLink::membership("file:m.go", "a"),
				GraphLink::call("a", "b"),
			]
		);
		assert_eq!(store.index().direct_predecessors("b").len(), 2);

		let ticket = store.load_more().unwrap();
		store.apply(ticket, Ok(page(vec![record("a", "m.go", &["b"])], None)));
		assert_eq!(store.links().len(), 3);
	}

	#[test]
	fn empty_page_with_token_keeps_paginating() {
		let mut store = GraphDataStore::default();
		let ticket = store.refresh();
		store.apply(ticket, Ok(page(vec![], Some("next"))));
		assert!(store.has_more());
		assert_eq!(store.cursor(), Some("next"));
	}
}
