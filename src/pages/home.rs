use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info};

use crate::api::BackendClient;
use crate::components::controls::{GraphControls, LoadStatus};
use crate::components::detail_panel::DetailPanel;
use crate::components::force_graph::ForceGraphCanvas;
use crate::config::AppConfig;
use crate::graph::{
	ApplyOutcome, FetchMode, FetchTicket, FilterConfig, GraphDataStore, SelectionController,
};

fn begin(
	store: RwSignal<GraphDataStore>,
	start: impl FnOnce(&mut GraphDataStore) -> Option<FetchTicket>,
) -> Option<FetchTicket> {
	let mut ticket = None;
	store.update(|s| ticket = start(s));
	ticket
}

/// Await one page and fold it into the store. A committed reset also drops
/// the selection, since the nodes it pointed at are gone. A committed append
/// recomputes the selection's upstream set against the rebuilt index.
fn run_fetch(
	client: BackendClient,
	store: RwSignal<GraphDataStore>,
	selection: RwSignal<SelectionController>,
	ticket: Option<FetchTicket>,
) {
	let Some(ticket) = ticket else {
		debug!("fetch not started");
		return;
	};
	spawn_local(async move {
		let result = client.fetch_page(ticket.request()).await;
		let mut outcome = ApplyOutcome::Stale;
		store.update(|s| outcome = s.apply(ticket, result));
		match outcome {
			ApplyOutcome::Committed(FetchMode::Reset) => {
				selection.update(SelectionController::on_background_click);
			}
			ApplyOutcome::Committed(FetchMode::Append) => {
				if selection.with_untracked(|c| c.selection().is_active()) {
					store.with_untracked(|s| selection.update(|c| c.refresh(s.index())));
				}
			}
			ApplyOutcome::Failed | ApplyOutcome::Stale => {}
		}
	});
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = AppConfig::from_env();
	info!("graph backend at {}", config.api_base_url);

	let client = BackendClient::new(config.api_base_url.clone());
	let store = RwSignal::new(GraphDataStore::new(config.filters.clone()));
	let selection = RwSignal::new(SelectionController::default());

	let revision = Memo::new(move |_| store.with(GraphDataStore::revision));
	let graph_data = Memo::new(move |_| {
		revision.track();
		store.with_untracked(GraphDataStore::snapshot)
	});
	let status = Memo::new(move |_| {
		store.with(|s| LoadStatus {
			nodes: s.nodes().len(),
			links: s.links().len(),
			loading: s.is_loading(),
			has_more: s.has_more(),
			error: s.error().map(ToString::to_string),
		})
	});
	let highlight = Memo::new(move |_| selection.with(|c| c.selection().clone()));
	let focus = Memo::new(move |_| selection.with(|c| c.focus_request().cloned()));
	let detail = Memo::new(move |_| selection.with(|c| c.detail().cloned()));

	let fetch = move |ticket| run_fetch(client.clone(), store, selection, ticket);
	fetch(begin(store, |s| Some(s.refresh())));

	let on_node_click = move |id: String| {
		let Some(node) = store.with_untracked(|s| s.node(&id).cloned()) else {
			return;
		};
		store.with_untracked(|s| selection.update(|c| c.on_node_click(&node, s.index())));
	};
	let on_background_click = move || selection.update(SelectionController::on_background_click);

	let on_apply = {
		let fetch = fetch.clone();
		move |filters: FilterConfig| fetch(begin(store, |s| s.set_filters(filters)))
	};
	let on_refresh = {
		let fetch = fetch.clone();
		move || fetch(begin(store, |s| Some(s.refresh())))
	};
	let on_load_more = move || fetch(begin(store, GraphDataStore::load_more));

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas
				data=graph_data
				selection=highlight
				focus=focus
				on_node_click=on_node_click
				on_background_click=on_background_click
				layout=config.layout
				label_zoom_threshold=config.label_zoom_threshold
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Code Graph"</h1>
				<p class="subtitle">
					"Click a node to trace everything upstream of it. Drag nodes, scroll to zoom."
				</p>
				<GraphControls
					status=status
					initial=config.filters.clone()
					on_apply=on_apply
					on_refresh=on_refresh
					on_load_more=on_load_more
				/>
			</div>
			<DetailPanel
				node=detail
				on_close=on_background_click
				editor_scheme=config.editor_scheme.clone()
			/>
		</div>
	}
}
