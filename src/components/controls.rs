use leptos::prelude::*;

use crate::graph::FilterConfig;

/// What the toolbar shows about the loaded graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadStatus {
	pub nodes: usize,
	pub links: usize,
	pub loading: bool,
	pub has_more: bool,
	pub error: Option<String>,
}

/// Filter inputs plus refresh / load-more actions.
#[component]
pub fn GraphControls<A, R, M>(
	#[prop(into)] status: Signal<LoadStatus>,
	initial: FilterConfig,
	on_apply: A,
	on_refresh: R,
	on_load_more: M,
) -> impl IntoView
where
	A: Fn(FilterConfig) + 'static,
	R: Fn() + 'static,
	M: Fn() + 'static,
{
	let extensions = RwSignal::new(initial.extensions_csv());
	let directories = RwSignal::new(initial.directories_csv());
	let batch_size = RwSignal::new(initial.batch_size().to_string());

	let apply = move |_: web_sys::MouseEvent| {
		let size = batch_size
			.get_untracked()
			.trim()
			.parse()
			.unwrap_or(initial.batch_size());
		on_apply(FilterConfig::parse(
			size,
			&extensions.get_untracked(),
			&directories.get_untracked(),
		));
	};

	view! {
		<div class="graph-controls">
			<label>
				"Skip extensions"
				<input
					type="text"
					placeholder=".md,.txt"
					prop:value=move || extensions.get()
					on:input=move |ev| extensions.set(event_target_value(&ev))
				/>
			</label>
			<label>
				"Skip directories"
				<input
					type="text"
					placeholder="venv,node_modules"
					prop:value=move || directories.get()
					on:input=move |ev| directories.set(event_target_value(&ev))
				/>
			</label>
			<label>
				"Batch size"
				<input
					type="number"
					min="1"
					prop:value=move || batch_size.get()
					on:input=move |ev| batch_size.set(event_target_value(&ev))
				/>
			</label>
			<button on:click=apply>"Apply"</button>
			<button on:click=move |_| on_refresh()>"Refresh"</button>
			<button
				on:click=move |_| on_load_more()
				disabled=move || status.with(|s| s.loading || !s.has_more || s.error.is_some())
			>
				"Load more"
			</button>
			<span class="status">
				{move || status.with(|s| format!("{} nodes · {} links", s.nodes, s.links))}
				{move || status.with(|s| s.loading).then_some(" · loading…")}
			</span>
			{move || status.with(|s| s.error.clone()).map(|message| view! {
				<span class="error">"Error connecting to API: " {message}</span>
			})}
		</div>
	}
}
