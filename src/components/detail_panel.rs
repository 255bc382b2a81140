use leptos::prelude::*;

use crate::graph::GraphNode;

/// `vscode://file/src/main.go:12` style link. Windows separators are turned
/// into forward slashes so the same path works from any host.
pub fn editor_uri(file_path: &str, line: Option<u32>, scheme: &str) -> String {
	let path = file_path.replace('\\', "/");
	let path = path.trim_start_matches('/');
	match line {
		Some(line) => format!("{scheme}://file/{path}:{line}"),
		None => format!("{scheme}://file/{path}"),
	}
}

/// Side panel with the clicked node's payload.
#[component]
pub fn DetailPanel<F>(
	#[prop(into)] node: Signal<Option<GraphNode>>,
	on_close: F,
	#[prop(into)] editor_scheme: String,
) -> impl IntoView
where
	F: Fn() + Clone + Send + Sync + 'static,
{
	move || {
		let node = node.get()?;
		let on_close = on_close.clone();
		let kind = node.kind().label();
		let payload = node.payload().cloned().unwrap_or_default();
		let file_path = node.file_path().map(str::to_string);
		let line = payload.line_number;
		let editor_link = file_path
			.as_deref()
			.map(|path| editor_uri(path, line, &editor_scheme));

		Some(view! {
			<aside class="sidebar">
				<div class="sidebar-header">
					<h2>"Details"</h2>
					<button class="close-btn" on:click=move |_| on_close()>"×"</button>
				</div>
				<div class="sidebar-content">
					<div class="info-group">
						<label>"Name"</label>
						<div class="value primary">{node.name().to_string()}</div>
					</div>
					<div class="info-group">
						<label>"Type"</label>
						<div class="value tag" data-type=kind>{kind}</div>
					</div>
					{file_path.map(|path| view! {
						<div class="info-group">
							<label>"File Path"</label>
							<div class="value file-path">{path}</div>
						</div>
					})}
					{line.map(|line| view! {
						<div class="info-group">
							<label>"Line Number"</label>
							<div class="value">{line}</div>
						</div>
					})}
					{(!payload.comments.is_empty()).then(|| view! {
						<div class="info-group">
							<label>"Comments"</label>
							<pre class="comments-block">{payload.comments.join("\n")}</pre>
						</div>
					})}
					{(!payload.dependency_ids.is_empty()).then(|| view! {
						<div class="info-group">
							<label>"Dependencies"</label>
							<div class="value">{payload.dependency_ids.len()}</div>
						</div>
					})}
					{editor_link.map(|href| view! {
						<a class="editor-link" href=href>"Open in editor"</a>
					})}
				</div>
			</aside>
		})
	}
}
