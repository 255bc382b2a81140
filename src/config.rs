//! Build-time configuration, read from the environment the WASM bundle was
//! compiled in.

use crate::graph::{DEFAULT_BATCH_SIZE, FilterConfig, LayoutConfig};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_LABEL_ZOOM: f64 = 1.5;
pub const DEFAULT_EDITOR_SCHEME: &str = "vscode";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	pub api_base_url: String,
	pub filters: FilterConfig,
	pub label_zoom_threshold: f64,
	pub editor_scheme: String,
	pub layout: LayoutConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self::from_values(None, None, None, None, None)
	}
}

impl AppConfig {
	/// `GRAPH_API_BASE_URL`, `GRAPH_BATCH_SIZE`, `GRAPH_SKIP_EXT`,
	/// `GRAPH_SKIP_DIR` and `GRAPH_EDITOR_SCHEME`, captured at compile time.
	pub fn from_env() -> Self {
		Self::from_values(
			option_env!("GRAPH_API_BASE_URL"),
			option_env!("GRAPH_BATCH_SIZE"),
			option_env!("GRAPH_SKIP_EXT"),
			option_env!("GRAPH_SKIP_DIR"),
			option_env!("GRAPH_EDITOR_SCHEME"),
		)
	}

	fn from_values(
		base_url: Option<&str>,
		batch_size: Option<&str>,
		skip_ext: Option<&str>,
		skip_dir: Option<&str>,
		editor_scheme: Option<&str>,
	) -> Self {
		let api_base_url = non_empty(base_url)
			.unwrap_or(DEFAULT_API_BASE_URL)
			.trim_end_matches('/')
			.to_string();
		let batch_size = non_empty(batch_size)
			.and_then(|raw| raw.parse::<u32>().ok())
			.filter(|&n| n > 0)
			.unwrap_or(DEFAULT_BATCH_SIZE);

		Self {
			api_base_url,
			filters: FilterConfig::parse(
				batch_size,
				skip_ext.unwrap_or_default(),
				skip_dir.unwrap_or_default(),
			),
			label_zoom_threshold: DEFAULT_LABEL_ZOOM,
			editor_scheme: non_empty(editor_scheme)
				.unwrap_or(DEFAULT_EDITOR_SCHEME)
				.to_string(),
			layout: LayoutConfig::default(),
		}
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|v| !v.is_empty())
}
