use thiserror::Error;

/// Why a page could not be loaded. Browser values are stringified at the
/// boundary so the error can be kept in reactive state.
#[derive(Error, Debug)]
pub enum FetchError {
	#[error("network error: {0}")]
	Network(String),

	#[error("backend responded with HTTP {0}")]
	Status(u16),

	#[error("unreadable response body: {0}")]
	Body(String),

	#[error("malformed page: {0}")]
	Decode(#[from] serde_json::Error),
}

impl FetchError {
	pub(crate) fn network(value: wasm_bindgen::JsValue) -> Self {
		FetchError::Network(describe(value))
	}

	pub(crate) fn body(value: wasm_bindgen::JsValue) -> Self {
		FetchError::Body(describe(value))
	}
}

fn describe(value: wasm_bindgen::JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
