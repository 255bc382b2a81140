use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::dto::PageResponse;
use super::error::FetchError;
use crate::graph::FilterConfig;

/// Everything needed to ask for one page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRequest {
	pub filters: FilterConfig,
	/// `None` asks for page 1.
	pub cursor: Option<String>,
}

impl PageRequest {
	/// Unencoded query parameters in the order they are sent.
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![("limit", self.filters.batch_size().to_string())];
		if !self.filters.skip_extensions().is_empty() {
			pairs.push(("skip_ext", self.filters.extensions_csv()));
		}
		if !self.filters.skip_directories().is_empty() {
			pairs.push(("skip_dir", self.filters.directories_csv()));
		}
		if let Some(cursor) = &self.cursor {
			pairs.push(("nextToken", cursor.clone()));
		}
		pairs
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendClient {
	base_url: String,
}

impl BackendClient {
	pub fn new(base_url: impl Into<String>) -> Self {
		let base_url = base_url.into().trim_end_matches('/').to_string();
		Self { base_url }
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn page_url(&self, request: &PageRequest) -> String {
		let query = request
			.query_pairs()
			.into_iter()
			.map(|(key, value)| format!("{key}={}", String::from(js_sys::encode_uri_component(&value))))
			.collect::<Vec<_>>()
			.join("&");
		format!("{}/v1/nodes?{query}", self.base_url)
	}

	/// Fetch and decode one page through the browser's `fetch`.
	pub async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
		let url = self.page_url(request);
		debug!("GET {url}");

		let window =
			web_sys::window().ok_or_else(|| FetchError::Network("no window available".into()))?;
		let response = JsFuture::from(window.fetch_with_str(&url))
			.await
			.map_err(FetchError::network)?;
		let response: Response = response.dyn_into().map_err(FetchError::network)?;
		if !response.ok() {
			return Err(FetchError::Status(response.status()));
		}

		let text = JsFuture::from(response.text().map_err(FetchError::body)?)
			.await
			.map_err(FetchError::body)?;
		let body = text
			.as_string()
			.ok_or_else(|| FetchError::Body("response text was not a string".into()))?;
		Ok(serde_json::from_str(&body)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_page_omits_cursor_and_empty_filters() {
		let request = PageRequest {
			filters: FilterConfig::default(),
			cursor: None,
		};
		assert_eq!(request.query_pairs(), vec![("limit", "100".to_string())]);
	}

	#[test]
	fn continuation_carries_filters_and_token() {
		let request = PageRequest {
			filters: FilterConfig::parse(25, "md,txt", "venv"),
			cursor: Some("MjU=".into()),
		};
		assert_eq!(
			request.query_pairs(),
			vec![
				("limit", "25".to_string()),
				("skip_ext", ".md,.txt".to_string()),
				("skip_dir", "venv".to_string()),
				("nextToken", "MjU=".to_string()),
			]
		);
	}

	#[test]
	fn base_url_trailing_slash_is_trimmed() {
		assert_eq!(BackendClient::new("http://localhost:8080/").base_url(), "http://localhost:8080");
	}
}
