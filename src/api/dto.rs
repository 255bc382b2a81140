//! Wire format of `GET /v1/nodes`.

use serde::Deserialize;

use crate::graph::NodeKind;

/// One code entity as the indexer reports it. The backend serializes Go zero
/// values, so empty strings, zero line numbers and null lists all mean "absent".
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeRecord {
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(rename = "type")]
	pub kind: NodeKind,
	pub file_path: Option<String>,
	pub line_number: Option<i64>,
	pub comments: Option<Vec<String>>,
	pub dependencies: Option<Vec<String>>,
}

impl NodeRecord {
	pub fn file_path(&self) -> Option<&str> {
		self.file_path.as_deref().filter(|p| !p.is_empty())
	}

	pub fn line_number(&self) -> Option<u32> {
		self.line_number
			.filter(|&n| n > 0)
			.and_then(|n| u32::try_from(n).ok())
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PageResponse {
	pub nodes: Option<Vec<NodeRecord>>,
	#[serde(rename = "nextToken")]
	pub next_token: Option<String>,
}

impl PageResponse {
	pub fn records(&self) -> &[NodeRecord] {
		self.nodes.as_deref().unwrap_or_default()
	}

	/// Continuation cursor; the backend sends `""` on the last page.
	pub fn next_token(&self) -> Option<&str> {
		self.next_token.as_deref().filter(|t| !t.is_empty())
	}
}
