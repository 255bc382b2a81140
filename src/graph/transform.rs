use std::collections::HashSet;

use super::types::{CodeEntity, EntityPayload, FileNode, GraphLink, GraphNode};
use crate::api::NodeRecord;

/// Nodes and links derived from a single backend page, before any merge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageBatch {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

/// Turn raw records into graph elements: the entity itself, its file hub (once
/// per distinct path), a membership link from the hub, and a call link per
/// dependency. Nothing here looks at already loaded state.
pub fn transform_page(records: &[NodeRecord]) -> PageBatch {
	let mut batch = PageBatch::default();
	let mut seen_files = HashSet::new();

	for record in records {
		let file_path = record.file_path();

		if let Some(path) = file_path {
			let hub = FileNode::for_path(path);
			batch.links.push(GraphLink::membership(hub.id.clone(), record.id.clone()));
			if seen_files.insert(path) {
				batch.nodes.push(GraphNode::File(hub));
			}
		}

		let dependency_ids = record.dependencies.clone().unwrap_or_default();
		batch.links.extend(
			dependency_ids
				.iter()
				.map(|dep| GraphLink::call(record.id.clone(), dep.clone())),
		);

		batch.nodes.push(GraphNode::Entity(CodeEntity {
			id: record.id.clone(),
			name: record.name.clone(),
			kind: record.kind,
			payload: EntityPayload {
				file_path: file_path.map(str::to_string),
				line_number: record.line_number(),
				comments: record.comments.clone().unwrap_or_default(),
				dependency_ids,
			},
		}));
	}

	batch
}
