use std::collections::HashSet;

use super::index::GraphIndex;
use super::types::GraphNode;

/// The clicked node and everything upstream of it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
	selected: Option<String>,
	predecessors: HashSet<String>,
}

impl Selection {
	pub fn selected_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn predecessors(&self) -> &HashSet<String> {
		&self.predecessors
	}

	pub fn is_active(&self) -> bool {
		self.selected.is_some()
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.as_deref() == Some(id)
	}

	pub fn is_predecessor(&self, id: &str) -> bool {
		self.predecessors.contains(id)
	}

	/// Member of `{selected} ∪ predecessors`.
	pub fn contains(&self, id: &str) -> bool {
		self.is_selected(id) || self.is_predecessor(id)
	}
}

/// Ask the renderer to fly the camera to a node. The sequence number makes
/// repeated clicks on the same node distinct requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusRequest {
	pub node_id: String,
	pub sequence: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionController {
	selection: Selection,
	detail: Option<GraphNode>,
	focus: Option<FocusRequest>,
	focus_sequence: u64,
}

impl SelectionController {
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// Node shown in the detail view, if any.
	pub fn detail(&self) -> Option<&GraphNode> {
		self.detail.as_ref()
	}

	pub fn focus_request(&self) -> Option<&FocusRequest> {
		self.focus.as_ref()
	}

	pub fn on_node_click(&mut self, node: &GraphNode, index: &GraphIndex) {
		let id = node.id().to_string();
		self.selection = Selection {
			predecessors: index.find_predecessors(&id),
			selected: Some(id.clone()),
		};
		self.focus_sequence += 1;
		self.focus = Some(FocusRequest {
			node_id: id,
			sequence: self.focus_sequence,
		});
		self.detail = Some(node.clone());
	}

	/// Recompute the upstream set against a rebuilt index. Keeps the detail
	/// node and issues no focus request.
	pub fn refresh(&mut self, index: &GraphIndex) {
		if let Some(id) = self.selection.selected.as_deref() {
			self.selection.predecessors = index.find_predecessors(id);
		}
	}

	/// Also used for the detail view's close action and for graph resets.
	pub fn on_background_click(&mut self) {
		self.selection = Selection::default();
		self.detail = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{FileNode, GraphLink};

	fn file(path: &str) -> GraphNode {
		GraphNode::File(FileNode::for_path(path))
	}

	#[test]
	fn click_selects_node_and_its_ancestors() {
		let index = GraphIndex::build(&[
			GraphLink::membership("file:a.go", "file:b.go"),
			GraphLink::membership("file:b.go", "file:c.go"),
		]);
		let mut controller = SelectionController::default();
		controller.on_node_click(&file("c.go"), &index);

		let selection = controller.selection();
		assert_eq!(selection.selected_id(), Some("file:c.go"));
		assert!(selection.is_predecessor("file:a.go"));
		assert!(selection.is_predecessor("file:b.go"));
		assert!(!selection.is_predecessor("file:c.go"));
		assert_eq!(controller.detail(), Some(&file("c.go")));
	}

	#[test]
	fn every_click_issues_a_new_focus_request() {
		let index = GraphIndex::default();
		let mut controller = SelectionController::default();
		controller.on_node_click(&file("a.go"), &index);
		let first = controller.focus_request().cloned().unwrap();
		controller.on_node_click(&file("a.go"), &index);
		let second = controller.focus_request().cloned().unwrap();

		assert_eq!(first.node_id, second.node_id);
		assert!(second.sequence > first.sequence);
	}

	#[test]
	fn refresh_picks_up_new_ancestors_without_refocusing() {
		let mut controller = SelectionController::default();
		controller.on_node_click(&file("b.go"), &GraphIndex::default());
		let focus = controller.focus_request().cloned();
		assert!(controller.selection().predecessors().is_empty());

		controller.refresh(&GraphIndex::build(&[GraphLink::membership(
			"file:a.go",
			"file:b.go",
		)]));
		assert!(controller.selection().is_predecessor("file:a.go"));
		assert_eq!(controller.selection().selected_id(), Some("file:b.go"));
		assert_eq!(controller.focus_request().cloned(), focus);
		assert_eq!(controller.detail(), Some(&file("b.go")));
	}

	#[test]
	fn refresh_without_selection_is_a_no_op() {
		let mut controller = SelectionController::default();
		controller.refresh(&GraphIndex::build(&[GraphLink::membership(
			"file:a.go",
			"file:b.go",
		)]));
		assert_eq!(controller, SelectionController::default());
	}

	#[test]
	fn background_click_clears_selection_and_detail() {
		let mut controller = SelectionController::default();
		controller.on_node_click(&file("a.go"), &GraphIndex::default());
		controller.on_background_click();

		assert!(!controller.selection().is_active());
		assert!(controller.selection().predecessors().is_empty());
		assert!(controller.detail().is_none());
	}
}
