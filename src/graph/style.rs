//! Render-time styling as pure functions of the current selection.

use super::selection::Selection;
use super::types::{LinkKind, NodeKind};

pub const SELECTED_COLOR: &str = "#ff3b6b";
pub const PREDECESSOR_COLOR: &str = "#ffb142";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEmphasis {
	/// No selection is active.
	Normal,
	Highlighted,
	Dimmed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
	pub emphasis: LinkEmphasis,
	pub color: &'static str,
	pub width: f64,
	pub arrow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
	Selected,
	Predecessor,
	Plain,
}

/// A link is highlighted when both endpoints are the selected node or one of
/// its predecessors.
pub fn link_emphasis(source: &str, target: &str, selection: &Selection) -> LinkEmphasis {
	if !selection.is_active() {
		LinkEmphasis::Normal
	} else if selection.contains(source) && selection.contains(target) {
		LinkEmphasis::Highlighted
	} else {
		LinkEmphasis::Dimmed
	}
}

pub fn link_style(kind: LinkKind, source: &str, target: &str, selection: &Selection) -> LinkStyle {
	let emphasis = link_emphasis(source, target, selection);
	let arrow = kind == LinkKind::Call;
	let (color, width) = match (emphasis, kind) {
		(LinkEmphasis::Highlighted, _) => ("rgba(255, 215, 90, 0.95)", 2.5),
		(LinkEmphasis::Dimmed, _) => ("rgba(90, 90, 90, 0.15)", 0.5),
		(LinkEmphasis::Normal, LinkKind::Call) => ("rgba(100, 180, 255, 0.6)", 1.5),
		(LinkEmphasis::Normal, LinkKind::Membership) => ("#555555", 0.5),
	};
	LinkStyle {
		emphasis,
		color,
		width,
		arrow,
	}
}

pub fn node_role(id: &str, selection: &Selection) -> NodeRole {
	if selection.is_selected(id) {
		NodeRole::Selected
	} else if selection.is_predecessor(id) {
		NodeRole::Predecessor
	} else {
		NodeRole::Plain
	}
}

pub fn kind_color(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::File => "#ffffff",
		NodeKind::Function => "#61dafb",
		NodeKind::Class => "#f1c40f",
		NodeKind::Interface => "#2ecc71",
		NodeKind::HttpCall => "#ff6b6b",
		NodeKind::CmdExec => "#e67e22",
		NodeKind::Other => "#95a5a6",
	}
}

pub fn node_color(kind: NodeKind, id: &str, selection: &Selection) -> &'static str {
	match node_role(id, selection) {
		NodeRole::Selected => SELECTED_COLOR,
		NodeRole::Predecessor => PREDECESSOR_COLOR,
		NodeRole::Plain => kind_color(kind),
	}
}

/// Relative node weight; radius grows with its square root.
pub fn kind_weight(kind: NodeKind) -> f64 {
	match kind {
		NodeKind::File => 10.0,
		NodeKind::Class => 7.0,
		NodeKind::Interface => 6.0,
		NodeKind::Function => 5.0,
		NodeKind::HttpCall | NodeKind::CmdExec | NodeKind::Other => 3.0,
	}
}

pub fn node_radius(kind: NodeKind) -> f64 {
	kind_weight(kind).sqrt() * 2.5
}

/// File hubs are always labelled; other nodes only when part of the selection
/// or once zoomed in past `threshold`.
pub fn shows_label(kind: NodeKind, id: &str, selection: &Selection, zoom: f64, threshold: f64) -> bool {
	kind == NodeKind::File || selection.contains(id) || zoom > threshold
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{CodeEntity, EntityPayload, GraphIndex, GraphLink, GraphNode, SelectionController};

	fn entity(id: &str) -> GraphNode {
		GraphNode::Entity(CodeEntity {
			id: id.into(),
			name: id.into(),
			kind: NodeKind::Function,
			payload: EntityPayload::default(),
		})
	}

	/// S selected with P1 and P2 upstream, X unrelated.
	fn selection() -> Selection {
		let index = GraphIndex::build(&[
			GraphLink::call("P1", "S"),
			GraphLink::call("P2", "P1"),
			GraphLink::call("P1", "X"),
		]);
		let mut controller = SelectionController::default();
		controller.on_node_click(&entity("S"), &index);
		controller.selection().clone()
	}

	#[test]
	fn links_inside_the_selection_are_highlighted() {
		let selection = selection();
		assert_eq!(link_emphasis("P1", "S", &selection), LinkEmphasis::Highlighted);
		assert_eq!(link_emphasis("P2", "P1", &selection), LinkEmphasis::Highlighted);
		assert_eq!(link_emphasis("P1", "X", &selection), LinkEmphasis::Dimmed);
	}

	#[test]
	fn default_styles_depend_on_kind() {
		let none = Selection::default();
		let call = link_style(LinkKind::Call, "a", "b", &none);
		let member = link_style(LinkKind::Membership, "a", "b", &none);
		assert_eq!(call.emphasis, LinkEmphasis::Normal);
		assert!(call.arrow && !member.arrow);
		assert!(call.width > member.width);
	}

	#[test]
	fn highlighted_links_are_wider_than_dimmed() {
		let selection = selection();
		let hot = link_style(LinkKind::Membership, "P1", "S", &selection);
		let cold = link_style(LinkKind::Call, "P1", "X", &selection);
		assert!(hot.width > cold.width);
		assert!(cold.arrow);
	}

	#[test]
	fn node_colors_follow_role() {
		let selection = selection();
		assert_eq!(node_color(NodeKind::Function, "S", &selection), SELECTED_COLOR);
		assert_eq!(node_color(NodeKind::Class, "P2", &selection), PREDECESSOR_COLOR);
		assert_eq!(node_color(NodeKind::Class, "X", &selection), kind_color(NodeKind::Class));
	}

	#[test]
	fn label_visibility() {
		let selection = selection();
		assert!(shows_label(NodeKind::File, "file:a.go", &selection, 0.5, 1.5));
		assert!(shows_label(NodeKind::Function, "P1", &selection, 0.5, 1.5));
		assert!(!shows_label(NodeKind::Function, "X", &selection, 1.5, 1.5));
		assert!(shows_label(NodeKind::Function, "X", &selection, 2.0, 1.5));
	}
}
