use serde::Deserialize;

/// What a vertex stands for. File hubs are synthesized client side, everything
/// else arrives from the indexer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
	File,
	Function,
	Class,
	Interface,
	HttpCall,
	CmdExec,
	#[default]
	#[serde(other)]
	Other,
}

impl NodeKind {
	pub fn label(self) -> &'static str {
		match self {
			NodeKind::File => "FILE",
			NodeKind::Function => "FUNCTION",
			NodeKind::Class => "CLASS",
			NodeKind::Interface => "INTERFACE",
			NodeKind::HttpCall => "HTTP_CALL",
			NodeKind::CmdExec => "CMD_EXEC",
			NodeKind::Other => "OTHER",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
	/// File hub -> code entity declared in it.
	Membership,
	/// Code entity -> entity it depends on.
	Call,
}

/// Synthetic hub, one per distinct file path.
#[derive(Clone, Debug, PartialEq)]
pub struct FileNode {
	pub id: String,
	pub name: String,
	pub path: String,
}

impl FileNode {
	pub fn for_path(path: &str) -> Self {
		let name = path.rsplit('/').next().unwrap_or(path).to_string();
		Self {
			id: file_node_id(path),
			name,
			path: path.to_string(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityPayload {
	pub file_path: Option<String>,
	pub line_number: Option<u32>,
	pub comments: Vec<String>,
	pub dependency_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CodeEntity {
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
	pub payload: EntityPayload,
}

/// A graph vertex: either a file hub or a code entity with its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphNode {
	File(FileNode),
	Entity(CodeEntity),
}

impl GraphNode {
	pub fn id(&self) -> &str {
		match self {
			GraphNode::File(file) => &file.id,
			GraphNode::Entity(entity) => &entity.id,
		}
	}

	pub fn name(&self) -> &str {
		match self {
			GraphNode::File(file) => &file.name,
			GraphNode::Entity(entity) => &entity.name,
		}
	}

	pub fn kind(&self) -> NodeKind {
		match self {
			GraphNode::File(_) => NodeKind::File,
			GraphNode::Entity(entity) => entity.kind,
		}
	}

	/// File path of the node: the hub's own path, or the entity's declaring file.
	pub fn file_path(&self) -> Option<&str> {
		match self {
			GraphNode::File(file) => Some(&file.path),
			GraphNode::Entity(entity) => entity.payload.file_path.as_deref(),
		}
	}

	pub fn payload(&self) -> Option<&EntityPayload> {
		match self {
			GraphNode::File(_) => None,
			GraphNode::Entity(entity) => Some(&entity.payload),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub kind: LinkKind,
}

impl GraphLink {
	pub fn membership(file_id: impl Into<String>, entity_id: impl Into<String>) -> Self {
		Self {
			source: file_id.into(),
			target: entity_id.into(),
			kind: LinkKind::Membership,
		}
	}

	pub fn call(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind: LinkKind::Call,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

/// Deterministic hub id, so repeated fetches of the same file converge.
pub fn file_node_id(path: &str) -> String {
	format!("file:{path}")
}
