//! Client-side graph assembly, indexing and selection. Nothing in here touches
//! the DOM.

mod filter;
mod index;
mod layout;
mod selection;
mod store;
pub mod style;
mod transform;
mod types;

pub use filter::{DEFAULT_BATCH_SIZE, FilterConfig};
pub use index::GraphIndex;
pub use layout::{ForceSettings, LayoutConfig, LayoutPhase};
pub use selection::{FocusRequest, Selection, SelectionController};
pub use store::{ApplyOutcome, FetchMode, FetchTicket, GraphDataStore};
pub use transform::{PageBatch, transform_page};
pub use types::{
	CodeEntity, EntityPayload, FileNode, GraphData, GraphLink, GraphNode, LinkKind, NodeKind,
	file_node_id,
};
