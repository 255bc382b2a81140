use std::collections::{HashMap, HashSet, VecDeque};

use super::types::GraphLink;

/// Reverse adjacency over a link set: for each node, the nodes holding a link
/// that points at it. Always built from scratch from the current links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphIndex {
	predecessors: HashMap<String, Vec<String>>,
	edge_count: usize,
}

impl GraphIndex {
	pub fn build(links: &[GraphLink]) -> Self {
		let mut predecessors: HashMap<String, Vec<String>> = HashMap::new();
		for link in links {
			predecessors
				.entry(link.target.clone())
				.or_default()
				.push(link.source.clone());
		}
		Self {
			predecessors,
			edge_count: links.len(),
		}
	}

	pub fn edge_count(&self) -> usize {
		self.edge_count
	}

	pub fn direct_predecessors(&self, node_id: &str) -> &[String] {
		self.predecessors
			.get(node_id)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Every node that reaches `node_id` along links, found by BFS over reverse
	/// edges. The start node is never part of the result, even on a cycle.
	pub fn find_predecessors(&self, node_id: &str) -> HashSet<String> {
		let mut visited: HashSet<&str> = HashSet::from([node_id]);
		let mut queue = VecDeque::from([node_id]);

		while let Some(current) = queue.pop_front() {
			for source in self.direct_predecessors(current) {
				if visited.insert(source.as_str()) {
					queue.push_back(source.as_str());
				}
			}
		}

		visited.remove(node_id);
		visited.into_iter().map(str::to_string).collect()
	}
}
