use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use log::{debug, info};

use crate::graph::style::node_radius;
use crate::graph::{
	FocusRequest, GraphData, LayoutConfig, LayoutPhase, LinkKind, NodeKind, Selection,
};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
pub const FOCUS_ZOOM: f64 = 4.0;
/// Seconds.
const FOCUS_DURATION: f64 = 1.0;
/// Screen pixels a press may travel and still count as a click.
const CLICK_SLOP: f64 = 4.0;
const MIN_HIT_RADIUS: f64 = 8.0;
const SPAWN_RING: f64 = 100.0;
const SPAWN_OFFSET: f64 = 20.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
	pub radius: f64,
}

/// A link as drawn. The physics graph holds one undirected spring per node
/// pair, so every link between the pair is kept here with its own direction.
#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub kind: LinkKind,
	pub source: String,
	pub target: String,
	/// Physics index of `source`.
	pub from: DefaultNodeIdx,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CanvasClick {
	Node(String),
	Background,
}

#[derive(Clone, Debug)]
struct Press {
	x: f64,
	y: f64,
	moved: bool,
}

#[derive(Clone, Debug)]
struct CameraFlight {
	node_id: String,
	from: ViewTransform,
	t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub selection: Selection,
	pub label_zoom_threshold: f64,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	layout: LayoutPhase,
	ids: HashMap<String, DefaultNodeIdx>,
	edges: HashMap<(DefaultNodeIdx, DefaultNodeIdx), Vec<EdgeInfo>>,
	press: Option<Press>,
	camera: Option<CameraFlight>,
	last_focus: u64,
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		layout: LayoutConfig,
		label_zoom_threshold: f64,
	) -> Self {
		let layout = LayoutPhase::new(layout);
		let mut state = Self {
			graph: ForceGraph::new(layout.simulation_parameters()),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			selection: Selection::default(),
			label_zoom_threshold,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			layout,
			ids: HashMap::new(),
			edges: HashMap::new(),
			press: None,
			camera: None,
			last_focus: 0,
		};
		state.sync(data);
		state
	}

	/// Rebuild the simulation for new data. Nodes that were already on screen
	/// keep their position and pin; new nodes spawn next to a placed neighbour.
	pub fn sync(&mut self, data: &GraphData) {
		let mut previous: HashMap<String, (f32, f32, bool)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		let mut neighbors: HashMap<&str, Vec<&str>> = HashMap::new();
		for link in &data.links {
			neighbors.entry(&link.source).or_default().push(&link.target);
			neighbors.entry(&link.target).or_default().push(&link.source);
		}

		let mut graph = ForceGraph::new(self.layout.simulation_parameters());
		let mut ids = HashMap::with_capacity(data.nodes.len());
		let mut placed: HashMap<&str, (f32, f32)> = HashMap::new();
		let count = data.nodes.len().max(1) as f64;

		for (i, node) in data.nodes.iter().enumerate() {
			let id = node.id();
			let angle = (i as f64) * 2.0 * PI / count;
			let (x, y, is_anchor) = match previous.get(id) {
				Some(&known) => known,
				None => {
					let near = neighbors.get(id).and_then(|ns| {
						ns.iter().find_map(|n| {
							placed
								.get(n)
								.copied()
								.or_else(|| previous.get(*n).map(|&(x, y, _)| (x, y)))
						})
					});
					match near {
						Some((nx, ny)) => (
							nx + (SPAWN_OFFSET * angle.cos()) as f32,
							ny + (SPAWN_OFFSET * angle.sin()) as f32,
							false,
						),
						None => (
							(SPAWN_RING * angle.cos()) as f32,
							(SPAWN_RING * angle.sin()) as f32,
							false,
						),
					}
				}
			};
			placed.insert(id, (x, y));

			let kind = node.kind();
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: id.to_string(),
					name: node.name().to_string(),
					kind,
					radius: node_radius(kind),
				},
			});
			ids.insert(id.to_string(), idx);
		}

		let mut edges: HashMap<(DefaultNodeIdx, DefaultNodeIdx), Vec<EdgeInfo>> = HashMap::new();
		let mut drawn = 0;
		for link in &data.links {
			let (Some(&src), Some(&tgt)) = (ids.get(&link.source), ids.get(&link.target)) else {
				continue;
			};
			if src == tgt {
				continue;
			}
			let info = EdgeInfo {
				kind: link.kind,
				source: link.source.clone(),
				target: link.target.clone(),
				from: src,
			};
			drawn += 1;
			if let Some(pair) = edges.get_mut(&(tgt, src)) {
				pair.push(info);
				continue;
			}
			let pair = edges.entry((src, tgt)).or_default();
			if pair.is_empty() {
				graph.add_edge(src, tgt, EdgeData::default());
			}
			pair.push(info);
		}

		debug!(
			"renderer synced {} nodes, {} links on {} springs ({} new nodes)",
			ids.len(),
			drawn,
			edges.len(),
			data.nodes.len().saturating_sub(previous.len())
		);
		self.graph = graph;
		self.ids = ids;
		self.edges = edges;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.press = None;
	}

	pub fn is_layout_configured(&self) -> bool {
		self.layout.settings().is_some()
	}

	/// Every link drawn along the spring between `a` and `b`, in either order.
	pub fn edge_links(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> &[EdgeInfo] {
		self.edges
			.get(&(a, b))
			.or_else(|| self.edges.get(&(b, a)))
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	pub fn position_of(&self, id: &str) -> Option<(f64, f64)> {
		self.ids.get(id).and_then(|&idx| self.node_position(idx))
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// world-space, scales with zoom like nodes
			let hit = node.data.user_data.radius.max(MIN_HIT_RADIUS);
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn press(&mut self, x: f64, y: f64) {
		self.press = Some(Press { x, y, moved: false });
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			if let Some((nx, ny)) = self.node_position(idx) {
				self.drag.node_start_x = nx as f32;
				self.drag.node_start_y = ny as f32;
			}
		} else {
			self.camera = None;
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		let Some(press) = self.press.as_mut() else {
			return;
		};
		if !press.moved {
			let (dx, dy) = (x - press.x, y - press.y);
			if (dx * dx + dy * dy).sqrt() <= CLICK_SLOP {
				return;
			}
			press.moved = true;
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// End the gesture; a press that stayed put is reported as a click.
	pub fn release(&mut self) -> Option<CanvasClick> {
		let press = self.press.take()?;
		let pressed_node = self.drag.node_idx;
		self.drag = DragState::default();
		self.pan.active = false;

		if press.moved {
			return None;
		}
		Some(match pressed_node.and_then(|idx| self.node_id(idx)) {
			Some(id) => CanvasClick::Node(id),
			None => CanvasClick::Background,
		})
	}

	pub fn cancel_pointer(&mut self) {
		self.press = None;
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		self.camera = None;
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Start flying to the requested node unless this request was handled.
	pub fn focus_on(&mut self, request: &FocusRequest) {
		if request.sequence == self.last_focus {
			return;
		}
		self.last_focus = request.sequence;
		if self.ids.contains_key(&request.node_id) {
			self.camera = Some(CameraFlight {
				node_id: request.node_id.clone(),
				from: self.transform.clone(),
				t: 0.0,
			});
		}
	}

	pub fn tick(&mut self, dt: f32) {
		if let Some(settings) = self.layout.on_tick() {
			info!("layout configured: {settings:?}");
			self.graph.parameters = settings.simulation_parameters();
		}
		self.graph.update(dt);
		if let Some(settings) = self.layout.settings() {
			self.pull_to_center(settings.centering);
			self.separate(settings.collision_radius);
		}
		self.flow_time += dt as f64;
		self.advance_camera(dt as f64);
	}

	fn pull_to_center(&mut self, strength: f32) {
		if strength <= 0.0 {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x -= node.data.x * strength;
				node.data.y -= node.data.y * strength;
			}
		});
	}

	/// Push apart nodes closer than twice `radius`, bucketed on a grid so only
	/// neighbouring cells are compared.
	fn separate(&mut self, radius: f32) {
		if radius <= 0.0 {
			return;
		}
		let mut points = Vec::new();
		self.graph
			.visit_nodes(|node| points.push((node.index(), node.x(), node.y())));

		let min_dist = radius * 2.0;
		let cell_of = |x: f32, y: f32| ((x / min_dist).floor() as i32, (y / min_dist).floor() as i32);
		let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
		for (i, &(_, x, y)) in points.iter().enumerate() {
			grid.entry(cell_of(x, y)).or_default().push(i);
		}

		let mut shifts: HashMap<DefaultNodeIdx, (f32, f32)> = HashMap::new();
		for (&(cx, cy), members) in &grid {
			for &i in members {
				for (ox, oy) in (-1..=1).flat_map(|ox| (-1..=1).map(move |oy| (ox, oy))) {
					let Some(others) = grid.get(&(cx + ox, cy + oy)) else {
						continue;
					};
					for &j in others.iter().filter(|&&j| j > i) {
						let (a, ax, ay) = points[i];
						let (b, bx, by) = points[j];
						let (dx, dy) = (bx - ax, by - ay);
						let dist = (dx * dx + dy * dy).sqrt();
						if dist >= min_dist || dist < f32::EPSILON {
							continue;
						}
						let push = (min_dist - dist) * 0.5 / dist;
						let sa = shifts.entry(a).or_default();
						sa.0 -= dx * push;
						sa.1 -= dy * push;
						let sb = shifts.entry(b).or_default();
						sb.0 += dx * push;
						sb.1 += dy * push;
					}
				}
			}
		}

		if shifts.is_empty() {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			if let Some(&(dx, dy)) = shifts.get(&node.index()) {
				node.data.x += dx;
				node.data.y += dy;
			}
		});
	}

	fn advance_camera(&mut self, dt: f64) {
		let Some(mut flight) = self.camera.take() else {
			return;
		};
		let Some((gx, gy)) = self.position_of(&flight.node_id) else {
			return;
		};
		flight.t = (flight.t + dt / FOCUS_DURATION).min(1.0);
		let e = ease_out_cubic(flight.t);
		let k = lerp(flight.from.k, FOCUS_ZOOM, e);
		let (tx, ty) = (self.width / 2.0 - gx * k, self.height / 2.0 - gy * k);
		self.transform = ViewTransform {
			x: lerp(flight.from.x, tx, e),
			y: lerp(flight.from.y, ty, e),
			k,
		};
		if flight.t < 1.0 {
			self.camera = Some(flight);
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{CodeEntity, EntityPayload, GraphLink, GraphNode};

	fn entity(id: &str) -> GraphNode {
		GraphNode::Entity(CodeEntity {
			id: id.into(),
			name: id.into(),
			kind: NodeKind::Function,
			payload: EntityPayload::default(),
		})
	}

	fn data(ids: &[&str], links: Vec<GraphLink>) -> GraphData {
		GraphData {
			nodes: ids.iter().map(|id| entity(id)).collect(),
			links,
		}
	}

	fn state(graph: &GraphData) -> ForceGraphState {
		ForceGraphState::new(graph, 800.0, 600.0, LayoutConfig::default(), 1.5)
	}

	#[test]
	fn sync_keeps_existing_positions() {
		let mut s = state(&data(&["a", "b"], vec![]));
		let before = s.position_of("a").unwrap();

		s.sync(&data(&["a", "b", "c"], vec![GraphLink::call("c", "a")]));
		assert_eq!(s.position_of("a"), Some(before));

		let (cx, cy) = s.position_of("c").unwrap();
		let dist = ((cx - before.0).powi(2) + (cy - before.1).powi(2)).sqrt();
		assert!(dist <= SPAWN_OFFSET + 1e-3, "spawned next to its neighbour");
	}

	#[test]
	fn edges_remember_direction() {
		let s = state(&data(&["a", "b"], vec![GraphLink::call("a", "b")]));
		let (a, b) = (s.ids["a"], s.ids["b"]);
		let links = s.edge_links(b, a);
		assert_eq!(links.len(), 1);
		assert_eq!((links[0].source.as_str(), links[0].target.as_str()), ("a", "b"));
		assert_eq!(links[0].from, a);
	}

	#[test]
	fn two_node_cycle_draws_both_directions_on_one_spring() {
		let s = state(&data(
			&["a", "b"],
			vec![GraphLink::call("a", "b"), GraphLink::call("b", "a")],
		));
		let (a, b) = (s.ids["a"], s.ids["b"]);
		assert_eq!(s.edges.len(), 1);

		let links = s.edge_links(a, b);
		let directions: Vec<_> = links
			.iter()
			.map(|l| (l.source.as_str(), l.target.as_str()))
			.collect();
		assert_eq!(directions, vec![("a", "b"), ("b", "a")]);
		assert!(links.iter().all(|l| l.from == s.ids[&l.source]));
	}

	#[test]
	fn membership_and_call_between_a_pair_are_both_kept() {
		let s = state(&data(
			&["a", "b"],
			vec![GraphLink::membership("a", "b"), GraphLink::call("a", "b")],
		));
		let kinds: Vec<_> = s
			.edge_links(s.ids["a"], s.ids["b"])
			.iter()
			.map(|l| l.kind)
			.collect();
		assert_eq!(kinds, vec![LinkKind::Membership, LinkKind::Call]);
		assert_eq!(s.edges.len(), 1);
	}

	#[test]
	fn still_press_on_node_is_a_click() {
		let mut s = state(&data(&["a"], vec![]));
		let (gx, gy) = s.position_of("a").unwrap();
		let (sx, sy) = s.graph_to_screen(gx, gy);

		s.press(sx, sy);
		s.pointer_move(sx + 1.0, sy);
		assert_eq!(s.release(), Some(CanvasClick::Node("a".into())));
	}

	#[test]
	fn background_press_is_a_background_click() {
		let mut s = state(&data(&["a"], vec![]));
		s.press(1.0, 1.0);
		assert_eq!(s.release(), Some(CanvasClick::Background));
	}

	#[test]
	fn dragging_is_not_a_click() {
		let mut s = state(&data(&["a"], vec![]));
		let (gx, gy) = s.position_of("a").unwrap();
		let (sx, sy) = s.graph_to_screen(gx, gy);

		s.press(sx, sy);
		s.pointer_move(sx + 30.0, sy);
		assert_eq!(s.release(), None);
		let (nx, _) = s.position_of("a").unwrap();
		assert!((nx - (gx + 30.0)).abs() < 1e-3);
	}

	#[test]
	fn layout_is_configured_on_first_tick() {
		let mut s = state(&data(&["a", "b"], vec![GraphLink::call("a", "b")]));
		assert!(!s.is_layout_configured());
		s.tick(0.016);
		assert!(s.is_layout_configured());
		assert_eq!(s.graph.parameters.force_charge, 150.0);

		s.sync(&data(&["a", "b", "c"], vec![]));
		assert_eq!(s.graph.parameters.force_charge, 150.0);
	}

	#[test]
	fn focus_request_is_handled_once() {
		let mut s = state(&data(&["a"], vec![]));
		let request = FocusRequest {
			node_id: "a".into(),
			sequence: 1,
		};
		s.focus_on(&request);
		for _ in 0..100 {
			s.tick(0.016);
		}
		assert!((s.transform.k - FOCUS_ZOOM).abs() < 1e-9);

		s.zoom_at(0.0, 0.0, 0.5);
		s.focus_on(&request);
		s.tick(0.016);
		assert!((s.transform.k - FOCUS_ZOOM * 0.5).abs() < 1e-9);
	}
}
