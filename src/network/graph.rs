//! In-memory directed road graph backed by `petgraph`.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use petgraph::algo::{astar, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::RoadNetwork;
use crate::error::DeliveryError;

#[derive(Debug, Clone)]
struct NodeData<L> {
    id: L,
    position: Option<(f64, f64)>,
}

/// Directed road graph with edge lengths.
///
/// Shortest paths are computed on demand with A* and a zero heuristic.
///
/// # Examples
///
/// ```
/// use u_delivery::network::{GraphNetwork, RoadNetwork};
///
/// let mut g = GraphNetwork::new();
/// g.add_location_at("a", 0.0, 0.0);
/// g.add_location_at("b", 3.0, 4.0);
/// g.add_location("c");
/// g.add_road(&"a", &"b", 5.0).unwrap();
/// g.add_road(&"b", &"c", 2.0).unwrap();
///
/// assert_eq!(g.shortest_path_length(&"a", &"c"), Some(7.0));
/// assert_eq!(g.shortest_path(&"a", &"c"), Some(vec!["a", "b", "c"]));
/// assert_eq!(g.shortest_path_length(&"c", &"a"), None);
/// ```
#[derive(Debug, Clone)]
pub struct GraphNetwork<L> {
    graph: DiGraph<NodeData<L>, f64>,
    index: HashMap<L, NodeIndex>,
}

impl<L> Default for GraphNetwork<L> {
    fn default() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }
}

impl<L: Clone + Eq + Hash + Debug> GraphNetwork<L> {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a location without coordinates. Returns `false` if it already exists.
    pub fn add_location(&mut self, id: L) -> bool {
        self.insert_node(id, None)
    }

    /// Adds a location with a planar position. Returns `false` if it already exists.
    pub fn add_location_at(&mut self, id: L, x: f64, y: f64) -> bool {
        self.insert_node(id, Some((x, y)))
    }

    fn insert_node(&mut self, id: L, position: Option<(f64, f64)>) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        let idx = self.graph.add_node(NodeData {
            id: id.clone(),
            position,
        });
        self.index.insert(id, idx);
        true
    }

    /// Adds a one-way road segment of the given length.
    pub fn add_road(&mut self, from: &L, to: &L, length: f64) -> Result<(), DeliveryError> {
        let a = self.node(from)?;
        let b = self.node(to)?;
        self.graph.add_edge(a, b, length);
        Ok(())
    }

    /// Adds a road segment in both directions.
    pub fn add_two_way_road(&mut self, a: &L, b: &L, length: f64) -> Result<(), DeliveryError> {
        self.add_road(a, b, length)?;
        self.add_road(b, a, length)
    }

    /// Number of locations.
    pub fn location_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed road segments.
    pub fn road_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns a copy restricted to the largest strongly connected component.
    ///
    /// Every pair of locations in the result is mutually reachable, so a
    /// distance matrix built over it has no unreachable entries. Location
    /// order is preserved.
    pub fn largest_strongly_connected(&self) -> Self {
        let largest: HashSet<NodeIndex> = tarjan_scc(&self.graph)
            .into_iter()
            .max_by_key(|component| component.len())
            .unwrap_or_default()
            .into_iter()
            .collect();

        let mut out = Self::new();
        for idx in self.graph.node_indices() {
            if largest.contains(&idx) {
                let data = &self.graph[idx];
                out.insert_node(data.id.clone(), data.position);
            }
        }
        for edge in self.graph.edge_references() {
            if largest.contains(&edge.source()) && largest.contains(&edge.target()) {
                let a = out.index[&self.graph[edge.source()].id];
                let b = out.index[&self.graph[edge.target()].id];
                out.graph.add_edge(a, b, *edge.weight());
            }
        }

        log::debug!(
            "kept {} of {} locations in the largest strongly connected component",
            out.location_count(),
            self.location_count()
        );
        out
    }

    fn node(&self, id: &L) -> Result<NodeIndex, DeliveryError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| DeliveryError::UnknownLocation(format!("{id:?}")))
    }

    fn search(&self, from: &L, to: &L) -> Option<(f64, Vec<NodeIndex>)> {
        let start = *self.index.get(from)?;
        let goal = *self.index.get(to)?;
        astar(
            &self.graph,
            start,
            |n| n == goal,
            |e| *e.weight(),
            |_| 0.0,
        )
    }
}

impl<L> RoadNetwork for GraphNetwork<L>
where
    L: Clone + Eq + Hash + Debug + Send + Sync,
{
    type Location = L;

    fn shortest_path_length(&self, from: &L, to: &L) -> Option<f64> {
        self.search(from, to).map(|(cost, _)| cost)
    }

    fn shortest_path(&self, from: &L, to: &L) -> Option<Vec<L>> {
        self.search(from, to).map(|(_, path)| {
            path.into_iter()
                .map(|idx| self.graph[idx].id.clone())
                .collect()
        })
    }

    fn all_locations(&self) -> Vec<L> {
        self.graph
            .node_weights()
            .map(|data| data.id.clone())
            .collect()
    }

    fn coordinates(&self, location: &L) -> Option<(f64, f64)> {
        let idx = self.index.get(location)?;
        self.graph[*idx].position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 <-> 2 <-> 3 ring plus a one-way spur 3 -> 4.
    fn sample() -> GraphNetwork<u32> {
        let mut g = GraphNetwork::new();
        for id in 1..=4 {
            g.add_location_at(id, id as f64, 0.0);
        }
        g.add_two_way_road(&1, &2, 10.0).expect("known");
        g.add_two_way_road(&2, &3, 5.0).expect("known");
        g.add_road(&3, &1, 30.0).expect("known");
        g.add_road(&3, &4, 1.0).expect("known");
        g
    }

    #[test]
    fn test_duplicate_location() {
        let mut g = GraphNetwork::new();
        assert!(g.add_location(1u32));
        assert!(!g.add_location(1u32));
        assert_eq!(g.location_count(), 1);
    }

    #[test]
    fn test_unknown_location_road() {
        let mut g: GraphNetwork<u32> = GraphNetwork::new();
        g.add_location(1);
        let err = g.add_road(&1, &9, 1.0).unwrap_err();
        assert_eq!(err, DeliveryError::UnknownLocation("9".into()));
    }

    #[test]
    fn test_shortest_path_prefers_cheaper_route() {
        let g = sample();
        // 3 -> 1 direct is 30, via 2 is 15
        assert_eq!(g.shortest_path_length(&3, &1), Some(15.0));
        assert_eq!(g.shortest_path(&3, &1), Some(vec![3, 2, 1]));
    }

    #[test]
    fn test_no_path() {
        let g = sample();
        assert_eq!(g.shortest_path_length(&4, &1), None);
        assert_eq!(g.shortest_path(&4, &1), None);
        assert_eq!(g.shortest_path_length(&1, &99), None);
    }

    #[test]
    fn test_same_location() {
        let g = sample();
        assert_eq!(g.shortest_path_length(&2, &2), Some(0.0));
    }

    #[test]
    fn test_all_locations_in_insertion_order() {
        assert_eq!(sample().all_locations(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_coordinates() {
        let g = sample();
        assert_eq!(g.coordinates(&3), Some((3.0, 0.0)));
        assert_eq!(g.coordinates(&42), None);
    }

    #[test]
    fn test_largest_strongly_connected() {
        let g = sample().largest_strongly_connected();
        assert_eq!(g.all_locations(), vec![1, 2, 3]);
        // 2 + 2 two-way segments plus 3 -> 1
        assert_eq!(g.road_count(), 5);
        assert_eq!(g.shortest_path_length(&3, &1), Some(15.0));
        assert_eq!(g.coordinates(&2), Some((2.0, 0.0)));
    }

    #[test]
    fn test_largest_strongly_connected_empty() {
        let g: GraphNetwork<u32> = GraphNetwork::new();
        assert_eq!(g.largest_strongly_connected().location_count(), 0);
    }
}
