//! Exact reachability via breadth-first search.
//!
//! This is the deterministic ground-truth oracle for the random-walk tester.
//! It runs in `O(n + m)` time and keeps a visited set plus a FIFO frontier, so
//! its working space is linear in the vertex count rather than logarithmic.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::{
    error::Result,
    graph::{Graph, Vertex},
};

/// Vertices reachable from a start vertex, the start included.
///
/// Also records the order in which the traversal explored each vertex. The
/// set is identical for a fixed graph and start; the order depends on the
/// neighbour-list order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReachableSet<V: Vertex> {
    members: HashSet<V>,
    order: Vec<V>,
}

impl<V: Vertex> ReachableSet<V> {
    /// Returns `true` when `vertex` is reachable.
    #[must_use]
    pub fn contains(&self, vertex: &V) -> bool {
        self.members.contains(vertex)
    }

    /// Number of reachable vertices, the start included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false`: the start vertex is a member of its own set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Vertices in the order they were explored, starting with the start
    /// vertex.
    #[must_use]
    pub fn exploration_order(&self) -> &[V] {
        &self.order
    }

    /// Iterates over the reachable vertices in exploration order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.order.iter()
    }

    /// Consumes the set, returning the underlying hash set.
    #[must_use]
    pub fn into_set(self) -> HashSet<V> {
        self.members
    }
}

impl<'a, V: Vertex> IntoIterator for &'a ReachableSet<V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct BfsContext<V> {
    visited: HashSet<V>,
    queue: VecDeque<V>,
    explored: Vec<V>,
}

impl<V: Vertex> BfsContext<V> {
    fn new() -> Self {
        Self {
            visited: HashSet::new(),
            queue: VecDeque::new(),
            explored: Vec::new(),
        }
    }

    fn visit(&mut self, vertex: V) {
        if self.visited.insert(vertex.clone()) {
            self.queue.push_back(vertex);
        }
    }

    fn into_reachable(self) -> ReachableSet<V> {
        ReachableSet {
            members: self.visited,
            order: self.explored,
        }
    }
}

/// Explores `graph` breadth-first from `start` and returns every vertex it
/// reaches.
///
/// # Errors
/// Returns [`crate::GraphError::UnknownVertex`] when `start` is absent, or when
/// an explored adjacency list names a vertex that is not a key of the graph.
///
/// # Examples
/// ```
/// use ustcon_core::{Graph, reachable_from};
///
/// let graph = Graph::from_adjacency([
///     ('A', vec!['B']),
///     ('B', vec!['A', 'C']),
///     ('C', vec!['B']),
///     ('D', vec![]),
/// ]);
/// let reachable = reachable_from(&graph, &'A').expect("A exists");
/// assert_eq!(reachable.exploration_order(), &['A', 'B', 'C']);
/// assert!(!reachable.contains(&'D'));
/// ```
#[instrument(
    name = "core.reachable_from",
    level = "debug",
    err,
    skip_all,
    fields(vertices = graph.vertex_count()),
)]
pub fn reachable_from<V: Vertex>(graph: &Graph<V>, start: &V) -> Result<ReachableSet<V>> {
    graph.neighbors(start)?;

    let mut context = BfsContext::new();
    context.visit(start.clone());

    while let Some(vertex) = context.queue.pop_front() {
        for neighbour in graph.neighbors(&vertex)? {
            context.visit(neighbour.clone());
        }
        context.explored.push(vertex);
    }

    let reachable = context.into_reachable();
    debug!(reachable = reachable.len(), "breadth-first search completed");
    Ok(reachable)
}

/// Returns whether `target` is reachable from `start`.
///
/// `target == start` is trivially reachable. A `target` that is not a key of
/// the graph is unreachable rather than an error.
///
/// # Errors
/// Returns [`crate::GraphError::UnknownVertex`] when `start` is absent from the
/// graph, or propagates failures from [`reachable_from`].
///
/// # Examples
/// ```
/// use ustcon_core::{Graph, is_reachable};
///
/// let graph = Graph::from_adjacency([(1, vec![2]), (2, vec![1]), (3, vec![])]);
/// assert!(is_reachable(&graph, &1, &2).expect("1 exists"));
/// assert!(!is_reachable(&graph, &1, &3).expect("1 exists"));
/// assert!(is_reachable(&graph, &3, &3).expect("3 exists"));
/// ```
pub fn is_reachable<V: Vertex>(graph: &Graph<V>, start: &V, target: &V) -> Result<bool> {
    graph.neighbors(start)?;
    if start == target {
        return Ok(true);
    }
    Ok(reachable_from(graph, start)?.contains(target))
}

/// Partitions the vertex set into connected components.
///
/// Components are discovered in vertex insertion order, each by a fresh
/// breadth-first search from its first unassigned vertex. On an asymmetric
/// graph the result reflects forward reachability from those seeds only.
///
/// # Errors
/// Propagates [`crate::GraphError::UnknownVertex`] raised by a dangling
/// neighbour entry.
///
/// # Examples
/// ```
/// use ustcon_core::{Graph, connected_components};
///
/// let graph = Graph::from_adjacency([
///     ('A', vec!['B']),
///     ('B', vec!['A']),
///     ('C', vec!['D']),
///     ('D', vec!['C']),
/// ]);
/// let components = connected_components(&graph).expect("graph is well formed");
/// assert_eq!(components.len(), 2);
/// ```
pub fn connected_components<V: Vertex>(graph: &Graph<V>) -> Result<Vec<ReachableSet<V>>> {
    let mut assigned: HashSet<V> = HashSet::new();
    let mut components = Vec::new();
    for vertex in graph.vertices() {
        if assigned.contains(vertex) {
            continue;
        }
        let component = reachable_from(graph, vertex)?;
        assigned.extend(component.iter().cloned());
        components.push(component);
    }
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphBuilder, error::GraphErrorCode};

    fn lollipop() -> Graph<u32> {
        GraphBuilder::new()
            .with_edge(0, 1)
            .with_edge(1, 2)
            .with_edge(2, 0)
            .with_edge(2, 3)
            .with_edge(3, 4)
            .with_vertex(5)
            .build()
            .expect("lollipop must build")
    }

    #[test]
    fn context_visit_skips_seen_vertices() {
        let mut context = BfsContext::new();
        context.visit(1_u32);
        context.visit(1);
        assert_eq!(context.queue.len(), 1, "no duplicate visits should be queued");
    }

    #[test]
    fn exploration_is_level_ordered() {
        let reachable = reachable_from(&lollipop(), &0).expect("0 exists");
        assert_eq!(reachable.exploration_order(), &[0, 1, 2, 3, 4]);
        assert_eq!(reachable.len(), 5);
        assert!(!reachable.contains(&5));
    }

    #[test]
    fn isolated_start_reaches_only_itself() {
        let reachable = reachable_from(&lollipop(), &5).expect("5 exists");
        assert_eq!(reachable.exploration_order(), &[5]);
    }

    #[test]
    fn dangling_neighbour_surfaces_unknown_vertex() {
        let graph = Graph::from_adjacency([(0_u32, vec![1])]);
        let err = reachable_from(&graph, &0).expect_err("1 has no adjacency list");
        assert_eq!(err.code(), GraphErrorCode::UnknownVertex);
    }

    #[test]
    fn unknown_target_is_unreachable() {
        assert!(!is_reachable(&lollipop(), &0, &42).expect("0 exists"));
    }

    #[test]
    fn unknown_start_is_an_error_even_when_equal_to_target() {
        let err = is_reachable(&lollipop(), &42, &42).expect_err("42 is absent");
        assert_eq!(err.code(), GraphErrorCode::UnknownVertex);
    }

    #[test]
    fn components_partition_the_vertices() {
        let components = connected_components(&lollipop()).expect("well formed");
        let sizes: Vec<usize> = components.iter().map(ReachableSet::len).collect();
        assert_eq!(sizes, vec![5, 1]);
    }
}
