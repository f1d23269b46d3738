//! Adjacency-list graph representation shared by the reachability oracle and
//! the random-walk tester.
//!
//! A [`Graph`] maps each vertex to an ordered neighbour list. Storage is not
//! required to be symmetric; the algorithms assume the caller supplied an
//! undirected graph and only consume whatever lists are present. Vertices are
//! kept in insertion order so iteration and component discovery stay
//! deterministic across runs.

use std::{collections::HashMap, fmt, hash::Hash};

use tracing::debug;

use crate::error::{GraphError, Result, render_vertex};

/// Identifier requirements for graph vertices.
///
/// Implemented for every `Eq + Hash + Clone + Debug` type, so labels such as
/// `&str`, `String`, `char` or integer ids all qualify.
pub trait Vertex: Eq + Hash + Clone + fmt::Debug {}

impl<T> Vertex for T where T: Eq + Hash + Clone + fmt::Debug {}

/// Immutable adjacency-list graph.
///
/// # Examples
/// ```
/// use ustcon_core::GraphBuilder;
///
/// let graph = GraphBuilder::new()
///     .with_edge('A', 'B')
///     .with_vertex('C')
///     .build()
///     .expect("graph must build");
/// assert_eq!(graph.neighbors(&'A').expect("A exists"), &['B']);
/// assert!(graph.neighbors(&'C').expect("C exists").is_empty());
/// assert!(graph.neighbors(&'Z').is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Graph<V> {
    index: HashMap<V, usize>,
    entries: Vec<(V, Vec<V>)>,
}

impl<V: Vertex> Graph<V> {
    /// Builds a graph from `(vertex, neighbours)` pairs without validation.
    ///
    /// A vertex listed twice keeps its last adjacency list but its first
    /// position in iteration order.
    ///
    /// # Examples
    /// ```
    /// use ustcon_core::Graph;
    ///
    /// let graph = Graph::from_adjacency([(1_u32, vec![2]), (2, vec![1]), (3, vec![])]);
    /// assert_eq!(graph.vertex_count(), 3);
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    #[must_use]
    pub fn from_adjacency<I>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (V, Vec<V>)>,
    {
        let mut graph = Self::empty();
        for (vertex, neighbours) in adjacency {
            graph.upsert(vertex, neighbours);
        }
        graph
    }

    fn empty() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn upsert(&mut self, vertex: V, neighbours: Vec<V>) {
        match self.index.get(&vertex) {
            Some(&slot) => {
                if let Some(entry) = self.entries.get_mut(slot) {
                    entry.1 = neighbours;
                }
            }
            None => {
                self.index.insert(vertex.clone(), self.entries.len());
                self.entries.push((vertex, neighbours));
            }
        }
    }

    fn list_mut(&mut self, vertex: &V) -> Option<&mut Vec<V>> {
        let slot = *self.index.get(vertex)?;
        self.entries.get_mut(slot).map(|entry| &mut entry.1)
    }

    /// Returns the ordered adjacency list of `vertex`.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownVertex`] when `vertex` is not a key of the
    /// graph.
    pub fn neighbors(&self, vertex: &V) -> Result<&[V]> {
        self.index
            .get(vertex)
            .and_then(|&slot| self.entries.get(slot))
            .map(|(_, neighbours)| neighbours.as_slice())
            .ok_or_else(|| GraphError::unknown_vertex(vertex))
    }

    /// Returns `true` when `vertex` is a key of the graph.
    #[must_use]
    pub fn contains(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    /// Number of vertices (adjacency-mapping keys).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of adjacency-list entries across all vertices.
    #[must_use]
    pub fn adjacency_entries(&self) -> usize {
        self.entries.iter().map(|(_, list)| list.len()).sum()
    }

    /// Number of undirected edges, assuming every edge is stored in both
    /// directions.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency_entries() >> 1
    }

    /// Iterates over vertices in insertion order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.entries.iter().map(|(vertex, _)| vertex)
    }

    /// Checks that every adjacency entry names a known vertex and is mirrored
    /// by the reverse entry.
    ///
    /// Multi-edges are compared by presence only, so `A: [B, B]` paired with
    /// `B: [A]` is accepted.
    ///
    /// # Errors
    /// Returns [`GraphError::DanglingNeighbour`] for an entry naming a missing
    /// vertex and [`GraphError::AsymmetricEdge`] for a one-directional entry.
    /// The first offending entry in iteration order is reported.
    ///
    /// # Examples
    /// ```
    /// use ustcon_core::{Graph, GraphErrorCode};
    ///
    /// let graph = Graph::from_adjacency([('A', vec!['B']), ('B', vec![])]);
    /// let err = graph.validate_symmetry().expect_err("B does not list A");
    /// assert_eq!(err.code(), GraphErrorCode::AsymmetricEdge);
    /// ```
    pub fn validate_symmetry(&self) -> Result<()> {
        for (vertex, neighbours) in &self.entries {
            for neighbour in neighbours {
                let reverse = self.neighbors(neighbour).map_err(|_| {
                    GraphError::DanglingNeighbour {
                        vertex: render_vertex(vertex),
                        neighbour: render_vertex(neighbour),
                    }
                })?;
                if !reverse.contains(vertex) {
                    return Err(GraphError::AsymmetricEdge {
                        from: render_vertex(vertex),
                        to: render_vertex(neighbour),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Configures and constructs [`Graph`] instances.
///
/// Symmetry is trusted by default. Enable
/// [`with_symmetry_check`](Self::with_symmetry_check) to reject malformed
/// inputs when [`build`](Self::build) runs.
///
/// # Examples
/// ```
/// use ustcon_core::GraphBuilder;
///
/// let graph = GraphBuilder::new()
///     .with_adjacency("A", vec!["B", "C"])
///     .with_adjacency("B", vec!["A"])
///     .with_adjacency("C", vec!["A"])
///     .with_symmetry_check(true)
///     .build()
///     .expect("graph is symmetric");
/// assert_eq!(graph.edge_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct GraphBuilder<V> {
    graph: Graph<V>,
    check_symmetry: bool,
}

impl<V: Vertex> Default for GraphBuilder<V> {
    fn default() -> Self {
        Self {
            graph: Graph::empty(),
            check_symmetry: false,
        }
    }
}

impl<V: Vertex> GraphBuilder<V> {
    /// Creates an empty builder that trusts callers on symmetry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `vertex` with the given ordered neighbour list, replacing any
    /// list previously set for it.
    #[must_use]
    pub fn with_adjacency(mut self, vertex: V, neighbours: Vec<V>) -> Self {
        self.graph.upsert(vertex, neighbours);
        self
    }

    /// Adds `vertex` with an empty neighbour list unless it already exists.
    #[must_use]
    pub fn with_vertex(mut self, vertex: V) -> Self {
        if !self.graph.contains(&vertex) {
            self.graph.upsert(vertex, Vec::new());
        }
        self
    }

    /// Adds an undirected edge by appending each endpoint to the other's
    /// list. Missing endpoints are created. A self-loop is stored once.
    #[must_use]
    pub fn with_edge(self, left: V, right: V) -> Self {
        let mut builder = self.with_vertex(left.clone()).with_vertex(right.clone());
        if let Some(list) = builder.graph.list_mut(&left) {
            list.push(right.clone());
        }
        if left != right {
            if let Some(list) = builder.graph.list_mut(&right) {
                list.push(left);
            }
        }
        builder
    }

    /// Enables or disables eager symmetry validation in [`build`](Self::build).
    #[must_use]
    pub fn with_symmetry_check(mut self, enabled: bool) -> Self {
        self.check_symmetry = enabled;
        self
    }

    /// Returns whether [`build`](Self::build) validates symmetry.
    #[must_use]
    pub fn symmetry_check(&self) -> bool {
        self.check_symmetry
    }

    /// Finalises the graph.
    ///
    /// # Errors
    /// When the symmetry check is enabled, returns the first violation found by
    /// [`Graph::validate_symmetry`].
    pub fn build(self) -> Result<Graph<V>> {
        if self.check_symmetry {
            self.graph.validate_symmetry()?;
        }
        debug!(
            vertices = self.graph.vertex_count(),
            entries = self.graph.adjacency_entries(),
            checked = self.check_symmetry,
            "graph built"
        );
        Ok(self.graph)
    }
}
