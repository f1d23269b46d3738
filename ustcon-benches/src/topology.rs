//! Deterministic graph generators with known connectivity.
//!
//! Every generator produces a single connected component over the labels
//! `0..n` so walks between `0` and the last vertex always have a path.

use std::fmt;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use ustcon_core::{Graph, GraphBuilder};

use crate::error::BenchSetupError;

/// Seed used by [`Topology::RandomTree`] when none is supplied.
pub const DEFAULT_SEED: u64 = 42;

/// Graph families with contrasting cover times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    /// A simple path; cover time grows quadratically.
    Path,
    /// A ring; cover time grows quadratically.
    Cycle,
    /// A square lattice of `⌊√n⌋²` vertices.
    Grid,
    /// A clique of `n/2` vertices with a path tail; close to the cubic
    /// worst case.
    Lollipop,
    /// A random recursive tree plus `n` random chords.
    RandomTree,
}

impl Topology {
    /// Every topology, in benchmark order.
    pub const ALL: [Self; 5] = [
        Self::Path,
        Self::Cycle,
        Self::Grid,
        Self::Lollipop,
        Self::RandomTree,
    ];

    /// Builds a graph of this shape over about `vertices` vertices.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::TooLarge`] when `vertices` exceeds the
    /// `u32` label space, or [`BenchSetupError::Graph`] if the generated
    /// adjacency fails validation.
    pub fn build(self, vertices: usize) -> Result<Graph<u32>, BenchSetupError> {
        let n = u32::try_from(vertices).map_err(|_| BenchSetupError::TooLarge { vertices })?;
        let builder = match self {
            Self::Path => path(n),
            Self::Cycle => cycle(n),
            Self::Grid => grid(n),
            Self::Lollipop => lollipop(n),
            Self::RandomTree => random_tree(n, DEFAULT_SEED),
        };
        Ok(builder.with_symmetry_check(true).build()?)
    }

    /// Label of the vertex farthest from `0` along the construction order.
    #[must_use]
    pub fn far_vertex(graph: &Graph<u32>) -> u32 {
        graph.vertices().copied().max().unwrap_or(0)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Path => "path",
            Self::Cycle => "cycle",
            Self::Grid => "grid",
            Self::Lollipop => "lollipop",
            Self::RandomTree => "random_tree",
        };
        f.write_str(name)
    }
}

fn seeded(n: u32) -> GraphBuilder<u32> {
    if n == 0 {
        GraphBuilder::new()
    } else {
        GraphBuilder::new().with_vertex(0)
    }
}

fn path(n: u32) -> GraphBuilder<u32> {
    (1..n).fold(seeded(n), |builder, v| builder.with_edge(v - 1, v))
}

fn cycle(n: u32) -> GraphBuilder<u32> {
    let builder = path(n);
    if n > 2 {
        builder.with_edge(n - 1, 0)
    } else {
        builder
    }
}

fn grid(n: u32) -> GraphBuilder<u32> {
    let side = n.isqrt();
    let mut builder = seeded(side);
    for row in 0..side {
        for col in 0..side {
            let v = row * side + col;
            builder = builder.with_vertex(v);
            if col + 1 < side {
                builder = builder.with_edge(v, v + 1);
            }
            if row + 1 < side {
                builder = builder.with_edge(v, v + side);
            }
        }
    }
    builder
}

fn lollipop(n: u32) -> GraphBuilder<u32> {
    let clique = (n >> 1).max(1).min(n);
    let mut builder = seeded(n);
    for u in 0..clique {
        for v in (u + 1)..clique {
            builder = builder.with_edge(u, v);
        }
    }
    (clique..n).fold(builder, |builder, v| builder.with_edge(v - 1, v))
}

fn random_tree(n: u32, seed: u64) -> GraphBuilder<u32> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let builder = (1..n).fold(seeded(n), |builder, v| {
        let parent = rng.gen_range(0..v);
        builder.with_edge(parent, v)
    });
    if n < 2 {
        return builder;
    }
    (0..n).fold(builder, |builder, _| {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u == v {
            builder
        } else {
            builder.with_edge(u, v)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use ustcon_core::{connected_components, is_reachable};

    #[rstest]
    #[case(Topology::Path, 10, 10, 9)]
    #[case(Topology::Cycle, 10, 10, 10)]
    #[case(Topology::Grid, 10, 9, 12)]
    #[case(Topology::Lollipop, 10, 10, 15)]
    fn generators_have_expected_size(
        #[case] topology: Topology,
        #[case] requested: usize,
        #[case] vertices: usize,
        #[case] edges: usize,
    ) {
        let graph = topology.build(requested).expect("generator must build");
        assert_eq!(graph.vertex_count(), vertices);
        assert_eq!(graph.edge_count(), edges);
    }

    #[rstest]
    fn every_topology_is_connected(
        #[values(
            Topology::Path,
            Topology::Cycle,
            Topology::Grid,
            Topology::Lollipop,
            Topology::RandomTree
        )]
        topology: Topology,
        #[values(1, 2, 17, 64)] requested: usize,
    ) {
        let graph = topology.build(requested).expect("generator must build");
        let components = connected_components(&graph).expect("graph is well formed");
        assert_eq!(components.len(), 1);
        let far = Topology::far_vertex(&graph);
        assert!(is_reachable(&graph, &0, &far).expect("0 exists"));
    }

    #[test]
    fn empty_request_builds_an_empty_graph() {
        let graph = Topology::Path.build(0).expect("generator must build");
        assert!(graph.is_empty());
    }
}
