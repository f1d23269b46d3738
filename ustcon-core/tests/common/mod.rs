//! Graph fixtures shared by the integration suites.
#![allow(
    dead_code,
    reason = "each integration test binary uses a different subset of fixtures"
)]

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use test_strategy::Arbitrary;
use ustcon_core::{Graph, GraphBuilder};

/// Seven-vertex graph with one isolated vertex `G`.
pub fn lettered_graph() -> Graph<&'static str> {
    Graph::from_adjacency([
        ("A", vec!["B", "C"]),
        ("B", vec!["A", "D", "E"]),
        ("C", vec!["A", "F"]),
        ("D", vec!["B"]),
        ("E", vec!["B", "F"]),
        ("F", vec!["C", "E"]),
        ("G", vec![]),
    ])
}

/// Two disjoint edges `A-B` and `C-D`.
pub fn two_pairs() -> Graph<&'static str> {
    Graph::from_adjacency([
        ("A", vec!["B"]),
        ("B", vec!["A"]),
        ("C", vec!["D"]),
        ("D", vec!["C"]),
    ])
}

/// Path `0 - 1 - … - (n-1)`.
pub fn path(n: u32) -> Graph<u32> {
    (1..n)
        .fold(GraphBuilder::new().with_vertex(0), |builder, v| {
            builder.with_edge(v - 1, v)
        })
        .build()
        .expect("path must build")
}

/// Cycle over `n >= 3` vertices.
pub fn cycle(n: u32) -> Graph<u32> {
    (0..n)
        .fold(GraphBuilder::new(), |builder, v| {
            builder.with_edge(v, (v + 1) % n)
        })
        .build()
        .expect("cycle must build")
}

/// Complete graph over `n` vertices.
pub fn complete(n: u32) -> Graph<u32> {
    let mut builder = (0..n).fold(GraphBuilder::new(), GraphBuilder::with_vertex);
    for u in 0..n {
        for v in (u + 1)..n {
            builder = builder.with_edge(u, v);
        }
    }
    builder.build().expect("complete graph must build")
}

/// Clique on `0..clique` with a path hanging off vertex `clique - 1`, ending
/// at `clique + tail - 1`. The classic worst case for cover time.
pub fn lollipop(clique: u32, tail: u32) -> Graph<u32> {
    let mut builder = (0..clique).fold(GraphBuilder::new(), GraphBuilder::with_vertex);
    for u in 0..clique {
        for v in (u + 1)..clique {
            builder = builder.with_edge(u, v);
        }
    }
    for v in clique..clique + tail {
        builder = builder.with_edge(v - 1, v);
    }
    builder.build().expect("lollipop must build")
}

/// Family of randomly generated symmetric graphs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub enum GraphShape {
    /// Random spanning tree plus few extra edges; always connected.
    #[weight(3)]
    Sparse,
    /// Each pair joined with probability one half; may be disconnected.
    #[weight(2)]
    Dense,
    /// Two connected halves with no edge between them.
    #[weight(3)]
    TwoComponents,
    /// Connected sparse graph plus isolated vertices.
    #[weight(1)]
    WithIsolated,
}

/// Generated graph with its shape and vertex count.
#[derive(Clone, Debug)]
pub struct GraphFixture {
    pub shape: GraphShape,
    pub vertices: u32,
    pub graph: Graph<u32>,
}

pub fn fixture_strategy() -> impl Strategy<Value = GraphFixture> {
    (any::<GraphShape>(), 2_u32..=12, any::<u64>())
        .prop_map(|(shape, vertices, seed)| generate_fixture(shape, vertices, seed))
}

/// Fixture together with two vertex ids drawn from it.
pub fn fixture_with_pair() -> impl Strategy<Value = (GraphFixture, u32, u32)> {
    fixture_strategy().prop_flat_map(|fixture| {
        let n = fixture.vertices;
        (Just(fixture), 0..n, 0..n)
    })
}

pub fn generate_fixture(shape: GraphShape, vertices: u32, seed: u64) -> GraphFixture {
    let mut rng = SmallRng::seed_from_u64(seed);
    let builder = (0..vertices).fold(GraphBuilder::new(), GraphBuilder::with_vertex);
    let builder = match shape {
        GraphShape::Sparse => connect_range(builder, 0..vertices, 0.1, &mut rng),
        GraphShape::Dense => random_pairs(builder, 0..vertices, 0.5, &mut rng),
        GraphShape::TwoComponents => {
            let split = vertices / 2;
            let left = connect_range(builder, 0..split, 0.2, &mut rng);
            connect_range(left, split..vertices, 0.2, &mut rng)
        }
        GraphShape::WithIsolated => {
            let connected = vertices - vertices / 3;
            connect_range(builder, 0..connected, 0.1, &mut rng)
        }
    };
    GraphFixture {
        shape,
        vertices,
        graph: builder
            .with_symmetry_check(true)
            .build()
            .expect("generated graphs are symmetric"),
    }
}

/// Adds a random spanning tree over `range` plus extra edges with
/// probability `extra`.
fn connect_range(
    builder: GraphBuilder<u32>,
    range: std::ops::Range<u32>,
    extra: f64,
    rng: &mut SmallRng,
) -> GraphBuilder<u32> {
    let start = range.start;
    let with_tree = (start + 1..range.end).fold(builder, |builder, v| {
        let parent = rng.gen_range(start..v);
        builder.with_edge(parent, v)
    });
    random_pairs(with_tree, range, extra, rng)
}

fn random_pairs(
    builder: GraphBuilder<u32>,
    range: std::ops::Range<u32>,
    probability: f64,
    rng: &mut SmallRng,
) -> GraphBuilder<u32> {
    let mut builder = builder;
    for u in range.clone() {
        for v in (u + 1)..range.end {
            if rng.gen_bool(probability) {
                builder = builder.with_edge(u, v);
            }
        }
    }
    builder
}

/// Snapshot of every adjacency list, for checking that queries leave the
/// graph untouched.
pub fn snapshot<V: ustcon_core::Vertex>(graph: &Graph<V>) -> Vec<(V, Vec<V>)> {
    graph
        .vertices()
        .map(|vertex| {
            let neighbours = graph.neighbors(vertex).expect("listed vertices exist");
            (vertex.clone(), neighbours.to_vec())
        })
        .collect()
}
