//! Benchmark parameter types.

use std::fmt;

use crate::topology::Topology;

/// Parameters for a single graph benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct GraphBenchParams {
    /// Shape of the generated graph.
    pub topology: Topology,
    /// Number of vertices requested from the generator.
    pub vertex_count: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/n={}", self.topology, self.vertex_count)
    }
}

/// Parameters for a trial-harness benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct TrialBenchParams {
    /// Number of vertices in the generated graph.
    pub vertex_count: usize,
    /// Number of independent walks.
    pub trials: usize,
}

impl fmt::Display for TrialBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},trials={}", self.vertex_count, self.trials)
    }
}
