//! Randomized log-space s-t connectivity for undirected graphs.
//!
//! [`walk`] decides whether two vertices are connected by running a bounded
//! random walk, with one-sided error: it never reports a path that does not
//! exist, and with a budget of [`cover_time_bound`] steps it misses an
//! existing path with probability at most one half. [`reachable_from`] and
//! [`is_reachable`] provide the exact breadth-first answer used to check it,
//! and [`TrialHarness`] measures empirical failure rates over many seeded
//! trials.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod budget;
mod error;
mod graph;
mod harness;
mod reachability;
mod walk;

pub use crate::{
    budget::{StepBudget, cover_time_bound},
    error::{GraphError, GraphErrorCode, HarnessError, HarnessErrorCode, Result},
    graph::{Graph, GraphBuilder, Vertex},
    harness::{ExecutionStrategy, TrialHarness, TrialHarnessBuilder, TrialReport},
    reachability::{ReachableSet, connected_components, is_reachable, reachable_from},
    walk::{WalkOutcome, Walker, walk, walk_outcome},
};
