//! Benchmark support crate for ustcon.
//!
//! Provides deterministic graph generators and parameter types used by the
//! Criterion benchmarks for breadth-first search, single walks and the trial
//! harness.

pub mod error;
pub mod params;
pub mod topology;
