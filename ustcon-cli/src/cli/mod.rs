//! Command-line interface for exploring s-t connectivity on JSON graphs.
//!
//! `reach` answers with breadth-first search, `walk` runs a single random walk
//! and `trials` measures the walk's empirical failure rate against the exact
//! answer.

mod commands;
mod graph_file;

pub use commands::{
    BudgetArg, Cli, CliError, Command, QueryArgs, ReachCommand, Summary, TrialsCommand,
    WalkCommand, render_summary, run_cli,
};
pub use graph_file::load_graph;
