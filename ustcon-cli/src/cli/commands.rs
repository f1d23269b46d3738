//! Command implementations and argument parsing for the ustcon CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};
use ustcon_core::{
    ExecutionStrategy, GraphError, HarnessError, StepBudget, TrialHarnessBuilder, TrialReport,
    WalkOutcome, Walker, reachable_from,
};

use super::graph_file::load_graph;

const DEFAULT_TRIALS: usize = 10_000;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "ustcon",
    about = "Decide undirected s-t connectivity with random walks and breadth-first search."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Answer exactly with breadth-first search.
    Reach(ReachCommand),
    /// Run a single bounded random walk.
    Walk(WalkCommand),
    /// Run many seeded walks and compare with the exact answer.
    Trials(TrialsCommand),
}

/// Graph and vertex pair shared by every command.
#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    /// Path to a JSON object mapping each vertex to its neighbour list.
    pub graph: PathBuf,

    /// Start vertex.
    #[arg(long)]
    pub from: String,

    /// Target vertex.
    #[arg(long)]
    pub to: String,

    /// Reject graphs whose edges are not stored in both directions.
    #[arg(long)]
    pub strict: bool,
}

/// Step-budget rules selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BudgetArg {
    /// `2·n³` steps.
    Cover,
    /// `n` steps.
    Linear,
}

impl BudgetArg {
    fn resolve(self, max_steps: Option<u64>) -> StepBudget {
        match (max_steps, self) {
            (Some(steps), _) => StepBudget::Fixed(steps),
            (None, Self::Cover) => StepBudget::CoverTime,
            (None, Self::Linear) => StepBudget::Linear,
        }
    }
}

/// Options accepted by the `reach` command.
#[derive(Debug, Args, Clone)]
pub struct ReachCommand {
    /// Graph and vertex pair.
    #[command(flatten)]
    pub query: QueryArgs,
}

/// Options accepted by the `walk` command.
#[derive(Debug, Args, Clone)]
pub struct WalkCommand {
    /// Graph and vertex pair.
    #[command(flatten)]
    pub query: QueryArgs,

    /// Budget rule, resolved against the graph's vertex count.
    #[arg(long, value_enum, default_value_t = BudgetArg::Cover)]
    pub budget: BudgetArg,

    /// Explicit step budget, overriding `--budget`.
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Generator seed; drawn at random and reported when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print every visited vertex.
    #[arg(long)]
    pub trace: bool,
}

/// Options accepted by the `trials` command.
#[derive(Debug, Args, Clone)]
pub struct TrialsCommand {
    /// Graph and vertex pair.
    #[command(flatten)]
    pub query: QueryArgs,

    /// Number of independent walks.
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    pub trials: usize,

    /// Budget rule, resolved against the start vertex's component size.
    #[arg(long, value_enum, default_value_t = BudgetArg::Cover)]
    pub budget: BudgetArg,

    /// Explicit step budget, overriding `--budget`.
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Base seed for the per-trial generators.
    #[arg(long, default_value_t = 0x5EED_CAFE)]
    pub seed: u64,

    /// Run every trial on the calling thread.
    #[arg(long)]
    pub sequential: bool,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while loading a graph.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The graph file was not a JSON object of string arrays.
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A graph lookup or validation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// The trial harness rejected its configuration or failed.
    #[error(transparent)]
    Harness(#[from] HarnessError),
}

impl CliError {
    /// Stable machine-readable code of the underlying library error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Graph(error) => Some(error.code().as_str()),
            Self::Harness(error) => Some(error.code().as_str()),
            Self::Io { .. } | Self::Parse { .. } => None,
        }
    }
}

/// Outcome of a CLI command, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// Exact breadth-first answer.
    Reach {
        /// Start vertex.
        from: String,
        /// Target vertex.
        to: String,
        /// Whether `to` is reachable from `from`.
        reachable: bool,
        /// Size of the component containing `from`.
        component_size: usize,
    },
    /// A single random walk.
    Walk {
        /// Start vertex.
        from: String,
        /// Target vertex.
        to: String,
        /// Budget the walk ran with.
        max_steps: u64,
        /// Seed that reproduces the walk.
        seed: u64,
        /// How the walk terminated.
        outcome: WalkOutcome,
        /// Visited vertices, when tracing was requested.
        path: Option<Vec<String>>,
    },
    /// Aggregated trials.
    Trials {
        /// Start vertex.
        from: String,
        /// Target vertex.
        to: String,
        /// Base seed of the run.
        seed: u64,
        /// Aggregated report.
        report: TrialReport,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the graph or running the command fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use ustcon_cli::cli::{Cli, Command, QueryArgs, ReachCommand, Summary, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), r#"{"A": ["B"], "B": ["A"], "C": []}"#)?;
/// let cli = Cli {
///     command: Command::Reach(ReachCommand {
///         query: QueryArgs {
///             graph: file.path().to_path_buf(),
///             from: "A".into(),
///             to: "C".into(),
///             strict: true,
///         },
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert!(matches!(summary, Summary::Reach { reachable: false, component_size: 2, .. }));
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<Summary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Reach(command) => {
            span.record("command", field::display("reach"));
            run_reach(command)
        }
        Command::Walk(command) => {
            span.record("command", field::display("walk"));
            run_walk(command)
        }
        Command::Trials(command) => {
            span.record("command", field::display("trials"));
            run_trials(command)
        }
    }
}

pub(super) fn run_reach(command: ReachCommand) -> Result<Summary, CliError> {
    let QueryArgs {
        graph,
        from,
        to,
        strict,
    } = command.query;
    let graph = load_graph(&graph, strict)?;
    let component = reachable_from(&graph, &from)?;
    let reachable = component.contains(&to);
    info!(reachable, component_size = component.len(), "reach completed");
    Ok(Summary::Reach {
        from,
        to,
        reachable,
        component_size: component.len(),
    })
}

#[instrument(
    name = "cli.walk",
    err,
    skip(command),
    fields(max_steps = field::Empty, seed = field::Empty),
)]
pub(super) fn run_walk(command: WalkCommand) -> Result<Summary, CliError> {
    let WalkCommand {
        query,
        budget,
        max_steps,
        seed,
        trace,
    } = command;
    let graph = load_graph(&query.graph, query.strict)?;
    let max_steps = budget.resolve(max_steps).resolve(graph.vertex_count())?;
    let seed = seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    let span = Span::current();
    span.record("max_steps", max_steps);
    span.record("seed", seed);

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut walker = Walker::new(&graph, &query.from, &query.to, max_steps, &mut rng)?;
    let mut path = trace.then(Vec::new);
    for vertex in walker.by_ref() {
        let vertex = vertex?;
        if let Some(path) = path.as_mut() {
            path.push(vertex.clone());
        }
    }
    let outcome = walker
        .outcome()
        .unwrap_or(WalkOutcome::StepLimit { steps: walker.steps() });
    info!(success = outcome.is_success(), steps = outcome.steps(), "walk completed");
    Ok(Summary::Walk {
        from: query.from,
        to: query.to,
        max_steps,
        seed,
        outcome,
        path,
    })
}

#[instrument(name = "cli.trials", err, skip(command), fields(trials = command.trials))]
pub(super) fn run_trials(command: TrialsCommand) -> Result<Summary, CliError> {
    let TrialsCommand {
        query,
        trials,
        budget,
        max_steps,
        seed,
        sequential,
    } = command;
    let strategy = if sequential {
        ExecutionStrategy::Sequential
    } else {
        ExecutionStrategy::Auto
    };
    let harness = TrialHarnessBuilder::new()
        .with_trials(trials)
        .with_step_budget(budget.resolve(max_steps))
        .with_seed(seed)
        .with_execution_strategy(strategy)
        .build()?;
    let graph = load_graph(&query.graph, query.strict)?;
    let report = harness.run(&graph, &query.from, &query.to)?;
    Ok(Summary::Trials {
        from: query.from,
        to: query.to,
        seed,
        report,
    })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use ustcon_cli::cli::{Summary, render_summary};
/// let summary = Summary::Reach {
///     from: "A".into(),
///     to: "F".into(),
///     reachable: true,
///     component_size: 6,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer).expect("writing to a Vec succeeds");
/// assert_eq!(
///     String::from_utf8(buffer).expect("utf-8"),
///     "A -> F: reachable\ncomponent size: 6\n"
/// );
/// ```
pub fn render_summary(summary: &Summary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        Summary::Reach {
            from,
            to,
            reachable,
            component_size,
        } => {
            let verdict = if *reachable { "reachable" } else { "unreachable" };
            writeln!(writer, "{from} -> {to}: {verdict}")?;
            writeln!(writer, "component size: {component_size}")?;
        }
        Summary::Walk {
            from,
            to,
            max_steps,
            seed,
            outcome,
            path,
        } => {
            let verdict = match outcome {
                WalkOutcome::Reached { .. } => "reached",
                WalkOutcome::StepLimit { .. } => "step limit",
                WalkOutcome::DeadEnd { .. } => "dead end",
            };
            writeln!(writer, "{from} -> {to}: {verdict} after {} steps", outcome.steps())?;
            writeln!(writer, "max steps: {max_steps}")?;
            writeln!(writer, "seed: {seed}")?;
            if let Some(path) = path {
                writeln!(writer, "path: {}", path.join(" "))?;
            }
        }
        Summary::Trials {
            from,
            to,
            seed,
            report,
        } => {
            let verdict = if report.connected() {
                "connected"
            } else {
                "disconnected"
            };
            writeln!(writer, "{from} -> {to}: {verdict}")?;
            writeln!(writer, "component size: {}", report.component_size())?;
            writeln!(writer, "max steps: {}", report.max_steps())?;
            writeln!(writer, "seed: {seed}")?;
            writeln!(
                writer,
                "trials: {}\tsuccesses: {}\tfailures: {}",
                report.trials(),
                report.successes(),
                report.failures()
            )?;
            writeln!(writer, "failure rate: {:.4}", report.failure_rate())?;
            writeln!(writer, "false positives: {}", report.false_positives())?;
        }
    }
    Ok(())
}
