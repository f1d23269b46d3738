//! Monte Carlo trial harness for the random-walk tester.
//!
//! Runs many independent walks between the same pair of vertices and
//! compares the empirical outcome with the breadth-first oracle. Each trial
//! derives its own generator from the harness seed and the trial index, so a
//! report is identical whether trials run sequentially or across rayon
//! workers.

use std::num::NonZeroUsize;

use rand::{SeedableRng, rngs::SmallRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    budget::StepBudget,
    error::{GraphError, HarnessError},
    graph::{Graph, Vertex},
    reachability::reachable_from,
    walk::walk,
};

/// SplitMix64 increment (the 64-bit golden ratio) used for per-trial seed
/// derivation.
const TRIAL_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

const DEFAULT_TRIALS: usize = 10_000;
const DEFAULT_SEED: u64 = 0x5EED_CAFE;

#[inline]
fn trial_seed(base_seed: u64, trial: usize) -> u64 {
    splitmix64(base_seed ^ ((trial as u64).wrapping_add(1).wrapping_mul(TRIAL_SEED_SPACING)))
}

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(TRIAL_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// Indicates how [`TrialHarness::run`] schedules trials.
///
/// `Auto` uses rayon when the `parallel` feature is compiled in and runs
/// sequentially otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Allow the library to select an appropriate backend automatically.
    Auto,
    /// Run every trial on the calling thread.
    Sequential,
    /// Distribute trials across the rayon thread pool.
    Parallel,
}

/// Configures and constructs [`TrialHarness`] instances.
///
/// # Examples
/// ```
/// use ustcon_core::{ExecutionStrategy, StepBudget, TrialHarnessBuilder};
///
/// let harness = TrialHarnessBuilder::new()
///     .with_trials(500)
///     .with_step_budget(StepBudget::Linear)
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(harness.trials().get(), 500);
/// assert_eq!(harness.step_budget(), StepBudget::Linear);
/// ```
#[derive(Debug, Clone)]
pub struct TrialHarnessBuilder {
    trials: usize,
    step_budget: StepBudget,
    seed: u64,
    execution_strategy: ExecutionStrategy,
}

impl Default for TrialHarnessBuilder {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            step_budget: StepBudget::CoverTime,
            seed: DEFAULT_SEED,
            execution_strategy: ExecutionStrategy::Auto,
        }
    }
}

impl TrialHarnessBuilder {
    /// Creates a builder with 10,000 cover-time trials and a fixed seed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of independent trials.
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Returns the configured number of trials.
    #[must_use]
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Sets the rule used to pick each walk's step budget.
    #[must_use]
    pub fn with_step_budget(mut self, budget: StepBudget) -> Self {
        self.step_budget = budget;
        self
    }

    /// Seeds the per-trial generators.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the execution strategy used when running trials.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Validates the configuration and constructs a [`TrialHarness`].
    ///
    /// # Errors
    /// Returns [`HarnessError::InvalidTrialCount`] when the trial count is
    /// zero.
    pub fn build(self) -> Result<TrialHarness, HarnessError> {
        let trials = NonZeroUsize::new(self.trials).ok_or(HarnessError::InvalidTrialCount {
            got: self.trials,
        })?;
        Ok(TrialHarness {
            trials,
            step_budget: self.step_budget,
            seed: self.seed,
            execution_strategy: self.execution_strategy,
        })
    }
}

/// Runs repeated independent walks and aggregates their outcomes.
#[derive(Debug, Clone)]
pub struct TrialHarness {
    trials: NonZeroUsize,
    step_budget: StepBudget,
    seed: u64,
    execution_strategy: ExecutionStrategy,
}

impl TrialHarness {
    /// Number of trials per run.
    #[must_use]
    pub fn trials(&self) -> NonZeroUsize {
        self.trials
    }

    /// Step-budget rule applied to each walk.
    #[must_use]
    pub fn step_budget(&self) -> StepBudget {
        self.step_budget
    }

    /// Base seed for the per-trial generators.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Execution strategy used by [`run`](Self::run).
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Runs every trial from `start` towards `target`.
    ///
    /// The oracle answer and the component size come from a breadth-first
    /// search from `start`; the step budget is resolved against that size.
    ///
    /// # Errors
    /// Returns [`HarnessError::Graph`] when `start` is absent or the graph has
    /// dangling neighbours, [`HarnessError::StepBudgetOverflow`] when the
    /// budget does not fit in a `u64`, and [`HarnessError::BackendUnavailable`]
    /// when parallel execution is requested without the `parallel` feature.
    ///
    /// # Examples
    /// ```
    /// use ustcon_core::{Graph, TrialHarnessBuilder};
    ///
    /// let graph = Graph::from_adjacency([('A', vec!['B']), ('B', vec!['A']), ('C', vec![])]);
    /// let harness = TrialHarnessBuilder::new().with_trials(100).build().expect("valid");
    /// let report = harness.run(&graph, &'A', &'C').expect("A exists");
    /// assert!(!report.connected());
    /// assert_eq!(report.successes(), 0);
    /// assert_eq!(report.false_positives(), 0);
    /// ```
    #[instrument(
        name = "core.trials",
        err,
        skip_all,
        fields(
            trials = self.trials.get(),
            seed = self.seed,
            strategy = ?self.execution_strategy
        ),
    )]
    pub fn run<V: Vertex + Sync>(
        &self,
        graph: &Graph<V>,
        start: &V,
        target: &V,
    ) -> Result<TrialReport, HarnessError> {
        let component = reachable_from(graph, start)?;
        let connected = component.contains(target);
        let max_steps = self.step_budget.resolve(component.len())?;

        let successes = match self.execution_strategy {
            ExecutionStrategy::Sequential => {
                self.run_sequential(graph, start, target, max_steps)?
            }
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Auto | ExecutionStrategy::Parallel => {
                self.run_parallel(graph, start, target, max_steps)?
            }
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Auto => self.run_sequential(graph, start, target, max_steps)?,
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Parallel => {
                return Err(HarnessError::BackendUnavailable {
                    requested: ExecutionStrategy::Parallel,
                });
            }
        };

        let report = TrialReport {
            trials: self.trials.get(),
            successes,
            max_steps,
            component_size: component.len(),
            connected,
        };
        record_metrics(&report);
        info!(
            successes = report.successes,
            failures = report.failures(),
            max_steps = report.max_steps,
            connected = report.connected,
            "trials completed"
        );
        Ok(report)
    }

    fn run_trial<V: Vertex>(
        &self,
        graph: &Graph<V>,
        start: &V,
        target: &V,
        max_steps: u64,
        trial: usize,
    ) -> Result<bool, GraphError> {
        let mut rng = SmallRng::seed_from_u64(trial_seed(self.seed, trial));
        walk(graph, start, target, max_steps, &mut rng)
    }

    fn run_sequential<V: Vertex>(
        &self,
        graph: &Graph<V>,
        start: &V,
        target: &V,
        max_steps: u64,
    ) -> Result<usize, GraphError> {
        (0..self.trials.get()).try_fold(0_usize, |successes, trial| {
            let reached = self.run_trial(graph, start, target, max_steps, trial)?;
            Ok(successes + usize::from(reached))
        })
    }

    #[cfg(feature = "parallel")]
    fn run_parallel<V: Vertex + Sync>(
        &self,
        graph: &Graph<V>,
        start: &V,
        target: &V,
        max_steps: u64,
    ) -> Result<usize, GraphError> {
        (0..self.trials.get())
            .into_par_iter()
            .map(|trial| {
                self.run_trial(graph, start, target, max_steps, trial)
                    .map(usize::from)
            })
            .try_reduce(|| 0, |left, right| Ok(left + right))
    }
}

#[cfg(feature = "metrics")]
fn record_metrics(report: &TrialReport) {
    metrics::counter!("ustcon_trials_total").increment(report.trials as u64);
    metrics::counter!("ustcon_trial_failures_total").increment(report.failures() as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_metrics(_report: &TrialReport) {}

/// Aggregated outcome of a [`TrialHarness::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialReport {
    trials: usize,
    successes: usize,
    max_steps: u64,
    component_size: usize,
    connected: bool,
}

impl TrialReport {
    /// Number of walks performed.
    #[must_use]
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Walks that reached the target.
    #[must_use]
    pub fn successes(&self) -> usize {
        self.successes
    }

    /// Walks that did not reach the target.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.trials - self.successes
    }

    /// Step budget each walk ran with.
    #[must_use]
    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }

    /// Size of the component containing the start vertex.
    #[must_use]
    pub fn component_size(&self) -> usize {
        self.component_size
    }

    /// Oracle answer from breadth-first search.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Fraction of walks that did not reach the target.
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        self.failures() as f64 / self.trials as f64
    }

    /// Walks that reported success although the oracle says the vertices are
    /// disconnected. Always zero for a correct tester.
    #[must_use]
    pub fn false_positives(&self) -> usize {
        if self.connected { 0 } else { self.successes }
    }

    /// Walks that failed although the oracle says the vertices are connected.
    #[must_use]
    pub fn false_negatives(&self) -> usize {
        if self.connected { self.failures() } else { 0 }
    }

    /// Empirical false-negative rate, or `None` when the vertices are
    /// disconnected and no false negative is possible.
    #[must_use]
    pub fn false_negative_rate(&self) -> Option<f64> {
        self.connected.then(|| self.failure_rate())
    }
}
