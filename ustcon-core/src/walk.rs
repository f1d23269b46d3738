//! Space-bounded randomized s-t connectivity.
//!
//! A walk starts at `s` and repeatedly moves to a uniformly random neighbour
//! of the current vertex until it hits `t` or exhausts its step budget. The
//! only state is the current vertex and a step counter, which is what makes
//! the procedure log-space in the vertex count.
//!
//! The error is one-sided. When `s` and `t` lie in different components the
//! walk can never report success. When they share a component of `n`
//! vertices and the budget is at least `2·n³`, the walk fails with
//! probability at most one half: the component's cover time is at most
//! `2·|E|·(|V| - 1) ≤ n³`, and Markov's inequality bounds the chance that
//! covering takes more than twice its expectation.

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, instrument, trace};

use crate::{
    error::Result,
    graph::{Graph, Vertex},
};

/// How a walk terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WalkOutcome {
    /// The target was visited after `steps` transitions.
    Reached {
        /// Transitions taken before the target was reached.
        steps: u64,
    },
    /// The step budget ran out before the target was visited.
    StepLimit {
        /// Transitions taken, equal to the budget.
        steps: u64,
    },
    /// The walk stood on a non-target vertex with no neighbours.
    DeadEnd {
        /// Transitions taken before the dead end was hit.
        steps: u64,
    },
}

impl WalkOutcome {
    /// Returns `true` only when the target was reached.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Reached { .. })
    }

    /// Number of transitions the walk performed.
    #[must_use]
    pub const fn steps(self) -> u64 {
        match self {
            Self::Reached { steps } | Self::StepLimit { steps } | Self::DeadEnd { steps } => steps,
        }
    }
}

enum Step<'a, V> {
    Moved(&'a V),
    Finished(WalkOutcome),
}

/// Lazy random walk yielding each visited vertex.
///
/// The first item is the start vertex; each further item is the vertex
/// entered by one transition. Once the iterator returns `None`,
/// [`outcome`](Self::outcome) reports why the walk stopped. An `Err` item
/// ends the walk without an outcome.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use ustcon_core::{Graph, WalkOutcome, Walker};
///
/// let graph = Graph::from_adjacency([('A', vec!['B']), ('B', vec!['A'])]);
/// let mut rng = SmallRng::seed_from_u64(7);
/// let mut walker = Walker::new(&graph, &'A', &'B', 10, &mut rng).expect("A exists");
/// let path: Vec<char> = walker.by_ref().map(|v| v.map(|v| *v)).collect::<Result<_, _>>()
///     .expect("graph is well formed");
/// assert_eq!(path, vec!['A', 'B']);
/// assert_eq!(walker.outcome(), Some(WalkOutcome::Reached { steps: 1 }));
/// ```
pub struct Walker<'a, V: Vertex, R: Rng + ?Sized> {
    graph: &'a Graph<V>,
    target: &'a V,
    current: &'a V,
    steps: u64,
    max_steps: u64,
    rng: &'a mut R,
    emitted_start: bool,
    finished: bool,
    outcome: Option<WalkOutcome>,
}

impl<'a, V: Vertex, R: Rng + ?Sized> Walker<'a, V, R> {
    /// Prepares a walk from `start` towards `target` with at most `max_steps`
    /// transitions.
    ///
    /// # Errors
    /// Returns [`crate::GraphError::UnknownVertex`] when `start` is absent from
    /// the graph.
    pub fn new(
        graph: &'a Graph<V>,
        start: &'a V,
        target: &'a V,
        max_steps: u64,
        rng: &'a mut R,
    ) -> Result<Self> {
        graph.neighbors(start)?;
        Ok(Self {
            graph,
            target,
            current: start,
            steps: 0,
            max_steps,
            rng,
            emitted_start: false,
            finished: false,
            outcome: None,
        })
    }

    /// Returns the termination reason once the walk has finished.
    #[must_use]
    pub fn outcome(&self) -> Option<WalkOutcome> {
        self.outcome
    }

    /// Transitions taken so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn finish(&mut self, outcome: WalkOutcome) -> Step<'a, V> {
        self.finished = true;
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }

    fn advance(&mut self) -> Result<Step<'a, V>> {
        if let Some(outcome) = self.outcome {
            return Ok(Step::Finished(outcome));
        }
        // The target check precedes the budget check, so `s == t` succeeds
        // with a zero budget.
        if self.current == self.target {
            return Ok(self.finish(WalkOutcome::Reached { steps: self.steps }));
        }
        if self.steps >= self.max_steps {
            return Ok(self.finish(WalkOutcome::StepLimit { steps: self.steps }));
        }
        let neighbours = self.graph.neighbors(self.current)?;
        let Some(next) = neighbours.choose(&mut *self.rng) else {
            return Ok(self.finish(WalkOutcome::DeadEnd { steps: self.steps }));
        };
        self.steps += 1;
        self.current = next;
        trace!(step = self.steps, vertex = ?next, "walk advanced");
        Ok(Step::Moved(next))
    }

    fn run_to_end(mut self) -> Result<WalkOutcome> {
        loop {
            if let Step::Finished(outcome) = self.advance()? {
                return Ok(outcome);
            }
        }
    }
}

impl<'a, V: Vertex, R: Rng + ?Sized> Iterator for Walker<'a, V, R> {
    type Item = Result<&'a V>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.emitted_start {
            self.emitted_start = true;
            return Some(Ok(self.current));
        }
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Step::Moved(vertex)) => Some(Ok(vertex)),
            Ok(Step::Finished(_)) => None,
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Runs one bounded random walk and reports how it terminated.
///
/// # Errors
/// Returns [`crate::GraphError::UnknownVertex`] when `start` is absent, or when
/// the walk enters a vertex that has no adjacency list.
#[instrument(name = "core.walk", level = "debug", err, skip_all, fields(max_steps = max_steps))]
pub fn walk_outcome<V, R>(
    graph: &Graph<V>,
    start: &V,
    target: &V,
    max_steps: u64,
    rng: &mut R,
) -> Result<WalkOutcome>
where
    V: Vertex,
    R: Rng + ?Sized,
{
    let outcome = Walker::new(graph, start, target, max_steps, rng)?.run_to_end()?;
    debug!(?outcome, "walk finished");
    Ok(outcome)
}

/// Decides s-t connectivity with a single random walk of at most `max_steps`
/// transitions.
///
/// Returns `true` only if the walk visited `target`. A `false` answer is
/// either correct or a false negative; a `true` answer is always correct.
/// Dead ends at a non-target vertex return `false`.
///
/// # Errors
/// Returns [`crate::GraphError::UnknownVertex`] when `start` is absent, or when
/// the walk enters a vertex that has no adjacency list.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use ustcon_core::{Graph, walk};
///
/// let graph = Graph::from_adjacency([
///     ("A", vec!["B"]),
///     ("B", vec!["A"]),
///     ("C", vec!["D"]),
///     ("D", vec!["C"]),
/// ]);
/// let mut rng = SmallRng::seed_from_u64(42);
/// assert!(!walk(&graph, &"A", &"C", 100, &mut rng).expect("A exists"));
/// assert!(walk(&graph, &"A", &"A", 0, &mut rng).expect("A exists"));
/// ```
pub fn walk<V, R>(
    graph: &Graph<V>,
    start: &V,
    target: &V,
    max_steps: u64,
    rng: &mut R,
) -> Result<bool>
where
    V: Vertex,
    R: Rng + ?Sized,
{
    walk_outcome(graph, start, target, max_steps, rng).map(WalkOutcome::is_success)
}
