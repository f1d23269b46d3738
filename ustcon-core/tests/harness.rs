//! Statistical checks of the one-sided error bound through the trial harness.

mod common;

use common::{complete, cycle, lettered_graph, lollipop, path, two_pairs};
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use ustcon_core::{
    ExecutionStrategy, Graph, HarnessError, StepBudget, TrialHarness, TrialHarnessBuilder,
    TrialReport,
};
use ustcon_test_support::{profile::RunProfile, tracing::RecordingLayer};

/// Slack above the analytic bound of one half.
const TOLERANCE: f64 = 0.02;

fn harness(trials: usize, budget: StepBudget, strategy: ExecutionStrategy) -> TrialHarness {
    TrialHarnessBuilder::new()
        .with_trials(trials)
        .with_step_budget(budget)
        .with_seed(0xC0FF_EE00)
        .with_execution_strategy(strategy)
        .build()
        .expect("harness configuration is valid")
}

fn profile_trials() -> usize {
    RunProfile::load(128, false, 10_000).trials()
}

fn run_cover_time(graph: &Graph<u32>, start: u32, target: u32) -> TrialReport {
    harness(profile_trials(), StepBudget::CoverTime, ExecutionStrategy::Auto)
        .run(graph, &start, &target)
        .expect("start vertex exists")
}

#[rstest]
#[case::path(path(12), 0, 11)]
#[case::cycle(cycle(15), 0, 7)]
#[case::complete(complete(9), 0, 8)]
#[case::lollipop(lollipop(8, 6), 0, 13)]
fn cover_time_budget_keeps_false_negatives_below_half(
    #[case] graph: Graph<u32>,
    #[case] start: u32,
    #[case] target: u32,
) {
    let report = run_cover_time(&graph, start, target);
    assert!(report.connected());
    let rate = report
        .false_negative_rate()
        .expect("connected pairs have a false-negative rate");
    assert!(
        rate <= 0.5 + TOLERANCE,
        "false-negative rate {rate} exceeds the bound over {} trials",
        report.trials()
    );
}

#[test]
fn disconnected_pairs_never_succeed() {
    let report = harness(profile_trials(), StepBudget::Fixed(100), ExecutionStrategy::Auto)
        .run(&two_pairs(), &"A", &"C")
        .expect("A exists");
    assert!(!report.connected());
    assert_eq!(report.successes(), 0);
    assert_eq!(report.false_positives(), 0);
    assert_eq!(report.false_negative_rate(), None);
    assert!((report.failure_rate() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn linear_budget_is_unreliable_on_long_paths() {
    let report = harness(2_000, StepBudget::Linear, ExecutionStrategy::Auto)
        .run(&path(20), &0, &19)
        .expect("0 exists");
    assert_eq!(report.max_steps(), 20);
    assert!(report.connected());
    assert!(report.failure_rate() > 0.9, "rate was {}", report.failure_rate());
}

#[test]
fn budget_is_resolved_against_start_component() {
    let report = harness(10, StepBudget::CoverTime, ExecutionStrategy::Sequential)
        .run(&lettered_graph(), &"A", &"G")
        .expect("A exists");
    assert_eq!(report.component_size(), 6);
    assert_eq!(report.max_steps(), 432);
}

#[test]
fn sequential_and_parallel_reports_match() {
    let graph = lollipop(6, 5);
    let sequential = harness(3_000, StepBudget::Linear, ExecutionStrategy::Sequential)
        .run(&graph, &0, &10)
        .expect("0 exists");
    let auto = harness(3_000, StepBudget::Linear, ExecutionStrategy::Auto)
        .run(&graph, &0, &10)
        .expect("0 exists");
    assert_eq!(sequential, auto);
}

#[cfg(feature = "parallel")]
#[test]
fn explicit_parallel_strategy_runs() {
    let report = harness(100, StepBudget::CoverTime, ExecutionStrategy::Parallel)
        .run(&cycle(5), &0, &2)
        .expect("0 exists");
    assert_eq!(report.trials(), 100);
}

#[cfg(not(feature = "parallel"))]
#[test]
fn explicit_parallel_strategy_is_unavailable() {
    let err = harness(100, StepBudget::CoverTime, ExecutionStrategy::Parallel)
        .run(&cycle(5), &0, &2)
        .expect_err("parallel backend is not compiled in");
    assert_eq!(
        err,
        HarnessError::BackendUnavailable {
            requested: ExecutionStrategy::Parallel
        }
    );
}

#[test]
fn zero_trials_are_rejected() {
    let err = TrialHarnessBuilder::new()
        .with_trials(0)
        .build()
        .expect_err("zero trials must be rejected");
    assert!(matches!(err, HarnessError::InvalidTrialCount { got: 0 }));
}

#[test]
fn run_records_trial_tracing() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let harness = harness(25, StepBudget::CoverTime, ExecutionStrategy::Sequential);

    let report = tracing::subscriber::with_default(subscriber, || {
        harness.run(&cycle(4), &0, &2)
    })
    .expect("0 exists");
    assert_eq!(report.trials(), 25);

    let span = layer.span("core.trials").expect("core.trials span must exist");
    assert_eq!(span.field("trials"), Some("25".to_owned()));
    assert_eq!(span.field("strategy"), Some("Sequential".to_owned()));
    assert!(layer.has_message(Level::INFO, "trials completed"));
    assert!(layer.span("core.reachable_from").is_some());
    let walks = layer
        .spans()
        .iter()
        .filter(|span| span.name == "core.walk")
        .count();
    assert_eq!(walks, 25);
}
