//! Property tests over randomly generated symmetric graphs.

mod common;

use common::{GraphShape, fixture_strategy, fixture_with_pair, snapshot};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use rand::{SeedableRng, rngs::SmallRng};
use ustcon_core::{connected_components, cover_time_bound, is_reachable, reachable_from, walk};
use ustcon_test_support::profile::RunProfile;

fn config() -> ProptestConfig {
    let profile = RunProfile::load(128, false, 10_000);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn reachable_set_contains_start((fixture, start, _target) in fixture_with_pair()) {
        let reachable = reachable_from(&fixture.graph, &start)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert!(reachable.contains(&start));
        prop_assert_eq!(reachable.exploration_order().first(), Some(&start));
    }

    #[test]
    fn reachability_is_symmetric((fixture, u, v) in fixture_with_pair()) {
        let forward = is_reachable(&fixture.graph, &u, &v)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let backward = is_reachable(&fixture.graph, &v, &u)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn reachable_from_is_idempotent((fixture, start, _target) in fixture_with_pair()) {
        let first = reachable_from(&fixture.graph, &start)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let second = reachable_from(&fixture.graph, &start)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(first, second);
    }

    #[test]
    fn walk_has_no_false_positives(
        (fixture, start, target) in fixture_with_pair(),
        max_steps in 0_u64..2_000,
        seed in any::<u64>(),
    ) {
        let connected = is_reachable(&fixture.graph, &start, &target)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let reached = walk(&fixture.graph, &start, &target, max_steps, &mut rng)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert!(!reached || connected, "walk reported a path that does not exist");
    }

    #[test]
    fn two_component_fixtures_never_cross(
        seed in any::<u64>(),
        vertices in 2_u32..=12,
        walk_seed in any::<u64>(),
    ) {
        let fixture = common::generate_fixture(GraphShape::TwoComponents, vertices, seed);
        let split = vertices / 2;
        let budget = cover_time_bound(vertices as usize).unwrap_or(u64::MAX);
        let mut rng = SmallRng::seed_from_u64(walk_seed);
        let reached = walk(&fixture.graph, &0, &split, budget, &mut rng)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert!(!reached);
    }

    #[test]
    fn components_partition_every_vertex(fixture in fixture_strategy()) {
        let components = connected_components(&fixture.graph)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let total: usize = components.iter().map(|component| component.len()).sum();
        prop_assert_eq!(total, fixture.graph.vertex_count());
        for vertex in fixture.graph.vertices() {
            let owners = components.iter().filter(|component| component.contains(vertex)).count();
            prop_assert_eq!(owners, 1);
        }
    }

    #[test]
    fn queries_do_not_mutate_graph(
        (fixture, start, target) in fixture_with_pair(),
        seed in any::<u64>(),
    ) {
        let before = snapshot(&fixture.graph);
        let mut rng = SmallRng::seed_from_u64(seed);
        walk(&fixture.graph, &start, &target, 64, &mut rng)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        reachable_from(&fixture.graph, &start)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(snapshot(&fixture.graph), before);
    }
}
