use debt_netting::core::graph::LedgerGraph;
use debt_netting::core::loan::LoanRecord;
use debt_netting::optimization::cycle_cancel::CycleCanceller;
use debt_netting::optimization::greedy::GreedyMatcher;
use debt_netting::optimization::linear::LinearMatcher;
use debt_netting::optimization::{SimplificationReport, Simplifier};
use debt_netting::simulation::random_graph::{generate_random_graph_with, NetworkConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn strategies() -> Vec<(&'static str, Box<dyn Simplifier>)> {
    vec![
        ("linear", Box::new(LinearMatcher)),
        ("greedy", Box::new(GreedyMatcher)),
        ("cycle", Box::new(CycleCanceller)),
    ]
}

fn graph_of(arcs: &[(&str, &str, u64)]) -> LedgerGraph {
    let mut g = LedgerGraph::new();
    for &(from, to, amount) in arcs {
        let lender = g.add(from);
        let borrower = g.add(to);
        g.connect(lender, borrower, amount).unwrap();
    }
    g
}

/// Full pipeline: loans -> graph -> each strategy -> report.
#[test]
fn full_pipeline_household_scenario() {
    let graph = graph_of(&[
        ("alice", "bob", 100),
        ("bob", "carol", 80),
        ("carol", "dave", 120),
        ("dave", "alice", 90),
        ("erin", "bob", 40),
        ("carol", "alice", 70),
        ("bob", "dave", 30),
        ("dave", "erin", 25),
    ]);
    assert_eq!(graph.len(), 5);
    assert_eq!(graph.edge_amount(), 8);
    assert_eq!(graph.total_flow(), 555);
    assert!(graph.is_consistent());

    for (name, strategy) in strategies() {
        let result = strategy.simplify(&graph);
        let report = SimplificationReport::compare(&graph, &result);
        assert!(report.equivalent, "{} broke equity conservation", name);
        assert!(
            report.edges_after <= report.edges_before,
            "{} raised the edge count",
            name
        );
        assert!(
            report.flow_after <= report.flow_before,
            "{} raised the total flow",
            name
        );
        assert!(result.is_consistent(), "{} left stale caches", name);

        // The input must never be touched.
        assert_eq!(graph.edge_amount(), 8);
        assert_eq!(graph.total_flow(), 555);
    }
}

#[test]
fn three_cycle_scenario_all_strategies() {
    let graph = graph_of(&[("a", "b", 3), ("b", "c", 2), ("c", "a", 1)]);

    for (name, strategy) in strategies() {
        let result = strategy.simplify(&graph);
        assert!(graph.is_equivalent_to(&result), "{} not equivalent", name);
        assert!(result.edge_amount() <= 2, "{} kept too many edges", name);
        assert_eq!(result.equity_of("a"), Some(2));
        assert_eq!(result.equity_of("b"), Some(-1));
        assert_eq!(result.equity_of("c"), Some(-1));
    }

    // The cycle canceller hits the floor exactly: two arcs, two units of flow.
    let result = CycleCanceller.simplify(&graph);
    assert_eq!(result.edge_amount(), 2);
    assert_eq!(result.total_flow(), 2);
}

#[test]
fn balanced_four_cycle_cancels_for_all_strategies() {
    let graph = graph_of(&[
        ("n1", "n2", 10),
        ("n2", "n3", 10),
        ("n3", "n4", 10),
        ("n4", "n1", 10),
    ]);

    for (name, strategy) in strategies() {
        let result = strategy.simplify(&graph);
        assert_eq!(result.edge_amount(), 0, "{} left edges", name);
        assert_eq!(result.total_flow(), 0, "{} left flow", name);
        assert!(graph.is_equivalent_to(&result));
    }
}

#[test]
fn strategies_agree_on_random_networks() {
    let config = NetworkConfig {
        node_count: 12,
        arc_probability: 0.35,
        max_amount: 200,
    };

    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = generate_random_graph_with(&config, &mut rng);

        let mut results = Vec::new();
        for (name, strategy) in strategies() {
            let result = strategy.simplify(&graph);
            assert!(
                graph.is_equivalent_to(&result),
                "{} not equivalent on seed {}",
                name,
                seed
            );
            assert!(result.edge_amount() <= graph.edge_amount());
            assert!(result.total_flow() <= graph.total_flow());
            assert!(result.is_consistent());
            results.push(result);
        }

        // Any two valid reductions are equivalent to each other as well.
        for pair in results.windows(2) {
            assert!(pair[0].is_equivalent_to(&pair[1]));
        }
    }
}

#[test]
fn cycle_canceller_is_idempotent() {
    let graph = graph_of(&[
        ("a", "b", 7),
        ("b", "c", 4),
        ("c", "a", 2),
        ("c", "d", 5),
        ("d", "b", 1),
    ]);
    let once = CycleCanceller.simplify(&graph);
    let twice = CycleCanceller.simplify(&once);
    assert_eq!(once.edge_amount(), twice.edge_amount());
    assert_eq!(once.total_flow(), twice.total_flow());
    assert!(once.is_equivalent_to(&twice));
}

#[test]
fn loan_file_round_trip() {
    let graph = graph_of(&[("alice", "bob", 250), ("bob", "carol", 100)]);
    let json = serde_json::to_string(&graph.to_loans()).unwrap();
    let loans: Vec<LoanRecord> = serde_json::from_str(&json).unwrap();
    let rebuilt = LedgerGraph::from_loans(&loans).unwrap();

    assert!(graph.is_equivalent_to(&rebuilt));
    assert_eq!(rebuilt.edge_amount(), graph.edge_amount());
    assert_eq!(rebuilt.total_flow(), graph.total_flow());
}

#[test]
fn report_percentages() {
    use approx::assert_relative_eq;

    let graph = graph_of(&[("a", "b", 3), ("b", "c", 2), ("c", "a", 1)]);
    let result = CycleCanceller.simplify(&graph);
    let report = SimplificationReport::compare(&graph, &result);

    // 3 edges -> 2, 6 flow -> 2.
    assert_relative_eq!(report.edge_reduction_percent(), 100.0 / 3.0);
    assert_relative_eq!(report.flow_reduction_percent(), 200.0 / 3.0);
}
