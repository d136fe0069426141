//! Cycle scenario tests: closure, exact reference values, fail-fast on
//! degenerate parameters.

use fraudgraph_core::{
    composer::{Composer, Dataset},
    config::GeneratorConfig,
    scenario::{Scenario, Services},
    scenarios::{AmountPlan, CycleScenario},
    types::TransactionRecord,
};
use fraudgraph_core::error::GenError;
use std::collections::HashMap;

fn dataset() -> Dataset {
    Composer::build(&GeneratorConfig::default())
        .run()
        .expect("compose")
}

fn touching<'a>(d: &'a Dataset, account_prefix: &str) -> Vec<&'a TransactionRecord> {
    d.transactions
        .iter()
        .filter(|t| t.sender.starts_with(account_prefix) || t.receiver.starts_with(account_prefix))
        .collect()
}

/// The reference length-3 cycle: exact accounts, amounts, and 2-hour
/// spacing, with a manifest entry requiring all three flagged as one
/// ring.
#[test]
fn cycle_3_matches_reference_values() {
    let d = dataset();
    let txns = touching(&d, "ACC_CYCLE3_");
    assert_eq!(txns.len(), 3, "a 3-cycle is exactly 3 transactions");

    let expected = [
        ("ACC_CYCLE3_0001", "ACC_CYCLE3_0002", 5000.00),
        ("ACC_CYCLE3_0002", "ACC_CYCLE3_0003", 4950.00),
        ("ACC_CYCLE3_0003", "ACC_CYCLE3_0001", 4900.00),
    ];
    for (txn, (sender, receiver, amount)) in txns.iter().zip(expected) {
        assert_eq!(txn.sender, sender);
        assert_eq!(txn.receiver, receiver);
        assert_eq!(txn.amount, amount);
    }
    for pair in txns.windows(2) {
        let gap = pair[1].timestamp - pair[0].timestamp;
        assert_eq!(gap, chrono::Duration::hours(2));
    }

    // All three accounts appear in both columns.
    for i in 1..=3 {
        let account = format!("ACC_CYCLE3_{i:04}");
        assert!(txns.iter().any(|t| t.sender == account));
        assert!(txns.iter().any(|t| t.receiver == account));
    }

    let e = d.manifest.get("cycle_3").expect("manifest entry");
    assert_eq!(e.must_flag.len(), 3);
    assert_eq!(e.rings.len(), 1);
    assert_eq!(e.rings[0].pattern, "cycle_length_3");
    assert_eq!(e.rings[0].members.len(), 3);
}

/// Following the emitted edges from any member returns to it after
/// exactly L hops, and no other edges touch the cycle's accounts.
#[test]
fn cycles_close_and_stay_isolated() {
    let d = dataset();
    for (prefix, len) in [("ACC_CYCLE3_", 3), ("ACC_CYCLE4_", 4), ("ACC_CYCLE5_", 5)] {
        let txns = touching(&d, prefix);
        assert_eq!(txns.len(), len, "{prefix}: extra edges touch the cycle");

        let next: HashMap<&str, &str> = txns
            .iter()
            .map(|t| (t.sender.as_str(), t.receiver.as_str()))
            .collect();
        assert_eq!(next.len(), len, "{prefix}: duplicate senders");

        let start = txns[0].sender.as_str();
        let mut cursor = start;
        for _ in 0..len {
            cursor = next[cursor];
        }
        assert_eq!(cursor, start, "{prefix}: walk did not close after {len} hops");

        // Strictly increasing timestamps within the cycle.
        for pair in txns.windows(2) {
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
    }
}

#[test]
fn overlapping_cycles_share_exactly_one_account() {
    let d = dataset();
    let txns = touching(&d, "ACC_OVERLAP_");
    assert_eq!(txns.len(), 6, "two 3-cycles");

    let shared = "ACC_OVERLAP_0001";
    let shared_touches = txns
        .iter()
        .filter(|t| t.sender == shared || t.receiver == shared)
        .count();
    assert_eq!(shared_touches, 4, "shared account sits in both rings");

    let a = d.manifest.get("overlap_cycle_a").expect("entry a");
    let b = d.manifest.get("overlap_cycle_b").expect("entry b");
    assert!(a.must_flag.iter().any(|x| x == shared));
    assert!(b.must_flag.iter().any(|x| x == shared));
}

#[test]
fn amount_extremes_keep_cycle_structure() {
    let d = dataset();
    for (prefix, name) in [("ACC_LARGE_", "high_value_cycle"), ("ACC_TINY_", "penny_cycle")] {
        let txns = touching(&d, prefix);
        assert_eq!(txns.len(), 3);
        assert!(txns.iter().all(|t| t.amount > 0.0));
        let e = d.manifest.get(name).expect("entry");
        assert_eq!(e.must_flag.len(), 3);
    }
}

#[test]
fn cycle_shorter_than_three_is_rejected() {
    let scenario = CycleScenario::uniform(
        "bad_cycle",
        "BAD",
        2,
        0,
        60,
        AmountPlan::Constant(100.0),
        "",
    );
    let mut svc = Services::new(1);
    let err = scenario.build(&mut svc).unwrap_err();
    assert!(matches!(err, GenError::InvalidScenario { .. }), "got {err}");
}

#[test]
fn self_loop_aborts_generation() {
    // Indices [1, 1, 3] would emit 0001 → 0001 on the first hop.
    let scenario = CycleScenario {
        name: "looped".into(),
        prefix: "LOOP".into(),
        indices: vec![1, 1, 3],
        base_hours: 0,
        hop_minutes: vec![0, 60, 120],
        amounts: AmountPlan::Constant(100.0),
        pattern: fraudgraph_core::expectation::PatternKind::Cycle,
        rationale: String::new(),
        reuses: Vec::new(),
    };
    let mut svc = Services::new(1);
    let err = scenario.build(&mut svc).unwrap_err();
    assert!(matches!(err, GenError::SelfLoop { .. }), "got {err}");
}

#[test]
fn skim_that_exhausts_the_amount_is_rejected() {
    let scenario = CycleScenario::uniform(
        "broke",
        "BROKE",
        5,
        0,
        60,
        AmountPlan::Skim {
            start: 100.0,
            step: 30.0,
        },
        "",
    );
    let mut svc = Services::new(1);
    assert!(scenario.build(&mut svc).is_err());
}
