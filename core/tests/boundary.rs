//! Boundary probes: sender counts pinned exactly at the detector
//! threshold, windows pinned exactly at the clustering width, and the
//! structural oddballs (simultaneous burst, isolated pairs).

use fraudgraph_core::{
    composer::{Composer, Dataset},
    config::GeneratorConfig,
    types::TransactionRecord,
};

fn dataset() -> Dataset {
    Composer::build(&GeneratorConfig::default())
        .run()
        .expect("compose")
}

fn inbound<'a>(d: &'a Dataset, hub: &str) -> Vec<&'a TransactionRecord> {
    d.transactions.iter().filter(|t| t.receiver == hub).collect()
}

/// The 10-sender fan-in must be labeled must-flag; the 9-sender variant
/// must-not — same amount band, same spacing, the only difference is
/// one sender. An off-by-one regression in the detector fails loudly.
#[test]
fn sender_count_verdicts_are_directional() {
    let d = dataset();

    let at = d.manifest.get("fan_in_at_threshold").expect("at threshold");
    assert!(at
        .must_flag
        .iter()
        .any(|a| a == "ACC_BOUND10_AGG_0001"));

    let below = d
        .manifest
        .get("fan_in_below_threshold")
        .expect("below threshold");
    assert!(below
        .must_not_flag
        .iter()
        .any(|a| a == "ACC_BOUND9_AGG_0001"));
    assert!(below.must_flag.is_empty());

    // Identical construction apart from the count.
    let ten = inbound(&d, "ACC_BOUND10_AGG_0001");
    let nine = inbound(&d, "ACC_BOUND9_AGG_0001");
    assert_eq!(ten.len(), 10);
    assert_eq!(nine.len(), 9);
    for txns in [&ten, &nine] {
        assert!(txns.iter().all(|t| (500.0..=1500.0).contains(&t.amount)));
        for pair in txns.windows(2) {
            assert_eq!(
                pair[1].timestamp - pair[0].timestamp,
                chrono::Duration::hours(5)
            );
        }
    }
}

/// The on-window probe spans exactly the configured width; its twin
/// differs only by a stretched spacing.
#[test]
fn window_probes_straddle_the_configured_width() {
    let config = GeneratorConfig::default();
    let d = dataset();

    let exact = inbound(&d, "ACC_WIN72_AGG_0001");
    assert_eq!(exact.len(), config.fan_threshold);
    let span = exact.iter().map(|t| t.timestamp).max().unwrap()
        - exact.iter().map(|t| t.timestamp).min().unwrap();
    assert_eq!(
        span,
        chrono::Duration::hours(config.window_hours),
        "span must be exactly the window width"
    );
    let e = d.manifest.get("window_exact").expect("entry");
    assert!(e.must_flag.iter().any(|a| a == "ACC_WIN72_AGG_0001"));

    let wide = inbound(&d, "ACC_WIN72X_AGG_0001");
    assert_eq!(wide.len(), config.fan_threshold, "same sender count");
    let span = wide.iter().map(|t| t.timestamp).max().unwrap()
        - wide.iter().map(|t| t.timestamp).min().unwrap();
    assert!(
        span > chrono::Duration::hours(config.window_hours),
        "stretched probe must exceed the window"
    );
    let e = d.manifest.get("window_exceeded").expect("entry");
    assert!(e.must_not_flag.iter().any(|a| a == "ACC_WIN72X_AGG_0001"));
}

/// Identical timestamps are valid data — the detector must not crash on
/// them, and we promise nothing about its verdict.
#[test]
fn simultaneous_burst_shares_one_timestamp() {
    let d = dataset();
    let txns = inbound(&d, "ACC_SIMULT_AGG_0001");
    assert_eq!(txns.len(), 5);
    assert!(txns.iter().all(|t| t.timestamp == txns[0].timestamp));

    let e = d.manifest.get("simultaneous_burst").expect("entry");
    assert!(e.must_flag.is_empty());
    assert!(e.must_not_flag.is_empty());
    assert_eq!(e.undetermined.len(), 6, "hub plus five senders");
}

#[test]
fn isolated_pairs_touch_each_account_once() {
    let d = dataset();
    for i in 1..=5u32 {
        for account in [format!("ACC_ISO_A_{i:04}"), format!("ACC_ISO_B_{i:04}")] {
            let touches = d
                .transactions
                .iter()
                .filter(|t| t.sender == account || t.receiver == account)
                .count();
            assert_eq!(touches, 1, "{account} must appear exactly once");
        }
    }
}
