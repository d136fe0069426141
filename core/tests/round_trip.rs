//! Serialization tests: the tabular format, the report, and the
//! write-then-parse round trip.

use fraudgraph_core::{
    composer::{Composer, Dataset},
    config::GeneratorConfig,
    serialize,
};

fn dataset() -> Dataset {
    Composer::build(&GeneratorConfig::default())
        .run()
        .expect("compose")
}

#[test]
fn csv_round_trips_exactly() {
    let d = dataset();
    let csv = serialize::csv_string(&d.transactions).expect("write");
    let parsed = serialize::read_csv(csv.as_bytes()).expect("read");
    assert_eq!(parsed, d.transactions);
}

#[test]
fn csv_has_the_documented_shape() {
    let d = dataset();
    let csv = serialize::csv_string(&d.transactions).expect("write");
    let mut lines = csv.lines();

    assert_eq!(
        lines.next().expect("header"),
        "transaction_id,sender_id,receiver_id,amount,timestamp"
    );
    // First data row is the reference cycle's first hop.
    assert_eq!(
        lines.next().expect("first row"),
        "TXN_00001,ACC_CYCLE3_0001,ACC_CYCLE3_0002,5000.00,2025-01-15 08:00:00"
    );

    assert_eq!(csv.lines().count(), d.transactions.len() + 1);

    // Every amount field carries exactly two fraction digits.
    for line in csv.lines().skip(1) {
        let amount = line.split(',').nth(3).expect("amount field");
        let (_, frac) = amount.split_once('.').expect("decimal point");
        assert_eq!(frac.len(), 2, "bad amount field: {amount}");
    }
}

#[test]
fn penny_amounts_survive_the_round_trip() {
    let d = dataset();
    let csv = serialize::csv_string(&d.transactions).expect("write");
    let parsed = serialize::read_csv(csv.as_bytes()).expect("read");
    let pennies: Vec<_> = parsed
        .iter()
        .filter(|t| t.sender.starts_with("ACC_TINY_"))
        .collect();
    assert_eq!(pennies.len(), 3);
    assert!(pennies.iter().all(|t| t.amount == 0.01));
}

#[test]
fn malformed_rows_are_rejected_with_positions() {
    let bad_header = "id,from,to,amt,when\nTXN_00001,A,B,1.00,2025-01-15 08:00:00\n";
    assert!(serialize::read_csv(bad_header.as_bytes()).is_err());

    let bad_amount = "transaction_id,sender_id,receiver_id,amount,timestamp\n\
                      TXN_00001,ACC_A_0001,ACC_B_0001,not-a-number,2025-01-15 08:00:00\n";
    assert!(serialize::read_csv(bad_amount.as_bytes()).is_err());

    let bad_timestamp = "transaction_id,sender_id,receiver_id,amount,timestamp\n\
                         TXN_00001,ACC_A_0001,ACC_B_0001,1.00,January 15th\n";
    assert!(serialize::read_csv(bad_timestamp.as_bytes()).is_err());
}

#[test]
fn report_lists_every_scenario_and_the_closing_summary() {
    let d = dataset();
    let report = serialize::manifest_report_string(&d).expect("report");

    for e in &d.manifest.entries {
        assert!(
            report.contains(&format!("SCENARIO: {}", e.scenario)),
            "report is missing {}",
            e.scenario
        );
    }
    assert!(report.contains("MUST DETECT:"));
    assert!(report.contains("MUST NOT FLAG:"));
    assert!(report.contains(&format!("Total transactions: {}", d.transactions.len())));
}

#[test]
fn json_manifest_is_machine_checkable() {
    let d = dataset();
    let json = serialize::manifest_json(&d.manifest).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse back");

    let entries = value["entries"].as_array().expect("entries array");
    assert_eq!(entries.len(), d.manifest.len());
    assert_eq!(entries[0]["scenario"], "cycle_3");
    assert_eq!(entries[0]["rings"][0]["pattern"], "cycle_length_3");
}
