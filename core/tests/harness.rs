//! Verification-harness tests: response parsing, the manifest diff, and
//! the transport/mismatch error split.

use fraudgraph_core::{
    composer::{Composer, Dataset},
    config::GeneratorConfig,
    harness::{
        parse_response, run_verification, verify, DetectorClient, DetectorResponse, HarnessError,
    },
};
use serde_json::json;
use std::path::Path;

fn dataset() -> Dataset {
    Composer::build(&GeneratorConfig::default())
        .run()
        .expect("compose")
}

/// A detector response that flags exactly the given accounts.
fn response_flagging(accounts: &[&str]) -> DetectorResponse {
    let suspicious: Vec<_> = accounts
        .iter()
        .map(|a| json!({ "account_id": a, "suspicion_score": 0.91 }))
        .collect();
    serde_json::from_value(json!({
        "results": {
            "summary": { "accounts_analyzed": 600 },
            "fraud_rings": [],
            "suspicious_accounts": suspicious,
        }
    }))
    .expect("well-formed stub response")
}

#[test]
fn perfect_detector_passes_every_scenario() {
    let d = dataset();
    let must_flag: Vec<&str> = d
        .manifest
        .entries
        .iter()
        .flat_map(|e| e.must_flag.iter().map(|a| a.as_str()))
        .collect();

    let report = verify(&d.manifest, &response_flagging(&must_flag));
    assert!(report.all_passed(), "failures: {report}");
    assert_eq!(report.failed, 0);
    assert_eq!(report.passed, d.manifest.len());
}

#[test]
fn flagging_a_trap_fails_that_scenario_by_name() {
    let d = dataset();
    let mut flagged: Vec<&str> = d
        .manifest
        .entries
        .iter()
        .flat_map(|e| e.must_flag.iter().map(|a| a.as_str()))
        .collect();
    flagged.push("ACC_MERCHANT_0001");

    let report = verify(&d.manifest, &response_flagging(&flagged));
    assert_eq!(report.failed, 1);
    let failure = report
        .scenarios
        .iter()
        .find(|s| !s.passed)
        .expect("one failure");
    assert_eq!(failure.scenario, "merchant");
    assert_eq!(failure.wrongly_flagged, vec!["ACC_MERCHANT_0001".to_string()]);
}

#[test]
fn missing_a_required_flag_fails_that_scenario() {
    let d = dataset();
    let flagged: Vec<&str> = d
        .manifest
        .entries
        .iter()
        .flat_map(|e| e.must_flag.iter().map(|a| a.as_str()))
        .filter(|a| *a != "ACC_CYCLE3_0002")
        .collect();

    let report = verify(&d.manifest, &response_flagging(&flagged));
    let cycle = report
        .scenarios
        .iter()
        .find(|s| s.scenario == "cycle_3")
        .expect("cycle_3 result");
    assert!(!cycle.passed);
    assert_eq!(cycle.missed, vec!["ACC_CYCLE3_0002".to_string()]);
}

/// Undetermined accounts can never fail a scenario, whichever way the
/// detector decides.
#[test]
fn undetermined_accounts_are_free() {
    let d = dataset();
    let mut flagged: Vec<&str> = d
        .manifest
        .entries
        .iter()
        .flat_map(|e| e.must_flag.iter().map(|a| a.as_str()))
        .collect();
    flagged.extend(["ACC_DIAMOND_A_0001", "ACC_DIAMOND_D_0001"]);

    let report = verify(&d.manifest, &response_flagging(&flagged));
    assert!(report.all_passed(), "failures: {report}");
}

#[test]
fn response_parser_accepts_the_documented_shape() {
    let raw = r#"{
        "results": {
            "summary": { "total_transactions": 721 },
            "fraud_rings": [
                {
                    "ring_id": "ring-001",
                    "pattern_type": "cycle_length_3",
                    "member_accounts": ["ACC_CYCLE3_0001", "ACC_CYCLE3_0002", "ACC_CYCLE3_0003"],
                    "risk_score": 0.97
                }
            ],
            "suspicious_accounts": [
                { "account_id": "ACC_CYCLE3_0001", "cycle_count": 1, "velocity": "high" }
            ]
        }
    }"#;
    let response = parse_response(raw).expect("parse");
    assert_eq!(response.results.fraud_rings.len(), 1);
    assert_eq!(response.results.fraud_rings[0].member_accounts.len(), 3);
    assert_eq!(
        response.results.suspicious_accounts[0].account_id,
        "ACC_CYCLE3_0001"
    );
    // Unknown per-account signal fields are carried opaquely.
    assert_eq!(
        response.results.suspicious_accounts[0].signals["velocity"],
        "high"
    );
}

#[test]
fn malformed_response_is_a_distinct_error() {
    let err = parse_response("{ not json").unwrap_err();
    assert!(matches!(err, HarnessError::MalformedResponse(_)));
}

struct UnreachableDetector;

impl DetectorClient for UnreachableDetector {
    fn analyze(&self, _dataset_csv: &Path) -> Result<DetectorResponse, HarnessError> {
        Err(HarnessError::Transport("connection refused".into()))
    }
}

/// Transport failure is infrastructure — inconclusive, never a detection
/// mismatch.
#[test]
fn transport_failure_is_not_a_detection_result() {
    let d = dataset();
    let err = run_verification(&UnreachableDetector, Path::new("transactions.csv"), &d.manifest)
        .unwrap_err();
    assert!(matches!(err, HarnessError::Transport(_)));
}

struct CannedDetector(DetectorResponse);

impl DetectorClient for CannedDetector {
    fn analyze(&self, _dataset_csv: &Path) -> Result<DetectorResponse, HarnessError> {
        Ok(self.0.clone())
    }
}

#[test]
fn run_verification_diffs_through_the_client() {
    let d = dataset();
    let must_flag: Vec<&str> = d
        .manifest
        .entries
        .iter()
        .flat_map(|e| e.must_flag.iter().map(|a| a.as_str()))
        .collect();
    let client = CannedDetector(response_flagging(&must_flag));

    let report = run_verification(&client, Path::new("transactions.csv"), &d.manifest)
        .expect("canned client never fails transport");
    assert!(report.all_passed());
}
