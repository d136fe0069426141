//! Verification harness — diffs the external detector's output against
//! the expectation manifest.
//!
//! The detector itself is an external collaborator reached over HTTP;
//! this module owns its response model, the transport trait, and the
//! comparison. Transport failure is infrastructure — inconclusive, never
//! a detection result. Expectation mismatches are data in the report,
//! attributable to one named scenario.

use crate::expectation::ExpectationManifest;
use crate::types::AccountId;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    /// Network failure, timeout, non-success status — inconclusive.
    #[error("Detector transport failure: {0}")]
    Transport(String),

    /// The detector answered, but not with the documented shape.
    #[error("Malformed detector response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Detector response model ──────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct DetectorResponse {
    pub results: AnalysisResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResults {
    #[serde(default)]
    pub summary: serde_json::Value,
    #[serde(default)]
    pub fraud_rings: Vec<FraudRing>,
    #[serde(default)]
    pub suspicious_accounts: Vec<SuspiciousAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FraudRing {
    pub ring_id: String,
    pub pattern_type: String,
    pub member_accounts: Vec<AccountId>,
    pub risk_score: f64,
}

/// Per-account signal fields vary by detector version; everything beyond
/// the id is carried opaquely.
#[derive(Debug, Clone, Deserialize)]
pub struct SuspiciousAccount {
    pub account_id: AccountId,
    #[serde(flatten)]
    pub signals: serde_json::Map<String, serde_json::Value>,
}

pub fn parse_response(raw: &str) -> Result<DetectorResponse, HarnessError> {
    Ok(serde_json::from_str(raw)?)
}

/// One blocking call per test run. Implementations submit the CSV as a
/// file upload and must apply a timeout; any failure maps to
/// `HarnessError::Transport`.
pub trait DetectorClient {
    fn analyze(&self, dataset_csv: &Path) -> Result<DetectorResponse, HarnessError>;
}

// ── Manifest diff ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub scenario: String,
    pub passed: bool,
    /// Must-flag accounts the detector did not flag.
    pub missed: Vec<AccountId>,
    /// Must-not-flag accounts the detector flagged anyway.
    pub wrongly_flagged: Vec<AccountId>,
}

#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub scenarios: Vec<ScenarioResult>,
    pub passed: usize,
    pub failed: usize,
    pub flagged_total: usize,
    pub ring_count: usize,
}

impl VerificationReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}/{} scenarios passed ({} accounts flagged, {} rings)",
            self.passed,
            self.passed + self.failed,
            self.flagged_total,
            self.ring_count
        )?;
        for s in self.scenarios.iter().filter(|s| !s.passed) {
            writeln!(f, "FAIL {}", s.scenario)?;
            for account in &s.missed {
                writeln!(f, "  not flagged (must): {account}")?;
            }
            for account in &s.wrongly_flagged {
                writeln!(f, "  flagged (must not): {account}")?;
            }
        }
        Ok(())
    }
}

/// Diff observed flags against the manifest. Any account present in
/// `suspicious_accounts` counts as flagged; `Undetermined` accounts can
/// never fail a scenario.
pub fn verify(manifest: &ExpectationManifest, response: &DetectorResponse) -> VerificationReport {
    let flagged: BTreeSet<&str> = response
        .results
        .suspicious_accounts
        .iter()
        .map(|a| a.account_id.as_str())
        .collect();

    let mut scenarios = Vec::with_capacity(manifest.len());
    let (mut passed, mut failed) = (0usize, 0usize);
    for e in &manifest.entries {
        let missed: Vec<_> = e
            .must_flag
            .iter()
            .filter(|a| !flagged.contains(a.as_str()))
            .cloned()
            .collect();
        let wrongly_flagged: Vec<_> = e
            .must_not_flag
            .iter()
            .filter(|a| flagged.contains(a.as_str()))
            .cloned()
            .collect();
        let ok = missed.is_empty() && wrongly_flagged.is_empty();
        if ok {
            passed += 1;
        } else {
            failed += 1;
        }
        scenarios.push(ScenarioResult {
            scenario: e.scenario.clone(),
            passed: ok,
            missed,
            wrongly_flagged,
        });
    }

    VerificationReport {
        scenarios,
        passed,
        failed,
        flagged_total: flagged.len(),
        ring_count: response.results.fraud_rings.len(),
    }
}

/// Submit the dataset and diff the answer. Transport and parse failures
/// propagate as errors (inconclusive); mismatches come back in the
/// report.
pub fn run_verification<C: DetectorClient>(
    client: &C,
    dataset_csv: &Path,
    manifest: &ExpectationManifest,
) -> Result<VerificationReport, HarnessError> {
    let response = client.analyze(dataset_csv)?;
    Ok(verify(manifest, &response))
}
