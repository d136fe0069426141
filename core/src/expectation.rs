//! Ground-truth expectations — what the external detector must and must
//! not flag for each embedded scenario.
//!
//! RULE: expectations are append-only. The composer accumulates one entry
//! per scenario into the manifest; once composition finishes the manifest
//! is read-only and is the single source of truth for the harness.

use crate::types::{AccountId, TransactionRecord};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Expected-detection verdict for a group of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    MustFlag,
    MustNotFlag,
    /// Ambiguous topologies (e.g. the diamond) — either outcome is accepted.
    Undetermined,
}

/// The topology family a scenario belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Cycle,
    FanIn,
    FanOut,
    CombinedFan,
    ShellChain,
    FalsePositiveTrap,
    Boundary,
    Mixed,
    Noise,
}

impl PatternKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cycle => "cycle",
            Self::FanIn => "fan_in",
            Self::FanOut => "fan_out",
            Self::CombinedFan => "combined_fan",
            Self::ShellChain => "shell_chain",
            Self::FalsePositiveTrap => "false_positive_trap",
            Self::Boundary => "boundary",
            Self::Mixed => "mixed",
            Self::Noise => "noise",
        }
    }
}

/// One ring the detector is expected to group together, e.g. all members
/// of a length-3 cycle or the intermediaries of a shell chain.
#[derive(Debug, Clone, Serialize)]
pub struct RingExpectation {
    /// Pattern label the detector reports, e.g. `cycle_length_3`.
    pub pattern: String,
    pub members: Vec<AccountId>,
}

/// The temporal window a scenario's transactions occupy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Envelope of a transaction sequence. None for an empty sequence.
    pub fn of(records: &[TransactionRecord]) -> Option<Self> {
        let start = records.iter().map(|r| r.timestamp).min()?;
        let end = records.iter().map(|r| r.timestamp).max()?;
        Some(Self { start, end })
    }

    pub fn span_hours(&self) -> i64 {
        (self.end - self.start).num_hours()
    }
}

/// A scenario's structured expectation. Outlives the builder that made it.
#[derive(Debug, Clone, Serialize)]
pub struct Expectation {
    pub scenario: String,
    pub pattern: PatternKind,
    pub window: Option<TimeWindow>,
    pub must_flag: Vec<AccountId>,
    pub must_not_flag: Vec<AccountId>,
    pub undetermined: Vec<AccountId>,
    pub rings: Vec<RingExpectation>,
    pub rationale: String,
}

impl Expectation {
    /// Every account this expectation mentions, with its verdict.
    pub fn verdicts(&self) -> impl Iterator<Item = (&AccountId, Verdict)> {
        self.must_flag
            .iter()
            .map(|a| (a, Verdict::MustFlag))
            .chain(self.must_not_flag.iter().map(|a| (a, Verdict::MustNotFlag)))
            .chain(self.undetermined.iter().map(|a| (a, Verdict::Undetermined)))
    }
}

/// Accumulated mapping from scenario name to its expectation, in catalog
/// order. Consumed by the serializer and the verification harness.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpectationManifest {
    pub entries: Vec<Expectation>,
}

impl ExpectationManifest {
    pub fn push(&mut self, expectation: Expectation) {
        self.entries.push(expectation);
    }

    pub fn get(&self, scenario: &str) -> Option<&Expectation> {
        self.entries.iter().find(|e| e.scenario == scenario)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scenario names with at least one must-flag account.
    pub fn must_detect(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.must_flag.is_empty())
            .map(|e| e.scenario.as_str())
            .collect()
    }

    /// Scenario names where nothing may be flagged.
    pub fn must_not_flag(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.must_flag.is_empty() && !e.must_not_flag.is_empty())
            .map(|e| e.scenario.as_str())
            .collect()
    }
}
