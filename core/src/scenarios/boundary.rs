//! Structural edge probes that are not fan or cycle variants.
//!
//! The count/window boundary probes themselves are FanScenario instances
//! pinned exactly at (or one unit beyond) the configured detector
//! thresholds — see the catalog in composer.rs.

use crate::{
    error::{GenError, GenResult},
    expectation::{Expectation, PatternKind, TimeWindow},
    ids::account_id,
    scenario::{Scenario, ScenarioOutput, Services},
};

/// Disconnected single-transaction pairs. No topology at all — the
/// detector must leave disconnected components alone.
pub struct IsolatedPairsScenario {
    pub name: String,
    pub pairs: usize,
    pub amount_low: f64,
    pub amount_high: f64,
    pub base_days: i64,
}

impl Scenario for IsolatedPairsScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        if self.pairs == 0 {
            return Err(GenError::InvalidScenario {
                scenario: self.name.clone(),
                reason: "need at least one pair".into(),
            });
        }

        let mut transactions = Vec::with_capacity(self.pairs);
        let mut participants = Vec::new();
        for i in 1..=self.pairs as u32 {
            let a = account_id("ISO_A", i);
            let b = account_id("ISO_B", i);
            let amount = svc.rng.amount(self.amount_low, self.amount_high);
            let ts = svc.time.at(self.base_days + i as i64 - 1, 0, 0);
            transactions.push(svc.record(&self.name, &a, &b, amount, ts)?);
            participants.push(a);
            participants.push(b);
        }

        Ok(ScenarioOutput {
            expectation: Expectation {
                scenario: self.name.clone(),
                pattern: PatternKind::Boundary,
                window: TimeWindow::of(&transactions),
                must_flag: Vec::new(),
                must_not_flag: participants,
                undetermined: Vec::new(),
                rings: Vec::new(),
                rationale: "disconnected components with one transaction each carry no pattern".into(),
            },
            transactions,
        })
    }
}
