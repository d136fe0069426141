//! Background noise — the negative baseline the signal patterns sit in.

use crate::{
    error::{GenError, GenResult},
    expectation::{Expectation, PatternKind, TimeWindow},
    ids::account_id,
    scenario::{Scenario, ScenarioOutput, Services},
};
use std::collections::BTreeSet;

/// Single, mutually unrelated transactions between randomly chosen
/// accounts in a dedicated prefix pool. Senders draw from 0001..=0100
/// and receivers from 0101..=0200, so a noise pair can never self-loop
/// and noise never touches a pattern account.
pub struct NoiseScenario {
    pub name: String,
    pub prefix: String,
    pub count: usize,
    pub pool: u32,
    pub amount_low: f64,
    pub amount_high: f64,
    pub span_days: i64,
}

impl Scenario for NoiseScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        if self.count == 0 || self.pool == 0 || self.span_days <= 0 {
            return Err(GenError::InvalidScenario {
                scenario: self.name.clone(),
                reason: "noise needs a positive count, pool, and span".into(),
            });
        }

        let mut transactions = Vec::with_capacity(self.count);
        let mut used: BTreeSet<String> = BTreeSet::new();
        for _ in 0..self.count {
            // Draw order is part of the determinism contract: sender,
            // receiver, day, hour, minute, amount.
            let sender = account_id(&self.prefix, 1 + svc.rng.below(self.pool as u64) as u32);
            let receiver = account_id(
                &self.prefix,
                self.pool + 1 + svc.rng.below(self.pool as u64) as u32,
            );
            let days = svc.rng.below(self.span_days as u64) as i64;
            let hours = svc.rng.below(24) as i64;
            let minutes = svc.rng.below(60) as i64;
            let amount = svc.rng.amount(self.amount_low, self.amount_high);
            let ts = svc.time.at(days, hours, minutes);
            transactions.push(svc.record(&self.name, &sender, &receiver, amount, ts)?);
            used.insert(sender);
            used.insert(receiver);
        }

        Ok(ScenarioOutput {
            expectation: Expectation {
                scenario: self.name.clone(),
                pattern: PatternKind::Noise,
                window: TimeWindow::of(&transactions),
                must_flag: Vec::new(),
                must_not_flag: used.into_iter().collect(),
                undetermined: Vec::new(),
                rings: Vec::new(),
                rationale: "unrelated one-off transfers; the negative baseline".into(),
            },
            transactions,
        })
    }
}
