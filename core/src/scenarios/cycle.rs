//! Circular fund routing: A₁ → A₂ → … → A_L → A₁.

use super::AmountPlan;
use crate::{
    error::{GenError, GenResult},
    expectation::{Expectation, PatternKind, RingExpectation, TimeWindow},
    ids::account_id,
    scenario::{Scenario, ScenarioOutput, Services},
};

/// Shortest cycle the catalog may emit. L=1 is a self-loop and L=2 is a
/// simple back-and-forth, neither of which is a laundering cycle.
pub const MIN_CYCLE_LENGTH: usize = 3;

pub struct CycleScenario {
    pub name: String,
    pub prefix: String,
    /// Account indices, in hop order. `indices[i]` sends to
    /// `indices[(i + 1) % L]`. Non-contiguous indices let a cycle reuse
    /// specific accounts minted by another scenario (declared only).
    pub indices: Vec<u32>,
    /// Base offset of the scenario's window from the epoch, in hours.
    pub base_hours: i64,
    /// Cumulative minute offset of each hop from the base. Must be
    /// strictly increasing — cycle timestamps never tie.
    pub hop_minutes: Vec<i64>,
    pub amounts: AmountPlan,
    pub pattern: PatternKind,
    pub rationale: String,
    pub reuses: Vec<String>,
}

impl CycleScenario {
    /// A cycle on accounts 1..=length with a uniform hop spacing.
    pub fn uniform(
        name: &str,
        prefix: &str,
        length: usize,
        base_hours: i64,
        spacing_minutes: i64,
        amounts: AmountPlan,
        rationale: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            indices: (1..=length as u32).collect(),
            base_hours,
            hop_minutes: (0..length as i64).map(|i| i * spacing_minutes).collect(),
            amounts,
            pattern: PatternKind::Cycle,
            rationale: rationale.to_string(),
            reuses: Vec::new(),
        }
    }

    fn validate(&self) -> GenResult<()> {
        let fail = |reason: String| GenError::InvalidScenario {
            scenario: self.name.clone(),
            reason,
        };
        let len = self.indices.len();
        if len < MIN_CYCLE_LENGTH {
            return Err(fail(format!(
                "cycle length must be at least {MIN_CYCLE_LENGTH}, got {len}"
            )));
        }
        if self.hop_minutes.len() != len {
            return Err(fail(format!(
                "{} hop offsets for a length-{len} cycle",
                self.hop_minutes.len()
            )));
        }
        if self.hop_minutes.windows(2).any(|w| w[1] <= w[0]) {
            return Err(fail("hop timestamps must be strictly increasing".into()));
        }
        if let Err(reason) = self.amounts.validate(len) {
            return Err(fail(reason));
        }
        Ok(())
    }
}

impl Scenario for CycleScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn reuses_accounts(&self) -> &[String] {
        &self.reuses
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        self.validate()?;

        let accounts: Vec<_> = self
            .indices
            .iter()
            .map(|&i| account_id(&self.prefix, i))
            .collect();
        let len = accounts.len();

        let mut transactions = Vec::with_capacity(len);
        for hop in 0..len {
            let amount = self.amounts.draw(hop, &mut svc.rng);
            let ts = svc.time.at(0, self.base_hours, self.hop_minutes[hop]);
            transactions.push(svc.record(
                &self.name,
                &accounts[hop],
                &accounts[(hop + 1) % len],
                amount,
                ts,
            )?);
        }

        let expectation = Expectation {
            scenario: self.name.clone(),
            pattern: self.pattern,
            window: TimeWindow::of(&transactions),
            must_flag: accounts.clone(),
            must_not_flag: Vec::new(),
            undetermined: Vec::new(),
            rings: vec![RingExpectation {
                pattern: format!("cycle_length_{len}"),
                members: accounts,
            }],
            rationale: self.rationale.clone(),
        };

        Ok(ScenarioOutput {
            transactions,
            expectation,
        })
    }
}
