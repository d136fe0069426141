//! Smurfing topologies: fan-in (N senders → one aggregator), fan-out
//! (one disperser → N receivers), and the combined pass-through hub.
//!
//! Structuring and identical-amount smurfing are amount-distribution
//! properties layered onto the same fan topology via AmountPlan, not
//! separate topologies.

use super::AmountPlan;
use crate::{
    error::{GenError, GenResult},
    expectation::{Expectation, PatternKind, TimeWindow, Verdict},
    ids::account_id,
    scenario::{Scenario, ScenarioOutput, Services},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanDirection {
    /// Spokes send to the hub (aggregation).
    In,
    /// Hub sends to the spokes (dispersal).
    Out,
}

pub struct FanScenario {
    pub name: String,
    pub hub_prefix: String,
    pub spoke_prefix: String,
    pub direction: FanDirection,
    pub spokes: usize,
    pub base_days: i64,
    /// Offset of the first spoke transaction from the base, in minutes.
    pub first_offset_minutes: i64,
    /// Gap between consecutive spoke transactions. Zero is allowed — the
    /// simultaneous-burst probe uses identical timestamps on purpose.
    pub spacing_minutes: i64,
    pub amounts: AmountPlan,
    pub hub_verdict: Verdict,
    pub pattern: PatternKind,
    pub rationale: String,
}

impl FanScenario {
    fn validate(&self) -> GenResult<()> {
        let fail = |reason: String| GenError::InvalidScenario {
            scenario: self.name.clone(),
            reason,
        };
        if self.spokes == 0 {
            return Err(fail("fan count must be positive".into()));
        }
        if self.spacing_minutes < 0 || self.first_offset_minutes < 0 {
            return Err(fail("fan spacing must not be negative".into()));
        }
        if let Err(reason) = self.amounts.validate(self.spokes) {
            return Err(fail(reason));
        }
        Ok(())
    }
}

impl Scenario for FanScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        self.validate()?;

        let hub = account_id(&self.hub_prefix, 1);
        let spokes: Vec<_> = (1..=self.spokes as u32)
            .map(|i| account_id(&self.spoke_prefix, i))
            .collect();

        let mut transactions = Vec::with_capacity(self.spokes);
        for (i, spoke) in spokes.iter().enumerate() {
            let amount = self.amounts.draw(i, &mut svc.rng);
            let minutes = self.first_offset_minutes + i as i64 * self.spacing_minutes;
            let ts = svc.time.at(self.base_days, 0, minutes);
            let (sender, receiver) = match self.direction {
                FanDirection::In => (spoke.as_str(), hub.as_str()),
                FanDirection::Out => (hub.as_str(), spoke.as_str()),
            };
            transactions.push(svc.record(&self.name, sender, receiver, amount, ts)?);
        }

        // Only the hub carries a strict verdict. Spoke accounts of a
        // flagged fan may or may not be swept into the ring; below the
        // threshold nothing at all may be flagged.
        let (mut must_flag, mut must_not_flag, mut undetermined) =
            (Vec::new(), Vec::new(), Vec::new());
        match self.hub_verdict {
            Verdict::MustFlag => {
                must_flag.push(hub);
                undetermined.extend(spokes);
            }
            Verdict::MustNotFlag => {
                must_not_flag.push(hub);
                must_not_flag.extend(spokes);
            }
            Verdict::Undetermined => {
                undetermined.push(hub);
                undetermined.extend(spokes);
            }
        }

        let expectation = Expectation {
            scenario: self.name.clone(),
            pattern: self.pattern,
            window: TimeWindow::of(&transactions),
            must_flag,
            must_not_flag,
            undetermined,
            rings: Vec::new(),
            rationale: self.rationale.clone(),
        };

        Ok(ScenarioOutput {
            transactions,
            expectation,
        })
    }
}

/// One hub that aggregates a fan-in and then disperses a fan-out, the
/// fan-out leg scheduled strictly after the fan-in leg — pass-through
/// laundering.
pub struct CombinedFanScenario {
    pub name: String,
    pub hub_prefix: String,
    pub in_prefix: String,
    pub out_prefix: String,
    pub in_count: usize,
    pub out_count: usize,
    pub base_days: i64,
    pub in_spacing_minutes: i64,
    /// Offset of the first outbound transaction from the base, in hours.
    /// Must land after the last inbound transaction.
    pub out_start_hours: i64,
    pub out_spacing_minutes: i64,
    pub in_amounts: AmountPlan,
    pub out_amounts: AmountPlan,
    pub rationale: String,
}

impl CombinedFanScenario {
    fn validate(&self) -> GenResult<()> {
        let fail = |reason: String| GenError::InvalidScenario {
            scenario: self.name.clone(),
            reason,
        };
        if self.in_count == 0 || self.out_count == 0 {
            return Err(fail("fan count must be positive".into()));
        }
        let last_in = self.in_count as i64 * self.in_spacing_minutes;
        let first_out = self.out_start_hours * 60 + self.out_spacing_minutes;
        if first_out <= last_in {
            return Err(fail(format!(
                "fan-out must start after the fan-in window ends ({last_in} min)"
            )));
        }
        if let Err(reason) = self.in_amounts.validate(self.in_count) {
            return Err(fail(reason));
        }
        if let Err(reason) = self.out_amounts.validate(self.out_count) {
            return Err(fail(reason));
        }
        Ok(())
    }
}

impl Scenario for CombinedFanScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        self.validate()?;

        let hub = account_id(&self.hub_prefix, 1);
        let mut transactions = Vec::with_capacity(self.in_count + self.out_count);
        let mut undetermined = Vec::new();

        for i in 1..=self.in_count {
            let sender = account_id(&self.in_prefix, i as u32);
            let amount = self.in_amounts.draw(i - 1, &mut svc.rng);
            let ts = svc
                .time
                .at(self.base_days, 0, i as i64 * self.in_spacing_minutes);
            transactions.push(svc.record(&self.name, &sender, &hub, amount, ts)?);
            undetermined.push(sender);
        }
        for i in 1..=self.out_count {
            let receiver = account_id(&self.out_prefix, i as u32);
            let amount = self.out_amounts.draw(i - 1, &mut svc.rng);
            let ts = svc.time.at(
                self.base_days,
                self.out_start_hours,
                i as i64 * self.out_spacing_minutes,
            );
            transactions.push(svc.record(&self.name, &hub, &receiver, amount, ts)?);
            undetermined.push(receiver);
        }

        let expectation = Expectation {
            scenario: self.name.clone(),
            pattern: PatternKind::CombinedFan,
            window: TimeWindow::of(&transactions),
            must_flag: vec![hub],
            must_not_flag: Vec::new(),
            undetermined,
            rings: Vec::new(),
            rationale: self.rationale.clone(),
        };

        Ok(ScenarioOutput {
            transactions,
            expectation,
        })
    }
}
