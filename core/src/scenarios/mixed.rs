//! Mixed/compound scenarios — explicit compositions of two primitive
//! topologies sharing one account. The expectation is the union of the
//! constituents', plus the assertion that detecting one pattern must not
//! suppress detection of the other. Each compound scenario owns all of
//! its accounts, so no overlap declaration is needed.

use crate::{
    error::{GenError, GenResult},
    expectation::{Expectation, PatternKind, RingExpectation, TimeWindow},
    ids::account_id,
    scenario::{Scenario, ScenarioOutput, Services},
};

/// A 3-cycle whose first member is simultaneously the aggregator of a
/// fan-in.
pub struct CycleFanInScenario {
    pub name: String,
    /// Cycle accounts are `{prefix}_0001..0003`; fan senders are
    /// `{prefix}_FI_0001..`.
    pub prefix: String,
    pub fan_senders: usize,
    pub base_days: i64,
    pub cycle_start: f64,
    pub cycle_skim: f64,
    pub cycle_spacing_hours: i64,
    pub fan_low: f64,
    pub fan_high: f64,
    /// First fan transaction lands this many hours after the base; the
    /// cycle and the fan deliberately share the window.
    pub fan_start_hours: i64,
    pub fan_spacing_hours: i64,
}

impl Scenario for CycleFanInScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        if self.fan_senders == 0 {
            return Err(GenError::InvalidScenario {
                scenario: self.name.clone(),
                reason: "fan-in leg needs at least one sender".into(),
            });
        }

        let cycle: Vec<_> = (1..=3u32).map(|i| account_id(&self.prefix, i)).collect();
        let mut transactions = Vec::new();

        for hop in 0..3usize {
            let amount = self.cycle_start - self.cycle_skim * hop as f64;
            let ts = svc.time.at(
                self.base_days,
                hop as i64 * self.cycle_spacing_hours,
                0,
            );
            transactions.push(svc.record(
                &self.name,
                &cycle[hop],
                &cycle[(hop + 1) % 3],
                amount,
                ts,
            )?);
        }

        let mut senders = Vec::new();
        for i in 1..=self.fan_senders as u32 {
            let sender = account_id(&format!("{}_FI", self.prefix), i);
            let amount = svc.rng.amount(self.fan_low, self.fan_high);
            let ts = svc.time.at(
                self.base_days,
                self.fan_start_hours + i as i64 * self.fan_spacing_hours,
                0,
            );
            transactions.push(svc.record(&self.name, &sender, &cycle[0], amount, ts)?);
            senders.push(sender);
        }

        Ok(ScenarioOutput {
            expectation: Expectation {
                scenario: self.name.clone(),
                pattern: PatternKind::Mixed,
                window: TimeWindow::of(&transactions),
                must_flag: cycle.clone(),
                must_not_flag: Vec::new(),
                undetermined: senders,
                rings: vec![RingExpectation {
                    pattern: "cycle_length_3".into(),
                    members: cycle,
                }],
                rationale:
                    "one account is both cycle member and fan-in aggregator; detecting either pattern must not suppress the other"
                        .into(),
            },
            transactions,
        })
    }
}

/// A short shell chain whose destination is the entry node of a 3-cycle.
pub struct ShellIntoCycleScenario {
    pub name: String,
    /// Shells are `{prefix}_SHELL_*`, cycle members `{prefix}_CYC_*`,
    /// source `{prefix}_SRC_0001`, cover accounts `{prefix}_LG_*`.
    pub prefix: String,
    pub start_amount: f64,
    pub step: f64,
    pub hop_spacing_hours: i64,
    pub base_days: i64,
    pub cover_count: usize,
}

impl Scenario for ShellIntoCycleScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        if self.step <= 0.0 || self.start_amount - self.step * 5.0 <= 0.0 {
            return Err(GenError::InvalidScenario {
                scenario: self.name.clone(),
                reason: format!(
                    "step {} exhausts {} over the chain and cycle",
                    self.step, self.start_amount
                ),
            });
        }

        let src = account_id(&format!("{}_SRC", self.prefix), 1);
        let shells: Vec<_> = (1..=2u32)
            .map(|i| account_id(&format!("{}_SHELL", self.prefix), i))
            .collect();
        let cycle: Vec<_> = (1..=3u32)
            .map(|i| account_id(&format!("{}_CYC", self.prefix), i))
            .collect();

        // Chain src → shell1 → shell2 → cycle entry, then the cycle
        // continues in the same cadence with the skim carrying over.
        let line = [
            (&src, &shells[0]),
            (&shells[0], &shells[1]),
            (&shells[1], &cycle[0]),
            (&cycle[0], &cycle[1]),
            (&cycle[1], &cycle[2]),
            (&cycle[2], &cycle[0]),
        ];
        let mut transactions = Vec::new();
        for (hop, (sender, receiver)) in line.iter().enumerate() {
            let amount = self.start_amount - self.step * hop as f64;
            let ts = svc
                .time
                .at(self.base_days, hop as i64 * self.hop_spacing_hours, 0);
            transactions.push(svc.record(&self.name, sender.as_str(), receiver.as_str(), amount, ts)?);
        }

        // Cover for the source endpoint only; the chain's destination is
        // a cycle member and is expected to be flagged anyway.
        let mut cover = Vec::new();
        for i in 1..=self.cover_count as u32 {
            let legit = account_id(&format!("{}_LG", self.prefix), i);
            let amount = svc.rng.amount(100.0, 500.0);
            let ts = svc.time.at(self.base_days + i as i64, 0, 0);
            transactions.push(svc.record(&self.name, &src, &legit, amount, ts)?);
            cover.push(legit);
        }

        let mut must_flag = shells.clone();
        must_flag.extend(cycle.iter().cloned());

        Ok(ScenarioOutput {
            expectation: Expectation {
                scenario: self.name.clone(),
                pattern: PatternKind::Mixed,
                window: TimeWindow::of(&transactions),
                must_flag,
                must_not_flag: cover,
                undetermined: vec![src],
                rings: vec![
                    RingExpectation {
                        pattern: "shell_chain".into(),
                        members: shells,
                    },
                    RingExpectation {
                        pattern: "cycle_length_3".into(),
                        members: cycle,
                    },
                ],
                rationale: "layering chain terminates in a cycle; both patterns must surface".into(),
            },
            transactions,
        })
    }
}

/// Diamond: A→B, A→C, B→D, C→D. Funds split and reconverge without a
/// closed loop. Deliberately ambiguous — either detector outcome is
/// accepted.
pub struct DiamondScenario {
    pub name: String,
    pub prefix: String,
    pub split_amount: f64,
    pub merge_amount: f64,
    pub base_days: i64,
}

impl Scenario for DiamondScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        if self.split_amount <= 0.0 || self.merge_amount <= 0.0 {
            return Err(GenError::InvalidScenario {
                scenario: self.name.clone(),
                reason: "diamond amounts must be positive".into(),
            });
        }

        let names = ["A", "B", "C", "D"];
        let acc: Vec<_> = names
            .iter()
            .map(|n| account_id(&format!("{}_{n}", self.prefix), 1))
            .collect();

        let edges = [
            (0usize, 1usize, self.split_amount, 0i64),
            (0, 2, self.split_amount, 1),
            (1, 3, self.merge_amount, 3),
            (2, 3, self.merge_amount, 4),
        ];
        let mut transactions = Vec::new();
        for (s, r, amount, hours) in edges {
            let ts = svc.time.at(self.base_days, hours, 0);
            transactions.push(svc.record(&self.name, &acc[s], &acc[r], amount, ts)?);
        }

        Ok(ScenarioOutput {
            expectation: Expectation {
                scenario: self.name.clone(),
                pattern: PatternKind::Mixed,
                window: TimeWindow::of(&transactions),
                must_flag: Vec::new(),
                must_not_flag: Vec::new(),
                undetermined: acc,
                rings: Vec::new(),
                rationale: "split-and-reconverge without a closed loop; either outcome accepted".into(),
            },
            transactions,
        })
    }
}
