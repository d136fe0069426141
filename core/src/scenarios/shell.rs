//! Layered shell chains: funds pass through a line of intermediary
//! accounts that exist only to forward them.
//!
//! The defining shell signature is "exactly two transactions" per
//! interior account (one in, one out). The builder re-counts after
//! emission and aborts if the signature does not hold — an interior
//! account with a third transaction would silently invalidate the
//! ground truth.

use crate::{
    error::{GenError, GenResult},
    expectation::{Expectation, PatternKind, RingExpectation, TimeWindow},
    ids::account_id,
    scenario::{Scenario, ScenarioOutput, Services},
    types::TransactionRecord,
};

/// Per-hop amount reduction along the chain.
#[derive(Debug, Clone, Copy)]
pub enum Decay {
    /// Subtract a fixed amount each hop.
    FixedStep(f64),
    /// Multiply by (1 - rate) each hop; rate in (0, 1).
    Geometric(f64),
}

pub struct ShellChainScenario {
    pub name: String,
    /// Account prefixes derive from this: `{prefix}_SRC`, `{prefix}_MID`,
    /// `{prefix}_DST`, `{prefix}_LEGIT`, `{prefix}_LEGIT2`.
    pub prefix: String,
    /// Number of interior (shell) accounts. The chain has interior + 2
    /// accounts and interior + 1 hops.
    pub interior: usize,
    pub start_amount: f64,
    pub decay: Decay,
    pub base_days: i64,
    pub hop_spacing_hours: i64,
    /// Unrelated transactions given to each endpoint so the endpoints do
    /// NOT also carry the shell signature.
    pub cover_count: usize,
    pub cover_low: f64,
    pub cover_high: f64,
    pub rationale: String,
}

impl ShellChainScenario {
    fn validate(&self) -> GenResult<()> {
        let fail = |reason: String| GenError::InvalidScenario {
            scenario: self.name.clone(),
            reason,
        };
        if self.interior == 0 {
            return Err(fail("a shell chain needs at least one interior account".into()));
        }
        if self.start_amount <= 0.0 {
            return Err(fail(format!(
                "starting amount must be positive, got {}",
                self.start_amount
            )));
        }
        let hops = self.interior + 1;
        match self.decay {
            Decay::FixedStep(step) => {
                if step <= 0.0 || self.start_amount - step * hops as f64 <= 0.0 {
                    return Err(fail(format!(
                        "fixed decay of {step} exhausts {} over {hops} hops",
                        self.start_amount
                    )));
                }
            }
            Decay::Geometric(rate) => {
                if rate <= 0.0 || rate >= 1.0 {
                    return Err(fail(format!("decay rate must be in (0, 1), got {rate}")));
                }
            }
        }
        if self.cover_count == 0 {
            return Err(fail(
                "endpoints need cover transactions or they look shell-like themselves".into(),
            ));
        }
        Ok(())
    }

    /// Re-count appearances of each interior account within the emitted
    /// scenario. Exactly two, or the scenario is structurally broken.
    fn check_shell_signature(
        &self,
        interiors: &[String],
        transactions: &[TransactionRecord],
    ) -> GenResult<()> {
        for mid in interiors {
            let touches = transactions
                .iter()
                .filter(|t| t.sender == *mid || t.receiver == *mid)
                .count();
            if touches != 2 {
                return Err(GenError::InvalidScenario {
                    scenario: self.name.clone(),
                    reason: format!("shell account {mid} has {touches} transactions, expected 2"),
                });
            }
        }
        Ok(())
    }
}

impl Scenario for ShellChainScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        self.validate()?;

        let src = account_id(&format!("{}_SRC", self.prefix), 1);
        let dst = account_id(&format!("{}_DST", self.prefix), 1);
        let interiors: Vec<_> = (1..=self.interior as u32)
            .map(|i| account_id(&format!("{}_MID", self.prefix), i))
            .collect();

        let mut line = Vec::with_capacity(self.interior + 2);
        line.push(src.clone());
        line.extend(interiors.iter().cloned());
        line.push(dst.clone());

        let mut transactions = Vec::new();
        let mut amount = self.start_amount;
        for (hop, pair) in line.windows(2).enumerate() {
            let ts = svc
                .time
                .at(self.base_days, hop as i64 * self.hop_spacing_hours, 0);
            transactions.push(svc.record(&self.name, &pair[0], &pair[1], amount, ts)?);
            amount = match self.decay {
                Decay::FixedStep(step) => amount - step,
                Decay::Geometric(rate) => amount * (1.0 - rate),
            };
        }

        // Endpoint cover: the source pays unrelated counterparties and the
        // destination collects from unrelated counterparties, one per day.
        let mut cover_accounts = Vec::new();
        for i in 1..=self.cover_count as u32 {
            let legit = account_id(&format!("{}_LEGIT", self.prefix), i);
            let amount = svc.rng.amount(self.cover_low, self.cover_high);
            let ts = svc.time.at(self.base_days + i as i64, 0, 0);
            transactions.push(svc.record(&self.name, &src, &legit, amount, ts)?);
            cover_accounts.push(legit);
        }
        for i in 1..=self.cover_count as u32 {
            let legit = account_id(&format!("{}_LEGIT2", self.prefix), i);
            let amount = svc.rng.amount(self.cover_low, self.cover_high);
            let ts = svc.time.at(self.base_days + i as i64, 1, 0);
            transactions.push(svc.record(&self.name, &legit, &dst, amount, ts)?);
            cover_accounts.push(legit);
        }

        self.check_shell_signature(&interiors, &transactions)?;

        let expectation = Expectation {
            scenario: self.name.clone(),
            pattern: PatternKind::ShellChain,
            window: TimeWindow::of(&transactions),
            must_flag: interiors.clone(),
            must_not_flag: cover_accounts,
            undetermined: vec![src, dst],
            rings: vec![RingExpectation {
                pattern: "shell_chain".to_string(),
                members: interiors,
            }],
            rationale: self.rationale.clone(),
        };

        Ok(ScenarioOutput {
            transactions,
            expectation,
        })
    }
}
