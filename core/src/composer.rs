//! The composer — assembles every catalog scenario into one coherent
//! transaction log without unintended cross-contamination.
//!
//! CATALOG ORDER (fixed, documented, never reordered):
//!   Cycles → overlapping cycles → rapid/extreme cycles → fans →
//!   structuring variants → shell chains → false-positive traps →
//!   boundary probes → mixed compounds → background noise.
//!
//! RULES:
//!   - Every scenario builds exactly once, in registration order.
//!   - All randomness flows through the single shared stream, so the
//!     catalog order is part of the determinism contract.
//!   - An account or prefix reused across scenarios without a declared
//!     overlap aborts the run. Conflicting verdicts likewise.

use crate::{
    config::GeneratorConfig,
    error::{GenError, GenResult},
    expectation::{ExpectationManifest, PatternKind, Verdict},
    scenario::{Scenario, Services},
    scenarios::{
        AmountPlan, B2BScenario, CombinedFanScenario, CycleFanInScenario, CycleScenario,
        Decay, DiamondScenario, ExchangeHubScenario, FanDirection, FanScenario,
        IsolatedPairsScenario, MerchantScenario, NoiseScenario, PayrollScenario,
        ShellChainScenario, ShellIntoCycleScenario,
    },
    types::{AccountId, TransactionRecord},
};
use anyhow::anyhow;
use std::collections::{BTreeSet, HashMap};

/// The finished run: the global transaction sequence plus the manifest.
/// Read-only from here on.
#[derive(Debug)]
pub struct Dataset {
    pub transactions: Vec<TransactionRecord>,
    pub manifest: ExpectationManifest,
}

impl Dataset {
    pub fn unique_accounts(&self) -> BTreeSet<&str> {
        self.transactions
            .iter()
            .flat_map(|t| [t.sender.as_str(), t.receiver.as_str()])
            .collect()
    }
}

pub struct Composer {
    services: Services,
    scenarios: Vec<Box<dyn Scenario>>,
}

impl Composer {
    /// An empty composer. Tests compose their own small catalogs through
    /// register(); production runs use build().
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            services: Services::new(config.master_seed),
            scenarios: Vec::new(),
        }
    }

    pub fn register(&mut self, scenario: Box<dyn Scenario>) {
        self.scenarios.push(scenario);
    }

    /// The full catalog, in the fixed documented order.
    pub fn build(config: &GeneratorConfig) -> Self {
        let mut c = Composer::new(config);

        // ── Cycles ───────────────────────────────────────────────────
        c.register(Box::new(CycleScenario::uniform(
            "cycle_3",
            "CYCLE3",
            3,
            0,
            120,
            AmountPlan::Skim {
                start: 5000.0,
                step: 50.0,
            },
            "closed 3-hop loop inside 6 hours with a per-hop skim",
        )));
        c.register(Box::new(CycleScenario::uniform(
            "cycle_4",
            "CYCLE4",
            4,
            10,
            180,
            AmountPlan::Band {
                low: 3000.0,
                high: 3500.0,
            },
            "closed 4-hop loop inside 12 hours",
        )));
        c.register(Box::new(CycleScenario::uniform(
            "cycle_5",
            "CYCLE5",
            5,
            30,
            240,
            AmountPlan::Band {
                low: 7000.0,
                high: 7500.0,
            },
            "closed 5-hop loop inside 24 hours",
        )));

        // ── Overlapping cycles: the second deliberately reuses the
        //    first's entry account (declared) ─────────────────────────
        c.register(Box::new(CycleScenario::uniform(
            "overlap_cycle_a",
            "OVERLAP",
            3,
            60,
            60,
            AmountPlan::Skim {
                start: 2000.0,
                step: 50.0,
            },
            "first of two cycles sharing one account",
        )));
        c.register(Box::new(CycleScenario {
            name: "overlap_cycle_b".into(),
            prefix: "OVERLAP".into(),
            indices: vec![1, 4, 5],
            base_hours: 65,
            hop_minutes: vec![0, 60, 120],
            amounts: AmountPlan::Skim {
                start: 2500.0,
                step: 50.0,
            },
            pattern: PatternKind::Cycle,
            rationale: "second cycle through the shared account; multi-ring membership should raise its suspicion above any single-ring member"
                .into(),
            reuses: vec!["overlap_cycle_a".into()],
        }));

        // ── Velocity / amount extremes ───────────────────────────────
        c.register(Box::new(CycleScenario {
            name: "rapid_cycle".into(),
            prefix: "RAPID".into(),
            indices: vec![1, 2, 3],
            base_hours: 80,
            hop_minutes: vec![0, 10, 25],
            amounts: AmountPlan::Skim {
                start: 9500.0,
                step: 100.0,
            },
            pattern: PatternKind::Cycle,
            rationale: "full loop inside 25 minutes".into(),
            reuses: Vec::new(),
        }));
        c.register(Box::new(CycleScenario::uniform(
            "high_value_cycle",
            "LARGE",
            3,
            133 * 24,
            120,
            AmountPlan::Skim {
                start: 10_000_000.0,
                step: 500_000.0,
            },
            "structure is unchanged at eight figures",
        )));
        c.register(Box::new(CycleScenario::uniform(
            "penny_cycle",
            "TINY",
            3,
            135 * 24,
            60,
            AmountPlan::Constant(0.01),
            "structure is unchanged at one cent",
        )));

        // ── Fans ─────────────────────────────────────────────────────
        c.register(Box::new(FanScenario {
            name: "fan_in_15".into(),
            hub_prefix: "FANIN_AGG".into(),
            spoke_prefix: "FANIN_S".into(),
            direction: FanDirection::In,
            spokes: 15,
            base_days: 5,
            first_offset_minutes: 180,
            spacing_minutes: 180,
            amounts: AmountPlan::Band {
                low: 800.0,
                high: 1200.0,
            },
            hub_verdict: Verdict::MustFlag,
            pattern: PatternKind::FanIn,
            rationale: "15 distinct senders converge on one aggregator inside two days".into(),
        }));
        c.register(Box::new(FanScenario {
            name: "fan_out_15".into(),
            hub_prefix: "FANOUT_DISP".into(),
            spoke_prefix: "FANOUT_R".into(),
            direction: FanDirection::Out,
            spokes: 15,
            base_days: 7,
            first_offset_minutes: 120,
            spacing_minutes: 120,
            amounts: AmountPlan::Band {
                low: 500.0,
                high: 700.0,
            },
            hub_verdict: Verdict::MustFlag,
            pattern: PatternKind::FanOut,
            rationale: "one disperser feeds 15 receivers inside two days".into(),
        }));
        c.register(Box::new(CombinedFanScenario {
            name: "combined_hub".into(),
            hub_prefix: "COMBO_HUB".into(),
            in_prefix: "COMBO_IN".into(),
            out_prefix: "COMBO_OUT".into(),
            in_count: 12,
            out_count: 12,
            base_days: 10,
            in_spacing_minutes: 180,
            out_start_hours: 36,
            out_spacing_minutes: 120,
            in_amounts: AmountPlan::Band {
                low: 900.0,
                high: 1100.0,
            },
            out_amounts: AmountPlan::Band {
                low: 800.0,
                high: 1000.0,
            },
            rationale: "aggregate-then-disperse through one hub; pass-through laundering".into(),
        }));

        // ── Structuring variants on the fan-in topology ──────────────
        c.register(Box::new(FanScenario {
            name: "structuring".into(),
            hub_prefix: "STRUCT_AGG".into(),
            spoke_prefix: "STRUCT_S".into(),
            direction: FanDirection::In,
            spokes: 12,
            base_days: 13,
            first_offset_minutes: 300,
            spacing_minutes: 300,
            amounts: AmountPlan::Band {
                low: config.reporting_threshold * 0.95,
                high: config.reporting_threshold - 1.0,
            },
            hub_verdict: Verdict::MustFlag,
            pattern: PatternKind::FanIn,
            rationale: format!(
                "every amount sits just under the {:.0} reporting threshold",
                config.reporting_threshold
            ),
        }));
        c.register(Box::new(FanScenario {
            name: "identical_smurfing".into(),
            hub_prefix: "IDENT_AGG".into(),
            spoke_prefix: "IDENT_S".into(),
            direction: FanDirection::In,
            spokes: 11,
            base_days: 15,
            first_offset_minutes: 240,
            spacing_minutes: 240,
            amounts: AmountPlan::Constant(999.99),
            hub_verdict: Verdict::MustFlag,
            pattern: PatternKind::FanIn,
            rationale: "11 senders, one identical amount".into(),
        }));

        // ── Shell chains ─────────────────────────────────────────────
        c.register(Box::new(ShellChainScenario {
            name: "shell_chain_3".into(),
            prefix: "SHELL3".into(),
            interior: 2,
            start_amount: 15_000.0,
            decay: Decay::FixedStep(200.0),
            base_days: 18,
            hop_spacing_hours: 6,
            cover_count: 5,
            cover_low: 100.0,
            cover_high: 500.0,
            rationale: "two pass-through intermediaries, endpoints covered with unrelated activity"
                .into(),
        }));
        c.register(Box::new(ShellChainScenario {
            name: "shell_chain_5".into(),
            prefix: "SHELL5".into(),
            interior: 4,
            start_amount: 20_000.0,
            decay: Decay::Geometric(0.05),
            base_days: 22,
            hop_spacing_hours: 4,
            cover_count: 6,
            cover_low: 200.0,
            cover_high: 800.0,
            rationale: "four pass-through intermediaries with geometric amount decay".into(),
        }));

        // ── False-positive traps ─────────────────────────────────────
        c.register(Box::new(MerchantScenario {
            name: "merchant".into(),
            customers: 55,
            amount_low: 5.0,
            amount_high: 500.0,
            spacing_hours: 4,
            supplier_payments: vec![(8000.0, 10), (6000.0, 15)],
            base_days: 25,
        }));
        c.register(Box::new(PayrollScenario {
            name: "payroll".into(),
            employees: 25,
            pay_cycles: 3,
            cycle_days: 30,
            salary_low: 3900.0,
            salary_high: 4100.0,
            funding_amount: 100_000.0,
            base_days: 40,
        }));
        c.register(Box::new(ExchangeHubScenario {
            name: "exchange_hub".into(),
            depositors: 64,
            withdrawers: 64,
            amount_low: 100.0,
            amount_high: 50_000.0,
            spacing_hours: 2,
            out_start_hours: 128,
            base_days: 80,
        }));
        c.register(Box::new(B2BScenario {
            name: "b2b_partners".into(),
            months: 12,
            period_days: 30,
            a_to_b_low: 50_000.0,
            a_to_b_high: 80_000.0,
            b_to_a_low: 40_000.0,
            b_to_a_high: 70_000.0,
            base_days: 100,
        }));

        // ── Boundary probes around the configured detector constants ─
        let t = config.fan_threshold;
        c.register(Box::new(FanScenario {
            name: "fan_in_at_threshold".into(),
            hub_prefix: format!("BOUND{t}_AGG"),
            spoke_prefix: format!("BOUND{t}_S"),
            direction: FanDirection::In,
            spokes: t,
            base_days: 120,
            first_offset_minutes: 300,
            spacing_minutes: 300,
            amounts: AmountPlan::Band {
                low: 500.0,
                high: 1500.0,
            },
            hub_verdict: Verdict::MustFlag,
            pattern: PatternKind::Boundary,
            rationale: format!("exactly {t} senders — must trigger at the threshold"),
        }));
        c.register(Box::new(FanScenario {
            name: "fan_in_below_threshold".into(),
            hub_prefix: format!("BOUND{}_AGG", t - 1),
            spoke_prefix: format!("BOUND{}_S", t - 1),
            direction: FanDirection::In,
            spokes: t - 1,
            base_days: 123,
            first_offset_minutes: 300,
            spacing_minutes: 300,
            amounts: AmountPlan::Band {
                low: 500.0,
                high: 1500.0,
            },
            hub_verdict: Verdict::MustNotFlag,
            pattern: PatternKind::Boundary,
            rationale: format!("{} senders, one below the threshold — must not trigger", t - 1),
        }));

        let w = config.window_hours;
        let exact_spacing = w * 60 / (t as i64 - 1);
        c.register(Box::new(FanScenario {
            name: "window_exact".into(),
            hub_prefix: format!("WIN{w}_AGG"),
            spoke_prefix: format!("WIN{w}_S"),
            direction: FanDirection::In,
            spokes: t,
            base_days: 126,
            first_offset_minutes: 0,
            spacing_minutes: exact_spacing,
            amounts: AmountPlan::Band {
                low: 700.0,
                high: 900.0,
            },
            hub_verdict: Verdict::MustFlag,
            pattern: PatternKind::Boundary,
            rationale: format!("{t} senders spanning exactly {w} hours"),
        }));
        c.register(Box::new(FanScenario {
            name: "window_exceeded".into(),
            hub_prefix: format!("WIN{w}X_AGG"),
            spoke_prefix: format!("WIN{w}X_S"),
            direction: FanDirection::In,
            spokes: t,
            base_days: 130,
            first_offset_minutes: 0,
            spacing_minutes: exact_spacing + 60,
            amounts: AmountPlan::Band {
                low: 700.0,
                high: 900.0,
            },
            hub_verdict: Verdict::MustNotFlag,
            pattern: PatternKind::Boundary,
            rationale: format!(
                "same {t} senders and band stretched beyond the {w}-hour window"
            ),
        }));
        c.register(Box::new(FanScenario {
            name: "simultaneous_burst".into(),
            hub_prefix: "SIMULT_AGG".into(),
            spoke_prefix: "SIMULT_S".into(),
            direction: FanDirection::In,
            spokes: 5,
            base_days: 137,
            first_offset_minutes: 0,
            spacing_minutes: 0,
            amounts: AmountPlan::Band {
                low: 100.0,
                high: 500.0,
            },
            hub_verdict: Verdict::Undetermined,
            pattern: PatternKind::Boundary,
            rationale: "identical timestamps; robustness probe, either outcome accepted".into(),
        }));
        c.register(Box::new(IsolatedPairsScenario {
            name: "isolated_pairs".into(),
            pairs: 5,
            amount_low: 100.0,
            amount_high: 5000.0,
            base_days: 140,
        }));

        // ── Mixed compounds ──────────────────────────────────────────
        c.register(Box::new(CycleFanInScenario {
            name: "cycle_plus_fan_in".into(),
            prefix: "MIXED".into(),
            fan_senders: 12,
            base_days: 145,
            cycle_start: 3000.0,
            cycle_skim: 100.0,
            cycle_spacing_hours: 3,
            fan_low: 400.0,
            fan_high: 600.0,
            fan_start_hours: 10,
            fan_spacing_hours: 4,
        }));
        c.register(Box::new(ShellIntoCycleScenario {
            name: "shell_into_cycle".into(),
            prefix: "SCFEED".into(),
            start_amount: 8000.0,
            step: 200.0,
            hop_spacing_hours: 4,
            base_days: 150,
            cover_count: 5,
        }));
        c.register(Box::new(DiamondScenario {
            name: "diamond".into(),
            prefix: "DIAMOND".into(),
            split_amount: 5000.0,
            merge_amount: 4800.0,
            base_days: 155,
        }));

        // ── Background noise, always last ────────────────────────────
        c.register(Box::new(NoiseScenario {
            name: "background_noise".into(),
            prefix: "NORM".into(),
            count: config.noise_transactions,
            pool: 100,
            amount_low: 10.0,
            amount_high: 8000.0,
            span_days: config.noise_span_days,
        }));

        c
    }

    /// Execute every registered scenario exactly once and assemble the
    /// dataset. Consumes the composer — a run is not repeatable on the
    /// same stream positions.
    pub fn run(mut self) -> GenResult<Dataset> {
        let mut transactions: Vec<TransactionRecord> = Vec::new();
        let mut manifest = ExpectationManifest::default();

        // First claimant of each account / prefix, for contamination checks.
        let mut account_owner: HashMap<AccountId, String> = HashMap::new();
        let mut prefix_owner: HashMap<String, String> = HashMap::new();
        let mut verdicts: HashMap<AccountId, (String, Verdict)> = HashMap::new();

        for scenario in &self.scenarios {
            let name = scenario.name().to_string();
            if manifest.get(&name).is_some() {
                return Err(GenError::Other(anyhow!(
                    "scenario name '{name}' registered twice"
                )));
            }

            let output = scenario.build(&mut self.services)?;
            log::debug!(
                "scenario '{name}' emitted {} transactions",
                output.transactions.len()
            );

            let declared = scenario.reuses_accounts();
            for txn in &output.transactions {
                for account in [&txn.sender, &txn.receiver] {
                    claim(
                        &mut account_owner,
                        account.clone(),
                        &name,
                        declared,
                        |account, first| GenError::AccountOverlap {
                            account,
                            first,
                            second: name.clone(),
                        },
                    )?;
                    claim(
                        &mut prefix_owner,
                        prefix_of(account),
                        &name,
                        declared,
                        |prefix, first| GenError::PrefixCollision {
                            prefix,
                            first,
                            second: name.clone(),
                        },
                    )?;
                }
            }

            for (account, verdict) in output.expectation.verdicts() {
                if let Some((first, prior)) = verdicts.get(account) {
                    let conflicting = matches!(
                        (*prior, verdict),
                        (Verdict::MustFlag, Verdict::MustNotFlag)
                            | (Verdict::MustNotFlag, Verdict::MustFlag)
                    );
                    if conflicting && !declared.iter().any(|d| d == first) {
                        return Err(GenError::ConflictingExpectation {
                            account: account.clone(),
                            first: first.clone(),
                            second: name.clone(),
                        });
                    }
                } else {
                    verdicts.insert(account.clone(), (name.clone(), verdict));
                }
            }

            transactions.extend(output.transactions);
            manifest.push(output.expectation);
        }

        verify_id_sequence(&transactions)?;

        log::info!(
            "composed {} transactions across {} scenarios",
            transactions.len(),
            manifest.len()
        );
        Ok(Dataset {
            transactions,
            manifest,
        })
    }
}

/// `ACC_SHELL3_MID_0002` → `SHELL3_MID`.
fn prefix_of(account: &str) -> String {
    let body = account.strip_prefix("ACC_").unwrap_or(account);
    match body.rsplit_once('_') {
        Some((prefix, _)) => prefix.to_string(),
        None => body.to_string(),
    }
}

/// Record `key` as owned by `owner`, or error if another scenario holds
/// it and `owner` did not declare the reuse.
fn claim(
    owners: &mut HashMap<String, String>,
    key: String,
    owner: &str,
    declared: &[String],
    err: impl Fn(String, String) -> GenError,
) -> GenResult<()> {
    if let Some(first) = owners.get(&key) {
        if first == owner || declared.iter().any(|d| d == first) {
            return Ok(());
        }
        return Err(err(key, first.clone()));
    }
    owners.insert(key, owner.to_string());
    Ok(())
}

/// Transaction ids must be `TXN_00001..TXN_n` with no gap or repeat —
/// emission order is the file order.
fn verify_id_sequence(transactions: &[TransactionRecord]) -> GenResult<()> {
    for (i, txn) in transactions.iter().enumerate() {
        let expected = format!("TXN_{:05}", i + 1);
        if txn.id != expected {
            return Err(GenError::Other(anyhow!(
                "transaction id sequence broken at position {i}: got {}, expected {expected}",
                txn.id
            )));
        }
    }
    Ok(())
}
