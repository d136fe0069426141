//! False-positive traps — legitimate topologies that resemble fraud by
//! volume or degree but fail the fraud signature on one distinguishing
//! property. None of their participants may be flagged; a detector that
//! flags them over-triggers.

use crate::{
    error::{GenError, GenResult},
    expectation::{Expectation, PatternKind, TimeWindow},
    ids::account_id,
    scenario::{Scenario, ScenarioOutput, Services},
};

/// High fan-in, near-zero fan-out, highly varied amounts, no back-flow
/// to the paying customers. Distinguisher: a mule aggregator forwards
/// what it collects; a merchant keeps it and pays a couple of suppliers.
pub struct MerchantScenario {
    pub name: String,
    pub customers: usize,
    pub amount_low: f64,
    pub amount_high: f64,
    pub spacing_hours: i64,
    /// (amount, day offset from base) per supplier payment.
    pub supplier_payments: Vec<(f64, i64)>,
    pub base_days: i64,
}

impl Scenario for MerchantScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        if self.customers == 0 {
            return Err(GenError::InvalidScenario {
                scenario: self.name.clone(),
                reason: "merchant needs at least one customer".into(),
            });
        }

        let merchant = account_id("MERCHANT", 1);
        let mut transactions = Vec::new();
        let mut participants = vec![merchant.clone()];

        for i in 1..=self.customers as u32 {
            let customer = account_id("CUST", i);
            let amount = svc.rng.amount(self.amount_low, self.amount_high);
            let ts = svc
                .time
                .at(self.base_days, i as i64 * self.spacing_hours, 0);
            transactions.push(svc.record(&self.name, &customer, &merchant, amount, ts)?);
            participants.push(customer);
        }
        for (i, (amount, day)) in self.supplier_payments.iter().enumerate() {
            let supplier = account_id("SUPPLIER", i as u32 + 1);
            let ts = svc.time.at(self.base_days + day, 0, 0);
            transactions.push(svc.record(&self.name, &merchant, &supplier, *amount, ts)?);
            participants.push(supplier);
        }

        Ok(ScenarioOutput {
            expectation: Expectation {
                scenario: self.name.clone(),
                pattern: PatternKind::FalsePositiveTrap,
                window: TimeWindow::of(&transactions),
                must_flag: Vec::new(),
                must_not_flag: participants,
                undetermined: Vec::new(),
                rings: Vec::new(),
                rationale: "merchant: high in-degree with varied retail amounts and no back-flow to customers".into(),
            },
            transactions,
        })
    }
}

/// High fan-out at a fixed interval in a narrow amount band, funded by a
/// corporate account, no back-flow. Distinguisher: dispersal repeats on a
/// calendar schedule instead of clustering into one burst window.
pub struct PayrollScenario {
    pub name: String,
    pub employees: usize,
    pub pay_cycles: usize,
    pub cycle_days: i64,
    pub salary_low: f64,
    pub salary_high: f64,
    pub funding_amount: f64,
    pub base_days: i64,
}

impl Scenario for PayrollScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        if self.employees == 0 || self.pay_cycles == 0 {
            return Err(GenError::InvalidScenario {
                scenario: self.name.clone(),
                reason: "payroll needs employees and at least one pay cycle".into(),
            });
        }

        let payroll = account_id("PAYROLL", 1);
        let hq = account_id("CORPORATE_HQ", 1);
        let mut transactions = Vec::new();

        // HQ funds the payroll account the day before each cycle.
        for cycle in 0..self.pay_cycles as i64 {
            let ts = svc.time.at(self.base_days + cycle * self.cycle_days - 1, 0, 0);
            transactions.push(svc.record(&self.name, &hq, &payroll, self.funding_amount, ts)?);
        }
        let mut participants = vec![payroll.clone(), hq];
        for cycle in 0..self.pay_cycles as i64 {
            for emp in 1..=self.employees as u32 {
                let employee = account_id("EMP", emp);
                let amount = svc.rng.amount(self.salary_low, self.salary_high);
                let ts = svc
                    .time
                    .at(self.base_days + cycle * self.cycle_days, emp as i64, 0);
                transactions.push(svc.record(&self.name, &payroll, &employee, amount, ts)?);
                if cycle == 0 {
                    participants.push(employee);
                }
            }
        }

        Ok(ScenarioOutput {
            expectation: Expectation {
                scenario: self.name.clone(),
                pattern: PatternKind::FalsePositiveTrap,
                window: TimeWindow::of(&transactions),
                must_flag: Vec::new(),
                must_not_flag: participants,
                undetermined: Vec::new(),
                rings: Vec::new(),
                rationale: "payroll: regular monthly dispersal in a narrow salary band, no back-flow".into(),
            },
            transactions,
        })
    }
}

/// High in-degree AND out-degree, but the depositor and withdrawer sets
/// do not overlap — funds are not returning to their senders, which is
/// what separates a platform from a pass-through mule hub.
pub struct ExchangeHubScenario {
    pub name: String,
    pub depositors: usize,
    pub withdrawers: usize,
    pub amount_low: f64,
    pub amount_high: f64,
    pub spacing_hours: i64,
    /// The withdrawal leg starts this many hours after the base.
    pub out_start_hours: i64,
    pub base_days: i64,
}

impl Scenario for ExchangeHubScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        if self.depositors == 0 || self.withdrawers == 0 {
            return Err(GenError::InvalidScenario {
                scenario: self.name.clone(),
                reason: "exchange hub needs depositors and withdrawers".into(),
            });
        }

        let hub = account_id("EXCHANGE", 1);
        let mut transactions = Vec::new();
        let mut participants = vec![hub.clone()];

        for i in 1..=self.depositors as u32 {
            let depositor = account_id("DEPOSITOR", i);
            let amount = svc.rng.amount(self.amount_low, self.amount_high);
            let ts = svc
                .time
                .at(self.base_days, i as i64 * self.spacing_hours, 0);
            transactions.push(svc.record(&self.name, &depositor, &hub, amount, ts)?);
            participants.push(depositor);
        }
        for i in 1..=self.withdrawers as u32 {
            let withdrawer = account_id("WITHDRAWER", i);
            let amount = svc.rng.amount(self.amount_low, self.amount_high);
            let ts = svc.time.at(
                self.base_days,
                self.out_start_hours + i as i64 * self.spacing_hours,
                0,
            );
            transactions.push(svc.record(&self.name, &hub, &withdrawer, amount, ts)?);
            participants.push(withdrawer);
        }

        Ok(ScenarioOutput {
            expectation: Expectation {
                scenario: self.name.clone(),
                pattern: PatternKind::FalsePositiveTrap,
                window: TimeWindow::of(&transactions),
                must_flag: Vec::new(),
                must_not_flag: participants,
                undetermined: Vec::new(),
                rings: Vec::new(),
                rationale: "exchange hub: high in- and out-degree with disjoint depositor and withdrawer sets".into(),
            },
            transactions,
        })
    }
}

/// Two corporate accounts exchanging large transfers on a regular
/// schedule. High value alone must not imply suspicion.
pub struct B2BScenario {
    pub name: String,
    pub months: usize,
    pub period_days: i64,
    pub a_to_b_low: f64,
    pub a_to_b_high: f64,
    pub b_to_a_low: f64,
    pub b_to_a_high: f64,
    pub base_days: i64,
}

impl Scenario for B2BScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput> {
        if self.months == 0 {
            return Err(GenError::InvalidScenario {
                scenario: self.name.clone(),
                reason: "b2b schedule needs at least one period".into(),
            });
        }

        let corp_a = account_id("CORP_A", 1);
        let corp_b = account_id("CORP_B", 1);
        let mut transactions = Vec::new();

        for month in 0..self.months as i64 {
            let amount = svc.rng.amount(self.a_to_b_low, self.a_to_b_high);
            let ts = svc.time.at(self.base_days + month * self.period_days, 0, 0);
            transactions.push(svc.record(&self.name, &corp_a, &corp_b, amount, ts)?);

            let amount = svc.rng.amount(self.b_to_a_low, self.b_to_a_high);
            let ts = svc.time.at(
                self.base_days + month * self.period_days + self.period_days / 2,
                0,
                0,
            );
            transactions.push(svc.record(&self.name, &corp_b, &corp_a, amount, ts)?);
        }

        Ok(ScenarioOutput {
            expectation: Expectation {
                scenario: self.name.clone(),
                pattern: PatternKind::FalsePositiveTrap,
                window: TimeWindow::of(&transactions),
                must_flag: Vec::new(),
                must_not_flag: vec![corp_a, corp_b],
                undetermined: Vec::new(),
                rings: Vec::new(),
                rationale: "b2b: large bidirectional transfers at regular intervals between two counterparties".into(),
            },
            transactions,
        })
    }
}
