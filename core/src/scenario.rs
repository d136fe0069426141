//! Scenario trait and the shared service bundle.
//!
//! RULE: every topology builder implements Scenario. The composer calls
//! build() on each registered scenario exactly once, in catalog order.
//! Builders consume the shared services — they never construct their own
//! allocator, randomness stream, or time cursor.

use crate::{
    clock::TimeCursor,
    error::{GenError, GenResult},
    expectation::Expectation,
    ids::IdAllocator,
    rng::{round_cents, AmountRng},
    types::TransactionRecord,
};
use chrono::NaiveDateTime;

/// The shared mutable state of a run: one id counter, one randomness
/// stream, one epoch. Passed to every builder by the composer.
pub struct Services {
    pub ids: IdAllocator,
    pub rng: AmountRng,
    pub time: TimeCursor,
}

impl Services {
    pub fn new(master_seed: u64) -> Self {
        Self {
            ids: IdAllocator::new(),
            rng: AmountRng::new(master_seed),
            time: TimeCursor::new(),
        }
    }

    /// Emit one transaction: allocates the next id and rejects self-loops.
    /// All builders create records through here, which is what ties file
    /// order to generation order.
    pub fn record(
        &mut self,
        scenario: &str,
        sender: &str,
        receiver: &str,
        amount: f64,
        timestamp: NaiveDateTime,
    ) -> GenResult<TransactionRecord> {
        if sender == receiver {
            return Err(GenError::SelfLoop {
                scenario: scenario.to_string(),
                account: sender.to_string(),
            });
        }
        Ok(TransactionRecord {
            id: self.ids.next_transaction_id(),
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount: round_cents(amount),
            timestamp,
        })
    }
}

/// What one scenario contributes to the run.
#[derive(Debug)]
pub struct ScenarioOutput {
    pub transactions: Vec<TransactionRecord>,
    pub expectation: Expectation,
}

/// The contract every topology builder must fulfill.
pub trait Scenario {
    /// Unique stable name, used as the manifest key.
    fn name(&self) -> &str;

    /// Names of scenarios whose exact account identifiers this one
    /// deliberately reuses. Any cross-scenario account reuse not covered
    /// by this declaration aborts composition.
    fn reuses_accounts(&self) -> &[String] {
        &[]
    }

    /// Emit this scenario's transactions and expectation. Called exactly
    /// once per run. Must fail fast on any structural-contract violation
    /// rather than emit invalid data.
    fn build(&self, svc: &mut Services) -> GenResult<ScenarioOutput>;
}
