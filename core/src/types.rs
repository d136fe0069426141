//! Shared primitive types used across the entire generator.

use chrono::NaiveDateTime;

/// A stable account identifier, e.g. `ACC_CYCLE3_0001`.
pub type AccountId = String;

/// A transaction identifier, e.g. `TXN_00042`.
pub type TxnId = String;

/// One immutable transaction fact. Created once by a scenario builder,
/// appended to the global sequence, never mutated.
///
/// Invariant: `sender != receiver`. Enforced at emission — a self-loop is a
/// generator defect, not a data point.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: TxnId,
    pub sender: AccountId,
    pub receiver: AccountId,
    /// Positive amount, rounded to 2 fraction digits.
    pub amount: f64,
    /// Second resolution, no timezone.
    pub timestamp: NaiveDateTime,
}
