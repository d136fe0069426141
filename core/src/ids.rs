//! Identifier allocation.
//!
//! RULE: one transaction counter for the whole run, incremented by exactly
//! one per call, in call order. Transaction order in the output file
//! therefore reflects generation order, not timestamp order. The counter
//! is never reset and never skips.

use crate::types::{AccountId, TxnId};

/// Monotonic transaction-id allocator. One instance per run, owned by the
/// composer's service bundle and shared by every scenario builder.
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// `TXN_00001`, `TXN_00002`, ... globally across all scenarios.
    pub fn next_transaction_id(&mut self) -> TxnId {
        let id = format!("TXN_{:05}", self.next);
        self.next += 1;
        id
    }

    /// How many ids have been issued so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure function — no counter, no side effect. Callers choose indices,
/// which is what allows a scenario to deliberately reuse the exact same
/// identifier another scenario minted (declared overlap only).
pub fn account_id(prefix: &str, index: u32) -> AccountId {
    format!("ACC_{prefix}_{index:04}")
}
