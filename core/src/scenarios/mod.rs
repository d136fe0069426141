//! The scenario catalog — one module per topology family.
//!
//! Each builder is grounded in the structural contract of the pattern it
//! embeds: a cycle must close, a shell intermediary must have exactly two
//! transactions, a false-positive trap must fail the fraud signature on
//! its one distinguishing property. A builder that cannot honor its
//! contract aborts the run instead of emitting.

mod boundary;
mod cycle;
mod fan;
mod mixed;
mod noise;
mod shell;
mod traps;

pub use boundary::IsolatedPairsScenario;
pub use cycle::CycleScenario;
pub use fan::{CombinedFanScenario, FanDirection, FanScenario};
pub use mixed::{CycleFanInScenario, DiamondScenario, ShellIntoCycleScenario};
pub use noise::NoiseScenario;
pub use shell::{Decay, ShellChainScenario};
pub use traps::{B2BScenario, ExchangeHubScenario, MerchantScenario, PayrollScenario};

use crate::rng::AmountRng;

/// How a builder chooses hop/spoke amounts.
#[derive(Debug, Clone)]
pub enum AmountPlan {
    /// Strictly decreasing: `start, start - step, start - 2*step, ...`
    /// Models the per-hop skim of laundered funds.
    Skim { start: f64, step: f64 },
    /// Independent uniform draw per transaction from the shared stream.
    Band { low: f64, high: f64 },
    /// The same amount every time (identical-amount smurfing).
    Constant(f64),
}

impl AmountPlan {
    pub fn draw(&self, index: usize, rng: &mut AmountRng) -> f64 {
        match self {
            Self::Skim { start, step } => start - step * index as f64,
            Self::Band { low, high } => rng.amount(*low, *high),
            Self::Constant(amount) => *amount,
        }
    }

    /// Reject plans that could produce a non-positive amount within
    /// `count` draws.
    pub fn validate(&self, count: usize) -> Result<(), String> {
        match self {
            Self::Skim { start, step } => {
                if *step <= 0.0 {
                    return Err(format!("skim step must be positive, got {step}"));
                }
                let last = start - step * (count.saturating_sub(1)) as f64;
                if last <= 0.0 {
                    return Err(format!(
                        "skim of {step} over {count} hops exhausts the starting amount {start}"
                    ));
                }
                Ok(())
            }
            Self::Band { low, high } => {
                if *low <= 0.0 || high < low {
                    return Err(format!("amount band [{low}, {high}] is not a positive range"));
                }
                Ok(())
            }
            Self::Constant(amount) => {
                if *amount <= 0.0 {
                    return Err(format!("constant amount must be positive, got {amount}"));
                }
                Ok(())
            }
        }
    }
}
