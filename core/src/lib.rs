//! fraudgraph-core — deterministic synthetic transaction-graph generator.
//!
//! Builds a labeled financial-transaction dataset containing known
//! fraud topologies (cycles, smurfing fans, shell chains, compounds),
//! known-legitimate false-positive traps, boundary-exact probes, and
//! background noise — plus the machine-checkable manifest of which
//! accounts and rings an external detector must and must not flag.
//!
//! Everything is deterministic: one seeded randomness stream, one
//! monotonic id counter, one fixed epoch, one documented catalog order.
//! Same seed, same bytes.

pub mod clock;
pub mod composer;
pub mod config;
pub mod error;
pub mod expectation;
pub mod harness;
pub mod ids;
pub mod rng;
pub mod scenario;
pub mod scenarios;
pub mod serialize;
pub mod types;
