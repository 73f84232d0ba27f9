//! Parallel annealing.
//!
//! Races several independent annealing runs per round on a dedicated
//! thread pool and carries the best schedule forward as the next round's
//! starting point, until rounds stop paying off.

mod config;
mod runner;

pub use config::ParallelConfig;
pub use runner::{ParallelAnnealer, ParallelResult, RoundSummary};
