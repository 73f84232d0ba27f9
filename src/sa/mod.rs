//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Worsening moves are accepted with a probability
//! that shrinks as the temperature cools, letting the search escape
//! local optima early and settle later. A run stops once its best
//! schedule has not improved for a fixed number of iterations.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod cooling;
mod runner;

pub use config::AnnealConfig;
pub use cooling::{CoolingLaw, CoolingSchedule, Temperature};
pub use runner::{AnnealResult, Annealer, AnnealingRun, RunState};
