//! Simulated-annealing scheduler for independent tasks on identical
//! processors.
//!
//! Given tasks with processing durations and a number of identical
//! processors, finds an assignment and per-processor order minimizing
//! total flow time (the sum of task completion times):
//!
//! - **Schedules** ([`schedule`]): problem instances, the input
//!   description format, and the assignment state with its objective.
//! - **Mutation** ([`mutation`]): random single-task transfer moves.
//! - **Simulated Annealing** ([`sa`]): pluggable cooling laws and the
//!   stagnation-bounded annealing run.
//! - **Parallel annealing** ([`parallel`]): fork-join rounds of
//!   independent workers, keeping the best result across rounds.
//!
//! # Examples
//!
//! ```
//! use u_flowsched::parallel::{ParallelAnnealer, ParallelConfig};
//! use u_flowsched::random::create_rng;
//! use u_flowsched::schedule::ScheduleState;
//!
//! let mut rng = create_rng(42);
//! let seed = ScheduleState::from_description("2\n4\n0,3\n1,2\n2,5\n3,1\n", &mut rng).unwrap();
//!
//! let config = ParallelConfig::default().with_workers(2).with_seed(7);
//! let result = ParallelAnnealer::run(seed.clone(), &config).unwrap();
//! assert!(result.best_quality <= seed.quality());
//! println!("{}", result.best.render());
//! ```
//!
//! # Logging
//!
//! Progress is reported through [`tracing`] events; install a subscriber
//! to see them.

pub mod error;
pub mod mutation;
pub mod parallel;
pub mod random;
pub mod sa;
pub mod schedule;

pub use error::{Result, ScheduleError};
