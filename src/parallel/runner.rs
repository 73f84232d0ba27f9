//! Round-based coordinator for independent annealing workers.
//!
//! # Algorithm
//!
//! 1. Start from the seed schedule as the global best.
//! 2. Each round, run `workers` annealing runs in parallel, all starting
//!    from the global best, each with its own generator.
//! 3. Join, then reduce the workers' results to the lowest quality.
//! 4. If that beats the global best, it becomes the new global best and
//!    the seed for the following rounds.
//! 5. Stop once `round - last_improved_round > round_stagnation_limit`.
//!
//! Workers return their results by value; the reduction is a fold over
//! the collected results, so no state is shared between workers.

use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::config::ParallelConfig;
use crate::error::Result;
use crate::mutation::{Mutation, TransferMutation};
use crate::random::{create_rng, derive_seeds, rng_from_option};
use crate::sa::{AnnealingRun, Temperature};
use crate::schedule::{Schedule, ScheduleState};

/// Outcome of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    /// Zero-based round index.
    pub round: usize,

    /// Final best quality of each worker, in worker order.
    pub worker_qualities: Vec<u64>,

    /// Iterations each worker ran, in worker order.
    pub worker_iterations: Vec<usize>,

    /// Lowest quality among the workers.
    pub round_best_quality: u64,

    /// Whether this round improved the global best.
    pub improved: bool,
}

/// Result of a parallel annealing run.
#[derive(Debug, Clone)]
pub struct ParallelResult<S: Clone> {
    /// The best schedule found across all rounds (the seed if no round
    /// improved on it).
    pub best: S,

    /// Quality of the best schedule.
    pub best_quality: u64,

    /// Quality of the seed schedule.
    pub seed_quality: u64,

    /// Number of rounds executed.
    pub rounds: usize,

    /// Index of the last round that improved the global best.
    pub last_improved_round: usize,

    /// Per-round statistics.
    pub round_history: Vec<RoundSummary>,

    /// Wall-clock time for the whole run.
    pub elapsed: Duration,
}

struct WorkerOutcome<S> {
    best: S,
    quality: u64,
    iterations: usize,
}

/// Runs independent annealing workers in fork-join rounds.
pub struct ParallelAnnealer;

impl ParallelAnnealer {
    /// Anneals `seed` with [`TransferMutation`] and the cooling law from
    /// `config.anneal`.
    pub fn run(
        seed: ScheduleState,
        config: &ParallelConfig,
    ) -> Result<ParallelResult<ScheduleState>> {
        config.validate()?;
        Self::run_with(
            seed,
            &TransferMutation,
            &config.anneal.cooling_schedule(),
            config,
        )
    }

    /// Anneals with caller-supplied templates.
    ///
    /// Every worker of every round gets its own clone of `mutation` and
    /// `temperature`; `temperature` must already be set.
    #[tracing::instrument(
        level = "debug",
        name = "parallel annealing",
        skip_all,
        fields(workers = config.workers, mutation = mutation.name())
    )]
    pub fn run_with<S, M, T>(
        seed: S,
        mutation: &M,
        temperature: &T,
        config: &ParallelConfig,
    ) -> Result<ParallelResult<S>>
    where
        S: Schedule,
        M: Mutation<S>,
        T: Temperature,
    {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("anneal-worker-{i}"))
            .build()?;
        let mut master = rng_from_option(config.anneal.seed);
        let stagnation_limit = config.anneal.stagnation_limit;

        let start = Instant::now();
        let seed_quality = seed.quality();
        let mut best = seed;
        let mut best_quality = seed_quality;
        let mut round = 0usize;
        let mut last_improved_round = 0usize;
        let mut round_history = Vec::new();

        while round - last_improved_round <= config.round_stagnation_limit {
            let worker_seeds = derive_seeds(&mut master, config.workers);
            let round_seed = &best;

            let outcomes: Vec<WorkerOutcome<S>> = pool.install(|| {
                worker_seeds
                    .into_par_iter()
                    .map(|worker_seed| {
                        let result = AnnealingRun::new(
                            round_seed.clone(),
                            mutation.clone(),
                            temperature.clone(),
                            stagnation_limit,
                            create_rng(worker_seed),
                        )
                        .run();
                        WorkerOutcome {
                            best: result.best,
                            quality: result.best_quality,
                            iterations: result.iterations,
                        }
                    })
                    .collect()
            });

            let worker_qualities: Vec<u64> = outcomes.iter().map(|o| o.quality).collect();
            let worker_iterations: Vec<usize> = outcomes.iter().map(|o| o.iterations).collect();

            let mut improved = false;
            let mut round_best_quality = best_quality;
            if let Some(winner) = reduce_round(outcomes) {
                round_best_quality = winner.quality;
                if winner.quality < best_quality {
                    best = winner.best;
                    best_quality = winner.quality;
                    last_improved_round = round;
                    improved = true;
                }
            }

            tracing::debug!(
                round,
                round_best = round_best_quality,
                global_best = best_quality,
                improved,
                "round complete"
            );

            round_history.push(RoundSummary {
                round,
                worker_qualities,
                worker_iterations,
                round_best_quality,
                improved,
            });
            round += 1;
        }

        let elapsed = start.elapsed();
        tracing::info!(
            rounds = round,
            seed_quality,
            best_quality,
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "parallel annealing finished"
        );

        Ok(ParallelResult {
            best,
            best_quality,
            seed_quality,
            rounds: round,
            last_improved_round,
            round_history,
            elapsed,
        })
    }
}

/// Lowest-quality outcome; ties go to the lowest worker index.
fn reduce_round<S>(outcomes: Vec<WorkerOutcome<S>>) -> Option<WorkerOutcome<S>> {
    outcomes
        .into_iter()
        .fold(None, |acc: Option<WorkerOutcome<S>>, outcome| match acc {
            Some(current) if current.quality <= outcome.quality => Some(current),
            _ => Some(outcome),
        })
}
