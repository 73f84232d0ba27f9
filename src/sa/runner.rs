//! Single-worker annealing loop.
//!
//! # Algorithm
//!
//! While `iteration - best_iteration <= stagnation_limit`:
//!
//! 1. Propose `next = mutate(current)`.
//! 2. If `next` beats the best schedule, it becomes both current and best.
//! 3. Otherwise, if it is no worse than current, it becomes current.
//! 4. Otherwise it becomes current with probability `exp(-delta / T)`.
//! 5. Cool down and advance the iteration counter.

use std::time::{Duration, Instant};

use rand::Rng;

use super::config::AnnealConfig;
use super::cooling::Temperature;
use crate::error::Result;
use crate::mutation::{Mutation, TransferMutation};
use crate::random::rng_from_option;
use crate::schedule::{Schedule, ScheduleState};

/// Lifecycle of an [`AnnealingRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// The stagnation window still has room.
    Running,
    /// The best schedule has not improved for more than the stagnation
    /// limit; further steps are no-ops.
    Terminated,
}

/// Result of a completed annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult<S: Clone> {
    /// The best schedule found.
    pub best: S,

    /// Quality of the best schedule.
    pub best_quality: u64,

    /// Total number of iterations (proposals evaluated).
    pub iterations: usize,

    /// Iteration at which the best schedule was last improved.
    pub best_iteration: usize,

    /// Number of accepted proposals (including improvements).
    pub accepted_moves: usize,

    /// Number of proposals that improved the best schedule.
    pub improving_moves: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Best quality at every iteration boundary, starting with the seed.
    pub quality_history: Vec<u64>,

    /// Wall-clock time spent in the loop.
    pub elapsed: Duration,
}

/// One simulated-annealing trajectory.
///
/// The run owns its working schedule, cooling schedule and generator, so
/// several runs can proceed on different threads without sharing state.
///
/// # Examples
///
/// ```
/// use u_flowsched::mutation::TransferMutation;
/// use u_flowsched::random::create_rng;
/// use u_flowsched::sa::{AnnealingRun, CoolingLaw, CoolingSchedule};
/// use u_flowsched::schedule::ScheduleState;
///
/// let mut rng = create_rng(42);
/// let seed = ScheduleState::new(3, vec![4, 8, 15, 16, 23, 42], &mut rng).unwrap();
/// let start = seed.quality();
///
/// let run = AnnealingRun::new(
///     seed,
///     TransferMutation,
///     CoolingSchedule::with_initial(CoolingLaw::Boltzmann, 1_000.0),
///     100,
///     rng,
/// );
/// let result = run.run();
/// assert!(result.best_quality <= start);
/// ```
#[derive(Debug, Clone)]
pub struct AnnealingRun<S, M, T, R> {
    current: S,
    current_quality: u64,
    best: S,
    best_quality: u64,
    best_iteration: usize,
    iteration: usize,
    stagnation_limit: usize,
    mutation: M,
    temperature: T,
    rng: R,
    accepted_moves: usize,
    improving_moves: usize,
}

impl<S, M, T, R> AnnealingRun<S, M, T, R>
where
    S: Schedule,
    M: Mutation<S>,
    T: Temperature,
    R: Rng,
{
    /// Creates a run starting from `seed`. `temperature` must already be
    /// set to its initial value.
    pub fn new(seed: S, mutation: M, temperature: T, stagnation_limit: usize, rng: R) -> Self {
        let quality = seed.quality();
        Self {
            best: seed.clone(),
            best_quality: quality,
            current: seed,
            current_quality: quality,
            best_iteration: 0,
            iteration: 0,
            stagnation_limit,
            mutation,
            temperature,
            rng,
            accepted_moves: 0,
            improving_moves: 0,
        }
    }

    pub fn state(&self) -> RunState {
        if self.iteration - self.best_iteration <= self.stagnation_limit {
            RunState::Running
        } else {
            RunState::Terminated
        }
    }

    /// Executes one iteration of the loop body if the run is still running.
    pub fn step(&mut self) -> RunState {
        if self.state() == RunState::Terminated {
            return RunState::Terminated;
        }

        let proposal = self.mutation.mutate(&self.current, &mut self.rng);
        let proposal_quality = proposal.quality();
        let delta = proposal_quality as f64 - self.current_quality as f64;

        if proposal_quality < self.best_quality {
            tracing::trace!(
                iteration = self.iteration,
                quality = proposal_quality,
                "new best schedule"
            );
            self.best = proposal.clone();
            self.best_quality = proposal_quality;
            self.best_iteration = self.iteration;
            self.accept(proposal, proposal_quality);
            self.improving_moves += 1;
        } else if delta <= 0.0 {
            self.accept(proposal, proposal_quality);
        } else {
            let threshold = (-delta / self.temperature.get()).exp();
            let u: f64 = self.rng.random();
            if u <= threshold {
                self.accept(proposal, proposal_quality);
            }
        }

        self.temperature.decrease();
        self.iteration += 1;
        self.state()
    }

    fn accept(&mut self, proposal: S, quality: u64) {
        self.current = proposal;
        self.current_quality = quality;
        self.accepted_moves += 1;
    }

    /// Runs to termination and returns the best schedule found.
    pub fn run(mut self) -> AnnealResult<S> {
        let start = Instant::now();
        let mut quality_history = vec![self.best_quality];
        while self.state() == RunState::Running {
            self.step();
            quality_history.push(self.best_quality);
        }
        let elapsed = start.elapsed();

        tracing::debug!(
            iterations = self.iteration,
            best_iteration = self.best_iteration,
            best_quality = self.best_quality,
            accepted = self.accepted_moves,
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "annealing run terminated"
        );

        AnnealResult {
            final_temperature: self.temperature.get(),
            best: self.best,
            best_quality: self.best_quality,
            iterations: self.iteration,
            best_iteration: self.best_iteration,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            quality_history,
            elapsed,
        }
    }

    /// Best schedule found so far.
    pub fn best(&self) -> &S {
        &self.best
    }

    pub fn best_quality(&self) -> u64 {
        self.best_quality
    }

    /// Schedule the search is currently at.
    pub fn current(&self) -> &S {
        &self.current
    }

    pub fn current_quality(&self) -> u64 {
        self.current_quality
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn best_iteration(&self) -> usize {
        self.best_iteration
    }

    pub fn temperature(&self) -> &T {
        &self.temperature
    }
}

/// Convenience entry point for annealing a [`ScheduleState`].
pub struct Annealer;

impl Annealer {
    /// Anneals `schedule` with [`TransferMutation`] and the cooling law
    /// from `config`.
    pub fn run(
        schedule: ScheduleState,
        config: &AnnealConfig,
    ) -> Result<AnnealResult<ScheduleState>> {
        config.validate()?;
        Self::run_with(schedule, TransferMutation, config.cooling_schedule(), config)
    }

    /// Anneals with caller-supplied operators. `temperature` must already
    /// be set; `config` supplies the stagnation limit and seed.
    pub fn run_with<S, M, T>(
        schedule: S,
        mutation: M,
        temperature: T,
        config: &AnnealConfig,
    ) -> Result<AnnealResult<S>>
    where
        S: Schedule,
        M: Mutation<S>,
        T: Temperature,
    {
        config.validate()?;
        let rng = rng_from_option(config.seed);
        Ok(AnnealingRun::new(schedule, mutation, temperature, config.stagnation_limit, rng).run())
    }
}
