//! Neighborhood moves for the annealing loop.

use rand::Rng;

use crate::schedule::ScheduleState;

/// Produces a random neighbor of a schedule.
///
/// Operators take the schedule by reference and return a new value; the
/// caller's copy is never modified.
pub trait Mutation<S>: Clone + Send + Sync {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Returns a neighbor of `schedule`.
    fn mutate<R: Rng>(&self, schedule: &S, rng: &mut R) -> S;
}

/// Moves one random task from one processor to the end of another.
///
/// 1. Pick a source processor uniformly, resampling until it is non-empty.
/// 2. Pick a destination uniformly, resampling while it equals the source.
/// 3. Pick a position uniformly among the source's tasks.
/// 4. Transfer that task to the end of the destination.
///
/// With a single processor, or no tasks at all, no move exists and the
/// input is returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferMutation;

impl Mutation<ScheduleState> for TransferMutation {
    fn name(&self) -> &str {
        "transfer"
    }

    fn mutate<R: Rng>(&self, schedule: &ScheduleState, rng: &mut R) -> ScheduleState {
        let proc_num = schedule.processor_count();
        if proc_num == 1 || schedule.task_count() == 0 {
            return schedule.clone();
        }

        let mut source = rng.random_range(0..proc_num);
        while schedule.queue_len(source) == 0 {
            source = rng.random_range(0..proc_num);
        }

        let mut dest = rng.random_range(0..proc_num);
        while dest == source {
            dest = rng.random_range(0..proc_num);
        }

        let position = rng.random_range(0..schedule.queue_len(source));

        let mut neighbor = schedule.clone();
        neighbor.relocate(position, source, dest);
        neighbor
    }
}
