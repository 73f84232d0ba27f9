//! Core schedule types.

/// A task with a fixed processing duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    /// Task id in `[0, task_count)`.
    pub id: usize,
    /// Processing duration.
    pub duration: u64,
}

/// A candidate solution the annealing loop can rank.
///
/// The annealing run only needs to score and copy schedules; moves are
/// produced by a [`Mutation`](crate::mutation::Mutation) operator that
/// knows the concrete representation.
///
/// # Minimization
///
/// Lower quality is better.
pub trait Schedule: Clone + Send + Sync {
    /// Objective value of this schedule. Lower is better.
    fn quality(&self) -> u64;
}
