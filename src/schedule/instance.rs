//! Problem instances and the textual input description.
//!
//! # Format
//!
//! ```text
//! <processor count>
//! <task count>
//! <task id>,<duration>
//! ...
//! ```
//!
//! Blank lines are ignored. Task ids must be exactly `0..task_count`, in
//! any order, each appearing once.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use rand::Rng;

use super::state::ScheduleState;
use super::types::Task;
use crate::error::{Result, ScheduleError};

/// A scheduling problem: identical processors and tasks with durations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawInstance", into = "RawInstance")
)]
pub struct Instance {
    proc_num: usize,
    durations: Vec<u64>,
}

/// Serialized form of an [`Instance`]; validated on the way back in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct RawInstance {
    proc_num: usize,
    durations: Vec<u64>,
}

impl From<Instance> for RawInstance {
    fn from(instance: Instance) -> Self {
        Self {
            proc_num: instance.proc_num,
            durations: instance.durations,
        }
    }
}

impl TryFrom<RawInstance> for Instance {
    type Error = ScheduleError;

    fn try_from(raw: RawInstance) -> Result<Self> {
        Instance::new(raw.proc_num, raw.durations)
    }
}

/// Upper bound on the total flow time of any schedule over `durations`,
/// or `None` if it does not fit in a `u64`.
///
/// Every completion time is at most the sum of all durations, so the flow
/// time is at most `task_count * sum(durations)`.
pub(crate) fn flow_time_bound(durations: &[u64]) -> Option<u64> {
    let total = durations
        .iter()
        .try_fold(0u64, |acc, &d| acc.checked_add(d))?;
    total.checked_mul(durations.len() as u64)
}

impl Instance {
    /// Creates an instance. `durations[i]` is the duration of task `i`.
    pub fn new(proc_num: usize, durations: Vec<u64>) -> Result<Self> {
        if proc_num == 0 {
            return Err(ScheduleError::config("processor count must be at least 1"));
        }
        if flow_time_bound(&durations).is_none() {
            return Err(ScheduleError::config("total flow time would overflow u64"));
        }
        Ok(Self {
            proc_num,
            durations,
        })
    }

    /// Parses an input description.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line_no, raw) = lines
            .next()
            .ok_or_else(|| ScheduleError::parse(1, "missing processor count"))?;
        let proc_num: usize = raw.parse().map_err(|_| {
            ScheduleError::parse(line_no, format!("processor count `{raw}` is not an integer"))
        })?;
        if proc_num == 0 {
            return Err(ScheduleError::parse(
                line_no,
                "processor count must be at least 1",
            ));
        }

        let (line_no, raw) = lines
            .next()
            .ok_or_else(|| ScheduleError::parse(line_no + 1, "missing task count"))?;
        let task_num: usize = raw.parse().map_err(|_| {
            ScheduleError::parse(line_no, format!("task count `{raw}` is not an integer"))
        })?;

        // Only the lines actually present are stored; the declared count
        // may be arbitrarily large.
        let mut durations: BTreeMap<usize, u64> = BTreeMap::new();
        let mut last_line = line_no;
        for (line_no, raw) in lines {
            last_line = line_no;
            let (id, duration) = raw.split_once(',').ok_or_else(|| {
                ScheduleError::parse(line_no, format!("expected `task_id,duration`, got `{raw}`"))
            })?;
            let id: usize = id.trim().parse().map_err(|_| {
                ScheduleError::parse(line_no, format!("task id `{}` is not an integer", id.trim()))
            })?;
            let duration: u64 = duration.trim().parse().map_err(|_| {
                ScheduleError::parse(
                    line_no,
                    format!("duration `{}` is not a non-negative integer", duration.trim()),
                )
            })?;
            if id >= task_num {
                return Err(ScheduleError::parse(
                    line_no,
                    format!("task id {id} out of range for {task_num} tasks"),
                ));
            }
            if durations.insert(id, duration).is_some() {
                return Err(ScheduleError::parse(
                    line_no,
                    format!("task {id} listed more than once"),
                ));
            }
        }

        if durations.len() < task_num {
            // ids are unique and in range, so a gap exists within the first len + 1
            let missing = (0..task_num)
                .find(|id| !durations.contains_key(id))
                .unwrap_or(durations.len());
            return Err(ScheduleError::parse(
                last_line + 1,
                format!("missing task {missing} ({} of {task_num} listed)", durations.len()),
            ));
        }
        let durations: Vec<u64> = durations.into_values().collect();
        if flow_time_bound(&durations).is_none() {
            return Err(ScheduleError::parse(
                last_line,
                "durations too large: total flow time would overflow u64",
            ));
        }

        Ok(Self {
            proc_num,
            durations,
        })
    }

    /// Generates a random instance with durations drawn uniformly from
    /// `duration_range`.
    pub fn random<R: Rng>(
        proc_num: usize,
        task_num: usize,
        duration_range: RangeInclusive<u64>,
        rng: &mut R,
    ) -> Result<Self> {
        if duration_range.is_empty() {
            return Err(ScheduleError::config(format!(
                "empty duration range {}..={}",
                duration_range.start(),
                duration_range.end()
            )));
        }
        let durations = (0..task_num)
            .map(|_| rng.random_range(duration_range.clone()))
            .collect();
        Self::new(proc_num, durations)
    }

    /// Renders the instance in the input description format.
    pub fn to_description(&self) -> String {
        let tasks: String = self
            .durations
            .iter()
            .enumerate()
            .map(|(id, duration)| format!("{id},{duration}\n"))
            .collect();
        format!("{}\n{}\n{tasks}", self.proc_num, self.durations.len())
    }

    pub fn processor_count(&self) -> usize {
        self.proc_num
    }

    pub fn task_count(&self) -> usize {
        self.durations.len()
    }

    pub fn durations(&self) -> &[u64] {
        &self.durations
    }

    /// Iterates over the tasks in id order.
    pub fn tasks(&self) -> impl Iterator<Item = Task> + '_ {
        self.durations
            .iter()
            .enumerate()
            .map(|(id, &duration)| Task { id, duration })
    }

    /// Assigns every task to a uniformly random processor.
    pub fn assign<R: Rng>(&self, rng: &mut R) -> ScheduleState {
        ScheduleState::random_assignment(self.proc_num, self.durations.clone(), rng)
    }
}

impl FromStr for Instance {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
