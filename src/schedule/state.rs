//! Task-to-processor assignment and the total flow-time objective.

use std::fmt;
use std::fs;
use std::path::Path;

use rand::Rng;

use super::instance::{flow_time_bound, Instance};
use super::types::Schedule;
use crate::error::{Result, ScheduleError};

/// An assignment of tasks to identical processors, with an execution
/// order on each processor.
///
/// # Invariants
///
/// - every task id in `[0, task_count)` appears in exactly one processor
///   sequence, exactly once;
/// - the task → processor map is the inverse of the processor sequences;
/// - there is at least one processor.
///
/// The only mutating operation is [`transfer_task`](Self::transfer_task),
/// which preserves all three. Values are plain owned data: cloning gives a
/// fully independent copy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawSchedule", into = "RawSchedule")
)]
pub struct ScheduleState {
    durations: Vec<u64>,
    task_to_proc: Vec<usize>,
    proc_to_tasks: Vec<Vec<usize>>,
}

/// Serialized form of a [`ScheduleState`]: durations plus processor
/// sequences. Deserializing goes through
/// [`from_assignment`](ScheduleState::from_assignment), so the invariants
/// are re-checked.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct RawSchedule {
    durations: Vec<u64>,
    sequences: Vec<Vec<usize>>,
}

impl From<ScheduleState> for RawSchedule {
    fn from(state: ScheduleState) -> Self {
        Self {
            durations: state.durations,
            sequences: state.proc_to_tasks,
        }
    }
}

impl TryFrom<RawSchedule> for ScheduleState {
    type Error = ScheduleError;

    fn try_from(raw: RawSchedule) -> Result<Self> {
        ScheduleState::from_assignment(raw.durations, raw.sequences)
    }
}

impl Default for ScheduleState {
    /// One idle processor and no tasks.
    fn default() -> Self {
        Self {
            durations: Vec::new(),
            task_to_proc: Vec::new(),
            proc_to_tasks: vec![Vec::new()],
        }
    }
}

impl ScheduleState {
    /// Creates a schedule with every task on a uniformly random processor.
    pub fn new<R: Rng>(proc_num: usize, durations: Vec<u64>, rng: &mut R) -> Result<Self> {
        Ok(Instance::new(proc_num, durations)?.assign(rng))
    }

    /// Parses an input description and assigns tasks randomly.
    pub fn from_description<R: Rng>(text: &str, rng: &mut R) -> Result<Self> {
        Ok(Instance::parse(text)?.assign(rng))
    }

    /// Reads an input description from a file and assigns tasks randomly.
    ///
    /// An unreadable file is reported as a parse error.
    pub fn from_path<P: AsRef<Path>, R: Rng>(path: P, rng: &mut R) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ScheduleError::parse(0, format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_description(&text, rng)
    }

    /// Builds a schedule from explicit processor sequences.
    ///
    /// `sequences[p]` lists the tasks run on processor `p`, in order.
    pub fn from_assignment(durations: Vec<u64>, sequences: Vec<Vec<usize>>) -> Result<Self> {
        if sequences.is_empty() {
            return Err(ScheduleError::config("processor count must be at least 1"));
        }
        if flow_time_bound(&durations).is_none() {
            return Err(ScheduleError::config("total flow time would overflow u64"));
        }
        let task_num = durations.len();
        let mut task_to_proc = vec![usize::MAX; task_num];
        for (proc, tasks) in sequences.iter().enumerate() {
            for &task in tasks {
                ScheduleError::check_index("task", task, task_num)?;
                if task_to_proc[task] != usize::MAX {
                    return Err(ScheduleError::config(format!(
                        "task {task} assigned more than once"
                    )));
                }
                task_to_proc[task] = proc;
            }
        }
        if let Some(task) = task_to_proc.iter().position(|&p| p == usize::MAX) {
            return Err(ScheduleError::config(format!("task {task} is not assigned")));
        }
        Ok(Self {
            durations,
            task_to_proc,
            proc_to_tasks: sequences,
        })
    }

    pub(crate) fn random_assignment<R: Rng>(
        proc_num: usize,
        durations: Vec<u64>,
        rng: &mut R,
    ) -> Self {
        let mut proc_to_tasks = vec![Vec::new(); proc_num.max(1)];
        let task_to_proc: Vec<usize> = (0..durations.len())
            .map(|task| {
                let proc = rng.random_range(0..proc_to_tasks.len());
                proc_to_tasks[proc].push(task);
                proc
            })
            .collect();
        Self {
            durations,
            task_to_proc,
            proc_to_tasks,
        }
    }

    /// Total flow time: the sum of every task's completion time.
    ///
    /// The completion time of a task is the sum of the durations of all
    /// tasks up to and including it on its processor.
    pub fn quality(&self) -> u64 {
        self.proc_to_tasks
            .iter()
            .map(|tasks| {
                tasks
                    .iter()
                    .scan(0u64, |elapsed, &task| {
                        *elapsed += self.durations[task];
                        Some(*elapsed)
                    })
                    .sum::<u64>()
            })
            .sum()
    }

    /// Moves the task at `position` on `source_proc` to the end of
    /// `dest_proc`.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidIndex`] if either processor is out of range
    /// or `position` is not a valid index into `source_proc`'s sequence.
    pub fn transfer_task(
        &mut self,
        position: usize,
        source_proc: usize,
        dest_proc: usize,
    ) -> Result<usize> {
        let proc_num = self.processor_count();
        ScheduleError::check_index("processor", source_proc, proc_num)?;
        ScheduleError::check_index("processor", dest_proc, proc_num)?;
        ScheduleError::check_index("position", position, self.proc_to_tasks[source_proc].len())?;
        Ok(self.relocate(position, source_proc, dest_proc))
    }

    /// Unchecked move used by operators that sample valid indices.
    pub(crate) fn relocate(
        &mut self,
        position: usize,
        source_proc: usize,
        dest_proc: usize,
    ) -> usize {
        let task = self.proc_to_tasks[source_proc].remove(position);
        self.proc_to_tasks[dest_proc].push(task);
        self.task_to_proc[task] = dest_proc;
        task
    }

    pub fn processor_count(&self) -> usize {
        self.proc_to_tasks.len()
    }

    pub fn task_count(&self) -> usize {
        self.durations.len()
    }

    /// Number of tasks queued on `proc`.
    pub fn processor_task_count(&self, proc: usize) -> Result<usize> {
        Ok(self.processor_tasks(proc)?.len())
    }

    /// Task ids on `proc`, in execution order.
    pub fn processor_tasks(&self, proc: usize) -> Result<&[usize]> {
        ScheduleError::check_index("processor", proc, self.processor_count())?;
        Ok(&self.proc_to_tasks[proc])
    }

    /// Task id at `position` on `proc`.
    pub fn task_at(&self, proc: usize, position: usize) -> Result<usize> {
        let tasks = self.processor_tasks(proc)?;
        ScheduleError::check_index("position", position, tasks.len())?;
        Ok(tasks[position])
    }

    pub fn duration(&self, task: usize) -> Result<u64> {
        ScheduleError::check_index("task", task, self.task_count())?;
        Ok(self.durations[task])
    }

    /// Processor that `task` is assigned to.
    pub fn processor_of(&self, task: usize) -> Result<usize> {
        ScheduleError::check_index("task", task, self.task_count())?;
        Ok(self.task_to_proc[task])
    }

    pub(crate) fn queue_len(&self, proc: usize) -> usize {
        self.proc_to_tasks[proc].len()
    }

    /// One line per processor: `"<proc>:<task>,<task>,..."`, without a
    /// trailing newline.
    pub fn render(&self) -> String {
        self.proc_to_tasks
            .iter()
            .enumerate()
            .map(|(proc, tasks)| {
                let ids: Vec<String> = tasks.iter().map(ToString::to_string).collect();
                format!("{proc}:{}", ids.join(","))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Schedule for ScheduleState {
    fn quality(&self) -> u64 {
        ScheduleState::quality(self)
    }
}

impl fmt::Display for ScheduleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn scenario_a() -> ScheduleState {
        ScheduleState::from_assignment(vec![3, 2, 5], vec![vec![0, 2], vec![1]]).unwrap()
    }

    #[test]
    fn test_quality_scenario_a() {
        assert_eq!(scenario_a().quality(), 13);
    }

    #[test]
    fn test_transfer_scenario_b() {
        let mut s = scenario_a();
        let moved = s.transfer_task(0, 0, 1).unwrap();
        assert_eq!(moved, 0);
        assert_eq!(s.processor_tasks(0).unwrap(), &[2]);
        assert_eq!(s.processor_tasks(1).unwrap(), &[1, 0]);
        assert_eq!(s.processor_of(0).unwrap(), 1);
        assert_eq!(s.quality(), 12);
    }

    #[test]
    fn test_transfer_invalid_indices() {
        let mut s = scenario_a();
        assert!(s.transfer_task(2, 0, 1).unwrap_err().is_invalid_index());
        assert!(s.transfer_task(0, 2, 1).unwrap_err().is_invalid_index());
        assert!(s.transfer_task(0, 0, 5).unwrap_err().is_invalid_index());
        // failed transfers leave the schedule untouched
        assert_eq!(s, scenario_a());
    }

    #[test]
    fn test_transfer_same_processor_moves_to_end() {
        let mut s = scenario_a();
        s.transfer_task(0, 0, 0).unwrap();
        assert_eq!(s.processor_tasks(0).unwrap(), &[2, 0]);
        // 5 + 8 on proc 0, 2 on proc 1
        assert_eq!(s.quality(), 15);
    }

    #[test]
    fn test_render() {
        assert_eq!(scenario_a().render(), "0:0,2\n1:1");
        let empty_tail =
            ScheduleState::from_assignment(vec![1], vec![vec![0], vec![]]).unwrap();
        assert_eq!(empty_tail.to_string(), "0:0\n1:");
    }

    #[test]
    fn test_default_is_empty() {
        let s = ScheduleState::default();
        assert_eq!(s.processor_count(), 1);
        assert_eq!(s.task_count(), 0);
        assert_eq!(s.quality(), 0);
        assert_eq!(s.render(), "0:");
    }

    #[test]
    fn test_accessors_bounds() {
        let s = scenario_a();
        assert_eq!(s.task_at(0, 1).unwrap(), 2);
        assert_eq!(s.duration(2).unwrap(), 5);
        assert_eq!(s.processor_task_count(1).unwrap(), 1);
        assert!(s.task_at(1, 1).unwrap_err().is_invalid_index());
        assert!(s.duration(3).unwrap_err().is_invalid_index());
        assert!(s.processor_of(3).unwrap_err().is_invalid_index());
        assert!(s.processor_task_count(2).unwrap_err().is_invalid_index());
    }

    #[test]
    fn test_from_assignment_rejects_broken_invariants() {
        assert!(ScheduleState::from_assignment(vec![1, 2], vec![]).is_err());
        assert!(ScheduleState::from_assignment(vec![1, 2], vec![vec![0]]).is_err());
        assert!(ScheduleState::from_assignment(vec![1, 2], vec![vec![0, 1], vec![1]]).is_err());
        assert!(ScheduleState::from_assignment(vec![1], vec![vec![0, 3]])
            .unwrap_err()
            .is_invalid_index());
    }

    #[test]
    fn test_from_assignment_rejects_overflowing_durations() {
        let err = ScheduleState::from_assignment(vec![u64::MAX, 1], vec![vec![0, 1]]);
        assert!(matches!(err, Err(ScheduleError::Config(_))));
    }

    #[test]
    fn test_from_description_rejects_overflowing_durations() {
        let mut rng = create_rng(42);
        let text = "1\n2\n0,18446744073709551615\n1,1\n";
        let err = ScheduleState::from_description(text, &mut rng).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_largest_accepted_durations_do_not_overflow() {
        // bound: 2 * (2^62 - 1 + 2^62 - 1) fits in u64
        let d = u64::MAX / 4;
        let s = ScheduleState::from_assignment(vec![d, d], vec![vec![0, 1]]).unwrap();
        assert_eq!(s.quality(), d + 2 * d);
    }

    #[test]
    fn test_raw_round_trip_revalidates() {
        let raw = RawSchedule::from(scenario_a());
        assert_eq!(raw.sequences, vec![vec![0, 2], vec![1]]);
        assert_eq!(ScheduleState::try_from(raw).unwrap(), scenario_a());

        let broken = RawSchedule {
            durations: vec![3, 2, 5],
            sequences: vec![vec![0, 2], vec![2]],
        };
        assert!(ScheduleState::try_from(broken).is_err());
        let no_procs = RawSchedule {
            durations: vec![],
            sequences: vec![],
        };
        assert!(ScheduleState::try_from(no_procs).is_err());
    }

    #[test]
    fn test_from_description_assigns_every_task() {
        let mut rng = create_rng(42);
        let s = ScheduleState::from_description("3\n5\n0,1\n1,2\n2,3\n3,4\n4,5\n", &mut rng)
            .unwrap();
        assert_eq!(s.processor_count(), 3);
        assert_eq!(s.task_count(), 5);
        let mut seen: Vec<usize> = (0..3)
            .flat_map(|p| s.processor_tasks(p).unwrap().to_vec())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        for task in 0..5 {
            let proc = s.processor_of(task).unwrap();
            assert!(s.processor_tasks(proc).unwrap().contains(&task));
        }
    }

    #[test]
    fn test_from_description_parse_error() {
        let mut rng = create_rng(42);
        let err = ScheduleState::from_description("2\nabc\n0,3\n", &mut rng).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_from_path_missing_file() {
        let mut rng = create_rng(42);
        let err = ScheduleState::from_path("/nonexistent/flowsched/input.csv", &mut rng)
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = scenario_a();
        let mut copy = original.clone();
        copy.transfer_task(0, 1, 0).unwrap();
        assert_eq!(original.processor_tasks(1).unwrap(), &[1]);
        assert_ne!(original, copy);
    }
}
