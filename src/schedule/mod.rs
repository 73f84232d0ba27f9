//! Schedules: tasks on identical processors, scored by total flow time.
//!
//! An [`Instance`] holds the problem (processor count and task
//! durations); a [`ScheduleState`] is one assignment of that instance's
//! tasks to processors together with the execution order on each.

mod instance;
mod state;
mod types;

pub use instance::Instance;
pub use state::ScheduleState;
pub use types::{Schedule, Task};
