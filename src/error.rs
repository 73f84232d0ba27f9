//! Error type shared by every fallible operation in the crate.

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised while building, mutating or running schedules.
///
/// The annealing loop itself never fails; errors come from malformed
/// input, out-of-range indices, or invalid run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The input description is malformed or incomplete.
    ///
    /// `line` is 1-based; `0` means the error is not tied to a line
    /// (e.g. the source could not be read at all).
    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A processor, position or task index is out of range.
    #[error("invalid {what} index {index} (must be < {bound})")]
    InvalidIndex {
        what: &'static str,
        index: usize,
        bound: usize,
    },

    /// A run configuration failed validation.
    #[error("config error: {0}")]
    Config(String),

    /// The worker pool for a parallel run could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScheduleError {
    pub fn parse<S: Into<String>>(line: usize, reason: S) -> Self {
        ScheduleError::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        ScheduleError::Config(msg.into())
    }

    pub(crate) fn check_index(what: &'static str, index: usize, bound: usize) -> Result<()> {
        if index < bound {
            Ok(())
        } else {
            Err(ScheduleError::InvalidIndex { what, index, bound })
        }
    }

    /// Returns `true` for [`ScheduleError::Parse`].
    pub fn is_parse(&self) -> bool {
        matches!(self, ScheduleError::Parse { .. })
    }

    /// Returns `true` for [`ScheduleError::InvalidIndex`].
    pub fn is_invalid_index(&self) -> bool {
        matches!(self, ScheduleError::InvalidIndex { .. })
    }
}
