use std::borrow::Cow;
use std::time::{Duration, Instant};

use learnloop_core::{LearningStrategy, Result};
use tracing::debug;

/// Stop once a wall-clock budget has elapsed.
///
/// The deadline is recorded in `setup`. If the strategy is driven without
/// `setup`, the deadline starts at the first `finished` check instead.
#[derive(Debug, Clone)]
pub struct TimeLimit {
    limit: Duration,
    deadline: Option<Instant>,
}

impl TimeLimit {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            deadline: None,
        }
    }

    /// Negative, NaN and overflowing values become a zero budget.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self::new(Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// The deadline of the current run, once started
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl<M, D: ?Sized, T: ?Sized> LearningStrategy<M, D, T> for TimeLimit {
    fn setup(&mut self, _model: &mut M, _data: &D) -> Result<()> {
        self.deadline = Some(Instant::now() + self.limit);
        Ok(())
    }

    fn finished(&mut self, _model: &M, _data: &D, index: usize) -> Result<bool> {
        let limit = self.limit;
        let deadline = *self.deadline.get_or_insert_with(|| Instant::now() + limit);
        let done = Instant::now() >= deadline;
        if done {
            debug!(index, limit_secs = limit.as_secs_f64(), "TimeLimit reached");
        }
        Ok(done)
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("TimeLimit({:?})", self.limit))
    }
}
