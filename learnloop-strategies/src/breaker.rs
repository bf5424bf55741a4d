use std::fmt;

use learnloop_core::{LearningStrategy, Result};
use tracing::debug;

/// Stop when a caller-supplied predicate on the model and index holds.
#[derive(Clone)]
pub struct Breaker<F> {
    f: F,
}

impl<F> Breaker<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for Breaker<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Breaker").finish_non_exhaustive()
    }
}

impl<M, D, T, F> LearningStrategy<M, D, T> for Breaker<F>
where
    D: ?Sized,
    T: ?Sized,
    F: Fn(&M, usize) -> bool,
{
    fn finished(&mut self, model: &M, _data: &D, index: usize) -> Result<bool> {
        let done = (self.f)(model, index);
        if done {
            debug!(index, "Breaker tripped");
        }
        Ok(done)
    }
}
