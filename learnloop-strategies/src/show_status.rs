use std::fmt;

use learnloop_core::{LearningStrategy, Result};
use tracing::info;

use crate::due;

/// Log a status line built from the model every `n`th iteration.
#[derive(Clone)]
pub struct ShowStatus<F> {
    f: F,
    every: usize,
}

impl<F> ShowStatus<F> {
    pub fn new(f: F) -> Self {
        Self { f, every: 1 }
    }

    /// Only log every `n`th iteration
    pub fn every(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }
}

impl<F> fmt::Debug for ShowStatus<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShowStatus")
            .field("every", &self.every)
            .finish_non_exhaustive()
    }
}

impl<M, D, T, F> LearningStrategy<M, D, T> for ShowStatus<F>
where
    D: ?Sized,
    T: ?Sized,
    F: Fn(&M, usize) -> String,
{
    fn hook(&mut self, model: &mut M, _data: &D, index: usize) -> Result<()> {
        if due(index, self.every) {
            let status = (self.f)(&*model, index);
            info!(index, "{status}");
        }
        Ok(())
    }
}
