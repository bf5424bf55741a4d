use std::fmt;

use learnloop_core::{LearningStrategy, Result};

use crate::due;

/// The lifecycle operation an [`IterFunction`] runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Once, before the first iteration, with index 0
    Setup,
    /// During `update`, at this strategy's position among its siblings
    Update,
    /// In the observation hook
    #[default]
    Hook,
    /// Once, after the loop exits, with index 0
    Cleanup,
}

/// Run a caller-supplied function on the model at a chosen point of the
/// loop, optionally only every `n`th iteration.
///
/// Handy for schedules that mutate the model from outside the algorithm,
/// such as decaying a learning rate.
#[derive(Clone)]
pub struct IterFunction<F> {
    f: F,
    every: usize,
    phase: Phase,
}

impl<F> IterFunction<F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            every: 1,
            phase: Phase::default(),
        }
    }

    /// Only run every `n`th iteration (ignored for setup and cleanup)
    pub fn every(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }

    /// Run in `phase` instead of the hook
    pub fn on(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }
}

impl<F> fmt::Debug for IterFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterFunction")
            .field("every", &self.every)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<M, D, T, F> LearningStrategy<M, D, T> for IterFunction<F>
where
    D: ?Sized,
    T: ?Sized,
    F: FnMut(&mut M, usize),
{
    fn setup(&mut self, model: &mut M, _data: &D) -> Result<()> {
        if self.phase == Phase::Setup {
            (self.f)(model, 0);
        }
        Ok(())
    }

    fn update(&mut self, model: &mut M, index: usize, _item: &T) -> Result<()> {
        if self.phase == Phase::Update && due(index, self.every) {
            (self.f)(model, index);
        }
        Ok(())
    }

    fn hook(&mut self, model: &mut M, _data: &D, index: usize) -> Result<()> {
        if self.phase == Phase::Hook && due(index, self.every) {
            (self.f)(model, index);
        }
        Ok(())
    }

    fn cleanup(&mut self, model: &mut M) -> Result<()> {
        if self.phase == Phase::Cleanup {
            (self.f)(model, 0);
        }
        Ok(())
    }
}
