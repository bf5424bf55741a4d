use std::borrow::Cow;

use learnloop_core::{LearningStrategy, Result};
use tracing::{debug, info};

/// Decorator that logs every call on the wrapped strategy and announces
/// when it finishes.
///
/// All operations are delegated unchanged; the result of `finished` is only
/// observed, never altered.
#[derive(Debug, Clone)]
pub struct Verbose<S> {
    inner: S,
}

impl<S> Verbose<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<M, D, T, S> LearningStrategy<M, D, T> for Verbose<S>
where
    D: ?Sized,
    T: ?Sized,
    S: LearningStrategy<M, D, T>,
{
    fn setup(&mut self, model: &mut M, data: &D) -> Result<()> {
        debug!(strategy = %self.inner.name(), "setup");
        self.inner.setup(model, data)
    }

    fn update(&mut self, model: &mut M, index: usize, item: &T) -> Result<()> {
        debug!(strategy = %self.inner.name(), index, "update");
        self.inner.update(model, index, item)
    }

    fn hook(&mut self, model: &mut M, data: &D, index: usize) -> Result<()> {
        debug!(strategy = %self.inner.name(), index, "hook");
        self.inner.hook(model, data, index)
    }

    fn finished(&mut self, model: &M, data: &D, index: usize) -> Result<bool> {
        let done = self.inner.finished(model, data, index)?;
        if done {
            let name = self.inner.name();
            info!(strategy = %name, index, "{name} finished");
        }
        Ok(done)
    }

    fn cleanup(&mut self, model: &mut M) -> Result<()> {
        debug!(strategy = %self.inner.name(), "cleanup");
        self.inner.cleanup(model)
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("Verbose({})", self.inner.name()))
    }
}
