use std::borrow::Cow;

use learnloop_core::{LearningStrategy, Result};
use tracing::debug;

/// Stop after a fixed number of iterations.
///
/// `finished` is checked after the iteration body, so `MaxIter::new(n)`
/// lets iteration `n` run completely and then stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxIter {
    n: usize,
}

impl MaxIter {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// The iteration at which the loop stops
    pub fn limit(&self) -> usize {
        self.n
    }
}

impl<M, D: ?Sized, T: ?Sized> LearningStrategy<M, D, T> for MaxIter {
    fn finished(&mut self, _model: &M, _data: &D, index: usize) -> Result<bool> {
        let done = index >= self.n;
        if done {
            debug!(limit = self.n, "MaxIter reached");
        }
        Ok(done)
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("MaxIter({})", self.n))
    }
}
