use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use learnloop_core::{LearningStrategy, Result};

use crate::due;

/// Record a value derived from the model every `n`th iteration.
///
/// Storage is shared between clones, so a tracer handed to a composite can
/// still be read through the caller's copy after the run. Values accumulate
/// across runs until [`Tracer::clear`] is called.
pub struct Tracer<V, F> {
    f: F,
    every: usize,
    storage: Rc<RefCell<Vec<V>>>,
}

impl<V, F> Tracer<V, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            every: 1,
            storage: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Only record every `n`th iteration
    pub fn every(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }

    /// Snapshot of the recorded values
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.storage.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.storage.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.borrow().is_empty()
    }

    /// Most recent recorded value
    pub fn last(&self) -> Option<V>
    where
        V: Clone,
    {
        self.storage.borrow().last().cloned()
    }

    /// Handle to the shared storage
    pub fn storage(&self) -> Rc<RefCell<Vec<V>>> {
        Rc::clone(&self.storage)
    }

    pub fn clear(&self) {
        self.storage.borrow_mut().clear();
    }
}

impl<V, F: Clone> Clone for Tracer<V, F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            every: self.every,
            storage: Rc::clone(&self.storage),
        }
    }
}

impl<V, F> fmt::Debug for Tracer<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("every", &self.every)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<M, D, T, V, F> LearningStrategy<M, D, T> for Tracer<V, F>
where
    D: ?Sized,
    T: ?Sized,
    F: Fn(&M, usize) -> V,
{
    fn hook(&mut self, model: &mut M, _data: &D, index: usize) -> Result<()> {
        if due(index, self.every) {
            let value = (self.f)(&*model, index);
            self.storage.borrow_mut().push(value);
        }
        Ok(())
    }
}
