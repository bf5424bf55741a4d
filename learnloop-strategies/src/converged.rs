//! Convergence-based stopping conditions

use std::fmt;

use learnloop_core::{LearningStrategy, Result};
use tracing::debug;

use crate::due;

/// Distance between two values of the same kind, used by the convergence
/// strategies. Vectors of different lengths are infinitely far apart.
pub trait Distance {
    fn distance(&self, other: &Self) -> f64;
}

impl Distance for f64 {
    fn distance(&self, other: &Self) -> f64 {
        (self - other).abs()
    }
}

impl Distance for f32 {
    fn distance(&self, other: &Self) -> f64 {
        f64::from((self - other).abs())
    }
}

impl Distance for Vec<f64> {
    fn distance(&self, other: &Self) -> f64 {
        euclidean(self.iter().copied(), other.iter().copied(), self.len(), other.len())
    }
}

impl Distance for Vec<f32> {
    fn distance(&self, other: &Self) -> f64 {
        euclidean(
            self.iter().copied().map(f64::from),
            other.iter().copied().map(f64::from),
            self.len(),
            other.len(),
        )
    }
}

impl<const N: usize> Distance for [f64; N] {
    fn distance(&self, other: &Self) -> f64 {
        euclidean(self.iter().copied(), other.iter().copied(), N, N)
    }
}

fn euclidean(
    a: impl Iterator<Item = f64>,
    b: impl Iterator<Item = f64>,
    len_a: usize,
    len_b: usize,
) -> f64 {
    if len_a != len_b {
        return f64::INFINITY;
    }
    a.zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

/// Stop when a quantity derived from the model stops changing.
///
/// `setup` records `f(model)`. On every `every`-th index, `finished`
/// evaluates `f(model)` again, compares it with the previous evaluation and
/// stops if the distance is within `tol`.
#[derive(Clone)]
pub struct Converged<F, V> {
    f: F,
    tol: f64,
    every: usize,
    last: Option<V>,
}

impl<F, V> Converged<F, V> {
    pub fn new(f: F, tol: f64) -> Self {
        Self {
            f,
            tol,
            every: 1,
            last: None,
        }
    }

    /// Only check every `n`th iteration
    pub fn every(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }

    /// The most recent evaluation
    pub fn last(&self) -> Option<&V> {
        self.last.as_ref()
    }
}

impl<F, V: fmt::Debug> fmt::Debug for Converged<F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converged")
            .field("tol", &self.tol)
            .field("every", &self.every)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

impl<M, D, T, F, V> LearningStrategy<M, D, T> for Converged<F, V>
where
    D: ?Sized,
    T: ?Sized,
    F: Fn(&M) -> V,
    V: Distance,
{
    fn setup(&mut self, model: &mut M, _data: &D) -> Result<()> {
        self.last = Some((self.f)(&*model));
        Ok(())
    }

    fn finished(&mut self, model: &M, _data: &D, index: usize) -> Result<bool> {
        if !due(index, self.every) {
            return Ok(false);
        }

        let current = (self.f)(model);
        let done = self
            .last
            .as_ref()
            .is_some_and(|last| current.distance(last) <= self.tol);
        if done {
            debug!(index, tol = self.tol, "Converged");
        }
        self.last = Some(current);
        Ok(done)
    }
}

/// Stop when a quantity derived from the model is within `tol` of a goal.
#[derive(Clone)]
pub struct ConvergedTo<F, V> {
    f: F,
    goal: V,
    tol: f64,
    every: usize,
}

impl<F, V> ConvergedTo<F, V> {
    pub fn new(f: F, goal: V, tol: f64) -> Self {
        Self {
            f,
            goal,
            tol,
            every: 1,
        }
    }

    /// Only check every `n`th iteration
    pub fn every(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }
}

impl<F, V: fmt::Debug> fmt::Debug for ConvergedTo<F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvergedTo")
            .field("goal", &self.goal)
            .field("tol", &self.tol)
            .field("every", &self.every)
            .finish_non_exhaustive()
    }
}

impl<M, D, T, F, V> LearningStrategy<M, D, T> for ConvergedTo<F, V>
where
    D: ?Sized,
    T: ?Sized,
    F: Fn(&M) -> V,
    V: Distance,
{
    fn finished(&mut self, model: &M, _data: &D, index: usize) -> Result<bool> {
        if !due(index, self.every) {
            return Ok(false);
        }

        let gap = (self.f)(model).distance(&self.goal);
        let done = gap <= self.tol;
        if done {
            debug!(index, gap, tol = self.tol, "ConvergedTo reached goal");
        }
        Ok(done)
    }
}
