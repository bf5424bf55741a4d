//! Restartable data sources for the online driver
//!
//! The online driver iterates `&D`, so any collection whose reference is
//! iterable already works as a source. These types cover the lazy and
//! infinite cases, which plain iterators cannot because they are consumed
//! by the first pass.

use std::fmt;
use std::iter::{Repeat, repeat};

/// An infinite source of `()` placeholders.
///
/// Used by [`learn_without_data`](crate::learn_without_data) for runs whose
/// strategies derive everything from the model. Each iteration over a
/// `Nothing` starts fresh, so the same value can back any number of runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nothing;

impl<'a> IntoIterator for &'a Nothing {
    type Item = ();
    type IntoIter = Repeat<()>;

    fn into_iter(self) -> Self::IntoIter {
        repeat(())
    }
}

/// A lazy source that builds a fresh iterator from a closure every time it
/// is iterated.
///
/// ```
/// use learnloop_core::Generator;
///
/// let evens = Generator::new(|| (0..).step_by(2));
/// let first: Vec<i32> = (&evens).into_iter().take(3).collect();
/// assert_eq!(first, vec![0, 2, 4]);
/// ```
#[derive(Clone)]
pub struct Generator<F> {
    make: F,
}

impl<F, I> Generator<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    /// Wrap an iterator factory
    pub fn new(make: F) -> Self {
        Self { make }
    }

    /// Start a new pass over the source
    pub fn iter(&self) -> I::IntoIter {
        (self.make)().into_iter()
    }
}

impl<F> fmt::Debug for Generator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator").finish_non_exhaustive()
    }
}

impl<'a, F, I> IntoIterator for &'a Generator<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    type Item = I::Item;
    type IntoIter = I::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_is_infinite_and_restartable() {
        let source = Nothing;
        assert_eq!((&source).into_iter().take(1000).count(), 1000);
        assert_eq!((&source).into_iter().take(3).count(), 3);
    }

    #[test]
    fn test_generator_restarts_each_pass() {
        let source = Generator::new(|| vec![1, 2, 3]);
        let first: Vec<i32> = source.iter().collect();
        let second: Vec<i32> = (&source).into_iter().collect();
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_generator_can_be_infinite() {
        let samples = [0.5, 1.5];
        let source = Generator::new(move || samples.into_iter().cycle());
        let taken: Vec<f64> = source.iter().take(5).collect();
        assert_eq!(taken, vec![0.5, 1.5, 0.5, 1.5, 0.5]);
    }
}
