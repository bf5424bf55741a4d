//! Composite strategy that fans every call out to an ordered list of children

use std::borrow::Cow;
use std::fmt;

use tracing::warn;

use crate::error::Result;
use crate::strategy::LearningStrategy;

/// Object-safe view of a child strategy that can also clone itself.
trait ChildStrategy<M, D: ?Sized, T: ?Sized>: LearningStrategy<M, D, T> {
    fn clone_child(&self) -> Box<dyn ChildStrategy<M, D, T>>;
}

impl<M, D, T, S> ChildStrategy<M, D, T> for S
where
    D: ?Sized,
    T: ?Sized,
    S: LearningStrategy<M, D, T> + Clone + 'static,
{
    fn clone_child(&self) -> Box<dyn ChildStrategy<M, D, T>> {
        Box::new(self.clone())
    }
}

/// A strategy composed of an ordered list of child strategies.
///
/// Every contract operation is forwarded to all children in list order.
/// `finished` is the logical OR of the children, and every child's
/// `finished` runs on every call even after an earlier child returned true,
/// so observation side effects inside `finished` are never skipped.
///
/// The child list is fixed once built. [`MetaStrategy::extended`] returns a new
/// composite and leaves the original untouched; children are cloned, so
/// strategies that expose results to the caller (a tracer, say) should keep
/// that state behind a shared handle.
///
/// Every child must be `Clone + 'static`, even if the composite is never
/// extended. A strategy owning non-`Clone` state, such as a file writer or a
/// boxed `FnMut`, has to hold it behind `Rc<RefCell<_>>` to be composed.
///
/// A composite over borrowed items (`T = &'d X` in online mode) carries that
/// lifetime in its boxed children, so it must be declared after the source it
/// borrows from:
///
/// ```
/// use learnloop_core::{MetaStrategy, learn};
///
/// let data = vec![1, 2, 3];
/// let mut s: MetaStrategy<(), Vec<i32>, &i32> = MetaStrategy::new();
/// learn(&mut (), &mut s, &data).unwrap();
/// ```
///
/// An empty composite is legal but never finishes on its own: its loop ends
/// only when an online source runs dry.
pub struct MetaStrategy<M, D: ?Sized, T: ?Sized = D> {
    strategies: Vec<Box<dyn ChildStrategy<M, D, T>>>,
}

impl<M, D: ?Sized, T: ?Sized> MetaStrategy<M, D, T> {
    /// Create a composite with no children.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a child, consuming the builder.
    pub fn with<S>(mut self, strategy: S) -> Self
    where
        S: LearningStrategy<M, D, T> + Clone + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Return a new composite holding clones of this one's children followed
    /// by `strategy`. `self` is unchanged.
    pub fn extended<S>(&self, strategy: S) -> Self
    where
        S: LearningStrategy<M, D, T> + Clone + 'static,
    {
        self.clone().with(strategy)
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the composite has no children
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Child names in list order
    pub fn names(&self) -> Vec<Cow<'static, str>> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl<M, D: ?Sized, T: ?Sized> Default for MetaStrategy<M, D, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, D: ?Sized, T: ?Sized> Clone for MetaStrategy<M, D, T> {
    fn clone(&self) -> Self {
        Self {
            strategies: self.strategies.iter().map(|s| s.clone_child()).collect(),
        }
    }
}

impl<M, D: ?Sized, T: ?Sized> fmt::Display for MetaStrategy<M, D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetaStrategy(")?;
        for (i, strategy) in self.strategies.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", strategy.name())?;
        }
        write!(f, ")")
    }
}

impl<M, D: ?Sized, T: ?Sized> fmt::Debug for MetaStrategy<M, D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaStrategy")
            .field("strategies", &self.names())
            .finish()
    }
}

impl<M, D: ?Sized, T: ?Sized> LearningStrategy<M, D, T> for MetaStrategy<M, D, T> {
    fn setup(&mut self, model: &mut M, data: &D) -> Result<()> {
        if self.strategies.is_empty() {
            warn!("empty MetaStrategy never finishes; the run ends only if the source runs dry");
        }
        for strategy in &mut self.strategies {
            strategy.setup(model, data)?;
        }
        Ok(())
    }

    fn update(&mut self, model: &mut M, index: usize, item: &T) -> Result<()> {
        for strategy in &mut self.strategies {
            strategy.update(model, index, item)?;
        }
        Ok(())
    }

    fn hook(&mut self, model: &mut M, data: &D, index: usize) -> Result<()> {
        for strategy in &mut self.strategies {
            strategy.hook(model, data, index)?;
        }
        Ok(())
    }

    fn finished(&mut self, model: &M, data: &D, index: usize) -> Result<bool> {
        let mut done = false;
        for strategy in &mut self.strategies {
            done |= strategy.finished(model, data, index)?;
        }
        Ok(done)
    }

    fn cleanup(&mut self, model: &mut M) -> Result<()> {
        for strategy in &mut self.strategies {
            strategy.cleanup(model)?;
        }
        Ok(())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::LearnError;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every call it receives into a shared log.
    #[derive(Clone)]
    struct Recorder {
        label: &'static str,
        log: Log,
        stop_at: Option<usize>,
    }

    impl Recorder {
        fn new(label: &'static str, log: &Log) -> Self {
            Self {
                label,
                log: Rc::clone(log),
                stop_at: None,
            }
        }

        fn stopping_at(mut self, index: usize) -> Self {
            self.stop_at = Some(index);
            self
        }

        fn push(&self, event: String) {
            self.log.borrow_mut().push(event);
        }
    }

    impl LearningStrategy<i32, ()> for Recorder {
        fn setup(&mut self, _model: &mut i32, _data: &()) -> Result<()> {
            self.push(format!("{}.setup", self.label));
            Ok(())
        }

        fn update(&mut self, _model: &mut i32, index: usize, _item: &()) -> Result<()> {
            self.push(format!("{}.update{}", self.label, index));
            Ok(())
        }

        fn hook(&mut self, _model: &mut i32, _data: &(), index: usize) -> Result<()> {
            self.push(format!("{}.hook{}", self.label, index));
            Ok(())
        }

        fn finished(&mut self, _model: &i32, _data: &(), index: usize) -> Result<bool> {
            self.push(format!("{}.finished{}", self.label, index));
            Ok(self.stop_at.is_some_and(|n| index >= n))
        }

        fn cleanup(&mut self, _model: &mut i32) -> Result<()> {
            self.push(format!("{}.cleanup", self.label));
            Ok(())
        }

        fn name(&self) -> Cow<'static, str> {
            Cow::Borrowed(self.label)
        }
    }

    #[derive(Clone)]
    struct Increment;

    impl LearningStrategy<i32, ()> for Increment {
        fn update(&mut self, model: &mut i32, _index: usize, _item: &()) -> Result<()> {
            *model += 1;
            Ok(())
        }
    }

    #[derive(Clone)]
    struct Doubler;

    impl LearningStrategy<i32, ()> for Doubler {
        fn update(&mut self, model: &mut i32, _index: usize, _item: &()) -> Result<()> {
            *model *= 2;
            Ok(())
        }
    }

    #[derive(Clone)]
    struct Failing;

    impl LearningStrategy<i32, ()> for Failing {
        fn update(&mut self, _model: &mut i32, _index: usize, _item: &()) -> Result<()> {
            Err(LearnError::strategy("boom"))
        }
    }

    fn abc(log: &Log) -> MetaStrategy<i32, ()> {
        MetaStrategy::<i32, ()>::new()
            .with(Recorder::new("a", log))
            .with(Recorder::new("b", log))
            .with(Recorder::new("c", log))
    }

    #[test]
    fn test_update_fans_out_in_order() {
        let log = Log::default();
        let mut meta = abc(&log);
        let mut model = 0;

        meta.update(&mut model, 1, &()).unwrap();
        meta.update(&mut model, 2, &()).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["a.update1", "b.update1", "c.update1", "a.update2", "b.update2", "c.update2"]
        );
    }

    #[test]
    fn test_setup_hook_cleanup_fan_out_in_order() {
        let log = Log::default();
        let mut meta = abc(&log);
        let mut model = 0;

        meta.setup(&mut model, &()).unwrap();
        meta.hook(&mut model, &(), 4).unwrap();
        meta.cleanup(&mut model).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "a.setup", "b.setup", "c.setup", "a.hook4", "b.hook4", "c.hook4", "a.cleanup",
                "b.cleanup", "c.cleanup",
            ]
        );
    }

    #[test]
    fn test_finished_is_or_of_children() {
        let log = Log::default();
        let mut meta = MetaStrategy::<i32, ()>::new()
            .with(Recorder::new("a", &log))
            .with(Recorder::new("b", &log).stopping_at(3));

        assert!(!meta.finished(&0, &(), 2).unwrap());
        assert!(meta.finished(&0, &(), 3).unwrap());
    }

    #[test]
    fn test_finished_false_when_all_children_false() {
        let log = Log::default();
        let mut meta = abc(&log);
        assert!(!meta.finished(&0, &(), 100).unwrap());
    }

    #[test]
    fn test_finished_visits_every_child_after_true() {
        let log = Log::default();
        let mut meta = MetaStrategy::<i32, ()>::new()
            .with(Recorder::new("a", &log).stopping_at(1))
            .with(Recorder::new("b", &log))
            .with(Recorder::new("c", &log));

        assert!(meta.finished(&0, &(), 1).unwrap());
        assert_eq!(*log.borrow(), vec!["a.finished1", "b.finished1", "c.finished1"]);
    }

    #[test]
    fn test_later_sibling_sees_earlier_side_effects() {
        let mut meta = MetaStrategy::<i32, ()>::new().with(Increment).with(Doubler);
        let mut model = 1;
        meta.update(&mut model, 1, &()).unwrap();
        assert_eq!(model, 4);

        let mut reversed = MetaStrategy::<i32, ()>::new().with(Doubler).with(Increment);
        let mut model = 1;
        reversed.update(&mut model, 1, &()).unwrap();
        assert_eq!(model, 3);
    }

    #[test]
    fn test_error_stops_fan_out() {
        let log = Log::default();
        let mut meta = MetaStrategy::<i32, ()>::new()
            .with(Recorder::new("a", &log))
            .with(Failing)
            .with(Recorder::new("c", &log));

        let err = meta.update(&mut 0, 1, &()).unwrap_err();
        assert!(matches!(err, LearnError::Strategy(_)));
        assert_eq!(*log.borrow(), vec!["a.update1"]);
    }

    #[test]
    fn test_extended_leaves_original_untouched() {
        let log = Log::default();
        let base = MetaStrategy::<i32, ()>::new()
            .with(Recorder::new("a", &log))
            .with(Recorder::new("b", &log));

        let grown = base.extended(Recorder::new("c", &log));

        assert_eq!(base.len(), 2);
        assert_eq!(grown.len(), 3);
        assert_eq!(grown.names(), vec!["a", "b", "c"]);
    }

    /// Wraps a non-`Clone` closure so it can sit in a composite.
    #[derive(Clone)]
    struct Shared(Rc<RefCell<Box<dyn FnMut(&mut i32)>>>);

    impl LearningStrategy<i32, ()> for Shared {
        fn update(&mut self, model: &mut i32, _index: usize, _item: &()) -> Result<()> {
            (self.0.borrow_mut())(model);
            Ok(())
        }
    }

    #[test]
    fn test_non_clone_state_composes_behind_shared_handle() {
        let mut calls = 0;
        let counter: Box<dyn FnMut(&mut i32)> = Box::new(move |model: &mut i32| {
            calls += 1;
            *model = calls;
        });
        let shared = Shared(Rc::new(RefCell::new(counter)));
        let mut base = MetaStrategy::<i32, ()>::new().with(shared);
        let mut grown = base.extended(Increment);

        let mut model = 0;
        base.update(&mut model, 1, &()).unwrap();
        assert_eq!(model, 1);
        grown.update(&mut model, 2, &()).unwrap();
        assert_eq!(model, 3);
    }

    #[test]
    fn test_empty_composite_is_vacuous() {
        let mut meta = MetaStrategy::<i32, ()>::new();
        let mut model = 5;

        assert!(meta.is_empty());
        meta.setup(&mut model, &()).unwrap();
        meta.update(&mut model, 1, &()).unwrap();
        assert!(!meta.finished(&model, &(), 1).unwrap());
        meta.cleanup(&mut model).unwrap();
        assert_eq!(model, 5);
    }

    #[test]
    fn test_display_lists_children_in_order() {
        let log = Log::default();
        let meta = MetaStrategy::<i32, ()>::new()
            .with(Recorder::new("b", &log))
            .with(Recorder::new("a", &log));

        assert_eq!(meta.to_string(), "MetaStrategy(b, a)");
        assert_eq!(
            format!("{:?}", meta),
            r#"MetaStrategy { strategies: ["b", "a"] }"#
        );
    }

    #[test]
    fn test_nested_composites_flatten_calls() {
        let log = Log::default();
        let inner = MetaStrategy::<i32, ()>::new()
            .with(Recorder::new("a", &log))
            .with(Recorder::new("b", &log));
        let mut outer = MetaStrategy::<i32, ()>::new()
            .with(inner)
            .with(Recorder::new("c", &log));

        outer.update(&mut 0, 1, &()).unwrap();

        assert_eq!(*log.borrow(), vec!["a.update1", "b.update1", "c.update1"]);
        assert_eq!(outer.to_string(), "MetaStrategy(MetaStrategy(a, b), c)");
    }
}
