//! The strategy capability contract

use std::borrow::Cow;

use crate::error::Result;

/// A unit of loop behavior.
///
/// `M` is the model, `D` the data source handed to `setup`, `hook` and
/// `finished`, and `T` the item handed to `update`. In online mode `T` is the
/// element type the source yields; in offline mode `T = D` and `update`
/// receives the whole source every pass.
///
/// Every operation has a harmless default, so a strategy only overrides the
/// ones it cares about. Overriding `finished` alone is a valid stopping
/// condition.
pub trait LearningStrategy<M, D: ?Sized, T: ?Sized = D> {
    /// Called once before the first iteration.
    fn setup(&mut self, _model: &mut M, _data: &D) -> Result<()> {
        Ok(())
    }

    /// Called once per iteration with the current item.
    fn update(&mut self, _model: &mut M, _index: usize, _item: &T) -> Result<()> {
        Ok(())
    }

    /// Called after `update` on every iteration, for observation.
    fn hook(&mut self, _model: &mut M, _data: &D, _index: usize) -> Result<()> {
        Ok(())
    }

    /// Returns true when this strategy wants the loop to stop.
    ///
    /// Checked after the iteration body, never before.
    fn finished(&mut self, _model: &M, _data: &D, _index: usize) -> Result<bool> {
        Ok(false)
    }

    /// Called once after the loop exits.
    fn cleanup(&mut self, _model: &mut M) -> Result<()> {
        Ok(())
    }

    /// Display name used in composite formatting and log lines.
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(short_type_name(std::any::type_name::<Self>()))
    }
}

impl<M, D, T, S> LearningStrategy<M, D, T> for &mut S
where
    D: ?Sized,
    T: ?Sized,
    S: LearningStrategy<M, D, T> + ?Sized,
{
    fn setup(&mut self, model: &mut M, data: &D) -> Result<()> {
        (**self).setup(model, data)
    }

    fn update(&mut self, model: &mut M, index: usize, item: &T) -> Result<()> {
        (**self).update(model, index, item)
    }

    fn hook(&mut self, model: &mut M, data: &D, index: usize) -> Result<()> {
        (**self).hook(model, data, index)
    }

    fn finished(&mut self, model: &M, data: &D, index: usize) -> Result<bool> {
        (**self).finished(model, data, index)
    }

    fn cleanup(&mut self, model: &mut M) -> Result<()> {
        (**self).cleanup(model)
    }

    fn name(&self) -> Cow<'static, str> {
        (**self).name()
    }
}

impl<M, D, T, S> LearningStrategy<M, D, T> for Box<S>
where
    D: ?Sized,
    T: ?Sized,
    S: LearningStrategy<M, D, T> + ?Sized,
{
    fn setup(&mut self, model: &mut M, data: &D) -> Result<()> {
        (**self).setup(model, data)
    }

    fn update(&mut self, model: &mut M, index: usize, item: &T) -> Result<()> {
        (**self).update(model, index, item)
    }

    fn hook(&mut self, model: &mut M, data: &D, index: usize) -> Result<()> {
        (**self).hook(model, data, index)
    }

    fn finished(&mut self, model: &M, data: &D, index: usize) -> Result<bool> {
        (**self).finished(model, data, index)
    }

    fn cleanup(&mut self, model: &mut M) -> Result<()> {
        (**self).cleanup(model)
    }

    fn name(&self) -> Cow<'static, str> {
        (**self).name()
    }
}

/// Strip the module path and generic arguments from a type name.
///
/// `learnloop_strategies::tracer::Tracer<f64, F>` becomes `Tracer`.
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
