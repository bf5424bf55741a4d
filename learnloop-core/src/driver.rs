//! The driver loop: setup, iterate with hooks and a termination check, cleanup

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

use crate::error::Result;
use crate::source::Nothing;
use crate::strategy::LearningStrategy;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A strategy's `finished` returned true
    Finished,
    /// The online source ran out of items
    Exhausted,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of iterations whose update and hook ran
    pub iterations: usize,
    /// What ended the loop
    pub stop: StopReason,
}

/// Run the online loop: one iteration per item pulled from `data`.
///
/// Calls `setup`, then for `i = 1, 2, ...` runs `update` with the current
/// item, `hook`, and `finished`, stopping after the first iteration whose
/// `finished` returns true or when `data` is exhausted. `cleanup` runs once
/// after the loop. Any callback error returns immediately and skips
/// `cleanup`.
pub fn learn<'d, M, D, S>(model: &mut M, strategy: &mut S, data: &'d D) -> Result<RunSummary>
where
    D: ?Sized,
    &'d D: IntoIterator,
    S: LearningStrategy<M, D, <&'d D as IntoIterator>::Item> + ?Sized,
{
    let span = debug_span!("learn", mode = "online", strategy = %strategy.name());
    let _enter = span.enter();

    strategy.setup(model, data)?;
    debug!("setup complete");

    let mut iterations = 0;
    let mut stop = StopReason::Exhausted;
    for (index, item) in (1..).zip(data) {
        strategy.update(model, index, &item)?;
        strategy.hook(model, data, index)?;
        iterations = index;
        trace!(index, "iteration complete");

        if strategy.finished(model, data, index)? {
            stop = StopReason::Finished;
            break;
        }
    }

    strategy.cleanup(model)?;
    debug!(iterations, ?stop, "run complete");

    Ok(RunSummary { iterations, stop })
}

/// Run the offline loop: every iteration receives the whole of `data`.
///
/// The index counts up from 1 independently of the data, and only
/// `finished` ends the loop. A strategy that never finishes runs forever.
pub fn learn_offline<M, D, S>(model: &mut M, strategy: &mut S, data: &D) -> Result<RunSummary>
where
    D: ?Sized,
    S: LearningStrategy<M, D, D> + ?Sized,
{
    let span = debug_span!("learn", mode = "offline", strategy = %strategy.name());
    let _enter = span.enter();

    strategy.setup(model, data)?;
    debug!("setup complete");

    let mut index = 0;
    loop {
        index += 1;
        strategy.update(model, index, data)?;
        strategy.hook(model, data, index)?;
        trace!(index, "iteration complete");

        if strategy.finished(model, data, index)? {
            break;
        }
    }

    strategy.cleanup(model)?;
    debug!(iterations = index, "run complete");

    Ok(RunSummary {
        iterations: index,
        stop: StopReason::Finished,
    })
}

/// Run the online loop over [`Nothing`], an endless stream of `()`.
///
/// For strategies that work from model state alone. Only `finished` ends
/// the loop.
pub fn learn_without_data<M, S>(model: &mut M, strategy: &mut S) -> Result<RunSummary>
where
    S: LearningStrategy<M, Nothing, ()> + ?Sized,
{
    learn(model, strategy, &Nothing)
}

/// Marker selecting the online loop in [`learn!`](crate::learn!)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Online;

impl Online {
    /// Same as [`learn`]
    pub fn run<'d, M, D, S>(self, model: &mut M, strategy: &mut S, data: &'d D) -> Result<RunSummary>
    where
        D: ?Sized,
        &'d D: IntoIterator,
        S: LearningStrategy<M, D, <&'d D as IntoIterator>::Item> + ?Sized,
    {
        learn(model, strategy, data)
    }
}

/// Marker selecting the offline loop in [`learn!`](crate::learn!)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offline;

impl Offline {
    /// Same as [`learn_offline`]
    pub fn run<M, D, S>(self, model: &mut M, strategy: &mut S, data: &D) -> Result<RunSummary>
    where
        D: ?Sized,
        S: LearningStrategy<M, D, D> + ?Sized,
    {
        learn_offline(model, strategy, data)
    }
}
