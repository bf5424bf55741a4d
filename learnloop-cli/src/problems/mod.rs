//! Demo problems driven through the learnloop core

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use clap::ValueEnum;
use learnloop_core::{LearningStrategy, MetaStrategy, RunSummary, StopReason};
use learnloop_strategies::{ConvergedTo, MaxIter, ShowStatus, TimeLimit, Tracer, Verbose};
use serde::Serialize;

use crate::config::{LearnConfig, RunConfig};

pub mod regression;
pub mod sqrt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    /// Newton iteration for a square root, no data
    Sqrt,
    /// Least-squares line fit on synthetic samples
    Regression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One iteration per data item
    Online,
    /// Every iteration sees the whole dataset
    Offline,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Sqrt => write!(f, "sqrt"),
            Problem::Regression => write!(f, "regression"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Online => write!(f, "online"),
            Mode::Offline => write!(f, "offline"),
        }
    }
}

/// Outcome of one demo run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub problem: Problem,
    pub mode: Mode,
    #[serde(flatten)]
    pub summary: RunSummary,
    /// Fitted model parameters by name
    pub params: BTreeMap<&'static str, f64>,
    /// Loss of the final model
    pub loss: f64,
    /// Loss values recorded during the run
    pub trace: Vec<f64>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stop = match self.summary.stop {
            StopReason::Finished => "finished",
            StopReason::Exhausted => "ran out of data",
        };
        writeln!(
            f,
            "{} ({}): {} after {} iterations",
            self.problem, self.mode, stop, self.summary.iterations
        )?;
        for (name, value) in &self.params {
            writeln!(f, "  {} = {:.12}", name, value)?;
        }
        write!(f, "  loss = {:.3e} ({} traced)", self.loss, self.trace.len())
    }
}

/// Solve `problem` with the given configuration
pub fn solve(problem: Problem, mode: Mode, config: &LearnConfig, verbose: bool) -> Result<Report> {
    match problem {
        Problem::Sqrt => sqrt::run(mode, config, verbose),
        Problem::Regression => regression::run(mode, config, verbose),
    }
}

/// Observers and stopping conditions every problem runs with.
///
/// Installs a loss tracer, a status line, and stops on the loss reaching
/// `tolerance`, on `max_iter` and on the time limit. Returns the composite
/// and the tracer's storage.
fn harness<M, D, T, L>(
    run: &RunConfig,
    loss: L,
    verbose: bool,
) -> (MetaStrategy<M, D, T>, Rc<RefCell<Vec<f64>>>)
where
    M: fmt::Debug + 'static,
    D: ?Sized + 'static,
    T: ?Sized + 'static,
    L: Fn(&M) -> f64 + Clone + 'static,
{
    let traced = loss.clone();
    let tracer = Tracer::new(move |model: &M, _: usize| traced(model)).every(run.trace_every);
    let storage = tracer.storage();

    let shown = loss.clone();
    let status = ShowStatus::new(move |model: &M, index: usize| {
        format!("iteration {index}: loss {:.3e}, {model:?}", shown(model))
    })
    .every(run.status_every);

    let meta = MetaStrategy::new().with(tracer).with(status);
    let meta = stop_when(
        meta,
        ConvergedTo::new(loss, 0.0, run.tolerance).every(run.check_every),
        verbose,
    );
    let meta = stop_when(meta, MaxIter::new(run.max_iter), verbose);
    let meta = stop_when(meta, TimeLimit::from_secs_f64(run.time_limit_secs), verbose);

    (meta, storage)
}

/// Append a stopping condition, announcing when it fires if `verbose`
fn stop_when<M, D, T, S>(meta: MetaStrategy<M, D, T>, stop: S, verbose: bool) -> MetaStrategy<M, D, T>
where
    D: ?Sized,
    T: ?Sized,
    S: LearningStrategy<M, D, T> + Clone + 'static,
{
    if verbose {
        meta.with(Verbose::new(stop))
    } else {
        meta.with(stop)
    }
}
