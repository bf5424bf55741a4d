//! Newton iteration for `sqrt(target)`, driven without data

use std::collections::BTreeMap;

use anyhow::{Result, ensure};
use learnloop_core::{LearnError, LearningStrategy, learn};
use learnloop_strategies::Converged;

use super::{Mode, Problem, Report, harness, stop_when};
use crate::config::LearnConfig;

/// One Newton step `x <- (x + target / x) / 2` per iteration
#[derive(Debug, Clone, Copy)]
pub struct NewtonStep {
    target: f64,
}

impl NewtonStep {
    pub fn new(target: f64) -> Self {
        Self { target }
    }
}

impl<D: ?Sized, T: ?Sized> LearningStrategy<f64, D, T> for NewtonStep {
    fn update(&mut self, x: &mut f64, index: usize, _item: &T) -> learnloop_core::Result<()> {
        let next = 0.5 * (*x + self.target / *x);
        if !next.is_finite() {
            return Err(LearnError::model(format!(
                "newton iterate diverged to {next} at iteration {index}"
            )));
        }
        *x = next;
        Ok(())
    }
}

pub fn run(mode: Mode, config: &LearnConfig, verbose: bool) -> Result<Report> {
    let target = config.sqrt.target;
    ensure!(
        target.is_finite() && target >= 0.0,
        "sqrt target must be a finite non-negative number, got {target}"
    );
    ensure!(
        config.sqrt.initial.is_finite() && config.sqrt.initial > 0.0,
        "sqrt initial guess must be a finite positive number, got {}",
        config.sqrt.initial
    );
    ensure!(
        mode == Mode::Online,
        "sqrt has no dataset to run {mode}; use --mode online"
    );

    let loss = move |x: &f64| (x * x - target).abs();
    let (strategy, trace) = harness(&config.run, loss, verbose);
    let strategy = stop_when(
        strategy,
        Converged::new(|x: &f64| *x, config.run.tolerance).every(config.run.check_every),
        verbose,
    );
    let mut strategy = strategy.with(NewtonStep::new(target));

    let mut x = config.sqrt.initial;
    let summary = learn!(&mut x, &mut strategy)?;

    let trace = trace.borrow().clone();
    Ok(Report {
        problem: Problem::Sqrt,
        mode,
        summary,
        params: BTreeMap::from([("x", x)]),
        loss: loss(&x),
        trace,
    })
}
