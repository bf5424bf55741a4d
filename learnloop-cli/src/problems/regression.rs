//! Least-squares fit of `y = slope * x + intercept` to synthetic samples
//!
//! Online mode takes one stochastic gradient step per sample while cycling
//! over the dataset. Offline mode takes one full-batch gradient step per
//! iteration.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use anyhow::{Result, ensure};
use learnloop_core::{Generator, LearnError, LearningStrategy, Offline, Online, learn};

use super::{Mode, Problem, Report, harness};
use crate::config::{LearnConfig, RegressionConfig};

/// A line `y = slope * x + intercept`
#[derive(Clone, Copy, Default, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    fn check(&self, index: usize) -> learnloop_core::Result<()> {
        if self.slope.is_finite() && self.intercept.is_finite() {
            Ok(())
        } else {
            Err(LearnError::model(format!(
                "fit diverged at iteration {index}: {self:?}"
            )))
        }
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {:.6} * x + {:.6}", self.slope, self.intercept)
    }
}

/// Evenly spaced points on `[-1, 1]` lying exactly on the configured line
pub fn samples(config: &RegressionConfig) -> Vec<(f64, f64)> {
    let truth = Line {
        slope: config.slope,
        intercept: config.intercept,
    };
    let n = config.samples;
    (0..n)
        .map(|i| {
            let x = if n > 1 {
                -1.0 + 2.0 * i as f64 / (n - 1) as f64
            } else {
                0.0
            };
            (x, truth.predict(x))
        })
        .collect()
}

/// Mean squared error of `line` over `samples`
pub fn mse(line: &Line, samples: &[(f64, f64)]) -> f64 {
    let total: f64 = samples
        .iter()
        .map(|&(x, y)| {
            let err = line.predict(x) - y;
            err * err
        })
        .sum();
    total / samples.len() as f64
}

/// One gradient step on a single `(x, y)` sample per iteration
#[derive(Debug, Clone, Copy)]
pub struct SgdStep {
    learning_rate: f64,
}

impl<D: ?Sized> LearningStrategy<Line, D, (f64, f64)> for SgdStep {
    fn update(
        &mut self,
        line: &mut Line,
        index: usize,
        &(x, y): &(f64, f64),
    ) -> learnloop_core::Result<()> {
        let err = line.predict(x) - y;
        line.slope -= self.learning_rate * err * x;
        line.intercept -= self.learning_rate * err;
        line.check(index)
    }
}

/// One gradient step on the whole dataset per iteration
#[derive(Debug, Clone, Copy)]
pub struct BatchStep {
    learning_rate: f64,
}

impl LearningStrategy<Line, Vec<(f64, f64)>> for BatchStep {
    fn update(
        &mut self,
        line: &mut Line,
        index: usize,
        batch: &Vec<(f64, f64)>,
    ) -> learnloop_core::Result<()> {
        if batch.is_empty() {
            return Err(LearnError::strategy(
                "batch gradient step needs at least one sample",
            ));
        }

        let n = batch.len() as f64;
        let (grad_slope, grad_intercept) =
            batch.iter().fold((0.0, 0.0), |(gs, gi), &(x, y)| {
                let err = line.predict(x) - y;
                (gs + err * x, gi + err)
            });
        line.slope -= self.learning_rate * 2.0 * grad_slope / n;
        line.intercept -= self.learning_rate * 2.0 * grad_intercept / n;
        line.check(index)
    }
}

pub fn run(mode: Mode, config: &LearnConfig, verbose: bool) -> Result<Report> {
    let params = config.regression;
    ensure!(params.samples > 0, "regression needs at least one sample");
    ensure!(
        params.learning_rate.is_finite() && params.learning_rate > 0.0,
        "learning rate must be a finite positive number, got {}",
        params.learning_rate
    );

    let data = Rc::new(samples(&params));
    let scored = Rc::clone(&data);
    let loss = move |line: &Line| mse(line, &scored);

    let mut line = Line::default();
    let (summary, trace) = match mode {
        Mode::Online => {
            let source = Rc::clone(&data);
            let cycle = Generator::new(move || source.to_vec().into_iter().cycle());
            let (strategy, trace) = harness(&config.run, loss.clone(), verbose);
            let mut strategy = strategy.with(SgdStep {
                learning_rate: params.learning_rate,
            });
            let summary = learn!(&mut line, &mut strategy, &cycle, Online)?;
            (summary, trace)
        }
        Mode::Offline => {
            let (strategy, trace) = harness(&config.run, loss.clone(), verbose);
            let mut strategy = strategy.with(BatchStep {
                learning_rate: params.learning_rate,
            });
            let summary = learn!(&mut line, &mut strategy, &*data, Offline)?;
            (summary, trace)
        }
    };

    let trace = trace.borrow().clone();
    Ok(Report {
        problem: Problem::Regression,
        mode,
        summary,
        params: BTreeMap::from([("slope", line.slope), ("intercept", line.intercept)]),
        loss: loss(&line),
        trace,
    })
}
