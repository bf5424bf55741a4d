//! Built-in strategies composed and driven end to end

use std::time::Duration;

use learnloop_core::{
    LearningStrategy, MetaStrategy, Nothing, Offline, Result, StopReason, learn, learn_offline,
    learn_without_data, strategy,
};
use learnloop_strategies::{
    Breaker, Converged, ConvergedTo, IterFunction, MaxIter, Phase, ShowStatus, TimeLimit, Tracer,
    Verbose,
};

/// Adds one to the model on every update.
#[derive(Clone)]
struct Step;

impl<D: ?Sized, T: ?Sized> LearningStrategy<u64, D, T> for Step {
    fn update(&mut self, model: &mut u64, _index: usize, _item: &T) -> Result<()> {
        *model += 1;
        Ok(())
    }
}

/// One Newton step towards `sqrt(target)` per iteration.
#[derive(Clone)]
struct Newton {
    target: f64,
}

impl<D: ?Sized, T: ?Sized> LearningStrategy<f64, D, T> for Newton {
    fn update(&mut self, x: &mut f64, _index: usize, _item: &T) -> Result<()> {
        *x = 0.5 * (*x + self.target / *x);
        Ok(())
    }
}

/// Moves the model to the mean of the whole batch in one step.
#[derive(Clone)]
struct MeanFit;

impl LearningStrategy<f64, Vec<f64>> for MeanFit {
    fn update(&mut self, model: &mut f64, _index: usize, batch: &Vec<f64>) -> Result<()> {
        *model = batch.iter().sum::<f64>() / batch.len() as f64;
        Ok(())
    }
}

#[test]
fn test_tracer_records_every_iteration_up_to_max_iter() {
    let tracer = Tracer::new(|m: &u64, i: usize| (i, *m));
    let mut s: MetaStrategy<u64, Nothing, ()> = strategy!(Step, tracer.clone(), MaxIter::new(5));

    let mut model = 0u64;
    let summary = learn_without_data(&mut model, &mut s).unwrap();

    assert_eq!(summary.iterations, 5);
    assert_eq!(summary.stop, StopReason::Finished);
    assert_eq!(tracer.values(), vec![(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);
}

#[test]
fn test_tracer_every_nth_over_online_data() {
    let data: Vec<u64> = (0..10).collect();
    let tracer = Tracer::new(|m: &u64, _: usize| *m).every(3);
    let mut s = strategy!(Step, tracer.clone());

    let mut model = 0u64;
    let summary = learn(&mut model, &mut s, &data).unwrap();

    assert_eq!(summary.stop, StopReason::Exhausted);
    assert_eq!(summary.iterations, 10);
    assert_eq!(tracer.values(), vec![3, 6, 9]);
}

#[test]
fn test_newton_converges_before_max_iter() {
    let mut s = strategy!(
        Newton { target: 2.0 },
        ConvergedTo::new(|x: &f64| *x * *x, 2.0, 1e-12),
        MaxIter::new(100),
    );

    let mut x = 1.0f64;
    let summary = learn_without_data(&mut x, &mut s).unwrap();

    assert_eq!(summary.stop, StopReason::Finished);
    assert!(summary.iterations < 10);
    assert!((x - 2f64.sqrt()).abs() < 1e-9);
}

#[test]
fn test_converged_detects_fixed_point() {
    let mut s = strategy!(
        Newton { target: 9.0 },
        Converged::new(|x: &f64| *x, 1e-14),
        MaxIter::new(1000),
    );

    let mut x = 1.0f64;
    let summary = learn_without_data(&mut x, &mut s).unwrap();

    assert!(summary.iterations < 1000);
    assert!((x - 3.0).abs() < 1e-12);
}

#[test]
fn test_zero_time_limit_stops_after_first_iteration() {
    let mut s = strategy!(Step, TimeLimit::new(Duration::ZERO));

    let mut model = 0u64;
    let summary = learn_without_data(&mut model, &mut s).unwrap();

    assert_eq!(summary.iterations, 1);
    assert_eq!(model, 1);
}

#[test]
fn test_breaker_and_max_iter_earliest_wins() {
    let mut s = strategy!(
        Step,
        Breaker::new(|m: &u64, _: usize| *m >= 7),
        MaxIter::new(50),
    );

    let mut model = 0u64;
    let summary = learn_without_data(&mut model, &mut s).unwrap();
    assert_eq!(summary.iterations, 7);
}

#[test]
fn test_verbose_inside_composite_keeps_behavior() {
    let status = ShowStatus::new(|m: &u64, i: usize| format!("iteration {i}: model {m}"));
    let mut s = strategy!(Step, Verbose::new(MaxIter::new(4)), status.every(2));

    let mut model = 0u64;
    let summary = learn_without_data(&mut model, &mut s).unwrap();

    assert_eq!(summary.iterations, 4);
    assert_eq!(model, 4);
    assert_eq!(s.names(), vec!["Step", "Verbose(MaxIter(4))", "ShowStatus"]);
}

#[test]
fn test_iter_function_schedule_in_offline_run() {
    let data = vec![1.0, 2.0, 3.0, 6.0];
    let tracer = Tracer::new(|m: &f64, _: usize| *m);
    let mut s = strategy!(
        MeanFit,
        IterFunction::new(|m: &mut f64, _: usize| *m *= 0.5).on(Phase::Cleanup),
        tracer.clone(),
        MaxIter::new(1),
    );

    let mut model = 0.0f64;
    let summary = learn_offline(&mut model, &mut s, &data).unwrap();

    assert_eq!(summary.iterations, 1);
    assert_eq!(tracer.values(), vec![3.0]);
    assert_eq!(model, 1.5);
}

#[test]
fn test_appended_limit_leaves_base_reusable() {
    let tracer = Tracer::new(|m: &u64, _: usize| *m);
    let base: MetaStrategy<u64, Nothing, ()> = strategy!(Step, tracer.clone());

    let mut short = strategy!(base => MaxIter::new(2));
    let mut long = strategy!(base => MaxIter::new(5));
    assert_eq!(base.len(), 2);

    let mut model = 0u64;
    learn_without_data(&mut model, &mut short).unwrap();
    learn_without_data(&mut model, &mut long).unwrap();

    assert_eq!(model, 7);
    assert_eq!(tracer.values(), vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_offline_marker_with_time_and_iteration_limits() {
    let data = vec![4.0, 8.0];
    let mut s = strategy!(
        MeanFit,
        TimeLimit::new(Duration::from_secs(60)),
        MaxIter::new(3),
    );

    let mut model = 0.0f64;
    let summary = learn!(&mut model, &mut s, &data, Offline).unwrap();

    assert_eq!(summary.iterations, 3);
    assert_eq!(model, 6.0);
}
