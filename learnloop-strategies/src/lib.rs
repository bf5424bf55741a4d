//! Built-in strategies for learnloop
//!
//! Each strategy implements a small part of the
//! [`LearningStrategy`](learnloop_core::LearningStrategy) contract and is
//! meant to be composed with others through
//! [`strategy!`](learnloop_core::strategy):
//!
//! - Stopping conditions: [`MaxIter`], [`TimeLimit`], [`Converged`],
//!   [`ConvergedTo`], [`Breaker`]
//! - Observation: [`Tracer`], [`ShowStatus`], [`IterFunction`]
//! - Decoration: [`Verbose`]
//!
//! All of them are generic over the model, data and item types, so the same
//! value can be used in online and offline runs.

mod breaker;
mod converged;
mod iter_function;
mod max_iter;
mod show_status;
mod time_limit;
mod tracer;
mod verbose;

pub use breaker::Breaker;
pub use converged::{Converged, ConvergedTo, Distance};
pub use iter_function::{IterFunction, Phase};
pub use max_iter::MaxIter;
pub use show_status::ShowStatus;
pub use time_limit::TimeLimit;
pub use tracer::Tracer;
pub use verbose::Verbose;

/// Whether `index` falls on an `every`-th iteration.
pub(crate) fn due(index: usize, every: usize) -> bool {
    index % every.max(1) == 0
}
