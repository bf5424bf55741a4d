//! learnloop-core - a control loop for iterative algorithms
//!
//! This crate contains no numerical logic. It orchestrates caller-supplied
//! callbacks in a fixed order:
//!
//! ```text
//! setup
//! for i in 1.. { update; hook; if finished { break } }
//! cleanup
//! ```
//!
//! - [`LearningStrategy`] is the contract: five lifecycle operations, each
//!   with a no-op default.
//! - [`MetaStrategy`] fans every operation out to an ordered list of
//!   children and stops when any child reports finished.
//! - [`learn`], [`learn_offline`] and [`learn_without_data`] drive a run;
//!   [`learn!`] selects between them with an explicit mode marker.
//!
//! # Example
//!
//! ```
//! use learnloop_core::{LearningStrategy, Result, learn, strategy};
//!
//! #[derive(Clone)]
//! struct Sum;
//!
//! impl<'a> LearningStrategy<i64, [i64], &'a i64> for Sum {
//!     fn update(&mut self, model: &mut i64, _index: usize, item: &&'a i64) -> Result<()> {
//!         *model += **item;
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Clone)]
//! struct StopAfter(usize);
//!
//! impl<'a> LearningStrategy<i64, [i64], &'a i64> for StopAfter {
//!     fn finished(&mut self, _model: &i64, _data: &[i64], index: usize) -> Result<bool> {
//!         Ok(index >= self.0)
//!     }
//! }
//!
//! let data = vec![1, 2, 3, 4, 5];
//! let mut model = 0;
//! let mut s = strategy!(Sum, StopAfter(3));
//!
//! let summary = learn(&mut model, &mut s, &data[..]).unwrap();
//! assert_eq!(model, 6);
//! assert_eq!(summary.iterations, 3);
//! ```

mod driver;
pub mod error;
mod meta;
pub mod source;
mod strategy;

pub use driver::{
    Offline, Online, RunSummary, StopReason, learn, learn_offline, learn_without_data,
};
pub use error::{LearnError, Result};
pub use meta::MetaStrategy;
pub use source::{Generator, Nothing};
pub use strategy::{LearningStrategy, short_type_name};

/// Build a [`MetaStrategy`] from loose strategies, or append to an existing
/// one.
///
/// `strategy!(a, b, c)` creates a composite with children `[a, b, c]`.
/// `strategy!(base => c, d)` creates a new composite with clones of
/// `base`'s children followed by `c, d`; `base` itself is left unchanged.
#[macro_export]
macro_rules! strategy {
    ($base:expr => $($child:expr),+ $(,)?) => {{
        let mut meta = ::std::clone::Clone::clone(&$base);
        $(meta = meta.with($child);)+
        meta
    }};
    ($($child:expr),* $(,)?) => {{
        let meta = $crate::MetaStrategy::new();
        $(let meta = meta.with($child);)*
        meta
    }};
}

/// Run a learning loop.
///
/// - `learn!(model, strategy)` runs [`learn_without_data`].
/// - `learn!(model, strategy, data)` runs the online loop ([`learn()`]).
/// - `learn!(model, strategy, data, mode)` runs with an explicit mode
///   marker, [`Online`] or [`Offline`].
///
/// Arguments are passed through as given, so `model` and `strategy` are
/// `&mut` borrows and `data` a shared borrow.
#[macro_export]
macro_rules! learn {
    ($model:expr, $strategy:expr $(,)?) => {
        $crate::learn_without_data($model, $strategy)
    };
    ($model:expr, $strategy:expr, $data:expr $(,)?) => {
        $crate::learn($model, $strategy, $data)
    };
    ($model:expr, $strategy:expr, $data:expr, $mode:expr $(,)?) => {
        $mode.run($model, $strategy, $data)
    };
}
