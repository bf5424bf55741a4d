use serde::{Deserialize, Serialize};

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLearnConfig {
    #[serde(default)]
    pub run: RawRunConfig,

    #[serde(default)]
    pub sqrt: RawSqrtConfig,

    #[serde(default)]
    pub regression: RawRegressionConfig,
}

/// Run limits as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawRunConfig {
    pub max_iter: Option<usize>,
    pub time_limit_secs: Option<f64>,
    pub tolerance: Option<f64>,
    pub check_every: Option<usize>,
    pub status_every: Option<usize>,
    pub trace_every: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSqrtConfig {
    pub target: Option<f64>,
    pub initial: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawRegressionConfig {
    pub samples: Option<usize>,
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
    pub learning_rate: Option<f64>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LearnConfig {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub sqrt: SqrtConfig,

    #[serde(default)]
    pub regression: RegressionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Stop after this many iterations
    pub max_iter: usize,

    /// Wall-clock budget for one run
    pub time_limit_secs: f64,

    /// Loss at or below which a run counts as converged
    pub tolerance: f64,

    /// Check convergence every n iterations
    pub check_every: usize,

    /// Log a status line every n iterations
    pub status_every: usize,

    /// Record the loss every n iterations
    pub trace_every: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            tolerance: DEFAULT_TOLERANCE,
            check_every: 1,
            status_every: DEFAULT_STATUS_EVERY,
            trace_every: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SqrtConfig {
    /// Number whose square root is computed
    pub target: f64,

    /// Starting guess
    pub initial: f64,
}

impl Default for SqrtConfig {
    fn default() -> Self {
        Self {
            target: 2.0,
            initial: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Number of synthetic samples
    pub samples: usize,

    /// Slope of the line the samples are drawn from
    pub slope: f64,

    /// Intercept of the line the samples are drawn from
    pub intercept: f64,

    /// Gradient step size
    pub learning_rate: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            samples: 64,
            slope: 3.0,
            intercept: 2.0,
            learning_rate: 0.05,
        }
    }
}

pub const DEFAULT_MAX_ITER: usize = 1000;
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 10.0;
pub const DEFAULT_TOLERANCE: f64 = 1e-9;
pub const DEFAULT_STATUS_EVERY: usize = 100;
