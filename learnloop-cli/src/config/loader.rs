use super::types::{
    LearnConfig, RawLearnConfig, RawRegressionConfig, RawRunConfig, RawSqrtConfig,
    RegressionConfig, RunConfig, SqrtConfig,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project + optional explicit file)
    pub fn load(explicit: Option<&Path>) -> Result<LearnConfig> {
        let mut raw = RawLearnConfig::default();

        // Layer 1: User config
        let user_path = Self::user_config_path();
        if user_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        // Layer 3: File named on the command line, which must exist
        if let Some(path) = explicit {
            raw = Self::merge_raw(raw, Self::read_raw(path)?);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path
    ///
    /// `$XDG_CONFIG_HOME/learnloop/config.toml` if set, otherwise
    /// `~/.config/learnloop/config.toml`.
    pub fn user_config_path() -> PathBuf {
        let dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("learnloop")
        } else if let Some(home) = dirs::home_dir() {
            home.join(".config/learnloop")
        } else {
            PathBuf::from(".config/learnloop")
        };
        dir.join("config.toml")
    }

    /// Get project config path
    /// Can be overridden with LEARNLOOP_PROJECT_CONFIG_DIR env var
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("LEARNLOOP_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".learnloop/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawLearnConfig> {
        debug!(path = %path.display(), "reading config layer");
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawLearnConfig, overlay: RawLearnConfig) -> RawLearnConfig {
        RawLearnConfig {
            run: RawRunConfig {
                max_iter: overlay.run.max_iter.or(base.run.max_iter),
                time_limit_secs: overlay.run.time_limit_secs.or(base.run.time_limit_secs),
                tolerance: overlay.run.tolerance.or(base.run.tolerance),
                check_every: overlay.run.check_every.or(base.run.check_every),
                status_every: overlay.run.status_every.or(base.run.status_every),
                trace_every: overlay.run.trace_every.or(base.run.trace_every),
            },
            sqrt: RawSqrtConfig {
                target: overlay.sqrt.target.or(base.sqrt.target),
                initial: overlay.sqrt.initial.or(base.sqrt.initial),
            },
            regression: RawRegressionConfig {
                samples: overlay.regression.samples.or(base.regression.samples),
                slope: overlay.regression.slope.or(base.regression.slope),
                intercept: overlay.regression.intercept.or(base.regression.intercept),
                learning_rate: overlay
                    .regression
                    .learning_rate
                    .or(base.regression.learning_rate),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawLearnConfig) -> LearnConfig {
        let run = RunConfig::default();
        let sqrt = SqrtConfig::default();
        let regression = RegressionConfig::default();

        LearnConfig {
            run: RunConfig {
                max_iter: raw.run.max_iter.unwrap_or(run.max_iter),
                time_limit_secs: raw.run.time_limit_secs.unwrap_or(run.time_limit_secs),
                tolerance: raw.run.tolerance.unwrap_or(run.tolerance),
                check_every: raw.run.check_every.unwrap_or(run.check_every).max(1),
                status_every: raw.run.status_every.unwrap_or(run.status_every).max(1),
                trace_every: raw.run.trace_every.unwrap_or(run.trace_every).max(1),
            },
            sqrt: SqrtConfig {
                target: raw.sqrt.target.unwrap_or(sqrt.target),
                initial: raw.sqrt.initial.unwrap_or(sqrt.initial),
            },
            regression: RegressionConfig {
                samples: raw.regression.samples.unwrap_or(regression.samples),
                slope: raw.regression.slope.unwrap_or(regression.slope),
                intercept: raw.regression.intercept.unwrap_or(regression.intercept),
                learning_rate: raw
                    .regression
                    .learning_rate
                    .unwrap_or(regression.learning_rate),
            },
        }
    }

    /// Load config from a specific path (for testing)
    #[cfg(test)]
    pub fn load_from_path(path: &Path) -> Result<LearnConfig> {
        if path.exists() {
            Ok(Self::finalize(Self::read_raw(path)?))
        } else {
            Ok(LearnConfig::default())
        }
    }
}
