//! Numeric policy for the metrics engine.
//!
//! Every tunable constant (solver limits, risk-free rate, rebalancing
//! threshold) lives here so callers and tests can swap in alternate values.
//! Policies load from a TOML file; any missing field takes its default.
//!
//! ```toml
//! [solver]
//! max_iterations = 200
//!
//! [risk]
//! risk_free_rate = 6.5
//!
//! [rebalance]
//! threshold = 3.0
//! ```

use crate::types::Period;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable that points at an alternate config file.
pub const CONFIG_ENV_VAR: &str = "FOLIO_METRICS_CONFIG";

/// Newton-Raphson settings for the XIRR solver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverPolicy {
    /// Starting rate as a decimal (0.10 = 10%)
    pub initial_guess: f64,
    /// Iterations allowed before giving up
    pub max_iterations: u32,
    /// Stop once successive rates differ by less than this
    pub tolerance: f64,
    /// Derivative magnitudes below this abort the solve
    pub derivative_floor: f64,
    /// Day count used to turn day offsets into years
    pub days_per_year: f64,
}

impl Default for SolverPolicy {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            max_iterations: 100,
            tolerance: 1e-6,
            derivative_floor: 1e-12,
            days_per_year: 365.25,
        }
    }
}

/// Settings for risk statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskPolicy {
    /// Risk-free rate in percent, same unit as the return series
    pub risk_free_rate: f64,
    /// Sampling frequency assumed when the caller does not say
    pub default_period: Period,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            risk_free_rate: 4.0,
            default_period: Period::Monthly,
        }
    }
}

/// Settings for rebalancing suggestions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RebalancePolicy {
    /// Drift in percentage points that must be exceeded before suggesting a trade
    pub threshold: f64,
}

impl Default for RebalancePolicy {
    fn default() -> Self {
        Self { threshold: 5.0 }
    }
}

/// Complete metrics configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MetricsConfig {
    pub solver: SolverPolicy,
    pub risk: RiskPolicy,
    pub rebalance: RebalancePolicy,
}

impl MetricsConfig {
    /// Load the configuration from the default location.
    ///
    /// A missing or unreadable file falls back to the built-in defaults.
    pub fn load() -> Self {
        let path = Self::default_path();
        match Self::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring metrics config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Get the default config file path.
    ///
    /// Default path: `~/.folio/metrics.toml`
    /// Can be overridden with `FOLIO_METRICS_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".folio/metrics.toml"))
            .unwrap_or_else(|| PathBuf::from("metrics.toml"))
    }

    /// Load configuration from a TOML file. A path that does not exist yields defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No metrics config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the solver and risk calculations cannot work with.
    pub fn validate(&self) -> Result<()> {
        let solver = &self.solver;
        if solver.max_iterations == 0 {
            return Err(invalid("solver.max_iterations must be at least 1"));
        }
        if !solver.tolerance.is_finite() || solver.tolerance <= 0.0 {
            return Err(invalid("solver.tolerance must be a positive number"));
        }
        if !solver.derivative_floor.is_finite() || solver.derivative_floor < 0.0 {
            return Err(invalid("solver.derivative_floor must be a non-negative number"));
        }
        if !solver.days_per_year.is_finite() || solver.days_per_year <= 0.0 {
            return Err(invalid("solver.days_per_year must be a positive number"));
        }
        if !solver.initial_guess.is_finite() || solver.initial_guess <= -1.0 {
            return Err(invalid("solver.initial_guess must be a number above -1"));
        }
        if !self.risk.risk_free_rate.is_finite() {
            return Err(invalid("risk.risk_free_rate must be a finite number"));
        }
        if !self.rebalance.threshold.is_finite() || self.rebalance.threshold < 0.0 {
            return Err(invalid("rebalance.threshold must be a non-negative number"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidInput(message.to_string())
}
