//! Annealing run configuration.

use super::cooling::{CoolingLaw, CoolingSchedule};
use crate::error::{Result, ScheduleError};

/// Configuration for a single annealing run.
///
/// # Examples
///
/// ```
/// use u_flowsched::sa::{AnnealConfig, CoolingLaw};
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(5_000.0)
///     .with_cooling(CoolingLaw::Cauchy)
///     .with_stagnation_limit(250)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Initial temperature. Must be positive and finite.
    pub initial_temperature: f64,

    /// Decay law applied once per iteration.
    pub cooling: CoolingLaw,

    /// Iterations allowed without improving the best schedule before the
    /// run terminates.
    pub stagnation_limit: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1_000_000.0,
            cooling: CoolingLaw::default(),
            stagnation_limit: 100,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingLaw) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the cooling schedule this config describes, already set.
    pub fn cooling_schedule(&self) -> CoolingSchedule {
        CoolingSchedule::with_initial(self.cooling, self.initial_temperature)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(ScheduleError::config(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa::Temperature;

    #[test]
    fn test_default_config() {
        let config = AnnealConfig::default();
        assert!((config.initial_temperature - 1_000_000.0).abs() < 1e-6);
        assert_eq!(config.cooling, CoolingLaw::Boltzmann);
        assert_eq!(config.stagnation_limit, 100);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert!(AnnealConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        for t in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = AnnealConfig::default().with_initial_temperature(t);
            assert!(config.validate().is_err(), "accepted {t}");
        }
    }

    #[test]
    fn test_cooling_schedule_is_set() {
        let config = AnnealConfig::default()
            .with_initial_temperature(42.0)
            .with_cooling(CoolingLaw::Generalized);
        let schedule = config.cooling_schedule();
        assert_eq!(schedule.law(), CoolingLaw::Generalized);
        assert_eq!(schedule.get(), 42.0);
    }
}
