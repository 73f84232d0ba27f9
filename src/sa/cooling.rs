//! Temperature capability and the built-in cooling laws.

/// A temperature source driven by the annealing loop.
///
/// The run calls [`get`](Self::get) when weighing a worsening move and
/// [`decrease`](Self::decrease) once per iteration. Implement this trait
/// to plug in a new decay law without touching the run loop.
pub trait Temperature: Clone + Send + Sync {
    /// Sets the initial (and current) temperature.
    fn set(&mut self, temperature: f64);

    /// Returns the current temperature.
    fn get(&self) -> f64;

    /// Advances the schedule by one iteration.
    fn decrease(&mut self);
}

/// Decay law used by [`CoolingSchedule`].
///
/// `k` is the schedule's iteration counter, starting at 1.
///
/// # References
///
/// - Boltzmann: Geman & Geman (1984), logarithmic cooling
/// - Cauchy: Szu & Hartley (1987), fast simulated annealing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingLaw {
    /// `T_k = T_0 / ln(1 + k)`.
    #[default]
    Boltzmann,

    /// `T_k = T_0 / (1 + k)`.
    Cauchy,

    /// `T_k = T_0 * ln(1 + k) / (1 + k)`.
    ///
    /// Rises slightly between `k = 1` and `k = 2`, then decreases.
    Generalized,
}

impl CoolingLaw {
    /// Temperature at iteration `k` for initial temperature `initial`.
    pub fn temperature(self, initial: f64, k: u64) -> f64 {
        let k = k as f64;
        match self {
            CoolingLaw::Boltzmann => initial / (1.0 + k).ln(),
            CoolingLaw::Cauchy => initial / (1.0 + k),
            CoolingLaw::Generalized => initial * (1.0 + k).ln() / (1.0 + k),
        }
    }
}

/// Stateful cooling schedule following one [`CoolingLaw`].
///
/// # Examples
///
/// ```
/// use u_flowsched::sa::{CoolingLaw, CoolingSchedule, Temperature};
///
/// let mut t = CoolingSchedule::new(CoolingLaw::Cauchy);
/// t.set(100.0);
/// t.decrease();
/// assert!((t.get() - 50.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CoolingSchedule {
    law: CoolingLaw,
    initial: f64,
    current: f64,
    iteration: u64,
}

impl CoolingSchedule {
    /// Creates a schedule at temperature zero; call [`Temperature::set`]
    /// before use.
    pub fn new(law: CoolingLaw) -> Self {
        Self {
            law,
            initial: 0.0,
            current: 0.0,
            iteration: 1,
        }
    }

    /// Creates a schedule already set to `initial`.
    pub fn with_initial(law: CoolingLaw, initial: f64) -> Self {
        let mut schedule = Self::new(law);
        schedule.set(initial);
        schedule
    }

    pub fn law(&self) -> CoolingLaw {
        self.law
    }

    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// Value of `k` the next [`decrease`](Temperature::decrease) will use.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }
}

impl Temperature for CoolingSchedule {
    fn set(&mut self, temperature: f64) {
        self.initial = temperature;
        self.current = temperature;
    }

    fn get(&self) -> f64 {
        self.current
    }

    fn decrease(&mut self) {
        self.current = self.law.temperature(self.initial, self.iteration);
        self.iteration += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(law: CoolingLaw, steps: usize) -> Vec<f64> {
        let mut t = CoolingSchedule::with_initial(law, 1000.0);
        (0..steps)
            .map(|_| {
                t.decrease();
                t.get()
            })
            .collect()
    }

    #[test]
    fn test_set_and_get() {
        let mut t = CoolingSchedule::new(CoolingLaw::Boltzmann);
        assert_eq!(t.get(), 0.0);
        t.set(500.0);
        assert_eq!(t.get(), 500.0);
        assert_eq!(t.initial(), 500.0);
        assert_eq!(t.iteration(), 1);
    }

    #[test]
    fn test_first_decrease_uses_iteration_one() {
        let b = trace(CoolingLaw::Boltzmann, 1)[0];
        assert!((b - 1000.0 / 2f64.ln()).abs() < 1e-9);

        let c = trace(CoolingLaw::Cauchy, 1)[0];
        assert!((c - 500.0).abs() < 1e-9);

        let g = trace(CoolingLaw::Generalized, 1)[0];
        assert!((g - 1000.0 * 2f64.ln() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_iteration_advances() {
        let mut t = CoolingSchedule::with_initial(CoolingLaw::Cauchy, 10.0);
        for _ in 0..5 {
            t.decrease();
        }
        assert_eq!(t.iteration(), 6);
        assert!((t.get() - 10.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_boltzmann_and_cauchy_non_increasing() {
        for law in [CoolingLaw::Boltzmann, CoolingLaw::Cauchy] {
            let temps = trace(law, 500);
            for w in temps.windows(2) {
                assert!(w[1] <= w[0], "{law:?}: {} > {}", w[1], w[0]);
            }
        }
    }

    #[test]
    fn test_generalized_non_increasing_after_peak() {
        let temps = trace(CoolingLaw::Generalized, 500);
        for w in temps[1..].windows(2) {
            assert!(w[1] <= w[0], "{} > {}", w[1], w[0]);
        }
    }

    #[test]
    fn test_all_laws_finite_and_positive() {
        for law in [
            CoolingLaw::Boltzmann,
            CoolingLaw::Cauchy,
            CoolingLaw::Generalized,
        ] {
            assert!(trace(law, 1000).iter().all(|t| t.is_finite() && *t > 0.0));
        }
    }

    #[test]
    fn test_default_law() {
        assert_eq!(CoolingLaw::default(), CoolingLaw::Boltzmann);
    }
}
