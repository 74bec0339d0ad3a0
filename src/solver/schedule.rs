use crate::optimizer::qubo::Qubo;

/// Geometric cooling from `initial` to `final_temp` over `sweeps` steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSchedule {
    pub initial: f64,
    pub final_temp: f64,
    pub sweeps: usize,
}

impl TemperatureSchedule {
    pub fn geometric(initial: f64, final_temp: f64, sweeps: usize) -> Self {
        let initial = initial.max(f64::MIN_POSITIVE);
        let final_temp = final_temp.clamp(f64::MIN_POSITIVE, initial);
        Self {
            initial,
            final_temp,
            sweeps,
        }
    }

    /// Range derived from the objective's coefficient scale.
    ///
    /// The initial temperature accepts the largest possible single-flip
    /// increase with probability `hot_acceptance`; the final one accepts the
    /// smallest non-zero coefficient with probability `cold_acceptance`.
    pub fn for_qubo(qubo: &Qubo, sweeps: usize, hot_acceptance: f64, cold_acceptance: f64) -> Self {
        let max_delta = qubo.max_flip_delta();
        let min_delta = qubo.min_abs_coefficient().unwrap_or(max_delta);

        let initial = temperature_for(max_delta, hot_acceptance);
        let final_temp = temperature_for(min_delta, cold_acceptance);
        Self::geometric(initial, final_temp, sweeps)
    }

    /// Temperature during sweep `sweep` (0-based).
    pub fn temperature(&self, sweep: usize) -> f64 {
        if self.sweeps <= 1 {
            return self.final_temp;
        }
        let t = sweep.min(self.sweeps - 1) as f64 / (self.sweeps - 1) as f64;
        self.initial * (self.final_temp / self.initial).powf(t)
    }
}

/// Temperature at which an increase of `delta` is accepted with probability `p`.
fn temperature_for(delta: f64, p: f64) -> f64 {
    let p = p.clamp(1e-12, 1.0 - 1e-12);
    delta / -p.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_and_monotonic() {
        let s = TemperatureSchedule::geometric(10.0, 0.01, 100);
        assert!((s.temperature(0) - 10.0).abs() < 1e-12);
        assert!((s.temperature(99) - 0.01).abs() < 1e-12);

        let temps: Vec<f64> = (0..100).map(|i| s.temperature(i)).collect();
        assert!(temps.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_geometric_ratio_is_constant() {
        let s = TemperatureSchedule::geometric(8.0, 1.0, 4);
        assert!((s.temperature(1) - 4.0).abs() < 1e-9);
        assert!((s.temperature(2) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_final_never_exceeds_initial() {
        let s = TemperatureSchedule::geometric(1.0, 5.0, 10);
        assert_eq!(s.final_temp, 1.0);
    }

    #[test]
    fn test_for_qubo_acceptance() {
        let mut q = Qubo::new(2);
        q.add_linear(0, 4.0);
        q.add_interaction(0, 1, 0.5);
        let s = TemperatureSchedule::for_qubo(&q, 10, 0.5, 0.01);

        // exp(-4.5 / T0) = 0.5
        assert!(((-4.5 / s.initial).exp() - 0.5).abs() < 1e-9);
        // exp(-0.5 / Tf) = 0.01
        assert!(((-0.5 / s.final_temp).exp() - 0.01).abs() < 1e-9);
    }
}
