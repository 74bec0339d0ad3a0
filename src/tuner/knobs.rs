use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::optimizer::constants::{
    COLD_ACCEPTANCE, DEFAULT_NUM_SWEEPS, HOT_ACCEPTANCE, MAGNITUDE_PENALTY_WEIGHT,
};
use crate::optimizer::OptimizerConfig;

/// Tunable solver and objective parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunerKnobs {
    pub num_sweeps: usize,
    pub hot_acceptance: f64,
    pub cold_acceptance: f64,
    pub magnitude_weight: f64,
}

impl Default for TunerKnobs {
    fn default() -> Self {
        Self {
            num_sweeps: DEFAULT_NUM_SWEEPS,
            hot_acceptance: HOT_ACCEPTANCE,
            cold_acceptance: COLD_ACCEPTANCE,
            magnitude_weight: MAGNITUDE_PENALTY_WEIGHT,
        }
    }
}

impl TunerKnobs {
    /// Number of tunable knobs.
    pub const NUM_KNOBS: usize = 4;

    /// Generate random knobs within the given ranges.
    ///
    /// Sweeps and magnitude weight are drawn log-uniformly.
    pub fn random(rng: &mut impl Rng, ranges: &KnobRanges) -> Self {
        let log_sweeps = rng.gen_range(
            (ranges.num_sweeps.0 as f64).ln()..=(ranges.num_sweeps.1 as f64).ln(),
        );
        let log_weight =
            rng.gen_range(ranges.magnitude_weight.0.ln()..=ranges.magnitude_weight.1.ln());
        Self {
            num_sweeps: (log_sweeps.exp().round() as usize)
                .clamp(ranges.num_sweeps.0, ranges.num_sweeps.1),
            hot_acceptance: rng.gen_range(ranges.hot_acceptance.0..=ranges.hot_acceptance.1),
            cold_acceptance: rng.gen_range(ranges.cold_acceptance.0..=ranges.cold_acceptance.1),
            magnitude_weight: log_weight.exp(),
        }
    }

    /// Format knobs as a compact string for display.
    pub fn display(&self) -> String {
        format!(
            "sweeps={} hot={:.3} cold={:.4} F={:.2}",
            self.num_sweeps, self.hot_acceptance, self.cold_acceptance, self.magnitude_weight
        )
    }

    /// Create a copy with one knob multiplied by a factor.
    ///
    /// `knob_idx` maps to: 0=num_sweeps, 1=hot_acceptance, 2=cold_acceptance,
    /// 3=magnitude_weight. The result is clamped to the given ranges.
    pub fn perturb(&self, knob_idx: usize, factor: f64, ranges: &KnobRanges) -> Self {
        let mut new = self.clone();
        match knob_idx {
            0 => {
                new.num_sweeps = ((self.num_sweeps as f64 * factor).round() as usize)
                    .clamp(ranges.num_sweeps.0, ranges.num_sweeps.1);
            }
            1 => {
                new.hot_acceptance = (self.hot_acceptance * factor)
                    .clamp(ranges.hot_acceptance.0, ranges.hot_acceptance.1);
            }
            2 => {
                new.cold_acceptance = (self.cold_acceptance * factor)
                    .clamp(ranges.cold_acceptance.0, ranges.cold_acceptance.1);
            }
            3 => {
                new.magnitude_weight = (self.magnitude_weight * factor)
                    .clamp(ranges.magnitude_weight.0, ranges.magnitude_weight.1);
            }
            _ => {}
        }
        new
    }

    /// Knobs a configuration currently runs with.
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self {
            num_sweeps: config.anneal.num_sweeps,
            hot_acceptance: config.anneal.hot_acceptance,
            cold_acceptance: config.anneal.cold_acceptance,
            magnitude_weight: config.weights.magnitude,
        }
    }

    /// `base` with these knobs applied.
    pub fn apply(&self, base: &OptimizerConfig) -> OptimizerConfig {
        let mut config = base.clone();
        config.anneal.num_sweeps = self.num_sweeps;
        config.anneal.hot_acceptance = self.hot_acceptance;
        config.anneal.cold_acceptance = self.cold_acceptance;
        config.anneal.temperature_range = None;
        config.weights.magnitude = self.magnitude_weight;
        config
    }
}

/// Min/max ranges for each tunable knob.
#[derive(Debug, Clone)]
pub struct KnobRanges {
    pub num_sweeps: (usize, usize),
    pub hot_acceptance: (f64, f64),
    pub cold_acceptance: (f64, f64),
    pub magnitude_weight: (f64, f64),
}

impl Default for KnobRanges {
    fn default() -> Self {
        Self {
            num_sweeps: (50, 2000),
            hot_acceptance: (0.1, 0.9),
            cold_acceptance: (0.0001, 0.1),
            magnitude_weight: (1.0, 1000.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_knobs_match_constants() {
        let knobs = TunerKnobs::default();
        assert_eq!(knobs.num_sweeps, DEFAULT_NUM_SWEEPS);
        assert_eq!(knobs.hot_acceptance, HOT_ACCEPTANCE);
        assert_eq!(knobs.cold_acceptance, COLD_ACCEPTANCE);
        assert_eq!(knobs.magnitude_weight, MAGNITUDE_PENALTY_WEIGHT);
    }

    #[test]
    fn test_random_knobs_within_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let ranges = KnobRanges::default();
        for _ in 0..50 {
            let knobs = TunerKnobs::random(&mut rng, &ranges);
            assert!(knobs.num_sweeps >= ranges.num_sweeps.0);
            assert!(knobs.num_sweeps <= ranges.num_sweeps.1);
            assert!(knobs.hot_acceptance >= ranges.hot_acceptance.0);
            assert!(knobs.hot_acceptance <= ranges.hot_acceptance.1);
            assert!(knobs.cold_acceptance >= ranges.cold_acceptance.0);
            assert!(knobs.cold_acceptance <= ranges.cold_acceptance.1);
            assert!(knobs.magnitude_weight >= ranges.magnitude_weight.0 - 1e-9);
            assert!(knobs.magnitude_weight <= ranges.magnitude_weight.1 + 1e-9);
        }
    }

    #[test]
    fn test_perturb_modifies_single_knob() {
        let knobs = TunerKnobs::default();
        let ranges = KnobRanges::default();

        let perturbed = knobs.perturb(0, 1.1, &ranges);
        assert_eq!(perturbed.num_sweeps, 1100);
        assert_eq!(perturbed.hot_acceptance, knobs.hot_acceptance);

        let perturbed = knobs.perturb(3, 0.5, &ranges);
        assert!((perturbed.magnitude_weight - 50.0).abs() < 1e-9);
        assert_eq!(perturbed.num_sweeps, knobs.num_sweeps);
    }

    #[test]
    fn test_perturb_clamps_to_range() {
        let knobs = TunerKnobs {
            hot_acceptance: 0.8,
            ..Default::default()
        };
        let ranges = KnobRanges::default();

        assert_eq!(knobs.perturb(1, 1.5, &ranges).hot_acceptance, 0.9);
        assert_eq!(knobs.perturb(0, 10.0, &ranges).num_sweeps, 2000);
    }

    #[test]
    fn test_from_config_reads_current_settings() {
        let mut config = OptimizerConfig::default();
        config.anneal.num_sweeps = 321;
        config.anneal.cold_acceptance = 0.005;
        config.weights.magnitude = 12.5;

        let knobs = TunerKnobs::from_config(&config);
        assert_eq!(knobs.num_sweeps, 321);
        assert_eq!(knobs.cold_acceptance, 0.005);
        assert_eq!(knobs.magnitude_weight, 12.5);
        assert_eq!(knobs.apply(&config), config);
        assert_eq!(TunerKnobs::from_config(&OptimizerConfig::default()), TunerKnobs::default());
    }

    #[test]
    fn test_apply_overrides_config() {
        let base = OptimizerConfig::default();
        let knobs = TunerKnobs {
            num_sweeps: 123,
            magnitude_weight: 10.0,
            ..Default::default()
        };
        let config = knobs.apply(&base);
        assert_eq!(config.anneal.num_sweeps, 123);
        assert_eq!(config.weights.magnitude, 10.0);
        assert_eq!(config.anneal.num_reads, base.anneal.num_reads);
    }
}
