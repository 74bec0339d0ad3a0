use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::optimizer::constants::{
    COLD_ACCEPTANCE, DEFAULT_NUM_READS, DEFAULT_NUM_SWEEPS, HOT_ACCEPTANCE,
};
use crate::optimizer::qubo::Qubo;
use crate::solver::anneal::{run_read, ReadOutcome};
use crate::solver::schedule::TemperatureSchedule;

/// Annealing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealConfig {
    /// Independent reads; at least one is always run.
    pub num_reads: usize,
    pub num_sweeps: usize,
    /// Fixed seed for reproducible runs. Read `r` uses `seed + r`.
    pub seed: Option<u64>,
    /// Explicit `(initial, final)` temperatures. Derived from the objective when unset.
    pub temperature_range: Option<(f64, f64)>,
    pub hot_acceptance: f64,
    pub cold_acceptance: f64,
    /// Wall-clock budget for the whole solve.
    pub time_limit_ms: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            num_reads: DEFAULT_NUM_READS,
            num_sweeps: DEFAULT_NUM_SWEEPS,
            seed: None,
            temperature_range: None,
            hot_acceptance: HOT_ACCEPTANCE,
            cold_acceptance: COLD_ACCEPTANCE,
            time_limit_ms: None,
        }
    }
}

impl AnnealConfig {
    pub fn schedule(&self, qubo: &Qubo) -> TemperatureSchedule {
        match self.temperature_range {
            Some((initial, final_temp)) => {
                TemperatureSchedule::geometric(initial, final_temp, self.num_sweeps)
            }
            None => TemperatureSchedule::for_qubo(
                qubo,
                self.num_sweeps,
                self.hot_acceptance,
                self.cold_acceptance,
            ),
        }
    }
}

/// Lowest-energy assignment across all reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub assignment: Vec<bool>,
    pub energy: f64,
    pub read_index: usize,
}

/// Bookkeeping from a solve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveStats {
    pub reads: usize,
    pub total_sweeps: usize,
    pub timed_out: bool,
    pub seed: u64,
    pub elapsed: Duration,
}

/// Seedable simulated-annealing sampler.
pub struct SimulatedAnnealer {
    config: AnnealConfig,
}

impl SimulatedAnnealer {
    pub fn new(config: AnnealConfig) -> Self {
        Self { config }
    }

    /// Minimize `qubo`. Never fails; an empty objective gives an empty
    /// assignment with energy 0.
    pub fn solve(&self, qubo: &Qubo) -> (Solution, SolveStats) {
        let start = Instant::now();
        let seed = self.config.seed.unwrap_or_else(rand::random);

        if qubo.is_empty() {
            let solution = Solution {
                assignment: Vec::new(),
                energy: 0.0,
                read_index: 0,
            };
            let stats = SolveStats {
                seed,
                ..Default::default()
            };
            return (solution, stats);
        }

        let schedule = self.config.schedule(qubo);
        let deadline = self
            .config
            .time_limit_ms
            .map(|ms| start + Duration::from_millis(ms));
        let num_reads = self.config.num_reads.max(1);

        debug!(
            "annealing {} variables: {} reads x {} sweeps, T {:.3e} -> {:.3e}, seed {}",
            qubo.num_variables(),
            num_reads,
            schedule.sweeps,
            schedule.initial,
            schedule.final_temp,
            seed
        );

        let outcomes: Vec<ReadOutcome> = (0..num_reads)
            .into_par_iter()
            .map(|read| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(read as u64));
                run_read(qubo, &schedule, read, &mut rng, deadline)
            })
            .collect();

        let stats = SolveStats {
            reads: outcomes.len(),
            total_sweeps: outcomes.iter().map(|o| o.sweeps_run).sum(),
            timed_out: outcomes.iter().any(|o| o.timed_out),
            seed,
            elapsed: start.elapsed(),
        };

        let best = best_outcome(outcomes);
        info!(
            "best energy {:.6} from read {} ({} sweeps in {:?}{})",
            best.energy,
            best.read_index,
            stats.total_sweeps,
            stats.elapsed,
            if stats.timed_out { ", timed out" } else { "" }
        );

        let solution = Solution {
            assignment: best.assignment,
            energy: best.energy,
            read_index: best.read_index,
        };
        (solution, stats)
    }
}

/// Minimum energy, ties going to the lower read index.
fn best_outcome(outcomes: Vec<ReadOutcome>) -> ReadOutcome {
    outcomes
        .into_iter()
        .min_by(|a, b| {
            a.energy
                .total_cmp(&b.energy)
                .then(a.read_index.cmp(&b.read_index))
        })
        .unwrap_or(ReadOutcome {
            read_index: 0,
            assignment: Vec::new(),
            energy: 0.0,
            sweeps_run: 0,
            timed_out: false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Qubo {
        // Alternating on/off is optimal: each bit wants on, neighbours repel.
        let mut q = Qubo::new(n);
        for v in 0..n {
            q.add_linear(v, -1.0);
        }
        for v in 1..n {
            q.add_interaction(v - 1, v, 3.0);
        }
        q
    }

    fn config(seed: u64) -> AnnealConfig {
        AnnealConfig {
            num_reads: 8,
            num_sweeps: 200,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_objective() {
        let (solution, stats) = SimulatedAnnealer::new(config(1)).solve(&Qubo::empty());
        assert!(solution.assignment.is_empty());
        assert_eq!(solution.energy, 0.0);
        assert_eq!(stats.reads, 0);
    }

    #[test]
    fn test_finds_alternating_ground_state() {
        let q = chain(7);
        let (solution, stats) = SimulatedAnnealer::new(config(11)).solve(&q);

        assert!((solution.energy + 4.0).abs() < 1e-12);
        assert_eq!(
            solution.assignment,
            vec![true, false, true, false, true, false, true]
        );
        assert_eq!(stats.reads, 8);
        assert_eq!(stats.total_sweeps, 8 * 200);
    }

    #[test]
    fn test_seeded_solves_are_identical() {
        let q = chain(12);
        let a = SimulatedAnnealer::new(config(99)).solve(&q).0;
        let b = SimulatedAnnealer::new(config(99)).solve(&q).0;
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_reads_runs_one() {
        let q = chain(3);
        let cfg = AnnealConfig {
            num_reads: 0,
            ..config(5)
        };
        let (solution, stats) = SimulatedAnnealer::new(cfg).solve(&q);
        assert_eq!(stats.reads, 1);
        assert_eq!(solution.assignment.len(), 3);
    }

    #[test]
    fn test_zero_time_limit_still_returns_assignment() {
        let q = chain(5);
        let cfg = AnnealConfig {
            time_limit_ms: Some(0),
            ..config(5)
        };
        let (solution, stats) = SimulatedAnnealer::new(cfg).solve(&q);
        assert!(stats.timed_out);
        assert_eq!(solution.assignment.len(), 5);
        assert!((solution.energy - q.energy(&solution.assignment)).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_temperature_range() {
        let cfg = AnnealConfig {
            temperature_range: Some((5.0, 0.05)),
            ..config(1)
        };
        let schedule = cfg.schedule(&chain(3));
        assert_eq!(schedule.initial, 5.0);
        assert_eq!(schedule.final_temp, 0.05);
        assert_eq!(schedule.sweeps, 200);
    }

    #[test]
    fn test_best_outcome_breaks_ties_by_read() {
        let outcome = |read_index, energy| ReadOutcome {
            read_index,
            assignment: vec![read_index == 0],
            energy,
            sweeps_run: 1,
            timed_out: false,
        };
        let best = best_outcome(vec![outcome(2, -1.0), outcome(0, -1.0), outcome(1, 0.0)]);
        assert_eq!(best.read_index, 0);
    }
}
