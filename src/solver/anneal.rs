use std::time::Instant;

use rand::Rng;

use crate::optimizer::qubo::Qubo;
use crate::solver::schedule::TemperatureSchedule;

/// State of one annealing read.
///
/// `fields[v]` is the energy change of turning `v` on given the rest of the
/// assignment, so a proposal costs O(1) and an accepted flip O(n).
pub struct AnnealState<'q> {
    qubo: &'q Qubo,
    bits: Vec<bool>,
    fields: Vec<f64>,
    energy: f64,
    best_bits: Vec<bool>,
    best_energy: f64,
}

/// Outcome of one read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome {
    pub read_index: usize,
    pub assignment: Vec<bool>,
    pub energy: f64,
    pub sweeps_run: usize,
    pub timed_out: bool,
}

impl<'q> AnnealState<'q> {
    pub fn new(qubo: &'q Qubo, bits: Vec<bool>) -> Self {
        let fields = qubo.local_fields(&bits);
        let energy = qubo.energy(&bits);
        Self {
            qubo,
            best_bits: bits.clone(),
            best_energy: energy,
            bits,
            fields,
            energy,
        }
    }

    /// Uniformly random starting assignment.
    pub fn random(qubo: &'q Qubo, rng: &mut impl Rng) -> Self {
        let bits = (0..qubo.num_variables()).map(|_| rng.gen_bool(0.5)).collect();
        Self::new(qubo, bits)
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Energy change of flipping `v`.
    #[inline]
    pub fn flip_delta(&self, v: usize) -> f64 {
        if self.bits[v] {
            -self.fields[v]
        } else {
            self.fields[v]
        }
    }

    pub fn flip(&mut self, v: usize) {
        let delta = self.flip_delta(v);
        let sign = if self.bits[v] { -1.0 } else { 1.0 };
        self.bits[v] = !self.bits[v];
        self.energy += delta;

        for (u, (field, coupling)) in self.fields.iter_mut().zip(self.qubo.row(v)).enumerate() {
            if u != v {
                *field += sign * coupling;
            }
        }

        if self.energy < self.best_energy {
            self.best_energy = self.energy;
            self.best_bits.clone_from(&self.bits);
        }
    }

    /// One Metropolis pass over every variable in index order.
    ///
    /// Returns the number of accepted flips.
    pub fn sweep(&mut self, temperature: f64, rng: &mut impl Rng) -> usize {
        let mut accepted = 0;
        for v in 0..self.bits.len() {
            let delta = self.flip_delta(v);
            if delta <= 0.0 || rng.r#gen::<f64>() < (-delta / temperature).exp() {
                self.flip(v);
                accepted += 1;
            }
        }
        accepted
    }

    /// Lowest-energy assignment seen, with its energy recomputed from scratch.
    pub fn into_best(self) -> (Vec<bool>, f64) {
        let energy = self.qubo.energy(&self.best_bits);
        (self.best_bits, energy)
    }
}

/// Run a single read: random start, then the full cooling schedule.
///
/// Stops early at `deadline` and keeps the best state found so far.
pub fn run_read(
    qubo: &Qubo,
    schedule: &TemperatureSchedule,
    read_index: usize,
    rng: &mut impl Rng,
    deadline: Option<Instant>,
) -> ReadOutcome {
    let mut state = AnnealState::random(qubo, rng);
    let mut sweeps_run = 0;
    let mut timed_out = false;

    for sweep in 0..schedule.sweeps {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            timed_out = true;
            break;
        }
        state.sweep(schedule.temperature(sweep), rng);
        sweeps_run += 1;
    }

    let (assignment, energy) = state.into_best();
    ReadOutcome {
        read_index,
        assignment,
        energy,
        sweeps_run,
        timed_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn frustrated() -> Qubo {
        // Best: x0 = 1, x1 = 0, x2 = 1 with energy -2
        let mut q = Qubo::new(3);
        q.add_linear(0, -1.0);
        q.add_linear(1, -1.0);
        q.add_linear(2, -1.0);
        q.add_interaction(0, 1, 2.0);
        q.add_interaction(1, 2, 2.0);
        q
    }

    #[test]
    fn test_incremental_energy_matches_full() {
        let q = frustrated();
        let mut state = AnnealState::new(&q, vec![false, true, false]);
        for v in [0, 2, 1, 0, 1] {
            state.flip(v);
            assert!((state.energy() - q.energy(state.bits())).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_temperature_sweep_only_descends() {
        let q = frustrated();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = AnnealState::new(&q, vec![true, true, true]);
        let before = state.energy();
        state.sweep(f64::MIN_POSITIVE, &mut rng);
        assert!(state.energy() <= before);
    }

    #[test]
    fn test_read_finds_ground_state() {
        let q = frustrated();
        let schedule = TemperatureSchedule::for_qubo(&q, 50, 0.5, 0.01);
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = run_read(&q, &schedule, 0, &mut rng, None);

        assert_eq!(outcome.assignment, vec![true, false, true]);
        assert!((outcome.energy + 2.0).abs() < 1e-12);
        assert_eq!(outcome.sweeps_run, 50);
        assert!(!outcome.timed_out);
    }

    #[test]
    fn test_expired_deadline_returns_start_state() {
        let q = frustrated();
        let schedule = TemperatureSchedule::for_qubo(&q, 50, 0.5, 0.01);
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = run_read(&q, &schedule, 0, &mut rng, Some(Instant::now()));

        assert!(outcome.timed_out);
        assert_eq!(outcome.sweeps_run, 0);
        assert_eq!(outcome.assignment.len(), 3);
        assert!((outcome.energy - q.energy(&outcome.assignment)).abs() < 1e-12);
    }
}
