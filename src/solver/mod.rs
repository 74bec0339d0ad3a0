pub mod anneal;
pub mod sampler;
pub mod schedule;

pub use anneal::{run_read, AnnealState, ReadOutcome};
pub use sampler::{AnnealConfig, SimulatedAnnealer, Solution, SolveStats};
pub use schedule::TemperatureSchedule;
