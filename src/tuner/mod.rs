pub mod evaluation;
pub mod knobs;
pub mod output;
pub mod search;

pub use evaluation::{
    evaluate_knobs, evaluate_seed, hill_climb, EvaluationResult, HillClimbConfig, SeedResult,
};
pub use knobs::{KnobRanges, TunerKnobs};
pub use output::{print_topk, write_best_json, write_csv};
pub use search::{run_tuner, TunerConfig, TunerResults};
