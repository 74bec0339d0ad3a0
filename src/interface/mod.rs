pub mod prompts;
pub mod render;

pub use prompts::{prompt_amount, prompt_penalty_mode, prompt_target_nutrition, prompt_yes_no};
pub use render::{
    display_ingredient_list, display_objective_summary, display_optimization, display_profile,
};
