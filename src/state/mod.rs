mod persistence;

pub use persistence::{
    load_config, load_ingredients, load_target, save_config, save_response, write_proportions_csv,
};
