mod wizard;

pub use wizard::{prompt_choice, prompt_params_for, prompt_path_until_ok};
