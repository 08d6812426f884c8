mod defaults;
mod loader;
mod types;
mod validation;

pub use loader::{find_config_file, load_config, CONFIG_FILES};
pub use types::*;
pub use validation::validate_config;
