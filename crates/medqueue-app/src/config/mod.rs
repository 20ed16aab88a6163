//! Configuration file parsing for medqueue
//!
//! Settings live in `.medqueue/config.toml` under the working directory, or in
//! the file passed with `--config`.

pub mod settings;
pub mod types;

pub use settings::{
    config_path, init_config_dir, load_settings, load_settings_from, CONFIG_DIR, CONFIG_FILENAME,
};
pub use types::*;
