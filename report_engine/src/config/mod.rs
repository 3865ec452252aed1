//! Configuration module for the report engine
//!
//! Fixed schema constants live in `constants`; runtime settings come from
//! the line-oriented key:value configuration file.

pub mod constants;
pub mod settings;

pub use settings::{read_config_file, ConfigError, Settings};
