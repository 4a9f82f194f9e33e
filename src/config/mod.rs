//! Configuration module for chordcheckr

mod settings;

pub use settings::{ConfigBuilder, JudgmentConfig, LOCAL_CONFIG_FILE};
