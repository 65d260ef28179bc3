//! Configuration management for pulumi-actions

mod settings;

pub use settings::{CONFIG_FILE_NAMES, FailurePolicy, Settings};
