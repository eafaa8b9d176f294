//! Configuration module for pivotsql.
//!
//! Handles the config file, environment variables, and named pivot jobs.

mod settings;

pub use settings::{
    expand_env_vars, DatabaseSettings, FilterSettings, PivotJob, Settings, SettingsError,
};
