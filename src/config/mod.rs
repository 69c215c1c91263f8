//! Configuration module for the dexec trust/audit core.
//!
//! Handles loading and validating settings from TOML files.

mod settings;

pub use settings::*;
