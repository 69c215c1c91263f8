//! Error types for the dexec trust/audit core.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
