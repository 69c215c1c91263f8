//! Error types for secret capture and configuration loading.

use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// Errors that can occur while capturing a secret.
///
/// Role violations in the audit logger are deliberately not represented
/// here: calling a client-only operation on a server logger is a caller
/// bug and asserts instead of returning an error.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// A system resource operation (mmap, mlock, poll, read, munlock,
    /// munmap) failed. Fatal; the diagnostic names the failing operation.
    #[error("{op} failed: {errno}")]
    Resource {
        /// Name of the failing syscall.
        op: &'static str,
        /// The reported errno.
        errno: Errno,
    },

    /// No input arrived within the allowed time window.
    #[error("timed out waiting for input")]
    Timeout,

    /// Input ended or the byte budget was exhausted before a line
    /// terminator was found.
    #[error("input ended without a line terminator")]
    MalformedInput,
}

impl CaptureError {
    /// Process exit code for the askpass helper.
    ///
    /// Each taxonomy class gets a stable code so callers can distinguish
    /// timeout from malformed input from resource failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CaptureError::Timeout => 1,
            CaptureError::MalformedInput => 2,
            CaptureError::Resource { .. } => 3,
        }
    }
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_error_exit_codes_are_distinct() {
        let codes = [
            CaptureError::Timeout.exit_code(),
            CaptureError::MalformedInput.exit_code(),
            CaptureError::Resource {
                op: "mmap",
                errno: Errno::ENOMEM,
            }
            .exit_code(),
        ];
        assert_eq!(codes, [1, 2, 3]);
    }

    #[test]
    fn test_resource_error_names_operation() {
        let err = CaptureError::Resource {
            op: "mlock",
            errno: Errno::EPERM,
        };
        let message = err.to_string();
        assert!(message.starts_with("mlock failed"));
    }
}
