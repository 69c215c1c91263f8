//! dexec trust/audit core
//!
//! This crate provides the two security-sensitive building blocks of the
//! dexec distributed privileged-command execution tool:
//!
//! - [`secret`]: one-shot capture of an operator-supplied credential from
//!   standard input, staged entirely in locked memory and wiped on every
//!   exit path.
//! - [`audit`]: role-fixed (CLIENT/SERVER) audit logging of every command
//!   dispatch and completion, rendered without truncation and forwarded to
//!   the process-wide logging facility.
//!
//! Transport, host-set expansion, and command serialization live elsewhere;
//! both components here are leaf pieces consumed by the orchestrator.

pub mod audit;
pub mod config;
pub mod error;
pub mod secret;
