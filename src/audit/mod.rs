//! Execution audit logging.
//!
//! Records every command dispatch and completion on both ends of a
//! distributed execution exchange. The logger is bound to one [`Role`]
//! (CLIENT or SERVER) for its lifetime and renders fixed message templates
//! without ever truncating operator- or host-supplied text; finished lines
//! are forwarded to a [`LogSink`].
//!
//! Most callers construct an [`AuditLogger`] directly. Environments that
//! need one process-wide instance use [`init`]/[`global`], which bind the
//! role once and keep it valid until process exit.

mod logger;
mod render;
mod sink;

use std::sync::OnceLock;

pub use logger::{AuditErrorKind, AuditLogger, Role};
pub use render::{join_hosts, render_line};
pub use sink::{LogSink, NullSink, RecordingSink, Severity, TracingSink};

static GLOBAL: OnceLock<AuditLogger> = OnceLock::new();

/// Initialize the process-wide audit logger.
///
/// The first call binds the role; later calls return the existing logger
/// and their `role` argument is ignored. The instance stays valid until
/// process exit.
pub fn init(role: Role) -> &'static AuditLogger {
    GLOBAL.get_or_init(|| AuditLogger::new(role))
}

/// The process-wide audit logger, if [`init`] has run.
pub fn global() -> Option<&'static AuditLogger> {
    GLOBAL.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_role_is_fixed_at_first_init() {
        assert!(global().is_none());
        let logger = init(Role::Client);
        assert_eq!(logger.role(), Role::Client);

        // A second init does not rebind the role.
        let again = init(Role::Server);
        assert_eq!(again.role(), Role::Client);
        assert_eq!(global().unwrap().role(), Role::Client);
    }
}
