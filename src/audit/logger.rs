//! Role-fixed audit logger for command dispatch and completion.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use super::render::{join_hosts, render_line};
use super::sink::{LogSink, TracingSink};

/// Render one templated line with the measure-or-grow contract.
///
/// The initial size estimate is the template length plus the lengths the
/// caller supplies for the interpolated fields; [`render_line`] re-renders
/// once at the exact size if that was too small. Template field order is
/// part of the external interface; log parsers downstream depend on it.
macro_rules! render_template {
    ($fields:expr, $template:literal, $($arg:expr),+ $(,)?) => {
        render_line($template.len() + $fields, |out| {
            write!(out, $template, $($arg),+)
        })
    };
}

// Room for a signed 32-bit status in the size estimate.
const STATUS_PAD: usize = 12;

/// Which end of the execution exchange this process is.
///
/// Bound once at logger construction and immutable for the logger's
/// lifetime; each logging operation is only valid for its declared role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "CLIENT",
            Role::Server => "SERVER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed error classes for [`AuditLogger::log_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditErrorKind {
    TestError,
    CommandFailed,
}

impl AuditErrorKind {
    /// Stable numeric code, part of the logged line.
    pub fn code(self) -> u32 {
        match self {
            AuditErrorKind::TestError => 0,
            AuditErrorKind::CommandFailed => 1,
        }
    }

    /// Fixed human-readable text for the class.
    pub fn message(self) -> &'static str {
        match self {
            AuditErrorKind::TestError => "TEST ERROR",
            AuditErrorKind::CommandFailed => "COMMAND FAILED",
        }
    }
}

/// Renders audit lines for one fixed [`Role`] and forwards them to a sink.
///
/// Dispatch and completion operations are partitioned by role; invoking an
/// operation against the other role is a contract violation and panics.
/// That indicates a wiring bug in the caller, not bad input, so it is not
/// recoverable.
pub struct AuditLogger {
    role: Role,
    sink: Arc<dyn LogSink>,
}

impl AuditLogger {
    /// Create a logger forwarding to the process-wide tracing subscriber.
    pub fn new(role: Role) -> Self {
        Self::with_sink(role, Arc::new(TracingSink))
    }

    /// Create a logger with an explicit sink.
    pub fn with_sink(role: Role, sink: Arc<dyn LogSink>) -> Self {
        Self { role, sink }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Log the intent to run `command` on `hosts`.
    ///
    /// Hosts render comma-space-joined in dispatch order.
    ///
    /// # Panics
    ///
    /// If this logger's role is not [`Role::Client`].
    pub fn log_dispatch_client<S: AsRef<str>>(
        &self,
        command: &str,
        user: &str,
        hosts: &[S],
        cwd: &str,
    ) {
        assert_eq!(
            self.role,
            Role::Client,
            "client dispatch logged through a {} logger",
            self.role
        );
        let hosts = join_hosts(hosts);
        let line = render_template!(
            command.len() + user.len() + cwd.len() + hosts.len(),
            r#"running command "{}" as user "{}" in dir "{}" on hosts "{}""#,
            command,
            user,
            cwd,
            hosts,
        );
        self.log_message(&line);
    }

    /// Log that `command` arrived from `source` for execution here.
    ///
    /// # Panics
    ///
    /// If this logger's role is not [`Role::Server`].
    pub fn log_dispatch_server(&self, command: &str, user: &str, source: &str, cwd: &str) {
        assert_eq!(
            self.role,
            Role::Server,
            "server dispatch logged through a {} logger",
            self.role
        );
        let line = render_template!(
            command.len() + user.len() + cwd.len() + source.len(),
            r#"running command "{}" as user "{}" in dir "{}" from host "{}""#,
            command,
            user,
            cwd,
            source,
        );
        self.log_message(&line);
    }

    /// Log completion of `command` across `hosts` with its exit status.
    ///
    /// # Panics
    ///
    /// If this logger's role is not [`Role::Client`].
    pub fn log_completion_client<S: AsRef<str>>(
        &self,
        command: &str,
        user: &str,
        hosts: &[S],
        cwd: &str,
        status: i32,
    ) {
        assert_eq!(
            self.role,
            Role::Client,
            "client completion logged through a {} logger",
            self.role
        );
        let hosts = join_hosts(hosts);
        let line = render_template!(
            command.len() + user.len() + cwd.len() + hosts.len() + STATUS_PAD,
            r#"command "{}" run as user "{}" in dir "{}" exited with code "{}" on hosts "{}""#,
            command,
            user,
            cwd,
            status,
            hosts,
        );
        self.log_message(&line);
    }

    /// Log completion of a command that `source` dispatched here.
    ///
    /// # Panics
    ///
    /// If this logger's role is not [`Role::Server`].
    pub fn log_completion_server(
        &self,
        command: &str,
        user: &str,
        source: &str,
        cwd: &str,
        status: i32,
    ) {
        assert_eq!(
            self.role,
            Role::Server,
            "server completion logged through a {} logger",
            self.role
        );
        let line = render_template!(
            command.len() + user.len() + cwd.len() + source.len() + STATUS_PAD,
            r#"command "{}" run as user "{}" in dir "{}" from host "{}" exited with code "{}""#,
            command,
            user,
            cwd,
            source,
            status,
        );
        self.log_message(&line);
    }

    /// Log an error-class event at error severity.
    ///
    /// Valid for either role.
    pub fn log_error(&self, kind: AuditErrorKind, message: &str) {
        let line = render_template!(
            self.role.as_str().len() + kind.message().len() + message.len() + STATUS_PAD,
            "{} ERROR {}: {}: {}",
            self.role,
            kind.code(),
            kind.message(),
            message,
        );
        self.sink.error(&line);
    }

    /// Prefix the role and forward at info severity.
    fn log_message(&self, line: &str) {
        let estimate = self.role.as_str().len() + 2 + line.len();
        let tagged = render_line(estimate, |out| write!(out, "{}: {}", self.role, line));
        self.sink.info(&tagged);
    }
}
