//! Overflow-safe audit line rendering.
//!
//! Every audit template goes through the same measure-or-grow contract:
//! size a buffer from the template plus every interpolated field, render,
//! and if the rendered line needed more space than estimated, re-render
//! exactly once into a buffer of the reported size. Lines are never
//! truncated and the retry is never surfaced to the caller.

use std::fmt;

/// Join host identifiers with ", " in dispatch order.
///
/// The order is the dispatch order, never sorted.
pub fn join_hosts<S: AsRef<str>>(hosts: &[S]) -> String {
    let len: usize = hosts.iter().map(|h| h.as_ref().len()).sum::<usize>()
        + 2 * hosts.len().saturating_sub(1);
    let mut joined = String::with_capacity(len);
    for (i, host) in hosts.iter().enumerate() {
        if i > 0 {
            joined.push_str(", ");
        }
        joined.push_str(host.as_ref());
    }
    joined
}

/// Render one line into a buffer sized by `estimate`.
///
/// If rendering produced more bytes than the estimate, the line is
/// re-rendered once into a buffer of the exact reported size, so the
/// forwarded line is complete regardless of how far off the estimate was.
pub fn render_line<F>(estimate: usize, write: F) -> String
where
    F: Fn(&mut String) -> fmt::Result,
{
    let mut line = String::with_capacity(estimate);
    // Writing to a String is infallible for the field types used here.
    let _ = write(&mut line);
    if line.len() > estimate {
        let needed = line.len();
        let mut retry = String::with_capacity(needed);
        let _ = write(&mut retry);
        return retry;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    #[test]
    fn test_join_hosts_preserves_dispatch_order() {
        let hosts = ["zulu", "alpha", "mike"];
        assert_eq!(join_hosts(&hosts), "zulu, alpha, mike");
    }

    #[test]
    fn test_join_single_host_has_no_separator() {
        assert_eq!(join_hosts(&["h1"]), "h1");
    }

    #[test]
    fn test_join_empty_host_set() {
        let hosts: [&str; 0] = [];
        assert_eq!(join_hosts(&hosts), "");
    }

    #[test]
    fn test_render_line_with_generous_estimate() {
        let line = render_line(128, |out| write!(out, "status {}", 42));
        assert_eq!(line, "status 42");
    }

    #[test]
    fn test_render_line_grows_past_undersized_estimate() {
        // A zero estimate forces the grow path; the line must still be whole.
        let hosts = join_hosts(&(0..200).map(|i| format!("host{i:03}")).collect::<Vec<_>>());
        let line = render_line(0, |out| write!(out, "on hosts \"{}\"", hosts));
        assert!(line.ends_with("host199\""));
        assert!(line.contains("host000, host001"));
        assert_eq!(line.matches("host").count(), 200);
    }
}
