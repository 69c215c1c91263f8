//! One-shot secret capture in locked memory.
//!
//! Captures a single operator-supplied credential line from standard input
//! without letting the bytes touch swappable storage. The capture stages
//! everything inside a [`PinnedRegion`] that is wiped and released on every
//! exit path, including timeouts and partial-setup failures.

mod pinned;
mod reader;

pub use pinned::{PinnedRegion, REGION_LEN};
pub use reader::{capture_secret, Secret};

/// Upper bound on a captured line, terminator included.
///
/// A secret may be at most `MAX_SECRET_LEN - 1` bytes. A secret of exactly
/// that length is accepted whole with no truncation indicator; this is a
/// documented limitation, not silent corruption.
pub const MAX_SECRET_LEN: usize = 1024;
