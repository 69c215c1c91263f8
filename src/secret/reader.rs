//! Secret capture from standard input.
//!
//! The capture waits a bounded time for input, reads through a line
//! terminator with every byte staged in the pinned region, and emits the
//! trimmed secret exactly once. Reads go straight from the fd into pinned
//! memory; no buffered I/O layer sits in between, so no unpinned shadow
//! copy of the secret ever exists.

use std::os::fd::{AsFd, AsRawFd, BorrowedFd};
use std::time::Duration;

use nix::errno::Errno;
use nix::libc;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::CaptureError;

use super::pinned::PinnedRegion;
use super::MAX_SECRET_LEN;

/// An owned secret captured from the operator.
///
/// The backing storage zeroes itself on drop. Exactly one of these exists
/// per successful capture; the pinned staging areas it was read through are
/// wiped before capture returns.
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
    fn from_bytes(bytes: &[u8]) -> Self {
        Self(Zeroizing::new(bytes.to_vec()))
    }

    /// The secret bytes, without the line terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// An empty line is a valid zero-length secret.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the bytes.
        write!(f, "Secret({} bytes)", self.0.len())
    }
}

/// Capture one secret line from standard input.
///
/// Waits up to `timeout` for input readiness, then reads at most
/// [`MAX_SECRET_LEN`] bytes through a line terminator. The terminator (and
/// a preceding carriage return, if any) is trimmed from the result.
///
/// The pinned staging region is wiped, unlocked, and unmapped before this
/// function returns, on every path.
///
/// # Errors
///
/// - [`CaptureError::Timeout`] if no input arrives in time.
/// - [`CaptureError::MalformedInput`] if the input ends, or the byte budget
///   is exhausted, before a terminator is seen.
/// - [`CaptureError::Resource`] if a syscall fails; the error names the
///   failing operation.
pub fn capture_secret(timeout: Duration) -> Result<Secret, CaptureError> {
    let mut region = PinnedRegion::new()?;
    let stdin = std::io::stdin();
    let outcome = capture_into(&mut region, stdin.as_fd(), timeout);
    region.release()?;
    outcome
}

/// Capture a line from `fd` into `region`, without releasing the region.
///
/// Split out from [`capture_secret`] so the region stays inspectable by
/// the caller after the capture completes.
pub(crate) fn capture_into(
    region: &mut PinnedRegion,
    fd: BorrowedFd<'_>,
    timeout: Duration,
) -> Result<Secret, CaptureError> {
    wait_readable(fd, timeout)?;

    let (read_buf, line_buf) = region.halves_mut();
    let mut filled = 0;
    let terminator = loop {
        if filled == MAX_SECRET_LEN {
            return Err(CaptureError::MalformedInput);
        }
        let n = read_fd(fd, &mut read_buf[filled..MAX_SECRET_LEN])?;
        if n == 0 {
            // EOF before a terminator
            return Err(CaptureError::MalformedInput);
        }
        let chunk_start = filled;
        filled += n;
        if let Some(pos) = read_buf[chunk_start..filled].iter().position(|&b| b == b'\n') {
            break chunk_start + pos;
        }
    };

    let mut end = terminator;
    if end > 0 && read_buf[end - 1] == b'\r' {
        end -= 1;
    }

    // Stage the trimmed line in the workspace half, then hand out the one
    // owned copy.
    line_buf[..end].copy_from_slice(&read_buf[..end]);
    debug!(len = end, "captured secret line");
    Ok(Secret::from_bytes(&line_buf[..end]))
}

/// Wait up to `timeout` for `fd` to become readable.
fn wait_readable(fd: BorrowedFd<'_>, timeout: Duration) -> Result<(), CaptureError> {
    let poll_timeout = PollTimeout::try_from(poll_millis(timeout)).unwrap_or(PollTimeout::MAX);
    let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
    let ready = poll(&mut fds, poll_timeout).map_err(|errno| {
        CaptureError::Resource { op: "poll", errno }
    })?;
    if ready == 0 {
        return Err(CaptureError::Timeout);
    }
    Ok(())
}

/// Requested wait in whole milliseconds, clamped to what poll accepts.
///
/// The full i32 range is preserved so long waits expire when requested;
/// only durations past ~24.8 days clamp.
fn poll_millis(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX)
}

/// Read from `fd` into `buf`, retrying on EINTR.
fn read_fd(fd: BorrowedFd<'_>, buf: &mut [u8]) -> Result<usize, CaptureError> {
    loop {
        // SAFETY: buf is a live mutable slice; the kernel writes at most
        // buf.len() bytes into it.
        let n = unsafe { libc::read(fd.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len()) };
        if n >= 0 {
            return Ok(n as usize);
        }
        let errno = Errno::last();
        if errno == Errno::EINTR {
            continue;
        }
        return Err(CaptureError::Resource { op: "read", errno });
    }
}
