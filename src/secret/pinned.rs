//! Locked memory region for staging secrets.
//!
//! The region backs one in-flight capture call. It is mapped anonymously,
//! locked so the kernel never writes its pages to backing storage, and
//! guaranteed to be zeroed before it is unlocked and unmapped, on every
//! path out of the capture routine.

use nix::errno::Errno;
use nix::libc;
use tracing::warn;
use zeroize::Zeroize;

use crate::error::CaptureError;

use super::MAX_SECRET_LEN;

/// Total region size: a read buffer plus a line workspace, each
/// [`MAX_SECRET_LEN`] bytes.
pub const REGION_LEN: usize = 2 * MAX_SECRET_LEN;

/// An anonymous, locked memory mapping of [`REGION_LEN`] bytes.
///
/// Release order is fixed: wipe, then unlock, then unmap. [`release`]
/// surfaces syscall failures; dropping performs the same sequence with
/// failures only logged, so the wipe still happens if the capture path
/// unwinds early.
///
/// [`release`]: PinnedRegion::release
pub struct PinnedRegion {
    ptr: *mut u8,
    wiped: bool,
}

impl PinnedRegion {
    /// Map and lock a fresh region.
    pub fn new() -> Result<Self, CaptureError> {
        // SAFETY: anonymous private mapping with no fd; the kernel picks
        // the address.
        let addr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                REGION_LEN,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(CaptureError::Resource {
                op: "mmap",
                errno: Errno::last(),
            });
        }

        // SAFETY: addr is the start of the REGION_LEN mapping created above.
        if unsafe { libc::mlock(addr, REGION_LEN) } != 0 {
            let errno = Errno::last();
            // No secret bytes ever reached the region; just unmap it.
            // SAFETY: addr/REGION_LEN describe the mapping created above.
            unsafe { libc::munmap(addr, REGION_LEN) };
            return Err(CaptureError::Resource { op: "mlock", errno });
        }

        Ok(Self {
            ptr: addr.cast(),
            wiped: false,
        })
    }

    /// The read-buffer and line-workspace halves.
    pub fn halves_mut(&mut self) -> (&mut [u8], &mut [u8]) {
        self.as_mut_slice().split_at_mut(MAX_SECRET_LEN)
    }

    /// View the full backing region.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is a live mapping of REGION_LEN bytes owned
        // exclusively by self.
        unsafe { std::slice::from_raw_parts(self.ptr, REGION_LEN) }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: ptr is a live mapping of REGION_LEN bytes owned
        // exclusively by self.
        unsafe { std::slice::from_raw_parts_mut(self.ptr, REGION_LEN) }
    }

    /// Zero every byte of the region.
    ///
    /// Uses a wipe the compiler cannot eliminate. Runs at most once; the
    /// release path calls this again harmlessly if it already ran.
    pub fn wipe(&mut self) {
        if self.wiped {
            return;
        }
        self.as_mut_slice().zeroize();
        self.wiped = true;
    }

    /// Wipe, unlock, and unmap the region, reporting syscall failures.
    ///
    /// The helper process surfaces these as its exit status. A failed
    /// unlock skips the unmap; the region is already zeroed at that point
    /// and the process is about to exit.
    pub fn release(self) -> Result<(), CaptureError> {
        let mut this = std::mem::ManuallyDrop::new(self);
        this.wipe();
        // SAFETY: ptr/REGION_LEN describe the mapping locked in new();
        // self is consumed and Drop will not run, so the unlock and unmap
        // happen exactly once.
        unsafe {
            if libc::munlock(this.ptr.cast(), REGION_LEN) != 0 {
                return Err(CaptureError::Resource {
                    op: "munlock",
                    errno: Errno::last(),
                });
            }
            if libc::munmap(this.ptr.cast(), REGION_LEN) != 0 {
                return Err(CaptureError::Resource {
                    op: "munmap",
                    errno: Errno::last(),
                });
            }
        }
        Ok(())
    }
}

impl Drop for PinnedRegion {
    fn drop(&mut self) {
        self.wipe();
        // SAFETY: ptr/REGION_LEN describe the mapping locked in new().
        // Instances consumed by release() never reach Drop.
        unsafe {
            if libc::munlock(self.ptr.cast(), REGION_LEN) != 0 {
                warn!(errno = %Errno::last(), "munlock failed while dropping pinned region");
                return;
            }
            if libc::munmap(self.ptr.cast(), REGION_LEN) != 0 {
                warn!(errno = %Errno::last(), "munmap failed while dropping pinned region");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_has_two_halves() {
        let mut region = PinnedRegion::new().unwrap();
        let (read_buf, line_buf) = region.halves_mut();
        assert_eq!(read_buf.len(), MAX_SECRET_LEN);
        assert_eq!(line_buf.len(), MAX_SECRET_LEN);
        region.release().unwrap();
    }

    #[test]
    fn test_fresh_region_is_zeroed() {
        let region = PinnedRegion::new().unwrap();
        assert!(region.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_wipe_zeroes_written_bytes() {
        let mut region = PinnedRegion::new().unwrap();
        let (read_buf, line_buf) = region.halves_mut();
        read_buf.fill(0xAA);
        line_buf[..8].copy_from_slice(b"hunter2\n");

        region.wipe();
        assert!(region.as_slice().iter().all(|&b| b == 0));
        region.release().unwrap();
    }

    #[test]
    fn test_drop_without_release_is_safe() {
        let mut region = PinnedRegion::new().unwrap();
        region.halves_mut().0.fill(0x55);
        drop(region);
    }
}
