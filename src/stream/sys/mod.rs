//! Per-platform system call surface.
//!
//! Each platform provides one strategy type implementing [`Platform`].
//! The strategy is picked once at build time and exported as [`Native`];
//! nothing above this module branches on the target at run time.

use std::fmt::Debug;
use std::io;
use std::path::Path;

use super::{OpenIntent, SeekMode};

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub(crate) type Native = unix::Unix;
#[cfg(windows)]
pub(crate) type Native = windows::Windows;

/// Raw OS handle type of the current platform.
#[cfg(unix)]
pub type RawHandle = std::os::unix::io::RawFd;
#[cfg(windows)]
pub type RawHandle = windows_sys::Win32::Foundation::HANDLE;

pub(crate) trait Platform {
    type Handle: Copy + PartialEq + Debug;

    /// Value held by a handle that owns nothing.
    const INVALID: Self::Handle;

    fn open(path: &Path, intent: OpenIntent) -> io::Result<Self::Handle>;

    /// One read call. End of file is reported as `Ok(0)`.
    fn read(handle: Self::Handle, buffer: &mut [u8]) -> io::Result<usize>;

    /// Write every byte of `data` or fail.
    fn write_all(handle: Self::Handle, data: &[u8]) -> io::Result<()>;

    fn seek(handle: Self::Handle, offset: i64, mode: SeekMode)
        -> io::Result<u64>;

    /// Total length of the file.
    ///
    /// Derived by moving the cursor to the end and back. This is not atomic
    /// with respect to other writers of the same file; platforms with a
    /// direct size query override it.
    ///
    /// If moving back fails, that error is returned and the cursor is left
    /// at the end of the file.
    fn size(handle: Self::Handle) -> io::Result<u64> {
        let current = Self::seek(handle, 0, SeekMode::Current)?;
        let end = Self::seek(handle, 0, SeekMode::End)?;
        let current = i64::try_from(current)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        Self::seek(handle, current, SeekMode::Start)?;
        Ok(end)
    }

    fn flush(handle: Self::Handle) -> io::Result<()>;

    fn close(handle: Self::Handle) -> io::Result<()>;

    fn set_delete_on_close(handle: Self::Handle, value: bool)
        -> io::Result<()>;
}
