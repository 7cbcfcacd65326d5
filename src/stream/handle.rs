use std::cell::Cell;
use std::marker::PhantomData;
use std::path::Path;

use super::sys::{Native, Platform, RawHandle};
use super::{Access, OpenIntent, SeekMode};
use crate::{RawIoError, Result};

/// Sole owner of an open OS file handle.
///
/// The handle is released exactly once, when the owner is dropped. Moving a
/// `FileHandle` moves the ownership; it cannot be cloned.
///
/// Position queries are public. Reading and writing go through the typed
/// streams in [`super::view`], which only expose what the handle was opened
/// for.
#[derive(Debug)]
pub struct FileHandle {
    raw: RawHandle,
    access: Access,
    // `size()` moves the cursor behind `&self`, so sharing across threads
    // is ruled out.
    _unsync: PhantomData<Cell<()>>,
}

// SAFETY: the raw handle is an OS resource identifier, not a pointer into
// process memory.
#[cfg(windows)]
unsafe impl Send for FileHandle {}

impl FileHandle {
    /// Open or create `path` according to `intent`.
    pub fn open(path: impl AsRef<Path>, intent: OpenIntent) -> Result<Self> {
        let path = path.as_ref();
        let raw = Native::open(path, intent).map_err(|source| {
            log::debug!("failed to open {}: {}", path.display(), source);
            RawIoError::OpenFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        log::debug!("opened {} as {:?} ({:?})", path.display(), raw, intent);

        Ok(Self {
            raw,
            access: intent.access(),
            _unsync: PhantomData,
        })
    }

    /// Adopt a handle opened elsewhere.
    ///
    /// # Safety
    /// `raw` must be a valid, open handle that nothing else will close, and
    /// it must have been opened with at least the capabilities in `access`.
    pub unsafe fn from_raw(raw: RawHandle, access: Access) -> Self {
        Self {
            raw,
            access,
            _unsync: PhantomData,
        }
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn as_raw(&self) -> RawHandle {
        self.raw
    }

    /// Give up ownership of the OS handle without closing it.
    pub fn into_raw(mut self) -> RawHandle {
        std::mem::replace(&mut self.raw, Native::INVALID)
    }

    pub(crate) fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if buffer.is_empty() {
            return Ok(0);
        }
        let bytes_read =
            Native::read(self.raw, buffer).map_err(RawIoError::io("read"))?;
        log::trace!("read {} of {} bytes", bytes_read, buffer.len());
        Ok(bytes_read)
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        Native::write_all(self.raw, data).map_err(RawIoError::io("write"))?;
        log::trace!("wrote {} bytes", data.len());
        Ok(())
    }

    /// Ask the OS to write buffered data back to the device.
    ///
    /// Failure is logged and otherwise ignored.
    pub(crate) fn flush(&mut self) {
        if let Err(err) = Native::flush(self.raw) {
            log::warn!("flush of {:?} failed: {}", self.raw, err);
        }
    }

    pub(crate) fn set_delete_on_close(&mut self, value: bool) -> Result<()> {
        Native::set_delete_on_close(self.raw, value)
            .map_err(RawIoError::io("delete-on-close"))
    }

    /// Move the cursor and return the new absolute position.
    ///
    /// Seeking before the start, or forward from the end, is rejected before
    /// any system call is made.
    pub fn seek(&mut self, offset: i64, mode: SeekMode) -> Result<u64> {
        mode.check(offset)?;
        Native::seek(self.raw, offset, mode).map_err(RawIoError::io("seek"))
    }

    pub fn tell(&self) -> Result<u64> {
        Native::seek(self.raw, 0, SeekMode::Current)
            .map_err(RawIoError::io("tell"))
    }

    /// Current length of the file in bytes.
    pub fn size(&self) -> Result<u64> {
        Native::size(self.raw).map_err(RawIoError::io("size"))
    }

    /// Whether the cursor sits at the end of the file right now.
    ///
    /// Recomputed on every call; another writer can make the answer stale
    /// immediately.
    pub fn eof(&self) -> Result<bool> {
        Ok(self.tell()? == self.size()?)
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        if self.raw == Native::INVALID {
            return;
        }
        if let Err(err) = Native::close(self.raw) {
            log::warn!("closing {:?} failed: {}", self.raw, err);
        }
        log::trace!("closed {:?}", self.raw);
        self.raw = Native::INVALID;
    }
}
