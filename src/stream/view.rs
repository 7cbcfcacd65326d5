//! Capability-restricted streams over a [`FileHandle`].
//!
//! [`InStream`], [`OutStream`] and [`Stream`] own their handle and expose
//! only what they were opened for. [`Reader`] and [`Writer`] borrow a handle
//! and narrow it further: a [`Stream`] can lend itself as either one without
//! reopening anything.
//!
//! An owner dereferences to its handle for position queries only. The handle
//! itself cannot be swapped out; `TryFrom<FileHandle>` is the one way in:
//!
//! ```compile_fail
//! use fs_rawio::stream::{Disposition, InStream, OutStream};
//!
//! let mut input = InStream::open("in.bin")?;
//! let out = OutStream::open("out.bin", Disposition::OpenOrCreate)?;
//! *input = out.into_handle();
//! # Ok::<(), fs_rawio::RawIoError>(())
//! ```

use std::io;
use std::ops::Deref;
use std::path::Path;

use super::{Access, Disposition, FileHandle, OpenIntent, SeekMode};
use crate::raw_io::{Sink, Source};
use crate::{RawIoError, Result};

fn check_access(handle: &FileHandle, required: Access) -> Result<()> {
    let access = handle.access();
    let allowed = match required {
        Access::Read => access.can_read(),
        Access::Write => access.can_write(),
        Access::ReadWrite => access == Access::ReadWrite,
    };
    if !allowed {
        return Err(RawIoError::InvalidArgument(
            "Handle was not opened with the required access",
        ));
    }
    Ok(())
}

/// Read-only file stream.
#[derive(Debug)]
pub struct InStream {
    handle: FileHandle,
}

impl InStream {
    /// Open an existing file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let handle = FileHandle::open(path, OpenIntent::read())?;
        Ok(Self { handle })
    }

    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.handle.read(buffer)
    }

    pub fn reader(&mut self) -> Reader<'_> {
        Reader {
            handle: &mut self.handle,
        }
    }

    pub fn into_handle(self) -> FileHandle {
        self.handle
    }
}

/// Write-only file stream.
#[derive(Debug)]
pub struct OutStream {
    handle: FileHandle,
}

impl OutStream {
    pub fn open(
        path: impl AsRef<Path>,
        disposition: Disposition,
    ) -> Result<Self> {
        let intent = OpenIntent::new(Access::Write, disposition)?;
        let handle = FileHandle::open(path, intent)?;
        Ok(Self { handle })
    }

    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.handle.write(data)
    }

    /// Best-effort durable write-back; failures are only logged.
    pub fn flush(&mut self) {
        self.handle.flush()
    }

    pub fn set_delete_on_close(&mut self, value: bool) -> Result<()> {
        self.handle.set_delete_on_close(value)
    }

    pub fn set_retain_on_close(&mut self, value: bool) -> Result<()> {
        self.handle.set_delete_on_close(!value)
    }

    pub fn writer(&mut self) -> Writer<'_> {
        Writer {
            handle: &mut self.handle,
        }
    }

    pub fn into_handle(self) -> FileHandle {
        self.handle
    }
}

/// Read-write file stream.
#[derive(Debug)]
pub struct Stream {
    handle: FileHandle,
}

impl Stream {
    pub fn open(
        path: impl AsRef<Path>,
        disposition: Disposition,
    ) -> Result<Self> {
        let intent = OpenIntent::new(Access::ReadWrite, disposition)?;
        let handle = FileHandle::open(path, intent)?;
        Ok(Self { handle })
    }

    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.handle.read(buffer)
    }

    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.handle.write(data)
    }

    /// Best-effort durable write-back; failures are only logged.
    pub fn flush(&mut self) {
        self.handle.flush()
    }

    pub fn set_delete_on_close(&mut self, value: bool) -> Result<()> {
        self.handle.set_delete_on_close(value)
    }

    pub fn set_retain_on_close(&mut self, value: bool) -> Result<()> {
        self.handle.set_delete_on_close(!value)
    }

    /// Lend this stream as a read-only view.
    pub fn reader(&mut self) -> Reader<'_> {
        Reader {
            handle: &mut self.handle,
        }
    }

    /// Lend this stream as a write-only view.
    pub fn writer(&mut self) -> Writer<'_> {
        Writer {
            handle: &mut self.handle,
        }
    }

    pub fn into_handle(self) -> FileHandle {
        self.handle
    }
}

macro_rules! owned_stream {
    ($stream:ident, $access:expr) => {
        impl $stream {
            // Shadows `io::Seek::seek` when that trait is in scope.
            pub fn seek(&mut self, offset: i64, mode: SeekMode) -> Result<u64> {
                self.handle.seek(offset, mode)
            }
        }

        impl TryFrom<FileHandle> for $stream {
            type Error = RawIoError;

            fn try_from(handle: FileHandle) -> Result<Self> {
                check_access(&handle, $access)?;
                Ok(Self { handle })
            }
        }

        impl Deref for $stream {
            type Target = FileHandle;

            fn deref(&self) -> &FileHandle {
                &self.handle
            }
        }
    };
}

owned_stream!(InStream, Access::Read);
owned_stream!(OutStream, Access::Write);
owned_stream!(Stream, Access::ReadWrite);

/// Borrowed read-only view of a handle.
#[derive(Debug)]
pub struct Reader<'a> {
    handle: &'a mut FileHandle,
}

impl Reader<'_> {
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.handle.read(buffer)
    }

    pub fn seek(&mut self, offset: i64, mode: SeekMode) -> Result<u64> {
        self.handle.seek(offset, mode)
    }

    pub fn tell(&self) -> Result<u64> {
        self.handle.tell()
    }

    pub fn size(&self) -> Result<u64> {
        self.handle.size()
    }

    pub fn eof(&self) -> Result<bool> {
        self.handle.eof()
    }
}

/// Borrowed write-only view of a handle.
#[derive(Debug)]
pub struct Writer<'a> {
    handle: &'a mut FileHandle,
}

impl Writer<'_> {
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.handle.write(data)
    }

    pub fn flush(&mut self) {
        self.handle.flush()
    }

    pub fn set_delete_on_close(&mut self, value: bool) -> Result<()> {
        self.handle.set_delete_on_close(value)
    }

    pub fn set_retain_on_close(&mut self, value: bool) -> Result<()> {
        self.handle.set_delete_on_close(!value)
    }

    pub fn seek(&mut self, offset: i64, mode: SeekMode) -> Result<u64> {
        self.handle.seek(offset, mode)
    }

    pub fn tell(&self) -> Result<u64> {
        self.handle.tell()
    }

    pub fn size(&self) -> Result<u64> {
        self.handle.size()
    }

    pub fn eof(&self) -> Result<bool> {
        self.handle.eof()
    }
}

impl<'a> From<&'a mut Stream> for Reader<'a> {
    fn from(stream: &'a mut Stream) -> Self {
        stream.reader()
    }
}

impl<'a> From<&'a mut Stream> for Writer<'a> {
    fn from(stream: &'a mut Stream) -> Self {
        stream.writer()
    }
}

macro_rules! source_impl {
    ($($ty:ty),*) => {$(
        impl Source for $ty {
            fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
                self.handle.read(buffer)
            }

            fn eof(&self) -> Result<bool> {
                self.handle.eof()
            }
        }

        impl io::Read for $ty {
            fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
                Ok(self.handle.read(buffer)?)
            }
        }
    )*};
}

macro_rules! sink_impl {
    ($($ty:ty),*) => {$(
        impl Sink for $ty {
            fn write(&mut self, data: &[u8]) -> Result<()> {
                self.handle.write(data)
            }
        }

        impl io::Write for $ty {
            fn write(&mut self, data: &[u8]) -> io::Result<usize> {
                self.handle.write(data)?;
                Ok(data.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                self.handle.flush();
                Ok(())
            }
        }
    )*};
}

source_impl!(InStream, Stream, Reader<'_>);
sink_impl!(OutStream, Stream, Writer<'_>);

macro_rules! seek_impl {
    ($($ty:ty),*) => {$(
        impl io::Seek for $ty {
            fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
                let (offset, mode) = match pos {
                    io::SeekFrom::Start(offset) => (
                        i64::try_from(offset).map_err(|err| {
                            io::Error::new(io::ErrorKind::InvalidInput, err)
                        })?,
                        SeekMode::Start,
                    ),
                    io::SeekFrom::Current(offset) => {
                        (offset, SeekMode::Current)
                    }
                    io::SeekFrom::End(offset) => (offset, SeekMode::End),
                };
                Ok(self.handle.seek(offset, mode)?)
            }
        }
    )*};
}

seek_impl!(InStream, OutStream, Stream, Reader<'_>, Writer<'_>);
