use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

use super::Platform;
use crate::stream::{Access, Disposition, OpenIntent, SeekMode};

const CREATE_MODE: libc::c_uint = 0o644;

pub(crate) struct Unix;

fn open_flags(intent: OpenIntent) -> libc::c_int {
    let disposition = match intent.disposition() {
        Disposition::CreateExclusive => libc::O_CREAT | libc::O_EXCL,
        Disposition::CreateOrTruncate => libc::O_CREAT | libc::O_TRUNC,
        Disposition::OpenExisting => 0,
        Disposition::OpenOrCreate => libc::O_CREAT,
        Disposition::TruncateExisting => libc::O_TRUNC,
    };
    let access = match intent.access() {
        Access::Read => libc::O_RDONLY,
        Access::Write => libc::O_WRONLY,
        Access::ReadWrite => libc::O_RDWR,
    };
    disposition | access | libc::O_CLOEXEC
}

fn whence(mode: SeekMode) -> libc::c_int {
    match mode {
        SeekMode::Start => libc::SEEK_SET,
        SeekMode::Current => libc::SEEK_CUR,
        SeekMode::End => libc::SEEK_END,
    }
}

fn interrupted(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Interrupted
}

impl Platform for Unix {
    type Handle = RawFd;

    const INVALID: RawFd = -1;

    fn open(path: &Path, intent: OpenIntent) -> io::Result<RawFd> {
        let path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path contains an interior NUL byte",
            )
        })?;

        let fd = unsafe {
            libc::open(path.as_ptr(), open_flags(intent), CREATE_MODE)
        };
        if fd == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(fd)
    }

    fn read(handle: RawFd, buffer: &mut [u8]) -> io::Result<usize> {
        let len = buffer.len().min(isize::MAX as usize);
        loop {
            let result = unsafe {
                libc::read(handle, buffer.as_mut_ptr().cast(), len)
            };
            if result >= 0 {
                return Ok(result as usize);
            }
            let err = io::Error::last_os_error();
            if !interrupted(&err) {
                return Err(err);
            }
        }
    }

    fn write_all(handle: RawFd, mut data: &[u8]) -> io::Result<()> {
        while !data.is_empty() {
            let len = data.len().min(isize::MAX as usize);
            let result =
                unsafe { libc::write(handle, data.as_ptr().cast(), len) };
            if result < 0 {
                let err = io::Error::last_os_error();
                if interrupted(&err) {
                    continue;
                }
                return Err(err);
            }
            if result == 0 {
                return Err(io::ErrorKind::WriteZero.into());
            }
            data = &data[result as usize..];
        }
        Ok(())
    }

    fn seek(handle: RawFd, offset: i64, mode: SeekMode) -> io::Result<u64> {
        let offset = libc::off_t::try_from(offset)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        let position = unsafe { libc::lseek(handle, offset, whence(mode)) };
        if position == -1 {
            return Err(io::Error::last_os_error());
        }
        u64::try_from(position)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn flush(handle: RawFd) -> io::Result<()> {
        if unsafe { libc::fsync(handle) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn close(handle: RawFd) -> io::Result<()> {
        // Never retried: the descriptor is released even when EINTR is
        // reported.
        if unsafe { libc::close(handle) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn set_delete_on_close(_handle: RawFd, _value: bool) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "delete-on-close is not supported on this platform",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_intent() {
        let intent =
            OpenIntent::new(Access::Write, Disposition::CreateExclusive)
                .unwrap();
        let flags = open_flags(intent);
        assert_eq!(flags & libc::O_ACCMODE, libc::O_WRONLY);
        assert_ne!(flags & libc::O_CREAT, 0);
        assert_ne!(flags & libc::O_EXCL, 0);
        assert_eq!(flags & libc::O_TRUNC, 0);

        let flags = open_flags(OpenIntent::read());
        assert_eq!(flags & libc::O_ACCMODE, libc::O_RDONLY);
        assert_eq!(flags & libc::O_CREAT, 0);
    }
}
