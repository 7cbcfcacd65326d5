use std::ffi::c_void;
use std::io;
use std::iter;
use std::mem;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use windows_sys::Win32::Foundation::{
    CloseHandle, GetLastError, ERROR_HANDLE_EOF, GENERIC_READ, GENERIC_WRITE,
    HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileW, FileDispositionInfo, FlushFileBuffers, GetFileSizeEx,
    ReadFile, SetFileInformationByHandle, SetFilePointerEx, WriteFile,
    CREATE_ALWAYS, CREATE_NEW, DELETE, FILE_ATTRIBUTE_NORMAL, FILE_BEGIN,
    FILE_CURRENT, FILE_DISPOSITION_INFO, FILE_END, FILE_SHARE_READ,
    OPEN_ALWAYS, OPEN_EXISTING, TRUNCATE_EXISTING,
};

use super::Platform;
use crate::stream::{Access, Disposition, OpenIntent, SeekMode};

pub(crate) struct Windows;

fn last_error() -> io::Error {
    io::Error::from_raw_os_error(unsafe { GetLastError() } as i32)
}

fn wide_path(path: &Path) -> io::Result<Vec<u16>> {
    let wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    if wide.contains(&0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path contains an interior NUL character",
        ));
    }
    Ok(wide.into_iter().chain(iter::once(0)).collect())
}

impl Platform for Windows {
    type Handle = HANDLE;

    const INVALID: HANDLE = ptr::null_mut();

    fn open(path: &Path, intent: OpenIntent) -> io::Result<HANDLE> {
        let path = wide_path(path)?;

        // DELETE is needed for SetFileInformationByHandle(FileDispositionInfo)
        let access = match intent.access() {
            Access::Read => GENERIC_READ,
            Access::Write => GENERIC_WRITE | DELETE,
            Access::ReadWrite => GENERIC_READ | GENERIC_WRITE | DELETE,
        };
        let disposition = match intent.disposition() {
            Disposition::CreateExclusive => CREATE_NEW,
            Disposition::CreateOrTruncate => CREATE_ALWAYS,
            Disposition::OpenExisting => OPEN_EXISTING,
            Disposition::OpenOrCreate => OPEN_ALWAYS,
            Disposition::TruncateExisting => TRUNCATE_EXISTING,
        };

        let handle = unsafe {
            CreateFileW(
                path.as_ptr(),
                access,
                FILE_SHARE_READ,
                ptr::null(),
                disposition,
                FILE_ATTRIBUTE_NORMAL,
                ptr::null_mut(),
            )
        };
        if handle.is_null() || handle == INVALID_HANDLE_VALUE {
            return Err(last_error());
        }
        Ok(handle)
    }

    fn read(handle: HANDLE, buffer: &mut [u8]) -> io::Result<usize> {
        let len = u32::try_from(buffer.len()).unwrap_or(u32::MAX);
        let mut bytes_read = 0u32;
        let ok = unsafe {
            ReadFile(
                handle,
                buffer.as_mut_ptr(),
                len,
                &mut bytes_read,
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            let err = unsafe { GetLastError() };
            if err != ERROR_HANDLE_EOF {
                return Err(io::Error::from_raw_os_error(err as i32));
            }
        }
        Ok(bytes_read as usize)
    }

    fn write_all(handle: HANDLE, mut data: &[u8]) -> io::Result<()> {
        while !data.is_empty() {
            let len = u32::try_from(data.len()).unwrap_or(u32::MAX);
            let mut bytes_written = 0u32;
            let ok = unsafe {
                WriteFile(
                    handle,
                    data.as_ptr(),
                    len,
                    &mut bytes_written,
                    ptr::null_mut(),
                )
            };
            if ok == 0 {
                return Err(last_error());
            }
            if bytes_written == 0 {
                return Err(io::ErrorKind::WriteZero.into());
            }
            data = &data[bytes_written as usize..];
        }
        Ok(())
    }

    fn seek(handle: HANDLE, offset: i64, mode: SeekMode) -> io::Result<u64> {
        let method = match mode {
            SeekMode::Start => FILE_BEGIN,
            SeekMode::Current => FILE_CURRENT,
            SeekMode::End => FILE_END,
        };
        let mut position = 0i64;
        let ok =
            unsafe { SetFilePointerEx(handle, offset, &mut position, method) };
        if ok == 0 {
            return Err(last_error());
        }
        u64::try_from(position)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn size(handle: HANDLE) -> io::Result<u64> {
        let mut bytes = 0i64;
        if unsafe { GetFileSizeEx(handle, &mut bytes) } == 0 {
            return Err(last_error());
        }
        u64::try_from(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn flush(handle: HANDLE) -> io::Result<()> {
        if unsafe { FlushFileBuffers(handle) } == 0 {
            return Err(last_error());
        }
        Ok(())
    }

    fn close(handle: HANDLE) -> io::Result<()> {
        if unsafe { CloseHandle(handle) } == 0 {
            return Err(last_error());
        }
        Ok(())
    }

    fn set_delete_on_close(handle: HANDLE, value: bool) -> io::Result<()> {
        let info = FILE_DISPOSITION_INFO {
            DeleteFile: value as _,
        };
        let ok = unsafe {
            SetFileInformationByHandle(
                handle,
                FileDispositionInfo,
                &info as *const FILE_DISPOSITION_INFO as *const c_void,
                mem::size_of::<FILE_DISPOSITION_INFO>() as u32,
            )
        };
        if ok == 0 {
            return Err(last_error());
        }
        Ok(())
    }
}
