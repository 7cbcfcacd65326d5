use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RawIoError>;

#[derive(Error, Debug)]
pub enum RawIoError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("Failed to open {}: {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error during {op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("Not enough data: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
}

impl RawIoError {
    /// Wrap an OS failure of the named operation.
    pub(crate) fn io(op: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { op, source }
    }

    /// The raw OS error code behind an `OpenFailed` or `Io` error, if any.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::OpenFailed { source, .. } | Self::Io { source, .. } => {
                source.raw_os_error()
            }
            _ => None,
        }
    }

    pub fn is_short_read(&self) -> bool {
        matches!(self, Self::ShortRead { .. })
    }
}

impl From<RawIoError> for io::Error {
    fn from(err: RawIoError) -> Self {
        match err {
            RawIoError::OpenFailed { source, .. }
            | RawIoError::Io { source, .. } => source,
            RawIoError::InvalidArgument(msg) => {
                io::Error::new(io::ErrorKind::InvalidInput, msg)
            }
            err @ RawIoError::ShortRead { .. } => {
                io::Error::new(io::ErrorKind::UnexpectedEof, err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_code_is_kept() {
        let err = RawIoError::OpenFailed {
            path: PathBuf::from("missing.bin"),
            source: io::Error::from_raw_os_error(2),
        };
        assert_eq!(err.os_code(), Some(2));
        assert!(err.to_string().contains("missing.bin"));

        let err = RawIoError::ShortRead {
            expected: 4,
            actual: 1,
        };
        assert_eq!(err.os_code(), None);
        assert!(err.is_short_read());
    }

    #[test]
    fn converts_into_io_error() {
        let err: io::Error = RawIoError::InvalidArgument("bad seek").into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err: io::Error = RawIoError::ShortRead {
            expected: 8,
            actual: 0,
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
