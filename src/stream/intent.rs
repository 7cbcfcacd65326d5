use crate::{RawIoError, Result};

/// Capabilities requested when opening a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn can_read(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

/// What to do depending on whether the file already exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Create a new file, fail if it exists.
    CreateExclusive,
    /// Create a new file or truncate an existing one.
    CreateOrTruncate,
    /// Open an existing file, fail if it is absent.
    OpenExisting,
    /// Open the file, creating it if it is absent.
    OpenOrCreate,
    /// Open an existing file and truncate it, fail if it is absent.
    TruncateExisting,
}

impl Disposition {
    pub const ALL: [Disposition; 5] = [
        Disposition::CreateExclusive,
        Disposition::CreateOrTruncate,
        Disposition::OpenExisting,
        Disposition::OpenOrCreate,
        Disposition::TruncateExisting,
    ];

    pub fn creates(self) -> bool {
        matches!(
            self,
            Disposition::CreateExclusive
                | Disposition::CreateOrTruncate
                | Disposition::OpenOrCreate
        )
    }

    pub fn truncates(self) -> bool {
        matches!(
            self,
            Disposition::CreateOrTruncate | Disposition::TruncateExisting
        )
    }
}

/// A validated pair of access and disposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OpenIntent {
    access: Access,
    disposition: Disposition,
}

impl OpenIntent {
    /// Truncating a file needs write access, anything else is accepted.
    pub fn new(access: Access, disposition: Disposition) -> Result<Self> {
        if disposition.truncates() && !access.can_write() {
            return Err(RawIoError::InvalidArgument(
                "Truncating disposition requires write access",
            ));
        }
        Ok(Self {
            access,
            disposition,
        })
    }

    pub fn read() -> Self {
        Self {
            access: Access::Read,
            disposition: Disposition::OpenExisting,
        }
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }
}

/// Origin of a seek.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeekMode {
    Start,
    Current,
    End,
}

impl SeekMode {
    /// Reject offsets that would move before the start of the file
    /// or past its end.
    pub fn check(self, offset: i64) -> Result<()> {
        match self {
            SeekMode::Start if offset < 0 => Err(RawIoError::InvalidArgument(
                "Cannot seek before start of file",
            )),
            SeekMode::End if offset > 0 => Err(RawIoError::InvalidArgument(
                "Cannot seek beyond end of file",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Access::Read, Disposition::CreateExclusive, true)]
    #[case(Access::Read, Disposition::CreateOrTruncate, false)]
    #[case(Access::Read, Disposition::OpenExisting, true)]
    #[case(Access::Read, Disposition::OpenOrCreate, true)]
    #[case(Access::Read, Disposition::TruncateExisting, false)]
    #[case(Access::Write, Disposition::TruncateExisting, true)]
    #[case(Access::ReadWrite, Disposition::CreateOrTruncate, true)]
    fn intent_validation(
        #[case] access: Access,
        #[case] disposition: Disposition,
        #[case] valid: bool,
    ) {
        let intent = OpenIntent::new(access, disposition);
        assert_eq!(intent.is_ok(), valid);
        if let Err(err) = intent {
            assert!(matches!(err, RawIoError::InvalidArgument(_)));
        }
    }

    #[rstest]
    #[case(SeekMode::Start, -1, false)]
    #[case(SeekMode::Start, 0, true)]
    #[case(SeekMode::Start, 10, true)]
    #[case(SeekMode::Current, -10, true)]
    #[case(SeekMode::Current, 10, true)]
    #[case(SeekMode::End, 1, false)]
    #[case(SeekMode::End, 0, true)]
    #[case(SeekMode::End, -4, true)]
    fn seek_offset_check(
        #[case] mode: SeekMode,
        #[case] offset: i64,
        #[case] valid: bool,
    ) {
        assert_eq!(mode.check(offset).is_ok(), valid);
    }
}
