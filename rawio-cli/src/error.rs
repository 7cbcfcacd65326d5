use fs_rawio::RawIoError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid chunk spec '{0}': expected TAG:FILE with a 4-byte ASCII tag")]
    InvalidChunkSpec(String),

    #[error("Corrupt or truncated container at offset {offset}: {reason}")]
    CorruptContainer { offset: u64, reason: String },

    #[error(transparent)]
    RawIoError(#[from] RawIoError),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    WalkDirError(#[from] walkdir::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}
