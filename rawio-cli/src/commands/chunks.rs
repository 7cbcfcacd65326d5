use std::fmt;
use std::io::{Seek, SeekFrom};
use std::path::PathBuf;

use fs_rawio::chunk::{ChunkHeader, ChunkReader};
use fs_rawio::raw_io::Source;
use fs_rawio::stream::InStream;
use fs_rawio::RawIoError;
use serde::Serialize;

use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "chunks", about = "List the chunks of a container")]
pub struct Chunks {
    #[clap(value_parser, help = "Path to the container file")]
    file: PathBuf,
    #[clap(short, long, action = clap::ArgAction::SetTrue, help = "Compute a CRC-32 of every payload")]
    checksum: bool,
    #[clap(long, action = clap::ArgAction::SetTrue, help = "Print the listing as JSON")]
    json: bool,
}

impl Chunks {
    pub fn run(&self) -> Result<(), AppError> {
        let mut input = InStream::open(&self.file)?;
        let entries = list_chunks(&mut input, self.checksum)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for entry in &entries {
                println!("{}", entry);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkEntry {
    /// Offset of the chunk header from the start of the container.
    pub offset: u64,
    pub tag: String,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc32: Option<u32>,
}

impl fmt::Display for ChunkEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}  {}  {:>10}", self.offset, self.tag, self.size)?;
        if let Some(crc32) = self.crc32 {
            write!(f, "  {:08x}", crc32)?;
        }
        Ok(())
    }
}

/// Walk every chunk of `source` from its start.
///
/// A header cut short, or a payload running past the end, is reported as
/// [`AppError::CorruptContainer`].
pub fn list_chunks<S: Source + Seek>(
    source: &mut S,
    checksum: bool,
) -> Result<Vec<ChunkEntry>, AppError> {
    let len = source.seek(SeekFrom::End(0))?;
    source.seek(SeekFrom::Start(0))?;

    let mut entries = Vec::new();
    let mut offset = 0u64;
    let mut chunks = ChunkReader::new(source);
    while chunks.resume().map_err(|err| corrupt(offset, err))? {
        let header = ChunkHeader {
            tag: chunks.chunk_type(),
            size: chunks.chunk_size(),
        };
        let end = offset + ChunkHeader::LEN as u64 + u64::from(header.size);
        if end > len {
            return Err(AppError::CorruptContainer {
                offset,
                reason: format!("chunk {} runs past {} bytes", header, len),
            });
        }

        let crc32 = if checksum {
            let payload =
                chunks.read_payload().map_err(|err| corrupt(offset, err))?;
            Some(crc32fast::hash(&payload))
        } else {
            chunks
                .source()
                .seek(SeekFrom::Current(i64::from(header.size)))?;
            None
        };
        log::trace!("chunk {} at offset {}", header, offset);

        entries.push(ChunkEntry {
            offset,
            tag: header.tag_str(),
            size: header.size,
            crc32,
        });
        offset = end;
    }

    Ok(entries)
}

fn corrupt(offset: u64, err: RawIoError) -> AppError {
    if err.is_short_read() {
        AppError::CorruptContainer {
            offset,
            reason: err.to_string(),
        }
    } else {
        err.into()
    }
}
