//! Walking a stream of tagged chunks.
//!
//! A chunk is an 8-byte header followed by its payload:
//!
//! ```text
//! +--------+--------+------------------+
//! | tag    | size   | payload          |
//! | 4 bytes| u32 LE | `size` bytes     |
//! +--------+--------+------------------+
//! ```
//!
//! Chunks follow each other with no padding and no footer. The reader only
//! decodes headers; what happens to the payload is up to the caller.

use std::fmt;

use crate::raw_io::{self, Sink, Source};
use crate::{RawIoError, Result};

/// Pack four ASCII bytes into a tag, `a` being the least significant byte.
///
/// The result compares equal to the tag decoded from the bytes `a b c d` on
/// the wire.
pub const fn chunk_type(a: u8, b: u8, c: u8, d: u8) -> u32 {
    (d as u32) << 24 | (c as u32) << 16 | (b as u32) << 8 | a as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkHeader {
    pub tag: u32,
    /// Payload length, header excluded.
    pub size: u32,
}

impl ChunkHeader {
    /// Encoded length of a header.
    pub const LEN: usize = 8;

    pub fn new(tag: [u8; 4], size: u32) -> Self {
        Self {
            tag: u32::from_le_bytes(tag),
            size,
        }
    }

    /// Tag bytes in wire order.
    pub fn tag_bytes(&self) -> [u8; 4] {
        self.tag.to_le_bytes()
    }

    /// Tag as text, or `"????"` when it is not printable ASCII.
    pub fn tag_str(&self) -> String {
        let bytes = self.tag_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            bytes.iter().map(|&b| b as char).collect()
        } else {
            String::from("????")
        }
    }
}

impl fmt::Display for ChunkHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.tag_str(), self.size)
    }
}

/// Header-by-header iterator over a chunk stream.
///
/// Nothing is read until [`resume`](Self::resume) is called. Each successful
/// `resume` decodes the next header and leaves the source positioned at the
/// start of its payload. The caller must consume or skip the payload before
/// resuming again; the reader never skips on its own.
///
/// ```
/// use fs_rawio::chunk::{chunk_type, write_chunk, ChunkReader};
///
/// let mut bytes = Vec::new();
/// write_chunk(&mut bytes, chunk_type(b'T', b'E', b'S', b'T'), b"abc")?;
///
/// let mut source = bytes.as_slice();
/// let mut chunks = ChunkReader::new(&mut source);
/// assert!(chunks.resume()?);
/// assert_eq!(chunks.chunk_size(), 3);
/// assert_eq!(chunks.read_payload()?, b"abc");
/// assert!(!chunks.resume()?);
/// # Ok::<(), fs_rawio::RawIoError>(())
/// ```
#[derive(Debug)]
pub struct ChunkReader<'a, S: Source + ?Sized> {
    source: &'a mut S,
    last: Option<ChunkHeader>,
    exhausted: bool,
}

impl<'a, S: Source + ?Sized> ChunkReader<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self {
            source,
            last: None,
            exhausted: false,
        }
    }

    /// Decode the next header.
    ///
    /// Returns `Ok(false)` once the source is at its end. A header cut short
    /// fails with [`RawIoError::ShortRead`]; either way the reader is
    /// exhausted from then on and will not touch the source again.
    pub fn resume(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if self.source.eof()? {
            log::trace!("chunk stream exhausted");
            self.exhausted = true;
            return Ok(false);
        }

        match self.read_header() {
            Ok(header) => {
                log::trace!("chunk header {}", header);
                self.last = Some(header);
                Ok(true)
            }
            Err(err) => {
                log::debug!("chunk header unreadable: {}", err);
                self.exhausted = true;
                Err(err)
            }
        }
    }

    fn read_header(&mut self) -> Result<ChunkHeader> {
        let tag = u32::from_le(raw_io::get::<u32, _>(&mut *self.source)?);
        let size = u32::from_le(raw_io::get::<u32, _>(&mut *self.source)?);
        Ok(ChunkHeader { tag, size })
    }

    /// The header decoded by the last successful `resume`.
    pub fn header(&self) -> Option<ChunkHeader> {
        self.last
    }

    /// Tag of the current chunk, zero before the first chunk.
    pub fn chunk_type(&self) -> u32 {
        self.header().map_or(0, |header| header.tag)
    }

    /// Payload size of the current chunk, zero before the first chunk.
    pub fn chunk_size(&self) -> u32 {
        self.header().map_or(0, |header| header.size)
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The underlying source, e.g. to seek past a payload.
    pub fn source(&mut self) -> &mut S {
        &mut *self.source
    }

    /// Read the whole payload of the current chunk, over as many reads as
    /// the source needs.
    pub fn read_payload(&mut self) -> Result<Vec<u8>> {
        let size = usize::try_from(self.chunk_size()).map_err(|_| {
            RawIoError::InvalidArgument("Chunk size does not fit in memory")
        })?;
        let mut payload = vec![0u8; size];
        raw_io::read_full(&mut *self.source, &mut payload)?;
        Ok(payload)
    }
}

/// Frame `payload` as one chunk: header first, then the payload bytes.
pub fn write_chunk<S: Sink + ?Sized>(
    sink: &mut S,
    tag: u32,
    payload: &[u8],
) -> Result<()> {
    let size = u32::try_from(payload.len()).map_err(|_| {
        RawIoError::InvalidArgument("Chunk payload longer than u32::MAX")
    })?;
    raw_io::put(sink, &tag.to_le())?;
    raw_io::put(sink, &size.to_le())?;
    raw_io::put_slice(sink, payload)
}
