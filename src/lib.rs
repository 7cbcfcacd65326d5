//! Owned file handles, capability-typed streams and raw binary transfer.
//!
//! ```no_run
//! use fs_rawio::chunk::{chunk_type, write_chunk, ChunkReader};
//! use fs_rawio::stream::{Disposition, InStream, OutStream};
//!
//! let mut out = OutStream::open("data.bin", Disposition::CreateOrTruncate)?;
//! write_chunk(&mut out, chunk_type(b'H', b'E', b'A', b'D'), &[1, 2, 3])?;
//! drop(out);
//!
//! let mut input = InStream::open("data.bin")?;
//! let mut chunks = ChunkReader::new(&mut input);
//! while chunks.resume()? {
//!     let payload = chunks.read_payload()?;
//!     println!("{} {:?}", chunks.header().unwrap(), payload);
//! }
//! # Ok::<(), fs_rawio::RawIoError>(())
//! ```

pub mod chunk;
pub mod errors;
pub mod raw_io;
pub mod stream;

pub use chunk::{chunk_type, write_chunk, ChunkHeader, ChunkReader};
pub use errors::{RawIoError, Result};
pub use raw_io::{Sink, Source};
pub use stream::{
    Access, Disposition, FileHandle, InStream, OpenIntent, OutStream, Reader,
    SeekMode, Stream, Writer,
};
