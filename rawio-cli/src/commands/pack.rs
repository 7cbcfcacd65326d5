use std::path::{Path, PathBuf};
use std::str::FromStr;

use fs_rawio::chunk::{chunk_type, write_chunk};
use fs_rawio::raw_io::read_full;
use fs_rawio::stream::{Disposition, InStream, OutStream};
use fs_rawio::RawIoError;

use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "pack", about = "Build a container from files")]
pub struct Pack {
    #[clap(value_parser, help = "Path to the container to create")]
    output: PathBuf,
    #[clap(required = true, help = "Chunks to write, in order, as TAG:FILE")]
    chunks: Vec<ChunkSpec>,
    #[clap(short, long, action = clap::ArgAction::SetTrue, help = "Overwrite the container if it exists")]
    force: bool,
}

impl Pack {
    pub fn run(&self) -> Result<(), AppError> {
        let written = pack(&self.output, &self.chunks, self.force)?;
        println!("Packed {} chunks into {}", written, self.output.display());
        Ok(())
    }
}

/// One `TAG:FILE` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkSpec {
    pub tag: u32,
    pub path: PathBuf,
}

impl FromStr for ChunkSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidChunkSpec(s.to_owned());

        let (tag, path) = s.split_once(':').ok_or_else(invalid)?;
        let tag: [u8; 4] = tag.as_bytes().try_into().map_err(|_| invalid())?;
        if !tag.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
            || path.is_empty()
        {
            return Err(invalid());
        }

        Ok(ChunkSpec {
            tag: chunk_type(tag[0], tag[1], tag[2], tag[3]),
            path: PathBuf::from(path),
        })
    }
}

/// Write one chunk per spec into `output`, returning the chunk count.
///
/// An existing `output` is only replaced when `force` is set.
pub fn pack(
    output: &Path,
    specs: &[ChunkSpec],
    force: bool,
) -> Result<usize, AppError> {
    let disposition = if force {
        Disposition::CreateOrTruncate
    } else {
        Disposition::CreateExclusive
    };
    let mut out = OutStream::open(output, disposition)?;

    for spec in specs {
        let payload = read_payload(&spec.path)?;
        log::debug!(
            "packing {} ({} bytes) as {:08x}",
            spec.path.display(),
            payload.len(),
            spec.tag
        );
        write_chunk(&mut out, spec.tag, &payload)?;
    }
    out.flush();

    Ok(specs.len())
}

fn read_payload(path: &Path) -> Result<Vec<u8>, AppError> {
    let mut input = InStream::open(path)?;
    let size = u32::try_from(input.size()?).map_err(|_| {
        RawIoError::InvalidArgument("Chunk payload longer than u32::MAX")
    })?;
    let mut payload = vec![0u8; size as usize];
    read_full(&mut input, &mut payload)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::chunks::list_chunks;
    use rstest::rstest;
    use std::fs;
    use tempdir::TempDir;

    #[rstest]
    #[case("DATA:file.bin", "DATA", "file.bin")]
    #[case("fmt :a/b/c", "fmt ", "a/b/c")]
    #[case("HEAD:C:\\payload.bin", "HEAD", "C:\\payload.bin")]
    fn parses_chunk_spec(
        #[case] arg: &str,
        #[case] tag: &str,
        #[case] path: &str,
    ) {
        let spec = ChunkSpec::from_str(arg).unwrap();
        assert_eq!(spec.tag.to_le_bytes(), tag.as_bytes());
        assert_eq!(spec.path, PathBuf::from(path));
    }

    #[rstest]
    #[case("DATA")]
    #[case("DATA:")]
    #[case("DAT:file.bin")]
    #[case("DATAS:file.bin")]
    #[case("DA\tA:file.bin")]
    #[case("DAÄ:file.bin")]
    fn rejects_bad_chunk_spec(#[case] arg: &str) {
        let err = ChunkSpec::from_str(arg).unwrap_err();
        assert!(matches!(err, AppError::InvalidChunkSpec(ref s) if s == arg));
    }

    #[test]
    fn pack_then_list() {
        let dir = TempDir::new("pack").unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        fs::write(&first, b"hello").unwrap();
        fs::write(&second, b"").unwrap();
        let output = dir.path().join("out.bin");

        let specs = [
            ChunkSpec::from_str(&format!("TXT1:{}", first.display())).unwrap(),
            ChunkSpec::from_str(&format!("TXT2:{}", second.display()))
                .unwrap(),
        ];
        assert_eq!(pack(&output, &specs, false).unwrap(), 2);

        let mut input = InStream::open(&output).unwrap();
        let entries = list_chunks(&mut input, true).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tag, "TXT1");
        assert_eq!(entries[0].crc32, Some(crc32fast::hash(b"hello")));
        assert_eq!((entries[1].offset, entries[1].size), (13, 0));
    }

    #[test]
    fn existing_output_needs_force() {
        let dir = TempDir::new("pack_force").unwrap();
        let payload = dir.path().join("payload.bin");
        fs::write(&payload, [1u8, 2, 3]).unwrap();
        let output = dir.path().join("out.bin");
        fs::write(&output, b"previous content").unwrap();

        let specs = [ChunkSpec {
            tag: chunk_type(b'D', b'A', b'T', b'A'),
            path: payload,
        }];

        let err = pack(&output, &specs, false).unwrap_err();
        assert!(matches!(
            err,
            AppError::RawIoError(RawIoError::OpenFailed { .. })
        ));
        assert_eq!(fs::read(&output).unwrap(), b"previous content");

        pack(&output, &specs, true).unwrap();
        assert_eq!(
            fs::read(&output).unwrap(),
            b"DATA\x03\x00\x00\x00\x01\x02\x03"
        );
    }
}
