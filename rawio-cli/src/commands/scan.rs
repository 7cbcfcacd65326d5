use std::fmt;
use std::path::{Path, PathBuf};

use fs_rawio::stream::InStream;
use serde::Serialize;
use walkdir::WalkDir;

use super::chunks::list_chunks;
use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "scan",
    about = "Check whether every file under a directory is a well-formed container"
)]
pub struct Scan {
    #[clap(value_parser, help = "Path to the root directory")]
    root_dir: PathBuf,
    #[clap(long, action = clap::ArgAction::SetTrue, help = "Print the report as JSON")]
    json: bool,
}

impl Scan {
    pub fn run(&self) -> Result<(), AppError> {
        let report = scan_dir(&self.root_dir)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for entry in &report {
                println!("{}", entry);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    WellFormed { chunks: usize },
    Corrupt { offset: u64, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl fmt::Display for ScanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            FileStatus::WellFormed { chunks } => {
                write!(f, "{}: ok ({} chunks)", self.path.display(), chunks)
            }
            FileStatus::Corrupt { offset, reason } => write!(
                f,
                "{}: corrupt at offset {} ({})",
                self.path.display(),
                offset,
                reason
            ),
        }
    }
}

/// Check every regular file below `root`, in file name order.
///
/// Files that cannot be opened are skipped with a warning.
pub fn scan_dir(root: &Path) -> Result<Vec<ScanEntry>, AppError> {
    let mut report = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();

        let status = match check_file(&path) {
            Ok(chunks) => FileStatus::WellFormed { chunks },
            Err(AppError::CorruptContainer { offset, reason }) => {
                FileStatus::Corrupt { offset, reason }
            }
            Err(err) => {
                log::warn!("skipping {}: {}", path.display(), err);
                continue;
            }
        };
        report.push(ScanEntry { path, status });
    }

    Ok(report)
}

fn check_file(path: &Path) -> Result<usize, AppError> {
    let mut input = InStream::open(path)?;
    Ok(list_chunks(&mut input, false)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_rawio::chunk::{chunk_type, write_chunk};
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn reports_each_file() {
        let dir = TempDir::new("scan").unwrap();
        let root = dir.path();

        let mut good = Vec::new();
        write_chunk(&mut good, chunk_type(b'O', b'N', b'E', b' '), b"1")
            .unwrap();
        write_chunk(&mut good, chunk_type(b'T', b'W', b'O', b' '), b"22")
            .unwrap();
        fs::write(root.join("a_good.bin"), &good).unwrap();
        fs::write(root.join("b_empty.bin"), b"").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("c_short.bin"), b"abc").unwrap();

        let report = scan_dir(root).unwrap();
        let statuses: Vec<_> =
            report.iter().map(|entry| entry.status.clone()).collect();

        assert_eq!(report.len(), 3);
        assert_eq!(statuses[0], FileStatus::WellFormed { chunks: 2 });
        assert_eq!(statuses[1], FileStatus::WellFormed { chunks: 0 });
        assert!(matches!(statuses[2], FileStatus::Corrupt { offset: 0, .. }));
        assert!(report[2].path.ends_with("nested/c_short.bin"));
    }

    #[test]
    fn missing_root_fails() {
        let dir = TempDir::new("scan_missing").unwrap();
        let err = scan_dir(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, AppError::WalkDirError(_)));
    }

    #[test]
    fn json_report_is_flat() {
        let entry = ScanEntry {
            path: PathBuf::from("x.bin"),
            status: FileStatus::WellFormed { chunks: 4 },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "path": "x.bin",
                "status": "well_formed",
                "chunks": 4,
            })
        );
        assert_eq!(entry.to_string(), "x.bin: ok (4 chunks)");
    }
}
