//! Filesystem primitives the loader depends on.
//!
//! The pipeline never touches `std::fs` directly; it goes through the
//! [`FileSystem`] trait so tests can hand it an in-memory tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub exists: bool,
    pub is_dir: bool,
    pub size_bytes: u64,
}

#[derive(Debug, Error)]
pub enum FsError {
    #[error("file {path} does not exist")]
    DoesNotExist { path: PathBuf },
    #[error("{path} is a directory")]
    IsADirectory { path: PathBuf },
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub trait FileSystem {
    /// Never fails: anything `stat` cannot see is reported as missing.
    fn file_info(&self, path: &Path) -> FileInfo;

    /// Reads the whole file as UTF-8 text. Fails if the path is missing or
    /// is a directory.
    fn read_file_to_text(&self, path: &Path) -> Result<String, FsError>;
}

/// The real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn file_info(&self, path: &Path) -> FileInfo {
        match fs::metadata(path) {
            Ok(meta) => FileInfo {
                exists: true,
                is_dir: meta.is_dir(),
                size_bytes: meta.len(),
            },
            Err(_) => FileInfo::default(),
        }
    }

    fn read_file_to_text(&self, path: &Path) -> Result<String, FsError> {
        let info = self.file_info(path);
        if !info.exists {
            return Err(FsError::DoesNotExist {
                path: path.to_path_buf(),
            });
        }
        if info.is_dir {
            return Err(FsError::IsADirectory {
                path: path.to_path_buf(),
            });
        }

        // the handle lives only for this call
        fs::read_to_string(path).map_err(|source| FsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
