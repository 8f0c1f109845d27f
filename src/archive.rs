//! Archive assembly.
//!
//! The pipeline describes the archive as an [`ArchiveLayout`]: an ordered list
//! of top-level folders, each with ordered named files. An [`ArchiveWriter`]
//! turns that into one downloadable blob. [`ZipArchiver`] is the production
//! writer.
//!
//! ```text
//! AppIcon.appiconset/
//! ├── AppIcon-20x20@2x.png
//! ├── ...
//! └── Contents.json
//! AppIcon.solidimagestack/        (optional)
//! ├── layer-1@1x.png
//! ├── ...
//! └── Contents.json
//! ```

use std::collections::HashSet;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Archive write failed: {0}")]
    Write(String),
}

/// One file inside a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One top-level folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFolder {
    pub name: String,
    pub files: Vec<ArchiveFile>,
}

impl ArchiveFolder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }

    /// Add a file. A name that is already present is skipped; returns
    /// whether the file was added.
    pub fn add(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.files.push(ArchiveFile { name, bytes });
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Everything that goes into one archive, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveLayout {
    pub folders: Vec<ArchiveFolder>,
}

impl ArchiveLayout {
    pub fn folder(&self, name: &str) -> Option<&ArchiveFolder> {
        self.folders.iter().find(|f| f.name == name)
    }

    /// Full `folder/file` paths in write order.
    pub fn paths(&self) -> Vec<String> {
        self.folders
            .iter()
            .flat_map(|folder| {
                folder
                    .files
                    .iter()
                    .map(move |f| format!("{}/{}", folder.name, f.name))
            })
            .collect()
    }
}

/// Turns a layout into archive bytes.
pub trait ArchiveWriter {
    fn write(&self, layout: &ArchiveLayout) -> Result<Vec<u8>, ArchiveError>;
}

/// Deflate-compressed zip archive held in memory.
#[derive(Debug, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveWriter for ZipArchiver {
    fn write(&self, layout: &ArchiveLayout) -> Result<Vec<u8>, ArchiveError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut seen = HashSet::new();
        for folder in &layout.folders {
            zip.add_directory(format!("{}/", folder.name), options)?;
            for file in &folder.files {
                let path = format!("{}/{}", folder.name, file.name);
                if !seen.insert(path.clone()) {
                    return Err(ArchiveError::Write(format!("duplicate entry {path}")));
                }
                zip.start_file(path, options)?;
                zip.write_all(&file.bytes)?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }
}
