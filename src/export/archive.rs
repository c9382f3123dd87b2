use std::io::{Cursor, Read as _, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::BrandframeResult;

/// One file placed in the export archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// File name inside the archive.
    pub name: String,
    /// Encoded file contents.
    pub bytes: Vec<u8>,
}

/// Receives the finished archive.
///
/// Saving is the last step of an export and is only reached when at least one file was encoded.
pub trait ArchiveSink {
    /// Persist or hand off the archive named `name`.
    fn save(&mut self, name: &str, archive: &[u8]) -> BrandframeResult<()>;
}

/// Writes archives into a directory.
#[derive(Clone, Debug)]
pub struct DirectoryArchiveSink {
    dir: PathBuf,
    last: Option<PathBuf>,
}

impl DirectoryArchiveSink {
    /// Sink writing into `dir`; the directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last: None,
        }
    }

    /// Path of the most recently written archive.
    pub fn last_path(&self) -> Option<&Path> {
        self.last.as_deref()
    }
}

impl ArchiveSink for DirectoryArchiveSink {
    fn save(&mut self, name: &str, archive: &[u8]) -> BrandframeResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create archive dir '{}'", self.dir.display()))?;
        let path = self.dir.join(name);
        std::fs::write(&path, archive)
            .with_context(|| format!("write archive '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = archive.len(), "archive saved");
        self.last = Some(path);
        Ok(())
    }
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryArchiveSink {
    pub(crate) saved: Vec<(String, Vec<u8>)>,
}

impl InMemoryArchiveSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Archives in save order.
    pub fn archives(&self) -> &[(String, Vec<u8>)] {
        &self.saved
    }
}

impl ArchiveSink for InMemoryArchiveSink {
    fn save(&mut self, name: &str, archive: &[u8]) -> BrandframeResult<()> {
        self.saved.push((name.to_string(), archive.to_vec()));
        Ok(())
    }
}

/// Bundle `entries` into a zip archive. Images are already compressed, so entries are stored.
pub fn build_zip(entries: &[ArchiveEntry]) -> BrandframeResult<Vec<u8>> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for entry in entries {
        zip.start_file(entry.name.as_str(), options)
            .with_context(|| format!("start zip entry '{}'", entry.name))?;
        zip.write_all(&entry.bytes)
            .with_context(|| format!("write zip entry '{}'", entry.name))?;
    }
    let cursor = zip.finish().context("finalize zip archive")?;
    Ok(cursor.into_inner())
}

/// Read a zip produced by [`build_zip`] back into its entries, in archive order.
pub fn read_zip(archive: &[u8]) -> BrandframeResult<Vec<ArchiveEntry>> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).context("open zip archive")?;
    let mut out = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut file = zip
            .by_index(i)
            .with_context(|| format!("open zip entry #{i}"))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .with_context(|| format!("read zip entry '{}'", file.name()))?;
        out.push(ArchiveEntry {
            name: file.name().to_string(),
            bytes,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/export/archive.rs"]
mod tests;
