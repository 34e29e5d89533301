//! Lazily opened archive entries

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::shared::models::{LstError, Result};

/// A `.jar`/`.zip` classpath entry.
///
/// The central directory is read on first lookup and the handle is kept
/// for the resolver's lifetime. `ZipArchive` needs `&mut` to read, hence
/// the mutex. An archive that cannot be opened stays closed and reads as
/// empty; later read failures on an open archive are hard errors.
pub struct ArchiveHandle {
    path: PathBuf,
    archive: OnceCell<std::result::Result<Mutex<ZipArchive<File>>, LstError>>,
}

impl ArchiveHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            archive: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn archive(&self) -> Option<&Mutex<ZipArchive<File>>> {
        self.archive
            .get_or_init(|| {
                tracing::debug!(archive = %self.path.display(), "Opening classpath archive");
                let opened = File::open(&self.path)
                    .map_err(|e| self.error(e))
                    .and_then(|file| ZipArchive::new(file).map_err(|e| self.error(e)));
                if let Err(e) = &opened {
                    tracing::warn!(archive = %self.path.display(), error = %e, "Skipping unreadable archive");
                }
                opened.map(Mutex::new)
            })
            .as_ref()
            .ok()
    }

    /// Why the archive could not be opened, once an open was attempted
    pub fn open_failure(&self) -> Option<&LstError> {
        self.archive.get().and_then(|opened| opened.as_ref().err())
    }

    /// Bytes of the entry at `internal_path`, `None` if the archive has no
    /// such entry or cannot be opened
    pub fn read(&self, internal_path: &str) -> Result<Option<Vec<u8>>> {
        let mut archive = match self.archive() {
            Some(archive) => archive.lock(),
            None => return Ok(None),
        };
        let mut entry = match archive.by_name(internal_path) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(self.error(e)),
        };
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes).map_err(|e| self.error(e))?;
        Ok(Some(bytes))
    }

    fn error(&self, source: impl std::error::Error + Send + Sync + 'static) -> LstError {
        LstError::classpath(format!("Cannot read archive: {}", source))
            .with_file(self.path.display().to_string())
            .with_source(source)
    }
}

impl std::fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveHandle")
            .field("path", &self.path)
            .field("opened", &self.archive.get().map(|opened| opened.is_ok()))
            .finish()
    }
}
