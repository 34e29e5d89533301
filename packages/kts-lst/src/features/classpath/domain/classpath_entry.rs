use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    Archive,
}

/// One location on a classpath
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClasspathEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl ClasspathEntry {
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn archive(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Archive,
        }
    }

    /// Tag a path: existing directories are directories, `.jar`/`.zip`
    /// files are archives, anything else missing is assumed a directory.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            return Self::directory(path);
        }
        if has_archive_extension(&path) {
            Self::archive(path)
        } else {
            Self::directory(path)
        }
    }

    pub fn exists(&self) -> bool {
        match self.kind {
            EntryKind::Directory => self.path.is_dir(),
            EntryKind::Archive => self.path.is_file(),
        }
    }
}

fn has_archive_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}
