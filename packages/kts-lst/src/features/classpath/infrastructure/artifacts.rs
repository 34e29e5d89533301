//! Locate classpath jars by artifact name

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::features::classpath::domain::ClasspathEntry;

/// Find one jar per artifact name below `search_roots`.
///
/// A file matches `name` when it is called `name.jar` or
/// `name-<version>.jar` with a version starting with a digit. Results follow
/// the order of `artifact_names`; among several matches for one name the
/// lexicographically greatest path wins, so the newest version of a
/// conventionally laid out cache is picked. Names with no match are logged
/// and skipped.
pub fn find_artifacts<P, S>(search_roots: &[P], artifact_names: &[S]) -> Vec<ClasspathEntry>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let jars: Vec<PathBuf> = search_roots
        .iter()
        .flat_map(|root| {
            WalkDir::new(root.as_ref())
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| {
                    path.extension()
                        .map(|ext| ext.eq_ignore_ascii_case("jar"))
                        .unwrap_or(false)
                })
        })
        .collect();

    artifact_names
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let found = jars
                .iter()
                .filter(|path| matches_artifact(path, name))
                .max()
                .cloned();
            match &found {
                Some(path) => debug!(artifact = name, path = %path.display(), "Found artifact"),
                None => warn!(artifact = name, "Artifact not found on any search root"),
            }
            found.map(ClasspathEntry::archive)
        })
        .collect()
}

fn matches_artifact(path: &Path, name: &str) -> bool {
    let stem = match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem,
        None => return false,
    };
    if stem == name {
        return true;
    }
    stem.strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|version| version.chars().next())
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
}
