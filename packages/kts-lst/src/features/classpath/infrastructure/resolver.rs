//! Classpath resolver
//!
//! Maps qualified names to type descriptors by scanning an ordered list of
//! class directories and archives. Nothing is read at construction time
//! beyond checking that each entry exists; class files are decoded on first
//! lookup and cached for the resolver's lifetime.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use super::archive::ArchiveHandle;
use super::class_reader;
use super::symbol_index::SymbolIndex;
use crate::features::classpath::domain::builtins::{builtin_descriptor, script_template_descriptor};
use crate::features::classpath::domain::{
    accessor_names, ClasspathEntry, EntryKind, MemberKind, MemberSignature, Origin, Resolution, TypeDescriptor,
    TypeKind,
};
use crate::features::classpath::ports::SymbolResolver;
use crate::shared::models::{Diagnostic, LstError, Result};

enum Location {
    Directory(PathBuf),
    Archive(ArchiveHandle),
    Missing,
}

pub struct ClasspathResolver {
    entries: Vec<ClasspathEntry>,
    locations: Vec<Location>,
    fallbacks: FxHashMap<String, Arc<TypeDescriptor>>,
    types: SymbolIndex,
    members: SymbolIndex,
    warnings: Vec<Diagnostic>,
}

impl ClasspathResolver {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ClasspathEntry>,
    {
        Self::with_fallbacks(entries, Vec::new())
    }

    /// Resolver with extra descriptors consulted after the classpath and
    /// before the builtins
    pub fn with_fallbacks<I>(entries: I, fallbacks: Vec<TypeDescriptor>) -> Self
    where
        I: IntoIterator<Item = ClasspathEntry>,
    {
        let entries: Vec<ClasspathEntry> = entries.into_iter().collect();
        let mut warnings = Vec::new();
        let locations: Vec<Location> = entries
            .iter()
            .map(|entry| {
                if !entry.exists() {
                    warn!(entry = %entry.path.display(), "Classpath entry does not exist");
                    warnings.push(Diagnostic::classpath_entry_missing(&entry.path));
                    return Location::Missing;
                }
                match entry.kind {
                    EntryKind::Directory => Location::Directory(entry.path.clone()),
                    EntryKind::Archive => Location::Archive(ArchiveHandle::new(&entry.path)),
                }
            })
            .collect();

        info!(
            entries = entries.len(),
            missing = warnings.len(),
            "Classpath resolver ready"
        );

        Self {
            entries,
            locations,
            fallbacks: fallbacks
                .into_iter()
                .map(|d| (d.qualified_name.clone(), Arc::new(d)))
                .collect(),
            types: SymbolIndex::new(),
            members: SymbolIndex::new(),
            warnings,
        }
    }

    pub fn entries(&self) -> &[ClasspathEntry] {
        &self.entries
    }

    /// Number of type names looked up so far (hits and misses)
    pub fn cached_types(&self) -> usize {
        self.types.len()
    }

    fn load_type(&self, name: &str) -> Result<Resolution> {
        let candidates = class_file_candidates(name);
        for (index, location) in self.locations.iter().enumerate() {
            for candidate in &candidates {
                if let Some(bytes) = self.read(location, candidate)? {
                    debug!(symbol = name, entry = index, path = %candidate, "Resolved from classpath");
                    let descriptor = decode(name, &bytes, index);
                    return Ok(Resolution::Resolved(Arc::new(descriptor)));
                }
            }
        }

        let fallback = self
            .fallbacks
            .get(name)
            .cloned()
            .or_else(|| builtin_descriptor(name))
            .or_else(|| script_template_descriptor(name));
        Ok(match fallback {
            Some(descriptor) => Resolution::Resolved(descriptor),
            None => {
                debug!(symbol = name, "Not found on classpath");
                Resolution::Unresolved
            }
        })
    }

    fn read(&self, location: &Location, relative: &str) -> Result<Option<Vec<u8>>> {
        match location {
            Location::Directory(root) => {
                let path = root.join(relative);
                if !path.is_file() {
                    return Ok(None);
                }
                std::fs::read(&path).map(Some).map_err(|e| {
                    LstError::classpath(format!("Cannot read class file: {}", e))
                        .with_file(path.display().to_string())
                        .with_source(e)
                })
            }
            Location::Archive(handle) => handle.read(relative),
            Location::Missing => Ok(None),
        }
    }

    fn load_member(&self, owner: &str, member: &str) -> Result<Resolution> {
        let accessors = accessor_names(member);
        let mut matches: Vec<MemberSignature> = Vec::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([owner.to_string()]);

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name.clone()) {
                continue;
            }
            let descriptor = match self.resolve(&name)? {
                Resolution::Resolved(descriptor) => descriptor,
                Resolution::Unresolved => continue,
            };
            for candidate in &descriptor.members {
                let is_match = candidate.kind != MemberKind::Constructor
                    && (candidate.name == member
                        || (candidate.kind == MemberKind::Method
                            && accessors.iter().any(|a| *a == candidate.name)));
                if is_match && !matches.contains(candidate) {
                    matches.push(candidate.clone());
                }
            }
            queue.extend(descriptor.supertypes.iter().cloned());
        }

        if matches.is_empty() {
            return Ok(Resolution::Unresolved);
        }
        // direct name matches before accessors, stable otherwise
        matches.sort_by_key(|m| m.name != member);
        let mut descriptor = TypeDescriptor::new(
            TypeKind::Function,
            format!("{}.{}", owner, member),
            Origin::Member,
        );
        descriptor.members = matches;
        Ok(Resolution::Resolved(Arc::new(descriptor)))
    }
}

impl SymbolResolver for ClasspathResolver {
    fn resolve(&self, qualified_name: &str) -> Result<Resolution> {
        if !is_qualified_name(qualified_name) {
            return Ok(Resolution::Unresolved);
        }
        self.types
            .get_or_try_init(qualified_name, || self.load_type(qualified_name))
    }

    fn resolve_member(&self, owner: &str, member: &str) -> Result<Resolution> {
        let key = format!("{}.{}", owner, member);
        self.members
            .get_or_try_init(&key, || self.load_member(owner, member))
    }

    fn warnings(&self) -> Vec<Diagnostic> {
        let unreadable = self.locations.iter().filter_map(|location| match location {
            Location::Archive(handle) => handle
                .open_failure()
                .map(|e| Diagnostic::classpath_entry_unreadable(handle.path(), &e.message)),
            _ => None,
        });
        self.warnings.iter().cloned().chain(unreadable).collect()
    }
}

impl std::fmt::Debug for ClasspathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClasspathResolver")
            .field("entries", &self.entries)
            .field("cached_types", &self.types.len())
            .field("warnings", &self.warnings.len())
            .finish()
    }
}

/// A malformed class file still resolves, to an opaque descriptor
fn decode(name: &str, bytes: &[u8], entry: usize) -> TypeDescriptor {
    let origin = Origin::Classpath { entry };
    match class_reader::parse_class(bytes, origin) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!(symbol = name, entry, error = %e, "Malformed class file");
            TypeDescriptor::new(TypeKind::Unknown, name, origin)
        }
    }
}

fn is_qualified_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('.')
            .all(|seg| !seg.is_empty() && !seg.contains(['/', '\\']))
}

/// `a.b.C.D` → `a/b/C/D.class`, `a/b/C$D.class`, `a/b$C$D.class`, ...
fn class_file_candidates(name: &str) -> Vec<String> {
    let segments: Vec<&str> = name.split('.').collect();
    (1..=segments.len())
        .map(|nested| {
            let split = segments.len() - nested;
            let class = segments[split..].join("$");
            if split == 0 {
                format!("{}.class", class)
            } else {
                format!("{}/{}.class", segments[..split].join("/"), class)
            }
        })
        .collect()
}
