//! Registry of files and media assets referenced from documentation.
//!
//! Every distinct normalized absolute path gets one small [`FileId`]. A subset
//! of ids is additionally owned by a reflection (a markdown document, a module
//! readme) so that links to the file can be rendered as links to the
//! reflection instead.

use crate::ids::{FileId, ReflectionId};
use crate::paths::{NormalizedPath, split_extension};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Result of registering a path that may carry a `#anchor` suffix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTarget {
    pub target: FileId,
    pub anchor: Option<String>,
}

/// What a file id points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedFile<'a> {
    /// The file is owned by a reflection.
    Reflection(ReflectionId),
    /// A plain media asset.
    Path(&'a NormalizedPath),
}

#[derive(Clone, Debug)]
pub struct FileRegistry {
    next_id: u32,
    media_to_path: IndexMap<FileId, NormalizedPath>,
    path_to_media: FxHashMap<NormalizedPath, FileId>,
    media_to_reflection: IndexMap<FileId, ReflectionId>,
    reflection_to_path: FxHashMap<ReflectionId, NormalizedPath>,
    names: FxHashMap<FileId, String>,
    name_usage: FxHashMap<String, u32>,
}

impl Default for FileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FileRegistry {
    pub fn new() -> Self {
        Self {
            next_id: FileId::FIRST.0,
            media_to_path: IndexMap::new(),
            path_to_media: FxHashMap::default(),
            media_to_reflection: IndexMap::new(),
            reflection_to_path: FxHashMap::default(),
            names: FxHashMap::default(),
            name_usage: FxHashMap::default(),
        }
    }

    /// Register an absolute path, optionally suffixed with `#anchor`.
    ///
    /// Re-registering a known path returns its existing id.
    pub fn register_absolute(&mut self, path: &str) -> FileTarget {
        let (path, anchor) = match path.split_once('#') {
            Some((path, anchor)) => (path, Some(anchor.to_string())),
            None => (path, None),
        };
        let normalized = NormalizedPath::new(path);
        if let Some(&existing) = self.path_to_media.get(&normalized) {
            return FileTarget {
                target: existing,
                anchor,
            };
        }

        let id = FileId(self.next_id);
        self.next_id += 1;
        trace!(file_id = id.0, path = %normalized, "file registered");
        self.media_to_path.insert(id, normalized.clone());
        self.path_to_media.insert(normalized, id);
        FileTarget { target: id, anchor }
    }

    /// Register `relative_path` as referenced from the file at `source_path`.
    pub fn register(&mut self, source_path: &str, relative_path: &str) -> FileTarget {
        let source = NormalizedPath::new(source_path);
        let absolute = NormalizedPath::resolve(source.dirname(), relative_path);
        self.register_absolute(absolute.as_str())
    }

    /// Record that the file at `path` is owned by `reflection`.
    pub fn register_reflection(&mut self, path: &str, reflection: ReflectionId) -> FileId {
        let FileTarget { target, .. } = self.register_absolute(path);
        let normalized = self.media_to_path[&target].clone();
        self.reflection_to_path.insert(reflection, normalized);
        self.media_to_reflection.insert(target, reflection);
        target
    }

    /// Associate an already registered file id with a reflection.
    ///
    /// Used when reviving a serialized registry, where the path mapping is read
    /// before the owning reflection exists.
    pub fn set_reflection(&mut self, file: FileId, reflection: ReflectionId) {
        if let Some(path) = self.media_to_path.get(&file) {
            self.reflection_to_path.insert(reflection, path.clone());
            self.media_to_reflection.insert(file, reflection);
        }
    }

    pub fn get_reflection_path(&self, reflection: ReflectionId) -> Option<&NormalizedPath> {
        self.reflection_to_path.get(&reflection)
    }

    /// Forget the reflection mapping for `reflection`; the path stays registered.
    pub fn remove_reflection(&mut self, reflection: ReflectionId) {
        let Some(path) = self.reflection_to_path.remove(&reflection) else {
            return;
        };
        if let Some(media) = self.path_to_media.get(&path)
            && self.media_to_reflection.get(media) == Some(&reflection)
        {
            self.media_to_reflection.shift_remove(media);
        }
    }

    pub fn resolve(&self, file: FileId) -> Option<ResolvedFile<'_>> {
        if let Some(&reflection) = self.media_to_reflection.get(&file) {
            return Some(ResolvedFile::Reflection(reflection));
        }
        self.media_to_path.get(&file).map(ResolvedFile::Path)
    }

    pub fn path(&self, file: FileId) -> Option<&NormalizedPath> {
        self.media_to_path.get(&file)
    }

    pub fn id_of(&self, path: &str) -> Option<FileId> {
        self.path_to_media.get(&NormalizedPath::new(path)).copied()
    }

    /// Unique output name for a media file.
    ///
    /// The first file named `x.png` keeps its name; later distinct files with
    /// the same base name become `x-1.png`, `x-2.png`, ...
    pub fn get_name(&mut self, file: FileId) -> Option<String> {
        let absolute = self.media_to_path.get(&file)?;
        if let Some(name) = self.names.get(&file) {
            return Some(name.clone());
        }

        let base = absolute.basename().to_string();
        let name = match self.name_usage.get(&base).copied() {
            None => {
                self.name_usage.insert(base.clone(), 1);
                base
            }
            Some(mut counter) => {
                let (stem, ext) = split_extension(&base);
                let mut candidate = format!("{stem}-{counter}{ext}");
                while self.name_usage.contains_key(&candidate) {
                    counter += 1;
                    candidate = format!("{stem}-{counter}{ext}");
                }
                self.name_usage.insert(base.clone(), counter + 1);
                self.name_usage.insert(candidate.clone(), 1);
                candidate
            }
        };
        self.names.insert(file, name.clone());
        Some(name)
    }

    /// Output names of every registered media file that is not owned by a
    /// reflection, mapped to their absolute paths.
    pub fn get_name_to_absolute_map(&mut self) -> IndexMap<String, NormalizedPath> {
        let ids: Vec<FileId> = self
            .media_to_path
            .keys()
            .filter(|id| !self.media_to_reflection.contains_key(*id))
            .copied()
            .collect();
        let mut out = IndexMap::new();
        for id in ids {
            if let Some(name) = self.get_name(id) {
                out.insert(name, self.media_to_path[&id].clone());
            }
        }
        out
    }

    /// Registered files in id order.
    pub fn entries(&self) -> impl Iterator<Item = (FileId, &NormalizedPath)> {
        self.media_to_path.iter().map(|(id, path)| (*id, path))
    }

    /// File-to-reflection mappings in registration order.
    pub fn reflections(&self) -> impl Iterator<Item = (FileId, ReflectionId)> + '_ {
        self.media_to_reflection.iter().map(|(f, r)| (*f, *r))
    }

    pub fn len(&self) -> usize {
        self.media_to_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.media_to_path.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/file_registry_tests.rs"]
mod tests;
