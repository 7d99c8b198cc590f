//! Identifiers for reflections and registered files.
//!
//! Both ids are plain `u32` newtypes. Every "points-to-but-does-not-own" edge in
//! the documentation model is expressed with one of these and resolved through
//! the owning registry, never through a direct reference.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ReflectionId
// =============================================================================

/// Identifier of a reflection inside a `ProjectReflection`.
///
/// Ids are allocated by [`ReflectionIdAllocator`] in strictly increasing order.
/// The project root always receives [`ReflectionId::PROJECT`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReflectionId(pub u32);

impl ReflectionId {
    /// Id of the project root.
    pub const PROJECT: Self = Self(0);

    /// Value written to JSON for a reference whose target could not be found.
    pub const BROKEN_JSON: i64 = -1;

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_project(self) -> bool {
        self.0 == Self::PROJECT.0
    }
}

impl fmt::Debug for ReflectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionId({})", self.0)
    }
}

impl fmt::Display for ReflectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ReflectionId> for u32 {
    #[inline]
    fn from(id: ReflectionId) -> Self {
        id.0
    }
}

/// Monotonic allocator for reflection ids.
///
/// Each registry owns one allocator, so two registries built from identical
/// input produce identical id sequences without any global state.
#[derive(Clone, Debug, Default)]
pub struct ReflectionIdAllocator {
    next: u32,
}

impl ReflectionIdAllocator {
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate the next id.
    pub fn alloc(&mut self) -> ReflectionId {
        let id = ReflectionId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .expect("reflection id space exhausted");
        id
    }

    /// Id that the next call to [`alloc`](Self::alloc) will return.
    pub const fn peek(&self) -> ReflectionId {
        ReflectionId(self.next)
    }

    /// Restart numbering from zero. Only meaningful for a registry that is
    /// about to be rebuilt from scratch.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

// =============================================================================
// FileId
// =============================================================================

/// Identifier of a file or media asset inside a `FileRegistry`.
///
/// File ids start at [`FileId::FIRST`]; zero is never handed out.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

impl FileId {
    pub const FIRST: Self = Self(1);

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

#[cfg(test)]
#[path = "../tests/ids_tests.rs"]
mod tests;
