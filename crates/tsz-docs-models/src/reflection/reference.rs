//! Target of a reference (re-export) reflection.

use std::cell::OnceCell;
use tsz_docs_common::ReflectionId;

/// Lazily resolved target of a `Reference` reflection.
///
/// A target is either known up front by id or looked up once by full name.
/// The first lookup result is kept: a success is never undone and a failure is
/// never retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceTarget {
    qualified_name: Option<String>,
    resolved: OnceCell<Option<ReflectionId>>,
}

impl ReferenceTarget {
    pub fn id(id: ReflectionId) -> Self {
        Self {
            qualified_name: None,
            resolved: OnceCell::from(Some(id)),
        }
    }

    /// Target resolved on first access by matching full names.
    pub fn by_name(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            resolved: OnceCell::new(),
        }
    }

    pub fn broken() -> Self {
        Self {
            qualified_name: None,
            resolved: OnceCell::from(None),
        }
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    /// `Some(result)` once resolution has been attempted.
    pub fn state(&self) -> Option<Option<ReflectionId>> {
        self.resolved.get().copied()
    }

    pub(crate) fn resolve_with(&self, lookup: impl FnOnce(&str) -> Option<ReflectionId>) -> Option<ReflectionId> {
        *self
            .resolved
            .get_or_init(|| self.qualified_name.as_deref().and_then(lookup))
    }
}
