//! Presentation groupings of a container's children.
//!
//! Groups and categories reference children by id only; they never own them.
//! The registry drops memberships when a reflection is removed.

use crate::comment::CommentDisplayPart;
use tsz_docs_common::ReflectionId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReflectionCategory {
    pub title: String,
    pub description: Option<Vec<CommentDisplayPart>>,
    pub children: Vec<ReflectionId>,
}

impl ReflectionCategory {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReflectionGroup {
    pub title: String,
    pub description: Option<Vec<CommentDisplayPart>>,
    pub children: Vec<ReflectionId>,
    /// Categories within this group, when categorization runs per group.
    pub categories: Option<Vec<ReflectionCategory>>,
}

impl ReflectionGroup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Drop `id` from this group and its categories.
    ///
    /// Returns `true` when the group is left without children.
    pub(crate) fn remove_child(&mut self, id: ReflectionId) -> bool {
        self.children.retain(|&c| c != id);
        if let Some(categories) = &mut self.categories {
            remove_from_categories(categories, id);
            if categories.is_empty() {
                self.categories = None;
            }
        }
        self.children.is_empty()
    }
}

/// Drop `id` from every category, removing categories that become empty.
pub(crate) fn remove_from_categories(categories: &mut Vec<ReflectionCategory>, id: ReflectionId) {
    for category in categories.iter_mut() {
        category.children.retain(|&c| c != id);
    }
    categories.retain(|c| !c.children.is_empty());
}
