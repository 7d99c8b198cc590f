//! Parsed documentation comments.
//!
//! Comment *text* parsing happens upstream; this module only models the
//! already-parsed display parts and tags so they can be stored on reflections
//! and serialized.

use indexmap::IndexSet;
use tsz_docs_common::{FileId, ReflectionId, ReflectionSymbolId};

/// Where an inline `{@link}` style tag points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineTagTarget {
    Reflection(ReflectionId),
    Symbol(ReflectionSymbolId),
    Url(String),
    /// Reflection id from a serialized project that has not been translated
    /// into the reviving project's id space yet.
    Pending(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineTagDisplayPart {
    /// Tag name including the `@`, e.g. `@link`.
    pub tag: String,
    pub text: String,
    pub target: Option<InlineTagTarget>,
    /// Link text as written in source, kept for `@link` tags the compiler resolved.
    pub ts_link_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelativeLinkDisplayPart {
    pub text: String,
    /// `None` when the linked file could not be found.
    pub target: Option<FileId>,
    pub target_anchor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentDisplayPart {
    Text(String),
    Code(String),
    InlineTag(InlineTagDisplayPart),
    RelativeLink(RelativeLinkDisplayPart),
}

impl CommentDisplayPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::Code(text.into())
    }

    pub fn inline_tag(tag: impl Into<String>, text: impl Into<String>, target: Option<InlineTagTarget>) -> Self {
        Self::InlineTag(InlineTagDisplayPart {
            tag: tag.into(),
            text: text.into(),
            target,
            ts_link_text: None,
        })
    }

    /// Serialized `kind` discriminator.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Code(_) => "code",
            Self::InlineTag(_) => "inline-tag",
            Self::RelativeLink(_) => "relative-link",
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Code(text) => text,
            Self::InlineTag(tag) => &tag.text,
            Self::RelativeLink(link) => &link.text,
        }
    }
}

/// Concatenate the raw text of `parts`.
pub fn combine_display_parts(parts: &[CommentDisplayPart]) -> String {
    parts.iter().map(CommentDisplayPart::as_text).collect()
}

/// A block tag such as `@param x description`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentTag {
    /// Tag name including the `@`.
    pub tag: String,
    /// Parameter or type parameter name for `@param`/`@typeParam`.
    pub name: Option<String>,
    pub content: Vec<CommentDisplayPart>,
}

impl CommentTag {
    pub fn new(tag: impl Into<String>, content: Vec<CommentDisplayPart>) -> Self {
        Self {
            tag: tag.into(),
            name: None,
            content,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Comment {
    pub summary: Vec<CommentDisplayPart>,
    pub block_tags: Vec<CommentTag>,
    /// Modifier tags (`@beta`, `@hidden`, ...) in the order they were first seen.
    pub modifier_tags: IndexSet<String>,
    /// Label from `{@label}`, used to disambiguate overloads.
    pub label: Option<String>,
}

impl Comment {
    pub fn new(summary: Vec<CommentDisplayPart>) -> Self {
        Self {
            summary,
            ..Self::default()
        }
    }

    pub fn has_modifier(&self, tag: &str) -> bool {
        self.modifier_tags.contains(tag)
    }

    pub fn get_tag(&self, tag: &str) -> Option<&CommentTag> {
        self.block_tags.iter().find(|t| t.tag == tag)
    }

    pub fn get_tags<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a CommentTag> + 'a {
        self.block_tags.iter().filter(move |t| t.tag == tag)
    }

    pub fn remove_tags(&mut self, tag: &str) {
        self.block_tags.retain(|t| t.tag != tag);
    }

    pub fn is_empty(&self) -> bool {
        self.summary.iter().all(|p| p.as_text().trim().is_empty())
            && self.block_tags.is_empty()
            && self.modifier_tags.is_empty()
    }

    /// All display parts of the comment: summary first, then each block tag.
    pub fn display_parts(&self) -> impl Iterator<Item = &CommentDisplayPart> {
        self.summary
            .iter()
            .chain(self.block_tags.iter().flat_map(|t| t.content.iter()))
    }

    pub fn display_parts_mut(&mut self) -> impl Iterator<Item = &mut CommentDisplayPart> {
        self.summary
            .iter_mut()
            .chain(self.block_tags.iter_mut().flat_map(|t| t.content.iter_mut()))
    }
}

#[cfg(test)]
#[path = "../tests/comment_tests.rs"]
mod tests;
