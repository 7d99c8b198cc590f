//! Documentation model for tsz.
//!
//! - [`types`]: type expressions
//! - [`comment`]: parsed documentation comments
//! - [`reflection`]: documented entities and their structural roles
//! - [`project`]: the registry that owns a reflection tree and its indexes

pub mod comment;
pub mod groups;
pub mod project;
pub mod reflection;
pub mod sources;
pub mod types;

pub use comment::{Comment, CommentDisplayPart, CommentTag, InlineTagTarget};
pub use groups::{ReflectionCategory, ReflectionGroup};
pub use project::ProjectReflection;
pub use reflection::{Reflection, ReflectionVariant, ReferenceTarget, TraverseProperty, VariantTag};
pub use sources::SourceReference;
pub use types::{ReferenceType, ReferenceTypeTarget, Type, TypeKind};

pub use tsz_docs_common::{
    CompilerSymbol, FileId, ReflectionFlags, ReflectionId, ReflectionKind, ReflectionSymbolId,
};
