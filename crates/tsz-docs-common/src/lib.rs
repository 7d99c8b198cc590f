//! Common types and utilities for the tsz documentation model.
//!
//! This crate provides foundational types used across all tsz-docs crates:
//! - Identifiers (`ReflectionId`, `FileId`, `ReflectionIdAllocator`)
//! - Reflection kinds and modifier flags (`ReflectionKind`, `ReflectionFlags`)
//! - Compiler symbol identity (`ReflectionSymbolId`, `CompilerSymbol`)
//! - Normalized paths and the file/media registry
//! - Traversal limits

pub mod ids;
pub use ids::{FileId, ReflectionId, ReflectionIdAllocator};

pub mod kind;
pub use kind::ReflectionKind;

pub mod flags;
pub use flags::ReflectionFlags;

pub mod symbol;
pub use symbol::{CompilerSymbol, ReflectionSymbolId};

pub mod paths;
pub use paths::NormalizedPath;

pub mod file_registry;
pub use file_registry::{FileRegistry, FileTarget, ResolvedFile};

pub mod limits;
