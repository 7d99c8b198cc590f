//! Compiler symbol identity.
//!
//! The documentation model never holds live compiler symbols. It stores a
//! [`ReflectionSymbolId`], a value that identifies a symbol by the file that
//! declares it and its qualified name, and compares those for identity only.
//! The host compiler integration supplies them through [`CompilerSymbol`].

use crate::paths::NormalizedPath;
use std::fmt;

/// Stable identity of a compiler symbol.
///
/// `pos` and `transient_id` disambiguate symbols that share a qualified name
/// within one file (overloads merged from separate declarations, transient
/// symbols created by the checker). They are not serialized, so a symbol id
/// read back from JSON carries neither.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReflectionSymbolId {
    /// Absolute path of the declaring source file.
    pub file_name: NormalizedPath,
    pub qualified_name: String,
    pub pos: Option<u32>,
    pub transient_id: Option<u32>,
}

impl ReflectionSymbolId {
    pub fn new(file_name: &str, qualified_name: impl Into<String>) -> Self {
        Self {
            file_name: NormalizedPath::new(file_name),
            qualified_name: qualified_name.into(),
            pos: None,
            transient_id: None,
        }
    }

    #[must_use]
    pub fn with_pos(mut self, pos: u32) -> Self {
        self.pos = Some(pos);
        self
    }

    #[must_use]
    pub fn with_transient_id(mut self, transient_id: u32) -> Self {
        self.transient_id = Some(transient_id);
        self
    }

    /// Rebuild an id from its serialized form.
    ///
    /// `source_file_name` is relative to `project_root` unless already absolute.
    pub fn from_serialized(project_root: &str, source_file_name: &str, qualified_name: &str) -> Self {
        Self {
            file_name: NormalizedPath::resolve(project_root, source_file_name),
            qualified_name: qualified_name.to_string(),
            pos: None,
            transient_id: None,
        }
    }

    /// File name as written to JSON: relative to `project_root` when possible.
    pub fn serialized_file_name(&self, project_root: &str) -> String {
        if self.file_name.is_absolute() {
            self.file_name.relative_to(project_root)
        } else {
            self.file_name.as_str().to_string()
        }
    }

    /// Key that is stable across incremental runs, suitable for external caches.
    pub fn stable_key(&self) -> String {
        match (self.pos, self.transient_id) {
            (None, None) => format!("{}\0{}", self.file_name, self.qualified_name),
            (pos, transient) => format!(
                "{}\0{}\0{}\0{}",
                self.file_name,
                self.qualified_name,
                pos.map_or(-1, i64::from),
                transient.map_or(-1, i64::from)
            ),
        }
    }
}

impl fmt::Debug for ReflectionSymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionSymbolId({}:{}", self.file_name, self.qualified_name)?;
        if let Some(pos) = self.pos {
            write!(f, "@{pos}")?;
        }
        f.write_str(")")
    }
}

/// A symbol handle supplied by the host compiler integration.
///
/// Only identity queries are needed by the registry; type queries stay on the
/// converter side.
pub trait CompilerSymbol {
    /// Identity of this symbol.
    fn symbol_id(&self) -> ReflectionSymbolId;

    /// Identity of the class or interface that declares this symbol after
    /// alias resolution, when the symbol is a member.
    fn parent_symbol_id(&self) -> Option<ReflectionSymbolId> {
        None
    }

    /// Files containing the symbol's declarations.
    fn declaration_files(&self) -> Vec<NormalizedPath> {
        Vec::new()
    }
}

impl CompilerSymbol for ReflectionSymbolId {
    fn symbol_id(&self) -> ReflectionSymbolId {
        self.clone()
    }

    fn declaration_files(&self) -> Vec<NormalizedPath> {
        vec![self.file_name.clone()]
    }
}

#[cfg(test)]
#[path = "../tests/symbol_tests.rs"]
mod tests;
