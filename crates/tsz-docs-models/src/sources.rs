//! Source locations attached to declarations and signatures.

use tsz_docs_common::NormalizedPath;

/// Where a declaration or signature was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceReference {
    /// Path shown to readers, relative to the project root.
    pub file_name: String,
    /// Absolute path. Not serialized; rebuilt from `file_name` when reviving.
    pub full_file_name: NormalizedPath,
    /// One-based line.
    pub line: u32,
    /// Zero-based column.
    pub character: u32,
    /// Link to the hosted source, when a source-link template is configured.
    pub url: Option<String>,
}

impl SourceReference {
    pub fn new(full_file_name: &str, line: u32, character: u32) -> Self {
        let full_file_name = NormalizedPath::new(full_file_name);
        Self {
            file_name: full_file_name.basename().to_string(),
            full_file_name,
            line,
            character,
            url: None,
        }
    }

    /// Rebase the displayed file name onto `project_root`.
    pub fn relative_to(mut self, project_root: &str) -> Self {
        self.file_name = self.full_file_name.relative_to(project_root);
        self
    }
}
