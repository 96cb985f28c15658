//! Language-level extraction types.
//!
//! The extractor reduces a Python module to the few facts the DataJoint
//! checks care about: import statements and class declarations, each with
//! the source span the diagnostics are reported against.

use std::path::PathBuf;

/// Source span of an extracted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed byte offset within line).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

/// One name bound by an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    /// Name as written after `import` (may be dotted for plain imports).
    pub name: String,
    /// Alias given with `as`, if any.
    pub alias: Option<String>,
}

impl ImportedName {
    /// Creates an import name without alias.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// Creates an aliased import name.
    #[must_use]
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// Alias if present, the name as written otherwise.
    #[must_use]
    pub fn alias_or_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Kind of import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    /// `import a, b.c as d`
    Module {
        /// Imported modules.
        names: Vec<ImportedName>,
    },
    /// `from m import X, Y as Z`
    From {
        /// Source module as written (may be relative, e.g. `.schema`).
        module: String,
        /// Imported names.
        names: Vec<ImportedName>,
    },
    /// `from m import *`
    Wildcard {
        /// Source module as written.
        module: String,
    },
}

/// A single import statement extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// Span of the whole statement.
    pub span: SourceSpan,
    /// What the statement imports.
    pub kind: ImportKind,
}

/// The `definition` class attribute, as far as it can be known statically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionAttr {
    /// Assigned a plain string literal; holds the decoded value.
    Literal(String),
    /// Assigned something that is not a constant string (f-string, call, name...).
    NonLiteral,
    /// No `definition` assignment in the class body.
    Missing,
}

/// A class declaration extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Class name.
    pub name: String,
    /// Base class expressions in declaration order (e.g. `dj.Manual`).
    pub bases: Vec<String>,
    /// The `definition` attribute of the class body.
    pub definition: DefinitionAttr,
    /// Span from the `class` keyword to the end of the class name.
    pub span: SourceSpan,
    /// Name of the directly enclosing class, for nested declarations.
    pub enclosing: Option<String>,
}

impl ClassInfo {
    /// First base class, as written.
    #[must_use]
    pub fn first_base(&self) -> Option<&str> {
        self.bases.first().map(String::as_str)
    }
}

/// Result of analyzing a single Python module.
#[derive(Debug, Clone, Default)]
pub struct ModuleAnalysis {
    /// Path relative to project root.
    pub file_path: PathBuf,
    /// All import statements, in source order, at any nesting depth.
    pub imports: Vec<ImportInfo>,
    /// All class declarations, in pre-order (outer classes before nested ones).
    pub classes: Vec<ClassInfo>,
}
