//! Names visible to foreign key references within one file.

use crate::catalog::{Emitter, RuleId};
use dj_lint_python::{ImportInfo, ImportKind, ImportedName, SourceSpan};
use std::collections::HashSet;

/// Per-file sets of table-like names and imported module names.
///
/// One tracker is built per file and never shared.
#[derive(Debug, Default)]
pub struct NamespaceTracker {
    classes: HashSet<String>,
    modules: HashSet<String>,
}

impl NamespaceTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes one import statement to the matching observer.
    pub fn observe(&mut self, import: &ImportInfo, emitter: &mut Emitter) {
        match &import.kind {
            ImportKind::Module { names } => self.observe_import(names),
            ImportKind::From { names, .. } => self.observe_import_from(names),
            ImportKind::Wildcard { .. } => Self::observe_star_import(import.span, emitter),
        }
    }

    /// `import a.b, c as d` records `a.b` and `d` as module names.
    ///
    /// A dotted import is kept whole, so a reference only resolves through
    /// it when the import is aliased.
    pub fn observe_import(&mut self, names: &[ImportedName]) {
        self.modules
            .extend(names.iter().map(|n| n.alias_or_name().to_string()));
    }

    /// `from m import X, Y as Z` binds `X` and `Z` as table-like names.
    pub fn observe_import_from(&mut self, names: &[ImportedName]) {
        self.classes
            .extend(names.iter().map(|n| n.alias_or_name().to_string()));
    }

    /// Wildcard imports cannot be enumerated; warn and record nothing.
    pub fn observe_star_import(span: SourceSpan, emitter: &mut Emitter) {
        emitter.emit(RuleId::WildcardImport, span, Vec::new());
    }

    /// Registers a recognized table class.
    pub fn observe_class_declared(&mut self, name: &str) {
        self.classes.insert(name.to_string());
    }

    /// Whether `name` is a known table or imported class.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    /// Whether `name` is a bound module name.
    #[must_use]
    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains(name)
    }
}
