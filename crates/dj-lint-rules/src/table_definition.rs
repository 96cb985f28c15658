//! Rule checking DataJoint table classes and their `definition` strings.
//!
//! # Rationale
//!
//! Table definitions are only parsed when a schema is activated against a
//! database, so mistakes in them surface late. This rule declares every
//! table offline and reports what DataJoint would reject, plus a few
//! reference problems DataJoint accepts silently.
//!
//! # Configuration
//!
//! `[datajoint]` section:
//!
//! - `permit_filepath`: accept `filepath@store` attributes (default: false)
//! - `module_aliases`: module names for `dj.Manual` style bases (default: `dj`, `datajoint`)
//! - `extension_bases`: bare base names treated as tables (default: `_Merge`)
//! - `null_pk_ref`: `after-options` or `per-option` (default: `after-options`)
//!
//! # Suppression
//!
//! - `# dj-lint: allow(no-pk)` on or above the class line
//! - `# pylint: disable=no-pk` on the class line

use crate::catalog::{Emitter, CATALOG};
use crate::classifier::DefinitionClassifier;
use crate::namespace::NamespaceTracker;
use crate::table_kind::{TableDeclaration, TableKindResolver};
use dj_lint_core::{DataJointConfig, FileContext, MessageSpec, NullPkRefMode, Rule, Violation};
use dj_lint_python::ModuleAnalysis;
use tracing::trace;

/// Rule name for the table definition checks.
pub const NAME: &str = "table-definition";

/// Checks every recognized table class of a module.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    kinds: TableKindResolver,
    /// Accept `filepath@store` attributes.
    pub permit_filepath: bool,
    /// How `null-pk-ref` interacts with `bad-opt`.
    pub null_pk_ref: NullPkRefMode,
}

impl Default for TableDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDefinition {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&DataJointConfig::default())
    }

    /// Creates the rule from the `[datajoint]` configuration section.
    #[must_use]
    pub fn from_config(config: &DataJointConfig) -> Self {
        Self {
            kinds: TableKindResolver::from_config(config),
            permit_filepath: config.permit_filepath,
            null_pk_ref: config.null_pk_ref,
        }
    }

    /// Sets whether `filepath@store` attributes are accepted.
    #[must_use]
    pub fn permit_filepath(mut self, permit: bool) -> Self {
        self.permit_filepath = permit;
        self
    }

    /// Sets the `null-pk-ref` mode.
    #[must_use]
    pub fn null_pk_ref(mut self, mode: NullPkRefMode) -> Self {
        self.null_pk_ref = mode;
        self
    }
}

impl Rule for TableDefinition {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Validates DataJoint table definitions and their foreign key references"
    }

    fn messages(&self) -> &'static [MessageSpec] {
        &CATALOG
    }

    fn check(&self, ctx: &FileContext, module: &ModuleAnalysis) -> Vec<Violation> {
        let mut emitter = Emitter::new(ctx.relative_path.clone());
        let mut namespace = NamespaceTracker::new();

        // Collect every visible name first so references may point forward.
        for import in &module.imports {
            namespace.observe(import, &mut emitter);
        }
        let kinds: Vec<_> = module
            .classes
            .iter()
            .filter_map(|class| self.kinds.classify(class).map(|kind| (class, kind)))
            .collect();
        for (class, _) in &kinds {
            namespace.observe_class_declared(&class.name);
        }
        trace!(
            "{}: {} table classes, {} imports",
            ctx.relative_path.display(),
            kinds.len(),
            module.imports.len()
        );

        let classifier = DefinitionClassifier::new(&namespace, self.null_pk_ref)
            .permit_filepath(self.permit_filepath);
        for (class, kind) in &kinds {
            classifier.classify(&TableDeclaration::new(class, kind), &mut emitter);
        }

        emitter.into_violations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dj_lint_python::PythonExtractor;
    use std::path::Path;

    fn check(rule: &TableDefinition, source: &str) -> Vec<String> {
        let module = PythonExtractor::new()
            .analyze(source)
            .expect("fixture should parse");
        let ctx = FileContext::new(Path::new("/p/schema.py"), source, Path::new("/p"));
        rule.check(&ctx, &module)
            .into_iter()
            .map(|v| format!("{}:{} {}", v.location.line, v.rule, v.message))
            .collect()
    }

    #[test]
    fn forward_references_resolve() {
        let source = r#"import datajoint as dj

class Session(dj.Manual):
    definition = """
    -> Subject
    session_id : int
    """

class Subject(dj.Manual):
    definition = """
    subject_id : int
    """
"#;
        assert!(check(&TableDefinition::new(), source).is_empty());
    }

    #[test]
    fn non_table_classes_are_ignored() {
        let source = "class Helper(object):\n    definition = 'not a table'\n";
        assert!(check(&TableDefinition::new(), source).is_empty());
    }

    #[test]
    fn permit_filepath_builder() {
        let source = r#"import datajoint as dj

class Raw(dj.Imported):
    definition = """
    id : int
    ---
    path : filepath@data
    """
"#;
        assert_eq!(
            check(&TableDefinition::new(), source),
            vec!["3:no-fp `Raw` err: Filepath type not supported"]
        );
        assert!(check(&TableDefinition::new().permit_filepath(true), source).is_empty());
    }
}
