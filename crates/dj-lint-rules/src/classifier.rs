//! Turns the outcome of declaring one table into diagnostics.

use crate::catalog::{Emitter, RuleId};
use crate::fk_interpreter::ForeignKeyInterpreter;
use crate::namespace::NamespaceTracker;
use crate::table_kind::TableDeclaration;
use dj_lint_core::NullPkRefMode;
use dj_lint_declare::{prepare_declare, DeclareContext};
use dj_lint_python::DefinitionAttr;
use tracing::debug;

/// Marker the parser puts in its error when `filepath` attributes are off.
const FILEPATH_MARKER: &str = "filepath data";

/// Classifies table definitions of one file.
#[derive(Debug)]
pub struct DefinitionClassifier<'a> {
    interpreter: ForeignKeyInterpreter<'a>,
    permit_filepath: bool,
    context: DeclareContext,
}

impl<'a> DefinitionClassifier<'a> {
    /// Creates a classifier over a fully populated namespace.
    #[must_use]
    pub fn new(namespace: &'a NamespaceTracker, null_pk_ref: NullPkRefMode) -> Self {
        Self {
            interpreter: ForeignKeyInterpreter::new(namespace, null_pk_ref),
            permit_filepath: false,
            context: DeclareContext::new(),
        }
    }

    /// Accept `filepath@store` attributes silently.
    #[must_use]
    pub fn permit_filepath(mut self, permit: bool) -> Self {
        self.permit_filepath = permit;
        self
    }

    /// Emits zero or more diagnostics for `table`.
    pub fn classify(&self, table: &TableDeclaration<'_>, emitter: &mut Emitter) {
        let definition = match table.definition {
            DefinitionAttr::Literal(text) if !text.trim().is_empty() => text,
            DefinitionAttr::Literal(_) | DefinitionAttr::Missing => {
                emitter.emit(RuleId::NoDef, table.span, vec![table.name.to_string()]);
                return;
            }
            DefinitionAttr::NonLiteral => {
                debug!("Skipping {}: definition is not a string literal", table.name);
                return;
            }
        };

        match prepare_declare(definition, &self.context) {
            Ok(declaration) => {
                if declaration.primary_key.is_empty() {
                    emitter.emit(RuleId::NoPk, table.span, vec![table.name.to_string()]);
                }
            }
            Err(err) => self.report_failure(table, err.message(), definition, emitter),
        }
    }

    fn report_failure(
        &self,
        table: &TableDeclaration<'_>,
        message: &str,
        definition: &str,
        emitter: &mut Emitter,
    ) {
        if self.interpreter.resolve(table, message, definition, emitter) {
            debug!("{}: reference resolved in file scope: {}", table.name, message);
            return;
        }
        if message.contains(FILEPATH_MARKER) {
            if !self.permit_filepath {
                emitter.emit(RuleId::NoFp, table.span, vec![table.name.to_string()]);
            }
            return;
        }
        emitter.emit(
            RuleId::DefinitionError,
            table.span,
            vec![table.name.to_string(), message.to_string()],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_kind::TableKind;
    use dj_lint_python::SourceSpan;
    use std::path::PathBuf;

    fn run(definition: DefinitionAttr, permit: bool) -> Vec<String> {
        let ns = NamespaceTracker::new();
        let kind = TableKind::Manual;
        let table = TableDeclaration {
            name: "Probe",
            kind: &kind,
            definition: &definition,
            span: SourceSpan {
                line: 3,
                column: 0,
                offset: 24,
                length: 11,
            },
            enclosing: None,
        };
        let mut emitter = Emitter::new(PathBuf::from("probe.py"));
        DefinitionClassifier::new(&ns, NullPkRefMode::default())
            .permit_filepath(permit)
            .classify(&table, &mut emitter);
        emitter
            .into_violations()
            .into_iter()
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect()
    }

    fn literal(text: &str) -> DefinitionAttr {
        DefinitionAttr::Literal(text.to_string())
    }

    #[test]
    fn valid_definition_is_silent() {
        assert!(run(literal("probe : varchar(32)\n---\nmodel : varchar(64)"), false).is_empty());
    }

    #[test]
    fn missing_and_blank_definitions() {
        let expected = vec!["no-def: `Probe` err: Table has no definition".to_string()];
        assert_eq!(run(DefinitionAttr::Missing, false), expected);
        assert_eq!(run(literal("  \n   "), false), expected);
        assert!(run(DefinitionAttr::NonLiteral, false).is_empty());
    }

    #[test]
    fn no_primary_key() {
        assert_eq!(
            run(literal("# Ephys\n"), false),
            vec!["no-pk: `Probe` err: Table must have a primary key."]
        );
        assert_eq!(
            run(literal("---\nnote : varchar(8)"), false),
            vec!["no-pk: `Probe` err: Table must have a primary key."]
        );
    }

    #[test]
    fn filepath_depends_on_permit() {
        let definition = literal("id : int\n---\nthis_path : filepath@data");
        assert_eq!(
            run(definition.clone(), false),
            vec!["no-fp: `Probe` err: Filepath type not supported"]
        );
        assert!(run(definition, true).is_empty());
    }

    #[test]
    fn parser_errors_become_definition_errors() {
        assert_eq!(
            run(literal("id : int\n---\nvalue : badtype"), false),
            vec!["definition-error: `Probe` err: Unsupported attribute type badtype"]
        );
    }

    #[test]
    fn unresolved_reference_is_a_definition_error() {
        assert_eq!(
            run(literal("-> [nullable] FakeTable\n---\n"), false),
            vec![
                "null-pk-ref: `Probe` err: Primary dependencies cannot be nullable",
                "definition-error: `Probe` err: Foreign key reference  FakeTable could not be resolved",
            ]
        );
    }
}
