//! Whole-definition compilation.

use crate::attribute::{compile_attribute, Attribute};
use crate::context::DeclareContext;
use crate::error::DeclareError;
use crate::foreign_key::{compile_foreign_key, is_foreign_key, ForeignKey};
use crate::index::{is_index_line, Index};

/// The compiled form of a table definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    /// Text of the leading `# comment` line.
    pub table_comment: String,
    /// Primary key attribute names, in declaration order.
    pub primary_key: Vec<String>,
    /// All attributes, including those inherited through foreign keys.
    pub attributes: Vec<Attribute>,
    /// Foreign key references.
    pub foreign_keys: Vec<ForeignKey>,
    /// Secondary indexes.
    pub indexes: Vec<Index>,
    /// External stores used by `@store` attributes.
    pub external_stores: Vec<String>,
}

/// Splits a definition into whitespace-trimmed lines.
#[must_use]
pub fn split_lines(definition: &str) -> Vec<&str> {
    definition.trim().split('\n').map(str::trim).collect()
}

/// Compiles a table definition.
///
/// Lines before the first `---` (or `___`) separator form the primary key.
/// Lines starting with `#` are comments; a leading comment line is the
/// table comment.
///
/// # Errors
///
/// Returns the first problem found, in line order.
pub fn prepare_declare(
    definition: &str,
    context: &DeclareContext,
) -> Result<Declaration, DeclareError> {
    let mut lines = split_lines(definition);
    let mut declaration = Declaration::default();

    if let Some(first) = lines.first().and_then(|l| l.strip_prefix('#')) {
        declaration.table_comment = first.trim().to_string();
        lines.remove(0);
    }
    if declaration.table_comment.starts_with(':') {
        return Err(DeclareError::new(
            "Table comment must not start with a colon \":\"",
        ));
    }

    let mut in_key = true;
    for line in lines {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("---") || line.starts_with("___") {
            in_key = false;
        } else if is_foreign_key(line) {
            compile_foreign_key(line, in_key, context, &mut declaration)?;
        } else if is_index_line(line) {
            declaration.indexes.push(Index::parse(line)?);
        } else {
            compile_attribute(line, in_key, context, &mut declaration)?;
        }
    }

    Ok(declaration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::TypeCategory;
    use pretty_assertions::assert_eq;

    fn declare(definition: &str) -> Result<Declaration, DeclareError> {
        prepare_declare(definition, &DeclareContext::new())
    }

    fn message(definition: &str) -> String {
        declare(definition).unwrap_err().message().to_string()
    }

    #[test]
    fn full_definition() {
        let decl = declare(
            r#"
            # table with many types
            key           : int auto_increment # key
            ---
            entry_time=CURRENT_TIMESTAMP :timestamp   # automatic timestamp
            value   :  int        # value
            evalue = null : enum('a', 'b')     # enum
            alt_value = null : decimal(7,3)
            notes = ""    : varchar(1)
            uvalue = null : uuid
            current = null : longblob
            img : blob@share     #  objects are stored in an external store
            index(value, evalue)
            "#,
        )
        .unwrap();

        assert_eq!(decl.table_comment, "table with many types");
        assert_eq!(decl.primary_key, vec!["key"]);
        assert_eq!(decl.attributes.len(), 9);
        assert_eq!(decl.external_stores, vec!["share"]);
        assert_eq!(decl.indexes.len(), 1);
        assert_eq!(decl.attributes[1].category, Some(TypeCategory::Temporal));
        assert!(decl.attributes[3].nullable);
    }

    #[test]
    fn missing_primary_key_is_not_an_error() {
        let decl = declare("---\nvalue : int").unwrap();
        assert!(decl.primary_key.is_empty());
        assert!(declare("").unwrap().primary_key.is_empty());
    }

    #[test]
    fn unsupported_type() {
        assert_eq!(
            message("key : int\n---\nthing : badtype"),
            "Unsupported attribute type badtype"
        );
    }

    #[test]
    fn unresolved_reference_keeps_spacing() {
        assert_eq!(
            message("-> FakeTable\n---\nvalue : int"),
            "Foreign key reference  FakeTable could not be resolved"
        );
    }

    #[test]
    fn first_failing_line_wins() {
        assert_eq!(
            message("-> A\n-> B"),
            "Foreign key reference  A could not be resolved"
        );
    }

    #[test]
    fn nullable_primary_key() {
        assert_eq!(
            message("key=null :  int        # key"),
            "Primary key attributes cannot be nullable in line \"key=null :  int        # key\""
        );
    }

    #[test]
    fn table_comment_colon() {
        assert_eq!(
            message("# :comment\nkey : int"),
            "Table comment must not start with a colon \":\""
        );
    }

    #[test]
    fn attribute_comment_colon() {
        assert_eq!(
            message("key       : int auto_increment # : key"),
            "An attribute comment must not start with a colon in comment \": key\""
        );
    }

    #[test]
    fn blob_default() {
        assert_eq!(
            message("key : int\n---\nthing=\"bad default\" : blob"),
            "The default value for a blob or attachment attributes can only be NULL in:\nthing=\"bad default\" : blob"
        );
    }

    #[test]
    fn filepath_is_disabled_by_default() {
        let msg = message("key : int\n---\nimg : filepath@repo  # managed files");
        assert!(msg.starts_with("The filepath data type is disabled"));

        let context = DeclareContext::new().with_filepath(true);
        let decl = prepare_declare("key : int\n---\nimg : filepath@repo", &context).unwrap();
        assert_eq!(decl.external_stores, vec!["repo"]);
    }

    #[test]
    fn undefined_adapter() {
        assert_eq!(
            message("key : int\n---\nconn : <graph>"),
            "Attribute adapter 'graph' is not defined."
        );
        let context = DeclareContext::new().with_adapter("graph");
        assert!(prepare_declare("key : int\n---\nconn : <graph>", &context).is_ok());
    }

    #[test]
    fn resolved_reference_extends_primary_key() {
        let context = DeclareContext::new().with_table("Subject", ["subject_id"]);
        let decl = prepare_declare(
            "-> Subject\nsession : int\n---\n-> [nullable] Subject.proj(alt=\"subject_id\")",
            &context,
        )
        .unwrap();
        assert_eq!(decl.primary_key, vec!["subject_id", "session"]);
        assert_eq!(decl.foreign_keys.len(), 2);
        assert!(decl.foreign_keys[1].nullable);
        assert_eq!(decl.foreign_keys[1].attributes, vec!["alt"]);
    }

    #[test]
    fn invalid_option_on_resolved_reference() {
        let context = DeclareContext::new().with_table("Subject", ["subject_id"]);
        let err = prepare_declare("-> [NONOPTION] Subject", &context).unwrap_err();
        assert_eq!(err.message(), "Invalid foreign key option \"NONOPTION\"");
    }

    #[test]
    fn nullable_primary_dependency() {
        let context = DeclareContext::new().with_table("Subject", ["subject_id"]);
        let err = prepare_declare("-> [nullable] Subject", &context).unwrap_err();
        assert_eq!(
            err.message(),
            "Primary dependencies cannot be nullable in line \"-> [nullable] Subject\""
        );
    }

    #[test]
    fn separator_variants() {
        let decl = declare("a : int\n___\nb : int").unwrap();
        assert_eq!(decl.primary_key, vec!["a"]);
    }
}
