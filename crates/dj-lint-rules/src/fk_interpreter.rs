//! Second opinion on "Foreign key reference ... could not be resolved".
//!
//! The declaration parser only knows the tables in its own context, which is
//! empty when linting, so every reference fails. This module recovers the
//! referenced name from the error text, reports problems with the reference
//! line itself, and decides whether the name is visible in the file after
//! all.
//!
//! Everything that depends on the parser's wording lives in
//! [`extract_reference`] and [`is_foreign_key_error`].

use crate::catalog::{Emitter, RuleId};
use crate::namespace::NamespaceTracker;
use crate::table_kind::TableDeclaration;
use dj_lint_core::NullPkRefMode;
use dj_lint_declare::parse_options;

const NULLABLE: &str = "NULLABLE";
const UNIQUE: &str = "UNIQUE";

/// Whether a parser error is about a foreign key.
#[must_use]
pub fn is_foreign_key_error(message: &str) -> bool {
    message.starts_with("Foreign")
}

/// Pulls the referenced table name out of a foreign key error message.
///
/// Takes the text after `reference `, drops any bracketed options, cuts at
/// ` could ` and at `.proj`, then trims.
///
/// ```
/// use dj_lint_rules::fk_interpreter::extract_reference;
///
/// assert_eq!(
///     extract_reference("Foreign key reference  lab.Subject.proj(x=\"y\") could not be resolved"),
///     Some("lab.Subject".to_string()),
/// );
/// ```
#[must_use]
pub fn extract_reference(message: &str) -> Option<String> {
    let (_, after) = message.split_once("reference ")?;
    let after = after.rsplit(']').next().unwrap_or(after);
    let name = after.split(" could ").next().unwrap_or(after);
    let name = name.split(".proj").next().unwrap_or(name);
    Some(name.trim().to_string())
}

/// Whether `reference` occurs in the primary key section of `definition`.
///
/// A plain substring test over the text before the first separator.
#[must_use]
pub fn in_primary_key(reference: &str, definition: &str) -> bool {
    let head = definition.split("---").next().unwrap_or(definition);
    let head = head.split("___").next().unwrap_or(head);
    head.contains(reference)
}

/// Definition lines containing ` <reference>`.
///
/// The leading space keeps `Session` from matching `SubSession`.
#[must_use]
pub fn reference_lines<'d>(reference: &str, definition: &'d str) -> Vec<&'d str> {
    let padded = format!(" {reference}");
    definition
        .split('\n')
        .filter(|line| line.contains(&padded))
        .collect()
}

/// Interprets foreign key failures against one file's namespace.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKeyInterpreter<'a> {
    namespace: &'a NamespaceTracker,
    mode: NullPkRefMode,
}

impl<'a> ForeignKeyInterpreter<'a> {
    /// Creates an interpreter over a fully populated namespace.
    #[must_use]
    pub fn new(namespace: &'a NamespaceTracker, mode: NullPkRefMode) -> Self {
        Self { namespace, mode }
    }

    /// Returns `true` when the failing reference is judged valid and the
    /// parser's error should be dropped.
    ///
    /// Problems with the reference line (`mult-fk-ref`, `bad-opt`,
    /// `null-pk-ref`) are emitted either way.
    pub fn resolve(
        &self,
        table: &TableDeclaration<'_>,
        message: &str,
        definition: &str,
        emitter: &mut Emitter,
    ) -> bool {
        if !is_foreign_key_error(message) {
            return false;
        }
        let Some(reference) = extract_reference(message) else {
            return false;
        };

        let in_pk = in_primary_key(&reference, definition);
        let lines = reference_lines(&reference, definition);
        if lines.len() != 1 {
            emitter.emit(RuleId::MultFkRef, table.span, vec![table.name.to_string()]);
        }

        if let Some(line) = lines.first() {
            let options: Vec<String> = parse_options(line)
                .iter()
                .map(|opt| opt.to_uppercase())
                .collect();
            self.check_options(table, &options, in_pk, emitter);
        }

        self.is_visible(table, &reference)
    }

    fn check_options(
        &self,
        table: &TableDeclaration<'_>,
        options: &[String],
        in_pk: bool,
        emitter: &mut Emitter,
    ) {
        let name = table.name.to_string();
        match self.mode {
            NullPkRefMode::AfterOptions => {
                for opt in options.iter().filter(|o| !is_valid_option(o)) {
                    emitter.emit(RuleId::BadOpt, table.span, vec![name.clone(), opt.clone()]);
                }
                if in_pk && options.iter().any(|o| o == NULLABLE) {
                    emitter.emit(RuleId::NullPkRef, table.span, vec![name]);
                }
            }
            NullPkRefMode::PerOption => {
                for opt in options {
                    if !is_valid_option(opt) {
                        emitter.emit(RuleId::BadOpt, table.span, vec![name.clone(), opt.clone()]);
                    } else if in_pk && opt == NULLABLE {
                        emitter.emit(RuleId::NullPkRef, table.span, vec![name.clone()]);
                    }
                }
            }
        }
    }

    fn is_visible(&self, table: &TableDeclaration<'_>, reference: &str) -> bool {
        if reference == "master" && table.kind.is_part() {
            return true;
        }
        if self.namespace.has_class(reference) {
            return true;
        }
        let prefix = reference.split('.').next().unwrap_or(reference);
        self.namespace.has_module(prefix)
    }
}

fn is_valid_option(option: &str) -> bool {
    option == NULLABLE || option == UNIQUE
}
