//! Foreign key lines: `-> [options] Table`.

use std::collections::HashMap;

use crate::attribute::Attribute;
use crate::context::DeclareContext;
use crate::declare::Declaration;
use crate::error::DeclareError;
use crate::scan::{char_position, find_unquoted, skip_whitespace};

/// Options accepted inside the `[...]` list of a foreign key.
pub const VALID_OPTIONS: [&str; 2] = ["NULLABLE", "UNIQUE"];

/// Returns true if the line declares a foreign key.
///
/// A line is a foreign key when it contains `->` with no quote or comment
/// character in front of it.
#[must_use]
pub fn is_foreign_key(line: &str) -> bool {
    line.find("->")
        .is_some_and(|arrow| !line[..arrow].contains(['"', '#', '\'']))
}

/// The syntactic parts of a foreign key line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyLine {
    /// Options from the bracketed list, as written.
    pub options: Vec<String>,
    /// Everything after the arrow and options, including leading whitespace.
    pub ref_table: String,
}

impl ForeignKeyLine {
    /// Parses a foreign key line.
    ///
    /// # Errors
    ///
    /// Returns a parsing error when the line does not start with `->`.
    pub fn parse(line: &str) -> Result<Self, DeclareError> {
        let start = skip_whitespace(line, 0);
        let Some(after) = line[start..].strip_prefix("->") else {
            let pos = char_position(line, start);
            let found = line[start..]
                .chars()
                .next()
                .map_or_else(|| "end of text".to_string(), |c| format!("'{c}'"));
            let col = pos + 1;
            return Err(DeclareError::new(format!(
                "Parsing error in line \"{line}\". Expected \"->\", found {found}  (at char {pos}), (line:1, col:{col})."
            )));
        };

        Ok(match bracket_options(after) {
            Some((options, consumed)) => Self {
                options,
                ref_table: after[consumed..].to_string(),
            },
            None => Self {
                options: Vec::new(),
                ref_table: after.to_string(),
            },
        })
    }
}

/// Extracts the bracketed option words of a foreign key line.
///
/// Returns an empty list when the line has no option list or the list does
/// not parse.
#[must_use]
pub fn parse_options(line: &str) -> Vec<String> {
    line.trim_start()
        .strip_prefix("->")
        .and_then(bracket_options)
        .map(|(options, _)| options)
        .unwrap_or_default()
}

/// Parses `[word, word, ...]` at the start of `s`, skipping leading
/// whitespace. Returns the words and the number of bytes consumed.
fn bracket_options(s: &str) -> Option<(Vec<String>, usize)> {
    let mut pos = skip_whitespace(s, 0);
    if !s[pos..].starts_with('[') {
        return None;
    }
    pos += 1;

    let mut options = Vec::new();
    loop {
        pos = skip_whitespace(s, pos);
        let word_len = s[pos..]
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len() - pos);
        if word_len == 0 {
            return None;
        }
        options.push(s[pos..pos + word_len].to_string());
        pos = skip_whitespace(s, pos + word_len);

        match s[pos..].chars().next() {
            Some(',') => pos += 1,
            Some(']') => return Some((options, pos + 1)),
            _ => return None,
        }
    }
}

/// A compiled foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Referenced table expression, without projection.
    pub table: String,
    /// Attributes contributed to the referencing table, after renames.
    pub attributes: Vec<String>,
    /// `[nullable]` was given.
    pub nullable: bool,
    /// `[unique]` was given.
    pub unique: bool,
}

/// Resolves a reference expression against the context.
///
/// Supports a dotted table name optionally followed by
/// `.proj(new_name="old_name", ...)`.
fn resolve_reference(expression: &str, context: &DeclareContext) -> Option<(String, Vec<String>)> {
    let expression = match find_unquoted(expression, 0, '#') {
        Some(comment) => &expression[..comment],
        None => expression,
    }
    .trim();

    let (base, renames) = match expression.find(".proj(") {
        Some(at) => {
            let args = expression[at + ".proj(".len()..].strip_suffix(')')?;
            (&expression[..at], projection_renames(args)?)
        }
        None => (expression, HashMap::new()),
    };

    let is_name = !base.is_empty()
        && base.split('.').all(|segment| {
            segment.starts_with(|c: char| c.is_alphabetic() || c == '_')
                && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
        });
    if !is_name {
        return None;
    }

    let attributes = context
        .table_primary_key(base)?
        .iter()
        .map(|attr| renames.get(attr.as_str()).cloned().unwrap_or_else(|| attr.clone()))
        .collect();
    Some((base.to_string(), attributes))
}

/// Parses `new="old", 'attr', ...` into an old-to-new rename map.
/// Positional arguments only select attributes and are ignored.
fn projection_renames(args: &str) -> Option<HashMap<&str, String>> {
    let mut renames = HashMap::new();
    for arg in args.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        match arg.split_once('=') {
            Some((new, old)) => {
                let old = unquote(old.trim())?;
                renames.insert(old, new.trim().to_string());
            }
            None => {
                unquote(arg)?;
            }
        }
    }
    Some(renames)
}

fn unquote(s: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|q| s.strip_prefix(q)?.strip_suffix(q))
}

/// Compiles a foreign key line into the declaration.
pub(crate) fn compile_foreign_key(
    line: &str,
    in_key: bool,
    context: &DeclareContext,
    declaration: &mut Declaration,
) -> Result<(), DeclareError> {
    let parsed = ForeignKeyLine::parse(line)?;

    let (table, attributes) = resolve_reference(&parsed.ref_table, context).ok_or_else(|| {
        DeclareError::new(format!(
            "Foreign key reference {} could not be resolved",
            parsed.ref_table
        ))
    })?;

    let options: Vec<String> = parsed.options.iter().map(|o| o.to_uppercase()).collect();
    if let Some(invalid) = options
        .iter()
        .find(|o| !VALID_OPTIONS.contains(&o.as_str()))
    {
        return Err(DeclareError::new(format!(
            "Invalid foreign key option \"{invalid}\""
        )));
    }
    let nullable = options.iter().any(|o| o == "NULLABLE");
    let unique = options.iter().any(|o| o == "UNIQUE");

    if nullable && in_key {
        return Err(DeclareError::new(format!(
            "Primary dependencies cannot be nullable in line \"{line}\""
        )));
    }

    for name in &attributes {
        if !declaration.attributes.iter().any(|a| &a.name == name) {
            declaration.attributes.push(Attribute {
                name: name.clone(),
                type_: String::new(),
                category: None,
                nullable,
                default: None,
                comment: String::new(),
                store: None,
            });
        }
        if in_key && !declaration.primary_key.contains(name) {
            declaration.primary_key.push(name.clone());
        }
    }

    declaration.foreign_keys.push(ForeignKey {
        table,
        attributes,
        nullable,
        unique,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_foreign_keys() {
        assert!(is_foreign_key("-> Subject"));
        assert!(is_foreign_key("-> [nullable] Subject"));
        assert!(!is_foreign_key("name : varchar(8) # -> not a reference"));
        assert!(!is_foreign_key("x = \"->\" : varchar(2)"));
        assert!(!is_foreign_key("x : int"));
    }

    #[test]
    fn reference_keeps_leading_space() {
        let parsed = ForeignKeyLine::parse("-> FakeTable").unwrap();
        assert_eq!(parsed.ref_table, " FakeTable");
        assert!(parsed.options.is_empty());
    }

    #[test]
    fn options_are_split() {
        let parsed = ForeignKeyLine::parse("-> [nullable, unique] Session").unwrap();
        assert_eq!(parsed.options, vec!["nullable", "unique"]);
        assert_eq!(parsed.ref_table, " Session");
    }

    #[test]
    fn text_before_arrow_is_rejected() {
        let err = ForeignKeyLine::parse("[ParseErr] -> BadFKRef").unwrap_err();
        assert_eq!(
            err.message(),
            "Parsing error in line \"[ParseErr] -> BadFKRef\". Expected \"->\", found '['  (at char 0), (line:1, col:1)."
        );
    }

    #[test]
    fn parse_options_from_line() {
        assert_eq!(parse_options("-> [NONOPTION] Subject"), vec!["NONOPTION"]);
        assert_eq!(parse_options("  ->[a,b]X"), vec!["a", "b"]);
        assert!(parse_options("-> Subject").is_empty());
        assert!(parse_options("-> [] Subject").is_empty());
        assert!(parse_options("-> [bad-opt] Subject").is_empty());
    }

    #[test]
    fn resolves_projection_renames() {
        let context = DeclareContext::new().with_table("Neuron", ["cell_id", "session"]);
        let (table, attributes) =
            resolve_reference(" Neuron.proj(pre_cell=\"cell_id\")", &context).unwrap();
        assert_eq!(table, "Neuron");
        assert_eq!(attributes, vec!["pre_cell", "session"]);
    }

    #[test]
    fn unresolvable_references() {
        let context = DeclareContext::new().with_table("Subject", ["subject_id"]);
        assert!(resolve_reference(" Unknown", &context).is_none());
        assert!(resolve_reference(" Subject & 'x=1'", &context).is_none());
        assert!(resolve_reference(" Subject  # comment", &context).is_some());
    }
}
