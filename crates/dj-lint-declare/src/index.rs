//! Index lines: `[unique] index (attr, ...)`.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::error::DeclareError;

fn index_line() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"^(unique\s+)?index\s*.*$")
            .case_insensitive(true)
            .build()
            .ok()
    })
    .as_ref()
}

fn index_declaration() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"^(?P<unique>unique\s+)?index\s*\((?P<attrs>[^)]*)\)\s*$")
            .case_insensitive(true)
            .build()
            .ok()
    })
    .as_ref()
}

/// Returns true if the line declares a secondary index.
#[must_use]
pub fn is_index_line(line: &str) -> bool {
    index_line().is_some_and(|re| re.is_match(line))
}

/// A secondary index declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// `unique index`.
    pub unique: bool,
    /// Indexed attributes, in declaration order.
    pub attributes: Vec<String>,
}

impl Index {
    /// Parses an index line.
    ///
    /// # Errors
    ///
    /// Returns an error when the attribute list is missing or empty.
    pub fn parse(line: &str) -> Result<Self, DeclareError> {
        let invalid = || DeclareError::new(format!("Parsing error in index line \"{line}\""));
        let captures = index_declaration()
            .and_then(|re| re.captures(line))
            .ok_or_else(invalid)?;

        let attributes: Vec<String> = captures
            .name("attrs")
            .map_or("", |m| m.as_str())
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();
        if attributes.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            unique: captures.name("unique").is_some(),
            attributes,
        })
    }
}
