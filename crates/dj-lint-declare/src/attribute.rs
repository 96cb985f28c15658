//! Attribute lines: `name [= default] : type [# comment]`.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::context::DeclareContext;
use crate::declare::Declaration;
use crate::error::DeclareError;
use crate::scan::{char_position, find_unquoted, skip_whitespace};

const FILEPATH_DISABLED: &str = "The filepath data type is disabled until complete validation.
    To turn it on as experimental feature, set the environment variable
    DJ_SUPPORT_FILEPATH_MANAGEMENT = TRUE or upgrade datajoint.
    ";

/// Data type category of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// `int`, `tinyint unsigned`, `serial`...
    Integer,
    /// `decimal(p,s)`, `numeric`
    Decimal,
    /// `float`, `double`, `real`
    Float,
    /// `char(n)`, `varchar(n)`
    String,
    /// `json`
    Json,
    /// `enum(...)`
    Enum,
    /// `date`, `datetime`, `time`, `timestamp`, `year`
    Temporal,
    /// `blob`, `longblob`...
    InternalBlob,
    /// `blob@store`
    ExternalBlob,
    /// `attach`
    InternalAttach,
    /// `attach@store`
    ExternalAttach,
    /// `filepath@store`
    Filepath,
    /// `uuid`
    Uuid,
    /// `<adapter>`
    Adapted,
}

impl TypeCategory {
    /// All categories, in matching order.
    pub const ALL: [Self; 14] = [
        Self::Integer,
        Self::Decimal,
        Self::Float,
        Self::String,
        Self::Json,
        Self::Enum,
        Self::Temporal,
        Self::InternalBlob,
        Self::ExternalBlob,
        Self::InternalAttach,
        Self::ExternalAttach,
        Self::Filepath,
        Self::Uuid,
        Self::Adapted,
    ];

    fn pattern(self) -> &'static str {
        match self {
            Self::Integer => {
                r"^(?:((tiny|small|medium|big|)int|integer)(\s*\(.+\))?(\s+unsigned)?(\s+auto_increment)?|serial$)"
            }
            Self::Decimal => r"^(decimal|numeric)(\s*\(.+\))?(\s+unsigned)?$",
            Self::Float => r"^(double|float|real)(\s*\(.+\))?(\s+unsigned)?$",
            Self::String => r"^(var)?char\s*\(.+\)$",
            Self::Json => r"^json$",
            Self::Enum => r"^enum\s*\(.+\)$",
            Self::Temporal => r"^(date|datetime|time|timestamp|year)(\s*\(.+\))?$",
            Self::InternalBlob => r"^(tiny|small|medium|long|)blob$",
            Self::ExternalBlob => r"^blob@(?P<store>[a-z][\-\w]*)$",
            Self::InternalAttach => r"^attach$",
            Self::ExternalAttach => r"^attach@(?P<store>[a-z][\-\w]*)$",
            Self::Filepath => r"^filepath@(?P<store>[a-z][\-\w]*)$",
            Self::Uuid => r"^uuid$",
            Self::Adapted => r"^<.+>$",
        }
    }

    /// Categories stored as serialized objects; their default may only be NULL.
    #[must_use]
    pub fn is_serialized(self) -> bool {
        matches!(
            self,
            Self::InternalBlob | Self::ExternalBlob | Self::InternalAttach | Self::ExternalAttach
        )
    }

    /// Categories whose data lives in an external store.
    #[must_use]
    pub fn is_external(self) -> bool {
        matches!(
            self,
            Self::ExternalBlob | Self::ExternalAttach | Self::Filepath
        )
    }

    /// Matches a declared type against the known categories.
    #[must_use]
    pub fn of(type_: &str) -> Option<Self> {
        type_patterns()
            .iter()
            .find(|(_, re)| re.is_match(type_))
            .map(|(category, _)| *category)
    }
}

fn type_patterns() -> &'static [(TypeCategory, Regex)] {
    static PATTERNS: OnceLock<Vec<(TypeCategory, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        TypeCategory::ALL
            .iter()
            .filter_map(|category| {
                RegexBuilder::new(category.pattern())
                    .case_insensitive(true)
                    .build()
                    .ok()
                    .map(|re| (*category, re))
            })
            .collect()
    })
}

/// The raw fields of an attribute line, whitespace-trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLine {
    /// Attribute name.
    pub name: String,
    /// Default value as written, if a `=` clause is present.
    pub default: Option<String>,
    /// Declared type.
    pub type_: String,
    /// Comment text after `#`.
    pub comment: String,
}

impl AttributeLine {
    /// Parses one attribute line.
    ///
    /// # Errors
    ///
    /// Returns a `Declaration error in position ...` message pointing at the
    /// first character that does not fit the grammar.
    pub fn parse(line: &str) -> Result<Self, DeclareError> {
        let padded = format!("{line}#");
        let s = padded.as_str();
        let fail = |pos: usize, expected: &str| {
            DeclareError::new(format!(
                "Declaration error in position {} in line:\n  {s}\n{expected}",
                char_position(s, pos)
            ))
        };

        let mut pos = skip_whitespace(s, 0);
        let name_len = identifier_len(&s[pos..]);
        if name_len == 0 {
            return Err(fail(pos, "Expected W:(a-z, a-z0-9_)"));
        }
        let name = s[pos..pos + name_len].to_string();
        pos = skip_whitespace(s, pos + name_len);

        let mut default = None;
        if s[pos..].starts_with('=') {
            pos += 1;
            let colon = find_unquoted(s, pos, ':').ok_or_else(|| fail(pos, "Expected \":\""))?;
            default = Some(s[pos..colon].trim().to_string());
            pos = colon;
        }

        pos = skip_whitespace(s, pos);
        if !s[pos..].starts_with(':') {
            return Err(fail(pos, "Expected \":\""));
        }
        pos = skip_whitespace(s, pos + 1);

        let type_start = pos;
        let (type_end, hash) = if s[pos..].starts_with('<') {
            let close = s[pos..]
                .find('>')
                .map(|i| pos + i + 1)
                .ok_or_else(|| fail(pos, "Expected data type"))?;
            let after = skip_whitespace(s, close);
            if !s[after..].starts_with('#') {
                return Err(fail(after, "Expected \"#\""));
            }
            (close, after)
        } else {
            if !s[pos..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Err(fail(pos, "Expected data type"));
            }
            let hash = find_unquoted(s, pos, '#').ok_or_else(|| fail(pos, "Expected \"#\""))?;
            (hash, hash)
        };

        Ok(Self {
            name,
            default,
            type_: s[type_start..type_end].trim().to_string(),
            comment: s[hash + 1..].trim_end_matches('#').trim().to_string(),
        })
    }
}

/// Length of a leading `[a-z][a-z0-9_]*` identifier.
fn identifier_len(s: &str) -> usize {
    if !s.starts_with(|c: char| c.is_ascii_lowercase()) {
        return 0;
    }
    s.find(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'))
        .unwrap_or(s.len())
}

/// A declared attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Declared type as written.
    pub type_: String,
    /// Matched type category; `None` for attributes inherited through a foreign key.
    pub category: Option<TypeCategory>,
    /// Whether the default is NULL.
    pub nullable: bool,
    /// Default value, if declared.
    pub default: Option<String>,
    /// Attribute comment.
    pub comment: String,
    /// External store name for `blob@store`, `attach@store`, `filepath@store`.
    pub store: Option<String>,
}

/// Compiles an attribute line into the declaration.
pub(crate) fn compile_attribute(
    line: &str,
    in_key: bool,
    context: &DeclareContext,
    declaration: &mut Declaration,
) -> Result<(), DeclareError> {
    let parsed = AttributeLine::parse(line)?;

    let nullable = parsed
        .default
        .as_deref()
        .is_some_and(|d| d.eq_ignore_ascii_case("null"));
    if nullable && in_key {
        return Err(DeclareError::new(format!(
            "Primary key attributes cannot be nullable in line \"{line}\""
        )));
    }

    let comment = parsed.comment.replace('"', "\\\"");
    if comment.starts_with(':') {
        return Err(DeclareError::new(format!(
            "An attribute comment must not start with a colon in comment \"{comment}\""
        )));
    }

    let category = TypeCategory::of(&parsed.type_).ok_or_else(|| {
        DeclareError::new(format!("Unsupported attribute type {}", parsed.type_))
    })?;

    let mut store = None;
    if category.is_external() {
        if category == TypeCategory::Filepath && !context.filepath_enabled() {
            return Err(DeclareError::new(FILEPATH_DISABLED));
        }
        store = parsed
            .type_
            .split_once('@')
            .map(|(_, store)| store.to_string());
    } else if category == TypeCategory::Adapted {
        let adapter = parsed.type_.trim_start_matches('<').trim_end_matches('>');
        if !context.has_adapter(adapter) {
            return Err(DeclareError::new(format!(
                "Attribute adapter '{adapter}' is not defined."
            )));
        }
    }

    let has_default = parsed.default.as_deref().is_some_and(|d| !d.is_empty());
    if category.is_serialized() && has_default && !nullable {
        return Err(DeclareError::new(format!(
            "The default value for a blob or attachment attributes can only be NULL in:\n{line}"
        )));
    }

    if let Some(store) = &store {
        if !declaration.external_stores.contains(store) {
            declaration.external_stores.push(store.clone());
        }
    }
    if in_key && !declaration.primary_key.contains(&parsed.name) {
        declaration.primary_key.push(parsed.name.clone());
    }
    if !declaration.attributes.iter().any(|a| a.name == parsed.name) {
        declaration.attributes.push(Attribute {
            name: parsed.name,
            type_: parsed.type_,
            category: Some(category),
            nullable,
            default: parsed.default,
            comment,
            store,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn all_type_patterns_compile() {
        assert_eq!(type_patterns().len(), TypeCategory::ALL.len());
    }

    #[test]
    fn categories() {
        let cases = [
            ("int", TypeCategory::Integer),
            ("tinyint unsigned", TypeCategory::Integer),
            ("int auto_increment", TypeCategory::Integer),
            ("serial", TypeCategory::Integer),
            ("decimal(7,3)", TypeCategory::Decimal),
            ("DOUBLE", TypeCategory::Float),
            ("varchar(60)", TypeCategory::String),
            ("enum('M','F')", TypeCategory::Enum),
            ("timestamp", TypeCategory::Temporal),
            ("longblob", TypeCategory::InternalBlob),
            ("blob@share", TypeCategory::ExternalBlob),
            ("attach", TypeCategory::InternalAttach),
            ("attach@store", TypeCategory::ExternalAttach),
            ("filepath@repo", TypeCategory::Filepath),
            ("uuid", TypeCategory::Uuid),
            ("json", TypeCategory::Json),
            ("<graph>", TypeCategory::Adapted),
        ];
        for (type_, expected) in cases {
            assert_eq!(TypeCategory::of(type_), Some(expected), "{type_}");
        }
    }

    #[test]
    fn unknown_types() {
        assert_eq!(TypeCategory::of("badtype"), None);
        assert_eq!(TypeCategory::of("varchar"), None);
        assert_eq!(TypeCategory::of("blob@1store"), None);
    }

    #[test]
    fn parse_full_line() {
        let parsed = AttributeLine::parse("evalue = null : enum('a', 'b')     # enum").unwrap();
        assert_eq!(parsed.name, "evalue");
        assert_eq!(parsed.default.as_deref(), Some("null"));
        assert_eq!(parsed.type_, "enum('a', 'b')");
        assert_eq!(parsed.comment, "enum");
    }

    #[test]
    fn quoted_default_may_contain_colon() {
        let parsed = AttributeLine::parse(r#"note = "a:b" : varchar(8)"#).unwrap();
        assert_eq!(parsed.default.as_deref(), Some(r#""a:b""#));
        assert_eq!(parsed.type_, "varchar(8)");
        assert_eq!(parsed.comment, "");
    }

    #[test]
    fn comment_may_contain_colon() {
        let parsed = AttributeLine::parse("fnum : int # test comment containing :").unwrap();
        assert_eq!(parsed.comment, "test comment containing :");
    }

    #[test]
    fn adapted_type() {
        let parsed = AttributeLine::parse("conn : <graph>  # network").unwrap();
        assert_eq!(parsed.type_, "<graph>");
        assert_eq!(parsed.comment, "network");
    }

    #[test]
    fn missing_colon_reports_position() {
        let err = AttributeLine::parse("new&key       : int auto_increment # key").unwrap_err();
        assert_eq!(
            err.message(),
            "Declaration error in position 3 in line:\n  new&key       : int auto_increment # key#\nExpected \":\""
        );
    }

    #[test]
    fn bad_name_reports_position() {
        let err = AttributeLine::parse("Key : int").unwrap_err();
        assert_eq!(
            err.message(),
            "Declaration error in position 0 in line:\n  Key : int#\nExpected W:(a-z, a-z0-9_)"
        );
    }

    #[test]
    fn missing_type() {
        let err = AttributeLine::parse("key : # nothing").unwrap_err();
        assert!(err.message().ends_with("Expected data type"));
    }
}
