//! Python extractor using Tree-sitter.

use std::path::PathBuf;
use tree_sitter::{Language, Node, Parser};

use crate::extractor::{
    ClassInfo, DefinitionAttr, ImportInfo, ImportKind, ImportedName, ModuleAnalysis, SourceSpan,
};
use crate::literal::decode_string_literal;

/// Errors raised while extracting a Python module.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load python grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser gave up without producing a tree.
    #[error("tree-sitter produced no syntax tree")]
    NoTree,

    /// The module contains a syntax error.
    #[error("syntax error at line {line}, column {column}")]
    Syntax {
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
    },
}

/// Name of the class attribute holding a table definition.
const DEFINITION_ATTR: &str = "definition";

/// Extracts imports and class declarations from Python source.
pub struct PythonExtractor {
    language: Language,
}

impl PythonExtractor {
    /// Creates a new Python extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// File extensions this extractor handles.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        &[".py", ".pyi"]
    }

    /// Extracts imports and class declarations from a module.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or the source
    /// contains a syntax error.
    pub fn analyze(&self, source: &str) -> Result<ModuleAnalysis, ExtractError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or(ExtractError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            let (line, column) = first_error_position(root);
            return Err(ExtractError::Syntax { line, column });
        }

        let mut result = ModuleAnalysis {
            file_path: PathBuf::new(),
            imports: Vec::new(),
            classes: Vec::new(),
        };
        walk(root, src, None, &mut result);
        Ok(result)
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

fn span_of(node: &Node<'_>, end_byte: usize) -> SourceSpan {
    let start = node.start_position();
    SourceSpan {
        line: start.row + 1,
        column: start.column,
        offset: node.start_byte(),
        length: end_byte.saturating_sub(node.start_byte()),
    }
}

fn first_error_position(node: Node<'_>) -> (usize, usize) {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return (pos.row + 1, pos.column + 1);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_position(child);
        }
    }
    let pos = node.start_position();
    (pos.row + 1, pos.column + 1)
}

/// Pre-order walk collecting imports and classes.
///
/// `enclosing` is the class whose body is being walked; it is reset when
/// entering a function, since classes defined there are not members.
fn walk(node: Node<'_>, src: &[u8], enclosing: Option<&str>, out: &mut ModuleAnalysis) {
    match node.kind() {
        "import_statement" => {
            out.imports.push(extract_import(&node, src));
            return;
        }
        "import_from_statement" => {
            out.imports.push(extract_import_from(&node, src));
            return;
        }
        "class_definition" => {
            let Some(class) = extract_class(&node, src, enclosing) else {
                return;
            };
            let name = class.name.clone();
            out.classes.push(class);
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, src, Some(&name), out);
            }
            return;
        }
        "function_definition" => {
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, src, None, out);
            }
            return;
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk(child, src, enclosing, out);
    }
}

fn imported_name(node: &Node<'_>, src: &[u8]) -> Option<ImportedName> {
    match node.kind() {
        "dotted_name" | "identifier" => Some(ImportedName::new(text(node, src))),
        "aliased_import" => {
            let name = node.child_by_field_name("name")?;
            let alias = node.child_by_field_name("alias")?;
            Some(ImportedName::aliased(text(&name, src), text(&alias, src)))
        }
        _ => None,
    }
}

fn extract_import(node: &Node<'_>, src: &[u8]) -> ImportInfo {
    let mut cursor = node.walk();
    let names = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|child| imported_name(&child, src))
        .collect();

    ImportInfo {
        span: span_of(node, node.end_byte()),
        kind: ImportKind::Module { names },
    }
}

fn extract_import_from(node: &Node<'_>, src: &[u8]) -> ImportInfo {
    let module = node
        .child_by_field_name("module_name")
        .map(|m| text(&m, src).to_owned())
        .unwrap_or_default();
    let span = span_of(node, node.end_byte());

    let mut cursor = node.walk();
    let is_wildcard = node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import");
    if is_wildcard {
        return ImportInfo {
            span,
            kind: ImportKind::Wildcard { module },
        };
    }

    let mut cursor = node.walk();
    let names = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|child| imported_name(&child, src))
        .collect();

    ImportInfo {
        span,
        kind: ImportKind::From { module, names },
    }
}

fn extract_class(node: &Node<'_>, src: &[u8], enclosing: Option<&str>) -> Option<ClassInfo> {
    let name_node = node.child_by_field_name("name")?;
    let name = text(&name_node, src).to_owned();

    let mut bases = Vec::new();
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            if matches!(base.kind(), "keyword_argument" | "comment") {
                continue;
            }
            bases.push(text(&base, src).split_whitespace().collect::<String>());
        }
    }

    let definition = node
        .child_by_field_name("body")
        .map_or(DefinitionAttr::Missing, |body| find_definition(&body, src));

    Some(ClassInfo {
        name,
        bases,
        definition,
        span: span_of(node, name_node.end_byte()),
        enclosing: enclosing.map(str::to_owned),
    })
}

/// Classifies the last `definition = ...` statement directly in a class body.
fn find_definition(body: &Node<'_>, src: &[u8]) -> DefinitionAttr {
    let mut found = DefinitionAttr::Missing;
    let mut cursor = body.walk();
    for statement in body.named_children(&mut cursor) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        let mut inner = statement.walk();
        for expr in statement.named_children(&mut inner) {
            if expr.kind() != "assignment" {
                continue;
            }
            let Some(left) = expr.child_by_field_name("left") else {
                continue;
            };
            if left.kind() != "identifier" || text(&left, src) != DEFINITION_ATTR {
                continue;
            }
            // Later assignments rebind the attribute.
            found = expr
                .child_by_field_name("right")
                .map_or(DefinitionAttr::NonLiteral, |right| {
                    classify_value(&right, src)
                });
        }
    }
    found
}

fn classify_value(node: &Node<'_>, src: &[u8]) -> DefinitionAttr {
    match node.kind() {
        "string" => string_value(node, src).map_or(DefinitionAttr::NonLiteral, DefinitionAttr::Literal),
        "concatenated_string" => {
            let mut joined = String::new();
            let mut cursor = node.walk();
            for part in node.named_children(&mut cursor) {
                if part.kind() == "comment" {
                    continue;
                }
                match string_value(&part, src) {
                    Some(value) => joined.push_str(&value),
                    None => return DefinitionAttr::NonLiteral,
                }
            }
            DefinitionAttr::Literal(joined)
        }
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner: Vec<Node<'_>> = node
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .collect();
            match inner.as_slice() {
                [single] => classify_value(single, src),
                _ => DefinitionAttr::NonLiteral,
            }
        }
        _ => DefinitionAttr::NonLiteral,
    }
}

fn string_value(node: &Node<'_>, src: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut cursor = node.walk();
    if node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "interpolation")
    {
        return None;
    }
    decode_string_literal(text(node, src))
}
