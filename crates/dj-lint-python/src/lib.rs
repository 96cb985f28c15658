//! # dj-lint-python
//!
//! Tree-sitter based Python front end for dj-lint.
//!
//! The DataJoint checks never look at arbitrary Python; they need the
//! import statements of a module and its class declarations with their
//! base classes and `definition` attributes. This crate extracts exactly
//! that:
//!
//! - [`PythonExtractor`] parses a module with `tree-sitter-python`
//! - [`ModuleAnalysis`] is the language-level result ([`ImportInfo`], [`ClassInfo`])
//! - [`decode_string_literal`] turns a Python string literal into its value

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod extractor;
pub mod literal;
pub mod python;

pub use extractor::{
    ClassInfo, DefinitionAttr, ImportInfo, ImportKind, ImportedName, ModuleAnalysis, SourceSpan,
};
pub use literal::decode_string_literal;
pub use python::{ExtractError, PythonExtractor};
