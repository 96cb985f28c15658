//! # dj-lint-declare
//!
//! The DataJoint table definition grammar, as far as it can be checked
//! without a database connection.
//!
//! A definition is a multi-line string: an optional `# table comment`,
//! primary key lines, a `---` separator, then secondary attributes,
//! foreign key references (`-> Table`) and index declarations.
//! [`prepare_declare`] walks it line by line and reports the first problem
//! with the same wording DataJoint itself uses, so callers can interpret
//! the message text.
//!
//! ```
//! use dj_lint_declare::{prepare_declare, DeclareContext};
//!
//! let decl = prepare_declare("id : int\n---\nname : varchar(32)", &DeclareContext::new())
//!     .unwrap();
//! assert_eq!(decl.primary_key, vec!["id".to_string()]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod attribute;
pub mod context;
pub mod declare;
pub mod error;
pub mod foreign_key;
pub mod index;
mod scan;

pub use attribute::{Attribute, AttributeLine, TypeCategory};
pub use context::DeclareContext;
pub use declare::{prepare_declare, split_lines, Declaration};
pub use error::DeclareError;
pub use foreign_key::{is_foreign_key, parse_options, ForeignKey, ForeignKeyLine};
pub use index::{is_index_line, Index};
