//! # dj-lint-rules
//!
//! DataJoint table definition checks for dj-lint.
//!
//! Every table class (first base `dj.Manual`, `dj.Lookup`, `dj.Imported`,
//! `dj.Computed`, `dj.Part`, `dj.Table` or a configured extension base) has
//! its `definition` declared offline. Failures are mapped onto the messages
//! below; foreign key failures are re-checked against the names the file
//! imports or declares.
//!
//! ## Messages
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | DJ001 | `definition-error` | DataJoint rejects the definition |
//! | DJ002 | `dj-wildcard-import` | `from module import *` hides names from reference checks |
//! | DJ003 | `no-pk` | The table has no primary key |
//! | DJ004 | `mult-fk-ref` | A reference target appears on several lines |
//! | DJ005 | `null-pk-ref` | A `nullable` reference inside the primary key |
//! | DJ006 | `bad-opt` | A reference option other than `nullable` or `unique` |
//! | DJ007 | `no-fp` | A `filepath@store` attribute |
//! | DJ008 | `no-def` | A table class without a `definition` |
//!
//! ## Usage
//!
//! ```ignore
//! use dj_lint_core::{Analyzer, Config};
//!
//! let config = Config::default();
//! let mut builder = Analyzer::builder().root("./pipeline");
//! for rule in dj_lint_rules::all_rules(&config.datajoint) {
//!     builder = builder.rule_box(rule);
//! }
//! let result = builder.config(config).build()?.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod classifier;
pub mod fk_interpreter;
mod namespace;
mod table_definition;
mod table_kind;

pub use catalog::{Emitter, RuleId, CATALOG};
pub use classifier::DefinitionClassifier;
pub use fk_interpreter::ForeignKeyInterpreter;
pub use namespace::NamespaceTracker;
pub use table_definition::{TableDefinition, NAME};
pub use table_kind::{TableDeclaration, TableKind, TableKindResolver};

/// Re-export core types for convenience.
pub use dj_lint_core::{Rule, Severity, Violation};

use dj_lint_core::{DataJointConfig, RuleBox};

/// Returns every rule, configured from the `[datajoint]` section.
#[must_use]
pub fn all_rules(config: &DataJointConfig) -> Vec<RuleBox> {
    vec![Box::new(TableDefinition::from_config(config))]
}
