//! # dj-lint-core
//!
//! Core framework for linting DataJoint schema modules.
//!
//! This crate provides the foundational traits and types shared by the
//! rules and the command line:
//!
//! - [`Rule`] trait for per-file rules over an extracted Python module
//! - [`Analyzer`] for discovering files and orchestrating rule execution
//! - [`Violation`] and [`MessageSpec`] for representing findings
//! - [`Config`] for `dj-lint.toml` / `[tool.dj-lint]` settings
//!
//! ## Example
//!
//! ```ignore
//! use dj_lint_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./pipeline")
//!     .config(Config::default())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod rule;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{
    AnalyzerConfig, Config, ConfigError, DataJointConfig, NullPkRefMode, RuleConfig,
};
pub use context::FileContext;
pub use rule::{Rule, RuleBox};
pub use types::{
    LintResult, Location, MessageSpec, Severity, Suggestion, Violation, ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
