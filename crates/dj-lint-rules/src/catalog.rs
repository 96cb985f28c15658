//! The message catalog and the per-file diagnostics sink.
//!
//! Message names match the ids of the DataJoint pylint plugin, so existing
//! `# pylint: disable=...` comments keep working.

use dj_lint_core::{Location, MessageSpec, Severity, Violation};
use dj_lint_python::SourceSpan;
use std::path::PathBuf;

/// Identifier of a catalogued message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    /// The resolver rejected the definition.
    DefinitionError,
    /// `from module import *`.
    WildcardImport,
    /// The definition declares no primary key.
    NoPk,
    /// A foreign key target matches several definition lines.
    MultFkRef,
    /// A nullable foreign key inside the primary key.
    NullPkRef,
    /// A foreign key option other than `nullable` / `unique`.
    BadOpt,
    /// A `filepath@store` attribute.
    NoFp,
    /// A table class without a `definition`.
    NoDef,
}

/// All messages, indexed by [`RuleId`].
pub static CATALOG: [MessageSpec; 8] = [
    MessageSpec {
        code: "DJ001",
        name: "definition-error",
        template: "`{}` err: {}",
        help: "DataJoint was unable to parse the definition of the table.",
        severity: Severity::Error,
    },
    MessageSpec {
        code: "DJ002",
        name: "dj-wildcard-import",
        template: "DataJoint linter does not support `*` import",
        help: "Names brought in by a `*` import are invisible to foreign key checks.",
        severity: Severity::Warning,
    },
    MessageSpec {
        code: "DJ003",
        name: "no-pk",
        template: "`{}` err: Table must have a primary key.",
        help: "Declare at least one attribute or reference above the `---` separator.",
        severity: Severity::Error,
    },
    MessageSpec {
        code: "DJ004",
        name: "mult-fk-ref",
        template: "`{}` err: Table references the same foreign key multiple times",
        help: "Tables should not repeat references.",
        severity: Severity::Warning,
    },
    MessageSpec {
        code: "DJ005",
        name: "null-pk-ref",
        template: "`{}` err: Primary dependencies cannot be nullable",
        help: "Primary key foreign key references cannot be nullable.",
        severity: Severity::Error,
    },
    MessageSpec {
        code: "DJ006",
        name: "bad-opt",
        template: "`{}` err: Invalid foreign key option {}",
        help: "Supported foreign key options: nullable and unique.",
        severity: Severity::Error,
    },
    MessageSpec {
        code: "DJ007",
        name: "no-fp",
        template: "`{}` err: Filepath type not supported",
        help: "To disable this check, use --permit-dj-filepath.",
        severity: Severity::Warning,
    },
    MessageSpec {
        code: "DJ008",
        name: "no-def",
        template: "`{}` err: Table has no definition",
        help: "Table classes need a `definition` string attribute.",
        severity: Severity::Error,
    },
];

impl RuleId {
    /// Every message, in catalog order.
    pub const ALL: [Self; 8] = [
        Self::DefinitionError,
        Self::WildcardImport,
        Self::NoPk,
        Self::MultFkRef,
        Self::NullPkRef,
        Self::BadOpt,
        Self::NoFp,
        Self::NoDef,
    ];

    /// The catalog entry of this message.
    #[must_use]
    pub fn spec(self) -> &'static MessageSpec {
        &CATALOG[self as usize]
    }

    /// Symbolic name, e.g. `no-pk`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Code, e.g. `DJ003`.
    #[must_use]
    pub fn code(self) -> &'static str {
        self.spec().code
    }

    /// Looks a message up by name or code.
    #[must_use]
    pub fn lookup(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.spec().matches(key))
    }
}

/// Append-only sink collecting the violations of one file.
#[derive(Debug)]
pub struct Emitter {
    file: PathBuf,
    violations: Vec<Violation>,
}

impl Emitter {
    /// Creates a sink for the file at `file` (relative to the project root).
    #[must_use]
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            violations: Vec::new(),
        }
    }

    /// Records one message at `span`.
    pub fn emit(&mut self, id: RuleId, span: SourceSpan, args: Vec<String>) {
        let location = Location::from_span(self.file.clone(), span);
        self.violations
            .push(Violation::from_spec(id.spec(), location, args));
    }

    /// Violations recorded so far.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the sink.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
