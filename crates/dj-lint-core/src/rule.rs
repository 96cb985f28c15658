//! Rule trait for defining lint rules.

use dj_lint_python::ModuleAnalysis;

use crate::context::FileContext;
use crate::types::{MessageSpec, Violation};

/// A per-file lint rule working on the extracted Python module.
///
/// A rule may report several kinds of message; each is described by a
/// [`MessageSpec`] and configured (enabled, severity) by its name.
///
/// # Example
///
/// ```ignore
/// use dj_lint_core::{FileContext, Location, MessageSpec, Rule, Severity, Violation};
/// use dj_lint_python::ModuleAnalysis;
///
/// const NO_CLASSES: MessageSpec = MessageSpec {
///     code: "X001",
///     name: "no-classes",
///     template: "module declares no classes",
///     help: "",
///     severity: Severity::Info,
/// };
///
/// pub struct NoClasses;
///
/// impl Rule for NoClasses {
///     fn name(&self) -> &'static str { "no-classes" }
///     fn messages(&self) -> &'static [MessageSpec] { std::slice::from_ref(&NO_CLASSES) }
///
///     fn check(&self, ctx: &FileContext, module: &ModuleAnalysis) -> Vec<Violation> {
///         if module.classes.is_empty() {
///             let location = Location::new(ctx.relative_path.clone(), 1, 1);
///             vec![Violation::from_spec(&NO_CLASSES, location, vec![])]
///         } else {
///             vec![]
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// The messages this rule can report.
    fn messages(&self) -> &'static [MessageSpec];

    /// Checks a single file and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `module` - Imports and class declarations extracted from the file
    fn check(&self, ctx: &FileContext, module: &ModuleAnalysis) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Severity};

    const ONE: MessageSpec = MessageSpec {
        code: "TEST001",
        name: "test-message",
        template: "`{}` found",
        help: "",
        severity: Severity::Warning,
    };

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn messages(&self) -> &'static [MessageSpec] {
            std::slice::from_ref(&ONE)
        }

        fn check(&self, ctx: &FileContext, module: &ModuleAnalysis) -> Vec<Violation> {
            module
                .classes
                .iter()
                .map(|class| {
                    Violation::from_spec(
                        &ONE,
                        Location::from_span(ctx.relative_path.clone(), class.span),
                        vec![class.name.clone()],
                    )
                })
                .collect()
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.messages()[0].code, "TEST001");
        assert_eq!(rule.description(), "A test rule");
    }

    #[test]
    fn test_rule_check_uses_module() {
        let content = "class A(object):\n    pass\n";
        let module = dj_lint_python::PythonExtractor::new()
            .analyze(content)
            .expect("valid python");
        let ctx = FileContext::new(
            std::path::Path::new("a.py"),
            content,
            std::path::Path::new("."),
        );
        let violations = TestRule.check(&ctx, &module);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "`A` found");
    }
}
