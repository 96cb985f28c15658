//! Integration test: file discovery, filtering and suppression via Analyzer.
//!
//! Builds a small Python project in a temp directory and runs a toy rule
//! that reports every class, so the assertions are about the analyzer's
//! plumbing rather than any particular check.

use dj_lint_core::{
    Analyzer, AnalyzerError, Config, FileContext, Location, MessageSpec, Rule, Severity,
    Violation,
};
use dj_lint_python::ModuleAnalysis;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CLASS_SEEN: MessageSpec = MessageSpec {
    code: "T001",
    name: "class-seen",
    template: "`{}` seen",
    help: "",
    severity: Severity::Warning,
};

const BASE_SEEN: MessageSpec = MessageSpec {
    code: "T002",
    name: "base-seen",
    template: "`{}` has base {}",
    help: "",
    severity: Severity::Error,
};

static MESSAGES: [MessageSpec; 2] = [CLASS_SEEN, BASE_SEEN];

struct EveryClass;

impl Rule for EveryClass {
    fn name(&self) -> &'static str {
        "every-class"
    }

    fn messages(&self) -> &'static [MessageSpec] {
        &MESSAGES
    }

    fn check(&self, ctx: &FileContext, module: &ModuleAnalysis) -> Vec<Violation> {
        let mut out = Vec::new();
        for class in &module.classes {
            let location = Location::from_span(ctx.relative_path.clone(), class.span);
            out.push(Violation::from_spec(
                &CLASS_SEEN,
                location.clone(),
                vec![class.name.clone()],
            ));
            if let Some(base) = class.first_base() {
                out.push(Violation::from_spec(
                    &BASE_SEEN,
                    location,
                    vec![class.name.clone(), base.to_string()],
                ));
            }
        }
        out
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, content).expect("write fixture");
}

fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "pipeline/subject.py",
        "import datajoint as dj\n\nclass Subject(dj.Manual):\n    definition = \"id : int\"\n",
    );
    write(
        root,
        "pipeline/session.py",
        "class Helper:\n    pass\n\n# dj-lint: allow(class-seen)\nclass Session(object):\n    pass\n",
    );
    write(root, "pipeline/notes.txt", "class NotPython(object): pass\n");
    write(root, "build/generated.py", "class Generated(object):\n    pass\n");
    write(root, ".gitignore", "ignored/\n");
    write(root, "ignored/skip.py", "class Skipped(object):\n    pass\n");
    dir
}

fn run(builder: dj_lint_core::AnalyzerBuilder) -> dj_lint_core::LintResult {
    builder
        .rule(EveryClass)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed")
}

fn summary(result: &dj_lint_core::LintResult) -> Vec<String> {
    result
        .violations
        .iter()
        .map(|v| {
            format!(
                "{}:{} {} {}",
                v.location.file.display(),
                v.location.line,
                v.rule,
                v.message
            )
        })
        .collect()
}

#[test]
fn walks_python_files_and_sorts_results() {
    let dir = project();
    let result = run(Analyzer::builder()
        .root(dir.path())
        .exclude("**/build/**"));

    assert_eq!(result.files_checked, 2);
    assert_eq!(
        summary(&result),
        vec![
            "pipeline/session.py:1 class-seen `Helper` seen",
            "pipeline/session.py:5 base-seen `Session` has base object",
            "pipeline/subject.py:3 class-seen `Subject` seen",
            "pipeline/subject.py:3 base-seen `Subject` has base dj.Manual",
        ]
    );
}

#[test]
fn gitignore_can_be_disabled() {
    let dir = project();
    let mut config = Config::default();
    config.analyzer.respect_gitignore = false;
    config.analyzer.exclude = vec!["**/build/**".to_string()];

    let result = run(Analyzer::builder().root(dir.path()).config(config));
    assert_eq!(result.files_checked, 3);
}

#[test]
fn disabled_message_and_severity_override() {
    let dir = project();
    let config = Config::parse(
        r#"
[analyzer]
exclude = ["**/build/**"]

[rules.class-seen]
enabled = false

[rules.base-seen]
severity = "info"
"#,
    )
    .expect("config should parse");

    let result = run(Analyzer::builder().root(dir.path()).config(config));
    assert_eq!(result.rule_names(), vec!["base-seen", "base-seen"]);
    assert!(result.violations.iter().all(|v| v.severity == Severity::Info));
    assert!(!result.has_errors());
}

#[test]
fn only_filter_accepts_codes() {
    let dir = project();
    let result = run(Analyzer::builder()
        .root(dir.path())
        .exclude("**/build/**")
        .only(["T001"]));
    assert_eq!(result.rule_names(), vec!["class-seen", "class-seen"]);
}

#[test]
fn single_file_root() {
    let dir = project();
    let result = run(Analyzer::builder().root(dir.path().join("pipeline/subject.py")));

    assert_eq!(result.files_checked, 1);
    assert_eq!(
        result.violations[0].location.file,
        Path::new("subject.py").to_path_buf()
    );
}

#[test]
fn syntax_errors_are_skipped_unless_fatal() {
    let dir = project();
    write(dir.path(), "pipeline/broken.py", "class Broken(:\n");

    let result = run(Analyzer::builder()
        .root(dir.path())
        .exclude("**/build/**"));
    assert_eq!(result.files_checked, 2);

    let err = Analyzer::builder()
        .root(dir.path())
        .rule(EveryClass)
        .fail_on_parse_error(true)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect_err("broken file should abort");
    assert!(matches!(err, AnalyzerError::Parse { .. }));
}
