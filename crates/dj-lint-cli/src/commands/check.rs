//! Check command implementation.

use anyhow::{Context, Result};
use dj_lint_core::{Analyzer, Config};
use dj_lint_rules::{all_rules, RuleId};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Flags of the `check` subcommand.
#[derive(Debug)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated message names or codes to report.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// `--permit-dj-filepath`.
    pub permit_filepath: bool,
}

/// Runs the check command.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let mut config = load_config(source)?;
    if options.permit_filepath {
        config.datajoint.permit_filepath = true;
    }

    let mut builder = Analyzer::builder().root(path);

    for pattern in &options.exclude {
        builder = builder.exclude(pattern.clone());
    }

    if let Some(filter) = &options.rules {
        let keys: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect();
        for key in &keys {
            if RuleId::lookup(key).is_none() {
                tracing::warn!("Unknown rule: {}", key);
            }
        }
        builder = builder.only(keys);
    }

    for rule in all_rules(&config.datajoint) {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    // Exit with error code if there are errors
    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}
