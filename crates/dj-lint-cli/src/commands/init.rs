//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# dj-lint configuration

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./pipeline"

# Glob patterns to exclude from analysis
exclude = [
    "**/.venv/**",
    "**/venv/**",
    "**/__pycache__/**",
]

# Respect .gitignore files
respect_gitignore = true

# Abort when a Python file does not parse (default: skip it with a warning)
# fail_on_parse_error = false

[datajoint]
# Accept filepath@store attributes (same as --permit-dj-filepath)
permit_filepath = false

# Module names under which dj.Manual style bases are recognized
module_aliases = ["dj", "datajoint"]

# Bare base class names that also declare tables
extension_bases = ["_Merge"]

# "after-options" or "per-option"
# null_pk_ref = "after-options"

# Message configurations
# Each message can be enabled/disabled and have its severity overridden

# [rules.mult-fk-ref]
# severity = "error"

# [rules.dj-wildcard-import]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("dj-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created dj-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit dj-lint.toml to configure messages");
    println!("  2. Run: dj-lint check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dj_lint_core::{Config, NullPkRefMode};

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert!(config.analyzer.respect_gitignore);
        assert!(!config.datajoint.permit_filepath);
        assert_eq!(config.datajoint.module_aliases, vec!["dj", "datajoint"]);
        assert_eq!(config.datajoint.null_pk_ref, NullPkRefMode::AfterOptions);
        assert!(config.is_rule_enabled("dj-wildcard-import"));
    }
}
