//! List rules command implementation.

use dj_lint_core::DataJointConfig;
use dj_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available messages:\n");
    println!("{:<8} {:<20} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(80));

    for rule in all_rules(&DataJointConfig::default()) {
        for spec in rule.messages() {
            println!(
                "{:<8} {:<20} {:<9} {}",
                spec.code,
                spec.name,
                spec.severity.to_string(),
                spec.help
            );
        }
    }

    println!("\nUse --rules to report only some messages, e.g.:");
    println!("  dj-lint check --rules no-pk,bad-opt");
    println!("  dj-lint check --rules DJ001,DJ003");
    println!("\nSuppress a single finding with a comment on or above the class line:");
    println!("  # dj-lint: allow(no-pk) reason=\"view-only table\"");
    println!("  # pylint: disable=no-pk");
}
