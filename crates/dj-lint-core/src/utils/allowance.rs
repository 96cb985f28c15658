//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! # dj-lint: allow(no-pk) reason="populated by an external job"
//! # pylint: disable=mult-fk-ref,bad-opt
//! ```
//!
//! A directive applies to its own line and to the line after it, so it can
//! trail the `class` line or sit on the line above.

use std::collections::HashSet;

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names (or codes) that are allowed, lowercased.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks source code for allowance comments with reason.
///
/// Rule names match case-insensitively; `all` matches every rule.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();
    let rule_name = rule_name.to_ascii_lowercase();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.rules.contains(&rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from any comment on a line.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    line.match_indices('#')
        .find_map(|(at, _)| parse_comment(line[at + 1..].trim()))
}

fn parse_comment(comment: &str) -> Option<AllowDirective> {
    if let Some(directive) = comment.strip_prefix("dj-lint:") {
        return parse_dj_lint(directive.trim());
    }
    let directive = comment.strip_prefix("pylint:")?.trim();
    let names = directive.strip_prefix("disable")?.trim_start();
    let names = names.strip_prefix('=')?;
    let end = names.find('#').unwrap_or(names.len());

    let rules = split_rules(&names[..end]);
    (!rules.is_empty()).then_some(AllowDirective {
        rules,
        reason: None,
    })
}

fn parse_dj_lint(directive: &str) -> Option<AllowDirective> {
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules = split_rules(&allow_content[..paren_end]);
    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

fn split_rules(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
