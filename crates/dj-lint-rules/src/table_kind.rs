//! Recognition of table classes by their first base class.

use dj_lint_core::DataJointConfig;
use dj_lint_python::{ClassInfo, DefinitionAttr, SourceSpan};

/// The DataJoint tier a table class derives from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableKind {
    /// `dj.Manual`
    Manual,
    /// `dj.Lookup`
    Lookup,
    /// `dj.Imported`
    Imported,
    /// `dj.Computed`
    Computed,
    /// `dj.Part`
    Part,
    /// `dj.Table`
    Table,
    /// A configured extension base such as `_Merge`.
    ExternalExtension(String),
}

impl TableKind {
    fn from_tier(tier: &str) -> Option<Self> {
        match tier {
            "Manual" => Some(Self::Manual),
            "Lookup" => Some(Self::Lookup),
            "Imported" => Some(Self::Imported),
            "Computed" => Some(Self::Computed),
            "Part" => Some(Self::Part),
            "Table" => Some(Self::Table),
            _ => None,
        }
    }

    /// Whether this is a part table.
    #[must_use]
    pub fn is_part(&self) -> bool {
        matches!(self, Self::Part)
    }
}

/// A class recognized as a table, ready for classification.
#[derive(Debug, Clone, Copy)]
pub struct TableDeclaration<'a> {
    /// Class name.
    pub name: &'a str,
    /// Resolved tier.
    pub kind: &'a TableKind,
    /// The `definition` attribute.
    pub definition: &'a DefinitionAttr,
    /// Span from `class` to the end of the name.
    pub span: SourceSpan,
    /// Name of the enclosing class, for nested declarations.
    pub enclosing: Option<&'a str>,
}

impl<'a> TableDeclaration<'a> {
    /// Pairs a class with its resolved kind.
    #[must_use]
    pub fn new(class: &'a ClassInfo, kind: &'a TableKind) -> Self {
        Self {
            name: &class.name,
            kind,
            definition: &class.definition,
            span: class.span,
            enclosing: class.enclosing.as_deref(),
        }
    }
}

/// Maps written base class expressions to [`TableKind`]s.
///
/// Only `<alias>.<Tier>` with a configured module alias, or a bare name
/// listed as an extension base, is recognized. `from datajoint import Manual`
/// followed by `class T(Manual)` is not.
#[derive(Debug, Clone)]
pub struct TableKindResolver {
    module_aliases: Vec<String>,
    extension_bases: Vec<String>,
}

impl Default for TableKindResolver {
    fn default() -> Self {
        Self::from_config(&DataJointConfig::default())
    }
}

impl TableKindResolver {
    /// Builds a resolver from the `[datajoint]` configuration section.
    #[must_use]
    pub fn from_config(config: &DataJointConfig) -> Self {
        Self {
            module_aliases: config.module_aliases.clone(),
            extension_bases: config.extension_bases.clone(),
        }
    }

    /// Resolves a base class expression such as `dj.Manual`.
    #[must_use]
    pub fn resolve(&self, base: &str) -> Option<TableKind> {
        if self.extension_bases.iter().any(|b| b == base) {
            return Some(TableKind::ExternalExtension(base.to_string()));
        }
        let (module, tier) = base.rsplit_once('.')?;
        if !self.module_aliases.iter().any(|alias| alias == module) {
            return None;
        }
        TableKind::from_tier(tier)
    }

    /// Resolves the first base of `class`; later bases are ignored.
    #[must_use]
    pub fn classify(&self, class: &ClassInfo) -> Option<TableKind> {
        class.first_base().and_then(|base| self.resolve(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_tiers_under_aliases() {
        let resolver = TableKindResolver::default();
        assert_eq!(resolver.resolve("dj.Manual"), Some(TableKind::Manual));
        assert_eq!(resolver.resolve("datajoint.Part"), Some(TableKind::Part));
        assert_eq!(resolver.resolve("dj.Computed"), Some(TableKind::Computed));
        assert_eq!(
            resolver.resolve("_Merge"),
            Some(TableKind::ExternalExtension("_Merge".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_bases() {
        let resolver = TableKindResolver::default();
        assert_eq!(resolver.resolve("Manual"), None);
        assert_eq!(resolver.resolve("dj.Schema"), None);
        assert_eq!(resolver.resolve("other.Manual"), None);
        assert_eq!(resolver.resolve("object"), None);
    }

    #[test]
    fn configured_aliases() {
        let config = DataJointConfig {
            module_aliases: vec!["datajoint".to_string()],
            extension_bases: vec!["SpikeSortingOutput".to_string()],
            ..DataJointConfig::default()
        };
        let resolver = TableKindResolver::from_config(&config);
        assert_eq!(resolver.resolve("dj.Manual"), None);
        assert_eq!(resolver.resolve("_Merge"), None);
        assert!(resolver.resolve("SpikeSortingOutput").is_some());
    }

    #[test]
    fn only_first_base_counts() {
        let class = ClassInfo {
            name: "Mixed".to_string(),
            bases: vec!["Mixin".to_string(), "dj.Manual".to_string()],
            definition: DefinitionAttr::Missing,
            span: SourceSpan {
                line: 1,
                column: 0,
                offset: 0,
                length: 11,
            },
            enclosing: None,
        };
        assert_eq!(TableKindResolver::default().classify(&class), None);
    }
}
