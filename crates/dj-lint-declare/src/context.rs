//! Name resolution context for a declaration.

use std::collections::{HashMap, HashSet};

/// Names a definition may refer to.
///
/// DataJoint evaluates foreign key targets and adapted types against the
/// defining module's namespace. Statically we only know what the caller
/// registers here; an empty context makes every reference unresolvable.
#[derive(Debug, Clone, Default)]
pub struct DeclareContext {
    tables: HashMap<String, Vec<String>>,
    adapters: HashSet<String>,
    filepath_enabled: bool,
}

impl DeclareContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a referenceable table and its primary key attributes.
    #[must_use]
    pub fn with_table<I, S>(mut self, name: impl Into<String>, primary_key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.insert(
            name.into(),
            primary_key.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Registers an attribute adapter name (used as `<name>`).
    #[must_use]
    pub fn with_adapter(mut self, name: impl Into<String>) -> Self {
        self.adapters.insert(name.into());
        self
    }

    /// Enables the experimental `filepath@store` type.
    #[must_use]
    pub fn with_filepath(mut self, enabled: bool) -> Self {
        self.filepath_enabled = enabled;
        self
    }

    /// Primary key of a registered table.
    #[must_use]
    pub fn table_primary_key(&self, name: &str) -> Option<&[String]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    /// Returns true if the adapter is registered.
    #[must_use]
    pub fn has_adapter(&self, name: &str) -> bool {
        self.adapters.contains(name)
    }

    /// Returns true if `filepath` attributes are accepted.
    #[must_use]
    pub fn filepath_enabled(&self) -> bool {
        self.filepath_enabled
    }
}
