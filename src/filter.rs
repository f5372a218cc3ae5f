//! Component type filter.

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

use std::collections::HashSet;

use crate::model::ComponentKind;

/// The set of component kinds the user has selected. Empty shows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    selected: HashSet<ComponentKind>,
}

impl TypeFilter {
    /// Build a filter from raw type tags as the host UI reports them.
    pub fn from_tags<S: AsRef<str>>(tags: impl IntoIterator<Item = S>) -> Self {
        Self {
            selected: tags
                .into_iter()
                .map(|t| ComponentKind::parse(t.as_ref()))
                .collect(),
        }
    }

    /// Whether components of `kind` are drawn and clickable.
    #[must_use]
    pub fn allows(&self, kind: ComponentKind) -> bool {
        self.selected.is_empty() || self.selected.contains(&kind)
    }

    /// Add or remove a kind from the selection.
    pub fn toggle(&mut self, kind: ComponentKind) {
        if !self.selected.remove(&kind) {
            self.selected.insert(kind);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
