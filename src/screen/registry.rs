use std::sync::Arc;

use crate::source::SourceMode;
use crate::table::{ColumnDescriptor, RowActionKind, SearchFields};

/// Static description of one master-data screen.
#[derive(Clone)]
pub struct ScreenDef {
    /// Stable identifier, used on the command line.
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Dataset collection the rows come from.
    pub collection: &'static str,
    pub mode: SourceMode,
    pub columns: fn() -> Vec<ColumnDescriptor>,
    /// Empty means "search the column keys".
    pub search_fields: &'static [&'static str],
    pub actions: &'static [RowActionKind],
}

impl ScreenDef {
    pub fn search(&self) -> Option<SearchFields> {
        (!self.search_fields.is_empty()).then(|| SearchFields::new(self.search_fields.iter().copied()))
    }
}

impl std::fmt::Debug for ScreenDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenDef")
            .field("key", &self.key)
            .field("collection", &self.collection)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Registered screens in the order they were added.
#[derive(Debug, Default)]
pub struct ScreenRegistry {
    screens: Vec<Arc<ScreenDef>>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a screen, replacing any with the same key in place.
    pub fn register(&mut self, def: ScreenDef) {
        let def = Arc::new(def);
        if let Some(slot) = self.screens.iter_mut().find(|s| s.key == def.key) {
            *slot = def;
        } else {
            self.screens.push(def);
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<ScreenDef>> {
        self.screens.iter().find(|s| s.key == key).cloned()
    }

    pub fn all(&self) -> &[Arc<ScreenDef>] {
        &self.screens
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(key: &'static str, title: &'static str) -> ScreenDef {
        ScreenDef {
            key,
            title,
            description: "",
            collection: key,
            mode: SourceMode::Local,
            columns: || vec![ColumnDescriptor::new("name", "Name")],
            search_fields: &[],
            actions: &[],
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ScreenRegistry::new();
        assert!(registry.is_empty());
        registry.register(def("colors", "Colors"));
        registry.register(def("users", "Users"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("users").unwrap().title, "Users");
        assert!(registry.get("secrets").is_none());
    }

    #[test]
    fn test_reregister_keeps_order() {
        let mut registry = ScreenRegistry::new();
        registry.register(def("colors", "Colors"));
        registry.register(def("users", "Users"));
        registry.register(def("colors", "Colours"));

        let titles: Vec<_> = registry.all().iter().map(|s| s.title).collect();
        assert_eq!(titles, ["Colours", "Users"]);
    }

    #[test]
    fn test_empty_search_fields_defer_to_columns() {
        assert!(def("colors", "Colors").search().is_none());
    }
}
