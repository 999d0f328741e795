//! Known model context windows.
//!
//! The table is data, not code: callers inject their own (or extend the
//! default) and ask which models could take a document of a given size.
//! Nothing here enforces a limit.

use serde::{Deserialize, Serialize};

/// One model and the number of tokens it accepts per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLimit {
    /// Model identifier, e.g. `gpt-4`.
    pub name: String,
    /// Context window in tokens.
    pub context_window: usize,
}

/// Ordered table of model context windows.
///
/// ```rust
/// use ctxwindow::ModelTable;
///
/// let table = ModelTable::default().with_model("tiny-model", 512);
/// assert_eq!(table.limit("gpt-4"), Some(8192));
/// assert_eq!(table.compatible(1000), vec!["gpt-3.5-turbo", "gpt-4", "gpt-4-turbo", "claude-3-opus"]);
/// assert_eq!(table.compatible(5000), vec!["gpt-4", "gpt-4-turbo", "claude-3-opus"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTable {
    models: Vec<ModelLimit>,
}

impl ModelTable {
    /// An empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self { models: Vec::new() }
    }

    /// Add a model, replacing the window of an existing entry with the same name.
    #[must_use]
    pub fn with_model(mut self, name: impl Into<String>, context_window: usize) -> Self {
        self.insert(name, context_window);
        self
    }

    /// Add or replace a model in place.
    pub fn insert(&mut self, name: impl Into<String>, context_window: usize) {
        let name = name.into();
        match self.models.iter_mut().find(|m| m.name == name) {
            Some(existing) => existing.context_window = context_window,
            None => self.models.push(ModelLimit {
                name,
                context_window,
            }),
        }
    }

    /// Context window of `name`, if known.
    #[must_use]
    pub fn limit(&self, name: &str) -> Option<usize> {
        self.models
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.context_window)
    }

    /// Names of models whose window can hold `tokens`, in table order.
    #[must_use]
    pub fn compatible(&self, tokens: usize) -> Vec<String> {
        self.models
            .iter()
            .filter(|m| tokens <= m.context_window)
            .map(|m| m.name.clone())
            .collect()
    }

    /// All entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelLimit> {
        self.models.iter()
    }

    /// Number of models in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the table has no models.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelTable {
    fn default() -> Self {
        Self::empty()
            .with_model("gpt-3.5-turbo", 4096)
            .with_model("gpt-4", 8192)
            .with_model("gpt-4-turbo", 128_000)
            .with_model("claude-3-opus", 200_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_inclusive() {
        let table = ModelTable::default();
        assert!(table.compatible(4096).contains(&"gpt-3.5-turbo".to_string()));
        assert!(!table.compatible(4097).contains(&"gpt-3.5-turbo".to_string()));
    }

    #[test]
    fn test_nothing_fits() {
        assert!(ModelTable::default().compatible(1_000_000).is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let table = ModelTable::default().with_model("gpt-4", 32_768);
        assert_eq!(table.len(), 4);
        assert_eq!(table.limit("gpt-4"), Some(32_768));
    }

    #[test]
    fn test_unknown_model() {
        assert_eq!(ModelTable::default().limit("llama"), None);
        assert!(ModelTable::empty().is_empty());
    }
}
