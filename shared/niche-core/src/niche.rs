//! Named groups of scored items

use serde::{Deserialize, Serialize};

use crate::ScoredItem;

/// A named cluster of items sharing topical similarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Niche {
    pub name: String,
    pub items: Vec<ScoredItem>,
}

impl Niche {
    pub fn with_items(name: impl Into<String>, items: Vec<ScoredItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifiers of the member items, in order
    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.id()).collect()
    }
}
