//! Catalog store
//!
//! Holds the most recently fetched batch of items in feed order.
//! Replaced wholesale on every successful fetch, never merged.

use crate::item::Item;
use std::collections::HashMap;

/// The current fetched batch, indexed by item id
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    items: Vec<Item>,
    /// id -> position in `items`
    index: HashMap<String, usize>,
}

impl CatalogStore {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `items`
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut catalog = Self::new();
        catalog.replace(items);
        catalog
    }

    /// Swap in a new batch
    ///
    /// The new contents are built aside and swapped in at once. If the feed
    /// repeats an id, the first occurrence wins.
    pub fn replace(&mut self, items: Vec<Item>) {
        let mut kept = Vec::with_capacity(items.len());
        let mut index = HashMap::with_capacity(items.len());

        for item in items {
            if index.contains_key(item.id()) {
                continue;
            }
            index.insert(item.id().to_string(), kept.len());
            kept.push(item);
        }

        self.items = kept;
        self.index = index;
    }

    /// Look up an item by id
    pub fn find_by_id(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    /// Items in feed order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog holds nothing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str) -> Item {
        Item::image(url, url.to_uppercase(), "2024-01-01")
    }

    #[test]
    fn test_find_by_id() {
        let catalog = CatalogStore::from_items(vec![item("u1"), item("u2")]);
        assert_eq!(catalog.find_by_id("u2").unwrap().title, "U2");
        assert!(catalog.find_by_id("u3").is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut catalog = CatalogStore::from_items(vec![item("u1"), item("u2")]);
        catalog.replace(vec![item("u3")]);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.find_by_id("u1").is_none());
        assert!(catalog.find_by_id("u3").is_some());
    }

    #[test]
    fn test_preserves_feed_order() {
        let catalog = CatalogStore::from_items(vec![item("c"), item("a"), item("b")]);
        let ids: Vec<_> = catalog.items().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut second = item("u1");
        second.title = "Second".to_string();
        let catalog = CatalogStore::from_items(vec![item("u1"), second, item("u2")]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find_by_id("u1").unwrap().title, "U1");
        assert_eq!(catalog.find_by_id("u2").unwrap().id(), "u2");
    }

    #[test]
    fn test_empty() {
        let mut catalog = CatalogStore::new();
        assert!(catalog.is_empty());
        catalog.replace(vec![item("u1")]);
        assert!(!catalog.is_empty());
        catalog.replace(Vec::new());
        assert!(catalog.is_empty());
    }
}
