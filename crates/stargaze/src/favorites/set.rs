//! Ordered favorites set
//!
//! Mapping from item id to item that remembers insertion order, both in
//! memory and through its JSON form (a flat object `id -> item`). Every key
//! must equal its item's url.

use crate::item::Item;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Favorited items keyed by id, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    entries: Vec<(String, Item)>,
    /// id -> position in `entries`
    index: HashMap<String, usize>,
}

impl FavoritesSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the persisted JSON form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Compact JSON form, as written to storage
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Whether `id` is present (O(1))
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Get an item by id
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    /// Insert under `id`. Returns false (and changes nothing) if present.
    pub fn insert(&mut self, id: impl Into<String>, item: Item) -> bool {
        let id = id.into();
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, item));
        true
    }

    /// Remove by id, returning the item if it was present
    pub fn remove(&mut self, id: &str) -> Option<Item> {
        let pos = self.index.remove(id)?;
        let (_, item) = self.entries.remove(pos);
        for (_, slot) in self.index.iter_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(item)
    }

    /// Items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().map(|(_, item)| item)
    }

    /// Ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FavoritesSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, item) in &self.entries {
            map.serialize_entry(id, item)?;
        }
        map.end()
    }
}

struct FavoritesSetVisitor;

impl<'de> Visitor<'de> for FavoritesSetVisitor {
    type Value = FavoritesSet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping item ids to items")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut set = FavoritesSet::new();
        while let Some((id, item)) = access.next_entry::<String, Item>()? {
            if id != item.id() {
                return Err(de::Error::custom(format!(
                    "key '{}' does not match item url '{}'",
                    id,
                    item.id()
                )));
            }
            // Repeated key: later value wins, first position is kept
            match set.index.get(&id) {
                Some(&pos) => set.entries[pos].1 = item,
                None => {
                    set.insert(id, item);
                }
            }
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for FavoritesSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FavoritesSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str) -> Item {
        Item::image(url, format!("Title {}", url), "2024-01-01")
    }

    fn set_of(ids: &[&str]) -> FavoritesSet {
        let mut set = FavoritesSet::new();
        for id in ids {
            set.insert(*id, item(id));
        }
        set
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut set = FavoritesSet::new();
        assert!(set.insert("u1", item("u1")));
        assert!(!set.insert("u1", item("u1")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order_of_rest() {
        let mut set = set_of(&["a", "b", "c", "d"]);
        assert!(set.remove("b").is_some());
        assert!(set.remove("b").is_none());

        let ids: Vec<_> = set.ids().collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
        assert_eq!(set.get("d").unwrap().url, "d");
        assert_eq!(set.get("c").unwrap().url, "c");
    }

    #[test]
    fn test_json_preserves_insertion_order() {
        let set = set_of(&["zeta", "alpha", "mid"]);
        let json = set.to_json().unwrap();

        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let mid = json.find("\"mid\"").unwrap();
        assert!(zeta < alpha && alpha < mid);

        let reloaded = FavoritesSet::from_json(&json).unwrap();
        assert_eq!(reloaded, set);
        let ids: Vec<_> = reloaded.ids().collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_json_is_flat_object() {
        let set = set_of(&["u1"]);
        let value: serde_json::Value = serde_json::from_str(&set.to_json().unwrap()).unwrap();
        assert_eq!(value["u1"]["url"], "u1");
        assert_eq!(value["u1"]["media_type"], "image");
    }

    #[test]
    fn test_empty_object() {
        let set = FavoritesSet::from_json("{}").unwrap();
        assert!(set.is_empty());
        assert_eq!(FavoritesSet::new().to_json().unwrap(), "{}");
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(FavoritesSet::from_json("{not json").is_err());
        assert!(FavoritesSet::from_json("[]").is_err());
        assert!(FavoritesSet::from_json(r#"{"u1": 5}"#).is_err());
    }

    #[test]
    fn test_rejects_key_that_is_not_the_item_url() {
        let json = r#"{"u1": {"media_type":"image","url":"u2","title":"x","explanation":"","date":""}}"#;
        let err = FavoritesSet::from_json(json).unwrap_err().to_string();
        assert!(err.contains("'u1'"));
        assert!(err.contains("'u2'"));
    }

    #[test]
    fn test_repeated_key_keeps_first_position() {
        let json = r#"{
            "a": {"media_type":"image","url":"a","title":"first","explanation":"","date":""},
            "b": {"media_type":"image","url":"b","title":"b","explanation":"","date":""},
            "a": {"media_type":"image","url":"a","title":"second","explanation":"","date":""}
        }"#;
        let set = FavoritesSet::from_json(json).unwrap();
        let ids: Vec<_> = set.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(set.get("a").unwrap().title, "second");
    }
}
