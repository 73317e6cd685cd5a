//! # Keyed Immutable Collection
//!
//! A lookup-by-identifier structure built once from a list of entities.
//! Every entity declares its own key through [`Keyed`], and the collection
//! guarantees two things for as long as it exists:
//!
//! - keys are unique (no two input entities shared a key), and
//! - each entry's map key is the key its entity declares.
//!
//! There is no insert, remove or replace. Derived subsets ([`select`],
//! [`filter`]) are fresh collections.
//!
//! Entries live in an `Arc`-shared `BTreeMap`, so clones are cheap and
//! iteration follows key order. Concurrent readers need no locking.
//!
//! [`select`]: KeyedCollection::select
//! [`filter`]: KeyedCollection::filter

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CollectionError;

/// An entity that knows its own identifier.
pub trait Keyed {
    /// The identifier type.
    type Key: Ord + Clone + fmt::Display;

    /// Collection label used in error messages ("ruleset", ...).
    const COLLECTION: &'static str;

    /// The entity's identifier.
    fn key(&self) -> &Self::Key;
}

/// Immutable map from identifier to entity.
pub struct KeyedCollection<V: Keyed> {
    entries: Arc<BTreeMap<V::Key, V>>,
}

impl<V: Keyed> KeyedCollection<V> {
    /// Build a collection from entities, keyed by each entity's own key.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateKey`] if two entities share a key.
    pub fn from_entities<I>(entities: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = V>,
    {
        let mut entries = BTreeMap::new();
        for entity in entities {
            let key = entity.key().clone();
            if entries.contains_key(&key) {
                return Err(CollectionError::DuplicateKey {
                    collection: V::COLLECTION,
                    key: key.to_string(),
                });
            }
            entries.insert(key, entity);
        }
        Ok(Self::from_checked(entries))
    }

    /// Build a collection from an existing key-to-entity map.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::KeyMismatch`] if any entity is filed under
    /// a key other than its own.
    pub fn from_map(entries: BTreeMap<V::Key, V>) -> Result<Self, CollectionError> {
        if let Some((key, entity)) = entries.iter().find(|(key, entity)| *key != entity.key()) {
            return Err(CollectionError::KeyMismatch {
                collection: V::COLLECTION,
                key: key.to_string(),
                declared: entity.key().to_string(),
            });
        }
        Ok(Self::from_checked(entries))
    }

    fn from_checked(entries: BTreeMap<V::Key, V>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Look up the entity stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingKey`] if `key` is absent. Callers
    /// that cannot tolerate failure should check [`contains_key`] first.
    ///
    /// [`contains_key`]: KeyedCollection::contains_key
    pub fn get(&self, key: &V::Key) -> Result<&V, CollectionError> {
        self.entries.get(key).ok_or_else(|| CollectionError::MissingKey {
            collection: V::COLLECTION,
            key: key.to_string(),
        })
    }

    /// Whether an entity is stored under `key`.
    pub fn contains_key(&self, key: &V::Key) -> bool {
        self.entries.contains_key(key)
    }

    /// The set of all keys.
    pub fn keys(&self) -> BTreeSet<V::Key> {
        self.entries.keys().cloned().collect()
    }

    /// Iterate over the entities in key order. Each call starts a new pass.
    pub fn iter(&self) -> std::collections::btree_map::Values<'_, V::Key, V> {
        self.entries.values()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The largest key, if any.
    pub fn last_key(&self) -> Option<&V::Key> {
        self.entries.keys().next_back()
    }
}

impl<V: Keyed + Clone> KeyedCollection<V> {
    /// Build a new collection holding exactly the entities named by `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingKey`] if a key is absent, or
    /// [`CollectionError::DuplicateKey`] if `keys` names an entity twice.
    pub fn select<'a, I>(&self, keys: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = &'a V::Key>,
        V::Key: 'a,
    {
        let mut selected = Vec::new();
        for key in keys {
            selected.push(self.get(key)?.clone());
        }
        Self::from_entities(selected)
    }

    /// Build a new collection holding the entities that satisfy `predicate`.
    ///
    /// Cannot fail: any subset of a valid collection is valid.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V) -> bool,
    {
        let entries = self
            .entries
            .iter()
            .filter(|(_, entity)| predicate(entity))
            .map(|(key, entity)| (key.clone(), entity.clone()))
            .collect();
        Self::from_checked(entries)
    }
}

impl<V: Keyed> Clone for KeyedCollection<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V: Keyed> Default for KeyedCollection<V> {
    fn default() -> Self {
        Self::from_checked(BTreeMap::new())
    }
}

impl<V: Keyed + fmt::Debug> fmt::Debug for KeyedCollection<V>
where
    V::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<V: Keyed + PartialEq> PartialEq for KeyedCollection<V> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries) || self.entries == other.entries
    }
}

impl<V: Keyed + Eq> Eq for KeyedCollection<V> {}

impl<'a, V: Keyed> IntoIterator for &'a KeyedCollection<V> {
    type Item = &'a V;
    type IntoIter = std::collections::btree_map::Values<'a, V::Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Keyed + Serialize> Serialize for KeyedCollection<V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'de, V> Deserialize<'de> for KeyedCollection<V>
where
    V: Keyed + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entities = Vec::<V>::deserialize(deserializer)?;
        Self::from_entities(entities).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Item {
        id: u32,
        label: String,
    }

    impl Keyed for Item {
        type Key = u32;
        const COLLECTION: &'static str = "item set";

        fn key(&self) -> &u32 {
            &self.id
        }
    }

    fn item(id: u32, label: &str) -> Item {
        Item {
            id,
            label: label.to_string(),
        }
    }

    #[test]
    fn from_entities_indexes_by_key() {
        let items = KeyedCollection::from_entities(vec![item(2, "b"), item(1, "a")]).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items.keys(), BTreeSet::from([1, 2]));
        assert_eq!(items.get(&1).unwrap().label, "a");
        assert_eq!(items.get(&2).unwrap().label, "b");
    }

    #[test]
    fn duplicate_key_fails_even_if_other_fields_differ() {
        let err = KeyedCollection::from_entities(vec![item(1, "a"), item(1, "z")]).unwrap_err();
        assert_eq!(
            err,
            CollectionError::DuplicateKey {
                collection: "item set",
                key: "1".to_string(),
            }
        );
    }

    #[test]
    fn from_map_rejects_misfiled_entity() {
        let mut map = BTreeMap::new();
        map.insert(1, item(1, "a"));
        map.insert(5, item(2, "b"));
        let err = KeyedCollection::from_map(map).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert!(matches!(err, CollectionError::KeyMismatch { ref key, ref declared, .. }
            if key == "5" && declared == "2"));
    }

    #[test]
    fn from_map_accepts_consistent_map() {
        let map = BTreeMap::from([(1, item(1, "a")), (2, item(2, "b"))]);
        let items = KeyedCollection::from_map(map).unwrap();
        assert!(items.contains_key(&2));
    }

    #[test]
    fn get_missing_key_fails() {
        let items = KeyedCollection::from_entities(vec![item(1, "a")]).unwrap();
        let err = items.get(&9).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
        assert_eq!(err.key(), "9");
    }

    #[test]
    fn iteration_is_restartable_and_key_ordered() {
        let items =
            KeyedCollection::from_entities(vec![item(3, "c"), item(1, "a"), item(2, "b")]).unwrap();
        let first: Vec<u32> = items.iter().map(|i| i.id).collect();
        let second: Vec<u32> = (&items).into_iter().map(|i| i.id).collect();
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn select_builds_fresh_subset() {
        let items =
            KeyedCollection::from_entities(vec![item(1, "a"), item(2, "b"), item(3, "c")]).unwrap();
        let subset = items.select(&[3, 1]).unwrap();
        assert_eq!(subset.keys(), BTreeSet::from([1, 3]));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn select_fails_on_missing_or_repeated_key() {
        let items = KeyedCollection::from_entities(vec![item(1, "a")]).unwrap();
        assert_eq!(items.select(&[2]).unwrap_err().kind(), ErrorKind::MissingKey);
        assert_eq!(items.select(&[1, 1]).unwrap_err().kind(), ErrorKind::DuplicateKey);
    }

    #[test]
    fn filter_restricts_without_touching_source() {
        let items =
            KeyedCollection::from_entities(vec![item(1, "a"), item(2, "b"), item(3, "c")]).unwrap();
        let odd = items.filter(|i| i.id % 2 == 1);
        assert_eq!(odd.keys(), BTreeSet::from([1, 3]));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn last_key_and_empty() {
        let empty: KeyedCollection<Item> = KeyedCollection::default();
        assert!(empty.is_empty());
        assert_eq!(empty.last_key(), None);

        let items = KeyedCollection::from_entities(vec![item(7, "g"), item(2, "b")]).unwrap();
        assert_eq!(items.last_key(), Some(&7));
    }

    #[test]
    fn clones_compare_equal() {
        let items = KeyedCollection::from_entities(vec![item(1, "a")]).unwrap();
        let rebuilt = KeyedCollection::from_entities(vec![item(1, "a")]).unwrap();
        assert_eq!(items.clone(), items);
        assert_eq!(items, rebuilt);
    }

    #[test]
    fn deserialize_rejects_duplicates() {
        let ok: KeyedCollection<Item> =
            serde_json::from_str(r#"[{"id":1,"label":"a"},{"id":2,"label":"b"}]"#).unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"[{"id":1,"label":"a"},{"id":2,"label":"b"}]"#
        );

        let dup = serde_json::from_str::<KeyedCollection<Item>>(
            r#"[{"id":1,"label":"a"},{"id":1,"label":"b"}]"#,
        );
        assert!(dup.is_err());
    }
}
