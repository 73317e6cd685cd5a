//! # Category Specifications
//!
//! Categories group rules independently of their numbering. A
//! [`CategorySpecificationSet`] is the catalogue of categories that a
//! [`RuleCategoryMapping`](crate::RuleCategoryMapping) may refer to.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use rulekeep_core::{CategoryId, CollectionError, Keyed, KeyedCollection};

/// A named category of rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategorySpecification {
    /// The category id. Must equal the key it is stored under.
    pub id: CategoryId,
    /// Display name.
    pub readable_name: String,
    /// Longer description.
    pub readable_description: String,
}

impl CategorySpecification {
    /// Create a category specification.
    pub fn new(
        id: impl Into<CategoryId>,
        readable_name: impl Into<String>,
        readable_description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            readable_name: readable_name.into(),
            readable_description: readable_description.into(),
        }
    }
}

impl Keyed for CategorySpecification {
    type Key = CategoryId;
    const COLLECTION: &'static str = "category specification set";

    fn key(&self) -> &CategoryId {
        &self.id
    }
}

/// The category catalogue, indexed by category id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySpecificationSet {
    categories: KeyedCollection<CategorySpecification>,
}

impl CategorySpecificationSet {
    /// Build a set from category specifications.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateKey`] if two categories share an id.
    pub fn from_categories<I>(categories: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = CategorySpecification>,
    {
        KeyedCollection::from_entities(categories).map(|categories| Self { categories })
    }

    /// Build a set from an id-to-category map.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::KeyMismatch`] if a category is filed under
    /// an id other than its own.
    pub fn from_map(
        categories: BTreeMap<CategoryId, CategorySpecification>,
    ) -> Result<Self, CollectionError> {
        KeyedCollection::from_map(categories).map(|categories| Self { categories })
    }

    /// The category with id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingKey`] if there is no such category.
    pub fn category_by_id(
        &self,
        id: &CategoryId,
    ) -> Result<&CategorySpecification, CollectionError> {
        self.categories.get(id)
    }

    /// The set of category ids.
    pub fn category_ids(&self) -> BTreeSet<CategoryId> {
        self.categories.keys()
    }

    /// Whether category `id` exists.
    pub fn contains(&self, id: &CategoryId) -> bool {
        self.categories.contains_key(id)
    }

    /// Iterate over the categories in id order.
    pub fn iter(
        &self,
    ) -> std::collections::btree_map::Values<'_, CategoryId, CategorySpecification> {
        self.categories.iter()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'a> IntoIterator for &'a CategorySpecificationSet {
    type Item = &'a CategorySpecification;
    type IntoIter = std::collections::btree_map::Values<'a, CategoryId, CategorySpecification>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
